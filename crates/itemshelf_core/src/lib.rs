//! Core item storage for itemshelf.
//! This crate is the single source of truth for item invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, DatabaseSettings, ListingSettings, LoggingSettings, Settings};
pub use db::{Database, DbError};
pub use logging::{default_log_level, init_from_settings, init_logging, logging_status};
pub use model::item::{Item, ItemDraft, ItemId, ItemIdParseError, ItemValidationError};
pub use repo::item_repo::{
    ItemListQuery, ItemRepository, RepoError, RepoResult, SqliteItemRepository,
};
pub use service::item_service::{ItemService, ListLimits};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
