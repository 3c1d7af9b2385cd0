//! Item persistence gateway.
//!
//! # Responsibility
//! - Expose list/get/create/update/delete over string item ids.
//! - Hide the native identifier encoding from transport callers.
//! - Re-read after writes so callers see what storage actually holds.
//!
//! # Invariants
//! - "Not found" is always `Ok(None)`, never an error.
//! - Malformed id text is treated as not found at this boundary only.
//! - Validation failures are returned as `RepoError::Validation` or
//!   `RepoError::InvalidQuery`.

use crate::model::item::{Item, ItemDraft, ItemId};
use crate::repo::item_repo::{ItemListQuery, ItemRepository, RepoError, RepoResult};
use log::debug;

/// Default page size used when the caller does not pick one.
pub const DEFAULT_LIST_LIMIT: u32 = 100;
/// Largest page size the gateway will hand to storage.
pub const MAX_LIST_LIMIT: u32 = 1000;

/// Page size bounds applied by `ItemService::list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLimits {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for ListLimits {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIST_LIMIT,
            max_limit: MAX_LIST_LIMIT,
        }
    }
}

/// Use-case gateway for item CRUD.
pub struct ItemService<R: ItemRepository> {
    repo: R,
    limits: ListLimits,
}

impl<R: ItemRepository> ItemService<R> {
    /// Creates a gateway with default listing limits.
    pub fn new(repo: R) -> Self {
        Self::with_limits(repo, ListLimits::default())
    }

    pub fn with_limits(repo: R, limits: ListLimits) -> Self {
        Self { repo, limits }
    }

    pub fn limits(&self) -> ListLimits {
        self.limits
    }

    /// Lists up to `limit` items after skipping `skip`, in insertion order.
    ///
    /// # Contract
    /// - `limit == 0` is rejected with `RepoError::InvalidQuery`.
    /// - `limit` above `max_limit` is clamped.
    /// - An empty window yields an empty vector.
    pub fn list(&self, skip: u32, limit: u32) -> RepoResult<Vec<Item>> {
        if limit == 0 {
            return Err(RepoError::InvalidQuery(
                "limit must be a positive integer".to_string(),
            ));
        }

        self.repo.list_items(&ItemListQuery {
            limit: Some(limit.min(self.limits.max_limit)),
            offset: skip,
        })
    }

    /// Lists using the configured default page size.
    pub fn list_default(&self, skip: u32) -> RepoResult<Vec<Item>> {
        self.list(skip, self.limits.default_limit)
    }

    /// Gets one item by its external id.
    pub fn get(&self, id: &str) -> RepoResult<Option<Item>> {
        match parse_external_id(id, "get") {
            Some(item_id) => self.repo.get_item(item_id),
            None => Ok(None),
        }
    }

    /// Persists a new item and returns the stored record.
    ///
    /// # Contract
    /// - The returned record is read back from storage, not echoed input.
    pub fn create(&self, draft: &ItemDraft) -> RepoResult<Item> {
        let id = self.repo.insert_item(draft)?;
        self.repo
            .get_item(id)?
            .ok_or(RepoError::InconsistentState("created item missing on read-back"))
    }

    /// Replaces name and description of an existing item.
    ///
    /// # Contract
    /// - Returns the post-update record, or `None` when `id` does not exist.
    /// - Absent ids cause no writes.
    pub fn update(&self, id: &str, draft: &ItemDraft) -> RepoResult<Option<Item>> {
        let Some(item_id) = parse_external_id(id, "update") else {
            draft.validate()?;
            return Ok(None);
        };

        match self.repo.replace_item(item_id, draft) {
            Ok(()) => {}
            Err(RepoError::NotFound(_)) => return Ok(None),
            Err(err) => return Err(err),
        }

        self.repo
            .get_item(item_id)?
            .map(Some)
            .ok_or(RepoError::InconsistentState("updated item missing on read-back"))
    }

    /// Deletes an item and returns it as it was right before removal.
    pub fn delete(&self, id: &str) -> RepoResult<Option<Item>> {
        match parse_external_id(id, "delete") {
            Some(item_id) => self.repo.delete_item(item_id),
            None => Ok(None),
        }
    }
}

fn parse_external_id(id: &str, operation: &'static str) -> Option<ItemId> {
    match id.parse::<ItemId>() {
        Ok(item_id) => Some(item_id),
        Err(_) => {
            debug!(
                "event=item_id_rejected module=service status=not_found operation={operation} id_len={}",
                id.len()
            );
            None
        }
    }
}
