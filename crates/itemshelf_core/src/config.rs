//! Runtime settings.
//!
//! # Responsibility
//! - Load settings from a TOML file.
//! - Apply `ITEMSHELF_*` environment overrides on top of file values.
//! - Validate the merged result before anything opens storage.
//!
//! # Invariants
//! - `Settings::default()` always validates.
//! - Environment values take precedence over file values.

use crate::db::IN_MEMORY_PATH;
use crate::service::item_service::{ListLimits, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_DB_PATH: &str = "ITEMSHELF_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "ITEMSHELF_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "ITEMSHELF_LOG_DIR";
pub const ENV_LOG_TO_STDERR: &str = "ITEMSHELF_LOG_TO_STDERR";
pub const ENV_DEBUG: &str = "ITEMSHELF_DEBUG";
pub const ENV_DEFAULT_LIMIT: &str = "ITEMSHELF_DEFAULT_LIMIT";
pub const ENV_MAX_LIMIT: &str = "ITEMSHELF_MAX_LIMIT";

const DEFAULT_DB_FILE_NAME: &str = "itemshelf.sqlite3";
const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    InvalidValue {
        key: &'static str,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config file `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "failed to parse config file: {err}"),
            Self::InvalidValue { key, message } => write!(f, "invalid `{key}`: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// File path, or `:memory:` for a private in-memory store.
    pub path: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: DEFAULT_DB_FILE_NAME.to_string(),
        }
    }
}

impl DatabaseSettings {
    pub fn in_memory() -> Self {
        Self {
            path: IN_MEMORY_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    /// Absolute directory for rolling log files; no file logging when unset.
    pub dir: Option<String>,
    /// Mirror warnings and errors to stderr.
    pub duplicate_to_stderr: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: crate::logging::default_log_level().to_string(),
            dir: None,
            duplicate_to_stderr: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSettings {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIST_LIMIT,
            max_limit: MAX_LIST_LIMIT,
        }
    }
}

impl From<&ListingSettings> for ListLimits {
    fn from(value: &ListingSettings) -> Self {
        Self {
            default_limit: value.default_limit,
            max_limit: value.max_limit,
        }
    }
}

/// Top-level settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Forces `debug` log level when set.
    pub debug: bool,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
    pub listing: ListingSettings,
}

impl Settings {
    /// Loads a TOML file, applies environment overrides and validates.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML text, applies environment overrides and validates.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let mut settings: Settings = toml::from_str(content)?;
        settings.apply_env_overrides()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults plus environment overrides, validated.
    pub fn from_env() -> ConfigResult<Self> {
        let mut settings = Settings::default();
        settings.apply_env_overrides()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Applies `ITEMSHELF_*` variables from the process environment.
    pub fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DB_PATH) {
            self.database.path = path;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        if let Some(dir) = lookup(ENV_LOG_DIR) {
            self.logging.dir = Some(dir).filter(|value| !value.trim().is_empty());
        }
        if let Some(value) = lookup(ENV_LOG_TO_STDERR) {
            self.logging.duplicate_to_stderr = parse_flag(&value);
        }
        if let Some(value) = lookup(ENV_DEBUG) {
            self.debug = parse_flag(&value);
        }
        if let Some(value) = lookup(ENV_DEFAULT_LIMIT) {
            self.listing.default_limit = parse_u32(ENV_DEFAULT_LIMIT, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_LIMIT) {
            self.listing.max_limit = parse_u32(ENV_MAX_LIMIT, &value)?;
        }
        Ok(())
    }

    /// Validates merged settings.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.path.trim().is_empty() {
            return Err(invalid("database.path", "cannot be empty"));
        }

        let level = self.logging.level.trim().to_ascii_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) && level != "warning" {
            return Err(invalid(
                "logging.level",
                format!(
                    "`{}` is not one of {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join("|")
                ),
            ));
        }

        if let Some(dir) = self.logging.dir.as_deref() {
            if !Path::new(dir.trim()).is_absolute() {
                return Err(invalid(
                    "logging.dir",
                    format!("must be an absolute path, got `{dir}`"),
                ));
            }
        }

        if self.listing.max_limit == 0 {
            return Err(invalid("listing.max_limit", "must be positive"));
        }
        if self.listing.default_limit == 0 {
            return Err(invalid("listing.default_limit", "must be positive"));
        }
        if self.listing.default_limit > self.listing.max_limit {
            return Err(invalid(
                "listing.default_limit",
                format!(
                    "{} cannot exceed listing.max_limit ({})",
                    self.listing.default_limit, self.listing.max_limit
                ),
            ));
        }

        Ok(())
    }

    /// Log level after applying the `debug` switch.
    pub fn effective_log_level(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            self.logging.level.as_str()
        }
    }

    pub fn list_limits(&self) -> ListLimits {
        ListLimits::from(&self.listing)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

fn parse_u32(key: &'static str, value: &str) -> ConfigResult<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(key, format!("expected a non-negative integer, got `{value}`")))
}

fn invalid(key: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_settings_are_valid() {
        let settings = Settings::default();
        settings.validate().expect("defaults should validate");
        assert_eq!(settings.database.path, "itemshelf.sqlite3");
        assert_eq!(settings.listing.default_limit, 100);
    }

    #[test]
    fn overrides_take_precedence_over_file_values() {
        let mut settings: Settings = toml::from_str(
            r#"
            [database]
            path = "from-file.db"
            [logging]
            level = "warn"
            "#,
        )
        .expect("toml should parse");

        settings
            .apply_overrides_from(lookup_from(&[
                (ENV_DB_PATH, ":memory:"),
                (ENV_LOG_LEVEL, "error"),
                (ENV_LOG_TO_STDERR, "YES"),
                (ENV_MAX_LIMIT, "50"),
                (ENV_DEFAULT_LIMIT, "20"),
            ]))
            .expect("overrides should apply");

        assert_eq!(settings.database.path, ":memory:");
        assert_eq!(settings.logging.level, "error");
        assert!(settings.logging.duplicate_to_stderr);
        assert_eq!(settings.list_limits().max_limit, 50);
        assert_eq!(settings.list_limits().default_limit, 20);
        settings.validate().expect("merged settings should validate");
    }

    #[test]
    fn non_numeric_limit_override_is_rejected() {
        let mut settings = Settings::default();
        let err = settings
            .apply_overrides_from(lookup_from(&[(ENV_MAX_LIMIT, "lots")]))
            .expect_err("non-numeric limit must fail");
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: ENV_MAX_LIMIT,
                ..
            }
        ));
    }

    #[test]
    fn validate_rejects_default_limit_above_max() {
        let mut settings = Settings::default();
        settings.listing.default_limit = 10;
        settings.listing.max_limit = 5;
        let err = settings.validate().expect_err("default above max must fail");
        assert!(err.to_string().contains("listing.default_limit"));
    }

    #[test]
    fn validate_rejects_relative_log_dir_and_unknown_level() {
        let mut settings = Settings::default();
        settings.logging.dir = Some("logs".to_string());
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.logging.level = "loud".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn debug_switch_forces_debug_level() {
        let mut settings = Settings::default();
        settings.logging.level = "error".to_string();
        settings
            .apply_overrides_from(lookup_from(&[(ENV_DEBUG, "1")]))
            .expect("overrides should apply");
        assert_eq!(settings.effective_log_level(), "debug");
    }
}
