//! Item domain model.
//!
//! # Responsibility
//! - Define the canonical item record and its id-less draft input.
//! - Own the string representation of store-assigned identifiers.
//!
//! # Invariants
//! - `ItemId` is assigned by storage and never reused for another item.
//! - `name` is never empty or whitespace-only.
//! - Serialized `id` is always a decimal string.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Store-assigned item identifier.
///
/// Natively a SQLite rowid; rendered to callers as a decimal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(i64);

impl ItemId {
    /// Wraps a rowid read back from storage.
    ///
    /// Only positive values are ever produced by the `items` table.
    pub fn from_row_id(value: i64) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rejected textual item id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemIdParseError {
    pub input: String,
}

impl Display for ItemIdParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid item id `{}`", self.input)
    }
}

impl Error for ItemIdParseError {}

impl FromStr for ItemId {
    type Err = ItemIdParseError;

    /// Accepts plain positive decimal text only (no sign, no whitespace).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let reject = || ItemIdParseError {
            input: value.to_string(),
        };
        if value.is_empty() || !value.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(reject());
        }
        value
            .parse::<i64>()
            .ok()
            .and_then(Self::from_row_id)
            .ok_or_else(reject)
    }
}

impl Serialize for ItemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

/// Domain validation failures for item fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    /// `name` is empty or whitespace-only.
    EmptyName,
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "item name must not be empty"),
        }
    }
}

impl Error for ItemValidationError {}

/// Id-less item fields used for create and full-replacement update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DraftWire")]
pub struct ItemDraft {
    pub name: String,
    pub description: Option<String>,
}

impl ItemDraft {
    /// Builds a validated draft.
    ///
    /// An empty `description` is kept as `Some("")`; only `None` means absent.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
    ) -> Result<Self, ItemValidationError> {
        let draft = Self {
            name: name.into(),
            description,
        };
        draft.validate()?;
        Ok(draft)
    }

    pub fn validate(&self) -> Result<(), ItemValidationError> {
        validate_name(&self.name)
    }
}

/// Canonical stored item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ItemWire")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: Option<String>,
}

impl Item {
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        validate_name(&self.name)
    }

    /// Returns the mutable fields as a draft, e.g. to prefill an edit.
    pub fn to_draft(&self) -> ItemDraft {
        ItemDraft {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

fn validate_name(name: &str) -> Result<(), ItemValidationError> {
    if name.trim().is_empty() {
        return Err(ItemValidationError::EmptyName);
    }
    Ok(())
}

#[derive(Deserialize)]
struct DraftWire {
    name: String,
    #[serde(default)]
    description: Option<String>,
}

impl TryFrom<DraftWire> for ItemDraft {
    type Error = ItemValidationError;

    fn try_from(value: DraftWire) -> Result<Self, Self::Error> {
        Self::new(value.name, value.description)
    }
}

#[derive(Deserialize)]
struct ItemWire {
    id: ItemId,
    name: String,
    #[serde(default)]
    description: Option<String>,
}

impl TryFrom<ItemWire> for Item {
    type Error = ItemValidationError;

    fn try_from(value: ItemWire) -> Result<Self, Self::Error> {
        let item = Self {
            id: value.id,
            name: value.name,
            description: value.description,
        };
        item.validate()?;
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::{ItemDraft, ItemId, ItemValidationError};

    #[test]
    fn item_id_parses_plain_decimal() {
        let id: ItemId = "42".parse().expect("decimal id should parse");
        assert_eq!(id.as_i64(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn item_id_rejects_non_canonical_text() {
        for input in ["", "abc", "-1", "+1", " 1", "1 ", "0", "1.0", "99999999999999999999"] {
            let err = input.parse::<ItemId>().expect_err("input should be rejected");
            assert_eq!(err.input, input);
        }
    }

    #[test]
    fn draft_rejects_blank_name() {
        assert_eq!(
            ItemDraft::new("   ", None).unwrap_err(),
            ItemValidationError::EmptyName
        );
    }

    #[test]
    fn draft_keeps_fields_verbatim() {
        let draft = ItemDraft::new(" milk ", Some(String::new())).expect("valid draft");
        assert_eq!(draft.name, " milk ");
        assert_eq!(draft.description.as_deref(), Some(""));
    }
}
