//! Item repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide typed CRUD APIs over the `items` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `ItemDraft::validate()` before SQL mutations.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Listing order is insertion order (`id ASC`).

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::item::{Item, ItemDraft, ItemId, ItemValidationError};
use log::{debug, info};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const ITEM_SELECT_SQL: &str = "SELECT id, name, description FROM items";
const ITEM_RETURNING_SQL: &str = "RETURNING id, name, description";
const REQUIRED_ITEM_COLUMNS: [&str; 5] = ["id", "name", "description", "created_at", "updated_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for item persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Input failed domain validation.
    Validation(ItemValidationError),
    /// Query options are unusable, e.g. a zero page size.
    InvalidQuery(String),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Target item does not exist.
    NotFound(ItemId),
    /// Persisted data cannot be converted to a valid `Item`.
    InvalidData(String),
    /// A write succeeded but its read-back did not observe it.
    InconsistentState(&'static str),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidQuery(message) => write!(f, "invalid item query: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "item not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted item data: {message}"),
            Self::InconsistentState(details) => write!(f, "inconsistent item state: {details}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "item repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "item repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "item repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ItemValidationError> for RepoError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Offset/limit window for listing items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemListQuery {
    /// `None` lists everything after `offset`.
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for item CRUD operations.
pub trait ItemRepository {
    fn list_items(&self, query: &ItemListQuery) -> RepoResult<Vec<Item>>;
    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>>;
    /// Inserts a new row and returns the store-assigned id.
    fn insert_item(&self, draft: &ItemDraft) -> RepoResult<ItemId>;
    /// Replaces name and description; `RepoError::NotFound` when absent.
    fn replace_item(&self, id: ItemId, draft: &ItemDraft) -> RepoResult<()>;
    /// Removes a row and returns it as it was right before removal.
    fn delete_item(&self, id: ItemId) -> RepoResult<Option<Item>>;
}

/// SQLite-backed item repository.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema was
    ///   tampered with after stamping.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_item_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn list_items(&self, query: &ItemListQuery) -> RepoResult<Vec<Item>> {
        let mut sql = format!("{ITEM_SELECT_SQL} ORDER BY id ASC");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        debug!(
            "event=item_list module=repo status=ok offset={} limit={:?} count={}",
            query.offset,
            query.limit,
            items.len()
        );
        Ok(items)
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.as_i64()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(row)?));
        }

        Ok(None)
    }

    fn insert_item(&self, draft: &ItemDraft) -> RepoResult<ItemId> {
        draft.validate()?;
        let started_at = Instant::now();

        self.conn.execute(
            "INSERT INTO items (name, description) VALUES (?1, ?2);",
            params![draft.name.as_str(), draft.description.as_deref()],
        )?;

        let row_id = self.conn.last_insert_rowid();
        let id = ItemId::from_row_id(row_id).ok_or_else(|| {
            RepoError::InvalidData(format!("store assigned non-positive id `{row_id}`"))
        })?;

        info!(
            "event=item_create module=repo status=ok id={} duration_ms={}",
            id,
            started_at.elapsed().as_millis()
        );
        Ok(id)
    }

    fn replace_item(&self, id: ItemId, draft: &ItemDraft) -> RepoResult<()> {
        draft.validate()?;
        let started_at = Instant::now();

        let changed = self.conn.execute(
            "UPDATE items
             SET
                name = ?1,
                description = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?3;",
            params![draft.name.as_str(), draft.description.as_deref(), id.as_i64()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        info!(
            "event=item_update module=repo status=ok id={} duration_ms={}",
            id,
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        let started_at = Instant::now();

        let mut stmt = self
            .conn
            .prepare(&format!("DELETE FROM items WHERE id = ?1 {ITEM_RETURNING_SQL};"))?;
        let deleted = stmt
            .query_row([id.as_i64()], |row| {
                Ok((
                    row.get::<_, i64>("id")?,
                    row.get::<_, String>("name")?,
                    row.get::<_, Option<String>>("description")?,
                ))
            })
            .optional()?;

        let Some((row_id, name, description)) = deleted else {
            return Ok(None);
        };

        let item = build_item(row_id, name, description)?;
        info!(
            "event=item_delete module=repo status=ok id={} duration_ms={}",
            item.id,
            started_at.elapsed().as_millis()
        );
        Ok(Some(item))
    }
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    build_item(row.get("id")?, row.get("name")?, row.get("description")?)
}

fn build_item(row_id: i64, name: String, description: Option<String>) -> RepoResult<Item> {
    let id = ItemId::from_row_id(row_id)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid id value `{row_id}` in items.id")))?;
    let item = Item {
        id,
        name,
        description,
    };
    item.validate().map_err(|err| {
        RepoError::InvalidData(format!("row {row_id} in items violates model: {err}"))
    })?;
    Ok(item)
}

fn ensure_item_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "items")? {
        return Err(RepoError::MissingRequiredTable("items"));
    }

    for column in REQUIRED_ITEM_COLUMNS {
        if !table_has_column(conn, "items", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "items",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
