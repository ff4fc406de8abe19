//! Storage backend trait and implementations
//!
//! Settings are persisted as rows of a single table:
//!
//! | column        | type                         |
//! |---------------|------------------------------|
//! | `id`          | auto-increment primary key   |
//! | `plugin`      | string, at most 50 chars     |
//! | `name`        | string, at most 150 chars    |
//! | `value`       | long text                    |
//! | `description` | text                         |
//!
//! The `id` column is owned by the backend; the settings store only sees
//! [`SettingRow`]s.

mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use memory::{MemoryStorage, StorageOp};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStorage;

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// One row of the settings table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingRow {
    pub plugin: String,
    pub name: String,
    pub value: String,
    pub description: String,
}

impl SettingRow {
    pub fn new(
        plugin: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            plugin: plugin.into(),
            name: name.into(),
            value: value.into(),
            description: description.into(),
        }
    }
}

/// Trait for storage backend implementations
///
/// All calls are blocking. Each `insert`/`update` is expected to be atomic on
/// its own; callers do not wrap several of them in a transaction.
pub trait StorageBackend {
    /// Human readable backend name and version (e.g., "SQLite 3.46.0")
    fn describe(&self) -> String;

    /// Check whether the settings table exists
    fn table_exists(&self) -> Result<bool>;

    /// Create the settings table if it does not exist yet. Idempotent.
    fn ensure_schema(&self) -> Result<()>;

    /// Read every row, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaMissing`](crate::Error::SchemaMissing) if the
    /// table does not exist.
    fn fetch_rows(&self) -> Result<Vec<SettingRow>>;

    /// Append a new row
    fn insert(&self, row: &SettingRow) -> Result<()>;

    /// Overwrite value and description of the rows matching plugin and name
    fn update(&self, row: &SettingRow) -> Result<()>;
}
