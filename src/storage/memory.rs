//! In-memory storage backend for testing and embedding

use super::{SettingRow, StorageBackend};
use crate::error::{Error, Result};
use crate::sync::RwLockExt;
use std::sync::{Arc, RwLock};

/// A write issued against a [`MemoryStorage`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageOp {
    CreateTable,
    Insert(SettingRow),
    Update(SettingRow),
}

#[derive(Default)]
struct MemoryTable {
    /// `None` until the table is created
    rows: Option<Vec<SettingRow>>,
    journal: Vec<StorageOp>,
    fault: Option<String>,
}

/// In-memory settings table (not persisted)
///
/// Clones share the same table, so a handle kept by a test observes every
/// write made through the store that owns another clone. Writes are recorded
/// in a journal.
#[derive(Clone)]
pub struct MemoryStorage {
    inner: Arc<RwLock<MemoryTable>>,
    table: String,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self {
            inner: Arc::default(),
            table: "configuration".to_string(),
        }
    }
}

impl MemoryStorage {
    /// Create a storage whose settings table does not exist yet
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage with an existing table holding `rows`
    #[must_use]
    pub fn with_rows(rows: Vec<SettingRow>) -> Self {
        let storage = Self::new();
        storage.inner.write_recovered().rows = Some(rows);
        storage
    }

    /// Set the table name reported in errors (default: "configuration")
    #[must_use]
    pub fn named(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Name of the settings table
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Snapshot of the current rows (empty if the table does not exist)
    pub fn rows(&self) -> Vec<SettingRow> {
        self.inner.read_recovered().rows.clone().unwrap_or_default()
    }

    /// Writes issued since creation or the last [`clear_journal`](Self::clear_journal)
    pub fn journal(&self) -> Vec<StorageOp> {
        self.inner.read_recovered().journal.clone()
    }

    pub fn clear_journal(&self) {
        self.inner.write_recovered().journal.clear();
    }

    /// Make every following operation fail with `Error::Storage(message)`
    pub fn fail_with(&self, message: impl Into<String>) {
        self.inner.write_recovered().fault = Some(message.into());
    }

    /// Stop injecting failures
    pub fn recover(&self) {
        self.inner.write_recovered().fault = None;
    }

    fn check_fault(table: &MemoryTable) -> Result<()> {
        match &table.fault {
            Some(message) => Err(Error::Storage(message.clone())),
            None => Ok(()),
        }
    }
}

impl StorageBackend for MemoryStorage {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn table_exists(&self) -> Result<bool> {
        let table = self.inner.read_recovered();
        Self::check_fault(&table)?;
        Ok(table.rows.is_some())
    }

    fn ensure_schema(&self) -> Result<()> {
        let mut table = self.inner.write_recovered();
        Self::check_fault(&table)?;
        if table.rows.is_none() {
            table.rows = Some(Vec::new());
            table.journal.push(StorageOp::CreateTable);
        }
        Ok(())
    }

    fn fetch_rows(&self) -> Result<Vec<SettingRow>> {
        let table = self.inner.read_recovered();
        Self::check_fault(&table)?;
        table
            .rows
            .clone()
            .ok_or_else(|| Error::SchemaMissing(self.table.clone()))
    }

    fn insert(&self, row: &SettingRow) -> Result<()> {
        let mut table = self.inner.write_recovered();
        Self::check_fault(&table)?;
        let rows = table
            .rows
            .as_mut()
            .ok_or_else(|| Error::SchemaMissing(self.table.clone()))?;
        rows.push(row.clone());
        table.journal.push(StorageOp::Insert(row.clone()));
        Ok(())
    }

    fn update(&self, row: &SettingRow) -> Result<()> {
        let mut table = self.inner.write_recovered();
        Self::check_fault(&table)?;
        let rows = table
            .rows
            .as_mut()
            .ok_or_else(|| Error::SchemaMissing(self.table.clone()))?;
        for existing in rows
            .iter_mut()
            .filter(|r| r.plugin == row.plugin && r.name == row.name)
        {
            existing.value.clone_from(&row.value);
            existing.description.clone_from(&row.description);
        }
        table.journal.push(StorageOp::Update(row.clone()));
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_table() {
        let storage = MemoryStorage::new();

        assert!(!storage.table_exists().unwrap());
        assert!(matches!(storage.fetch_rows(), Err(Error::SchemaMissing(_))));
        assert!(matches!(
            storage.insert(&SettingRow::new("p", "n", "v", "d")),
            Err(Error::SchemaMissing(_))
        ));
    }

    #[test]
    fn test_missing_table_error_names_the_table() {
        let err = MemoryStorage::new().fetch_rows().unwrap_err();
        assert!(matches!(err, Error::SchemaMissing(ref t) if t == "configuration"));

        let err = MemoryStorage::new().named("uf_config").fetch_rows().unwrap_err();
        assert_eq!(err.to_string(), "Settings table 'uf_config' does not exist");
    }

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let storage = MemoryStorage::new();

        storage.ensure_schema().unwrap();
        storage.ensure_schema().unwrap();

        assert!(storage.table_exists().unwrap());
        assert_eq!(storage.journal(), vec![StorageOp::CreateTable]);
    }

    #[test]
    fn test_insert_and_update() {
        let storage = MemoryStorage::with_rows(Vec::new());

        storage.insert(&SettingRow::new("p", "n", "a", "d")).unwrap();
        storage.update(&SettingRow::new("p", "n", "b", "d2")).unwrap();

        assert_eq!(storage.rows(), vec![SettingRow::new("p", "n", "b", "d2")]);
        assert_eq!(storage.journal().len(), 2);
    }

    #[test]
    fn test_update_touches_every_duplicate() {
        let storage = MemoryStorage::with_rows(vec![
            SettingRow::new("p", "n", "a", ""),
            SettingRow::new("p", "other", "x", ""),
            SettingRow::new("p", "n", "b", ""),
        ]);

        storage.update(&SettingRow::new("p", "n", "c", "")).unwrap();

        let values: Vec<_> = storage.rows().into_iter().map(|r| r.value).collect();
        assert_eq!(values, vec!["c", "x", "c"]);
    }

    #[test]
    fn test_clones_share_rows() {
        let storage = MemoryStorage::with_rows(Vec::new());
        let handle = storage.clone();

        storage.insert(&SettingRow::new("p", "n", "v", "")).unwrap();
        assert_eq!(handle.rows().len(), 1);
    }

    #[test]
    fn test_injected_fault() {
        let storage = MemoryStorage::with_rows(Vec::new());
        storage.fail_with("connection reset");

        assert!(matches!(storage.fetch_rows(), Err(Error::Storage(_))));

        storage.recover();
        assert!(storage.fetch_rows().is_ok());
    }
}
