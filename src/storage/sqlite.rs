//! SQLite storage backend

use super::{SettingRow, StorageBackend};
use crate::config::SiteConfig;
use crate::error::{Error, Result};
use log::{debug, info};
use rusqlite::{Connection, params};

/// Settings table stored in a SQLite database
pub struct SqliteStorage {
    conn: Connection,
    table: String,
}

impl SqliteStorage {
    /// Open (or create) the database file named by `config.database_path`.
    ///
    /// The settings table itself is not created here; see
    /// [`StorageBackend::ensure_schema`].
    pub fn open(config: &SiteConfig) -> Result<Self> {
        config.validate()?;
        let path = &config.database_path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        info!("Opening settings database at {}", path.display());
        let conn = Connection::open(path)?;
        Ok(Self {
            conn,
            table: config.table(),
        })
    }

    /// Open a private in-memory database - useful for tests.
    pub fn open_in_memory(config: &SiteConfig) -> Result<Self> {
        config.validate()?;
        debug!("Opening in-memory settings database");
        Ok(Self {
            conn: Connection::open_in_memory()?,
            table: config.table(),
        })
    }

    /// Wrap an existing connection
    pub fn from_connection(conn: Connection, config: &SiteConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            conn,
            table: config.table(),
        })
    }

    /// Full name of the settings table
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Turn "no such table" failures into [`Error::SchemaMissing`]
    fn classify(&self, err: rusqlite::Error) -> Error {
        match &err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.starts_with("no such table") => {
                Error::SchemaMissing(self.table.clone())
            }
            _ => Error::Database(err),
        }
    }
}

impl StorageBackend for SqliteStorage {
    fn describe(&self) -> String {
        format!("SQLite {}", rusqlite::version())
    }

    fn table_exists(&self) -> Result<bool> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE)",
            params![self.table],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn ensure_schema(&self) -> Result<()> {
        if self.table_exists()? {
            return Ok(());
        }

        // Tables created here get a unique (plugin, name) index. Tables that
        // predate it may hold duplicates and are left alone.
        let table = &self.table;
        self.conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                plugin VARCHAR(50) NOT NULL,
                name VARCHAR(150) NOT NULL,
                value TEXT NOT NULL,
                description TEXT NOT NULL
            );
            CREATE UNIQUE INDEX IF NOT EXISTS {table}_plugin_name ON {table} (plugin, name);"
        ))?;
        info!("Created settings table '{table}'");
        Ok(())
    }

    fn fetch_rows(&self) -> Result<Vec<SettingRow>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT plugin, name, value, description FROM {} ORDER BY id",
                self.table
            ))
            .map_err(|e| self.classify(e))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(SettingRow {
                    plugin: row.get(0)?,
                    name: row.get(1)?,
                    value: row.get(2)?,
                    description: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn insert(&self, row: &SettingRow) -> Result<()> {
        self.conn
            .execute(
                &format!(
                    "INSERT INTO {} (plugin, name, value, description) VALUES (?1, ?2, ?3, ?4)",
                    self.table
                ),
                params![row.plugin, row.name, row.value, row.description],
            )
            .map_err(|e| self.classify(e))?;
        Ok(())
    }

    fn update(&self, row: &SettingRow) -> Result<()> {
        self.conn
            .execute(
                &format!(
                    "UPDATE {} SET value = ?1, description = ?2 WHERE plugin = ?3 AND name = ?4",
                    self.table
                ),
                params![row.value, row.description, row.plugin, row.name],
            )
            .map_err(|e| self.classify(e))?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> SqliteStorage {
        let config = SiteConfig::builder("test", "1.0").table_prefix("uf_").build();
        SqliteStorage::open_in_memory(&config).unwrap()
    }

    #[test]
    fn test_missing_table_is_classified() {
        let storage = storage();

        assert!(!storage.table_exists().unwrap());
        let err = storage.fetch_rows().unwrap_err();
        assert!(err.is_schema_missing(), "unexpected error: {err}");
    }

    #[test]
    fn test_table_lookup_ignores_case() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE uf_configuration (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                plugin VARCHAR(50) NOT NULL,
                name VARCHAR(150) NOT NULL,
                value TEXT NOT NULL,
                description TEXT NOT NULL
            );
            INSERT INTO uf_configuration (plugin, name, value, description) VALUES ('p', 'n', 'a', '');
            INSERT INTO uf_configuration (plugin, name, value, description) VALUES ('p', 'n', 'b', '');",
        )
        .unwrap();

        let config = SiteConfig::builder("test", "1.0").table_prefix("UF_").build();
        let storage = SqliteStorage::from_connection(conn, &config).unwrap();

        assert!(storage.table_exists().unwrap());
        // Existing table with duplicates is left alone
        storage.ensure_schema().unwrap();
        assert_eq!(storage.fetch_rows().unwrap().len(), 2);

        let site = crate::SiteSettings::new(
            config,
            storage,
            &crate::RequestContext::new("http", "localhost", ""),
            crate::Defaults::new(),
        )
        .unwrap();
        assert_eq!(site.value("p", "n"), Some("b"));
        assert!(site.is_consistent().unwrap());
    }

    #[test]
    fn test_ensure_schema_then_roundtrip_rows() {
        let storage = storage();
        storage.ensure_schema().unwrap();
        storage.ensure_schema().unwrap();
        assert!(storage.table_exists().unwrap());

        storage
            .insert(&SettingRow::new("userfrosting", "site_title", "Foo", "Title"))
            .unwrap();
        storage
            .update(&SettingRow::new("userfrosting", "site_title", "Bar", "New title"))
            .unwrap();

        assert_eq!(
            storage.fetch_rows().unwrap(),
            vec![SettingRow::new("userfrosting", "site_title", "Bar", "New title")]
        );
    }

    #[test]
    fn test_new_tables_reject_duplicate_keys() {
        let storage = storage();
        storage.ensure_schema().unwrap();

        storage.insert(&SettingRow::new("p", "n", "a", "")).unwrap();
        let err = storage.insert(&SettingRow::new("p", "n", "b", "")).unwrap_err();
        assert!(matches!(err, Error::Database(_)));
    }

    #[test]
    fn test_rejects_invalid_table_name() {
        let config = SiteConfig::builder("test", "1.0").table_name("bad name").build();
        assert!(matches!(
            SqliteStorage::open_in_memory(&config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_describe_mentions_sqlite() {
        assert!(storage().describe().starts_with("SQLite "));
    }
}
