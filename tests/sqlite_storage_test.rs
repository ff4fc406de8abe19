//! SQLite Storage Integration Tests
//!
//! Runs the load/store lifecycle against a temporary database file.

mod common;

use common::{test_context, test_defaults};
use rusqlite::Connection;
use sitecfg::{
    Defaults, SettingKey, SiteConfig, SiteSettings, SqliteStorage, StorageBackend,
};
use std::path::Path;
use tempfile::TempDir;

fn config(dir: &Path) -> SiteConfig {
    SiteConfig::builder("test-site", "1.0.0")
        .database_path(dir.join("data").join("site.db"))
        .table_prefix("uf_")
        .build()
}

fn open(dir: &Path, defaults: Defaults) -> SiteSettings<SqliteStorage> {
    SiteSettings::open(config(dir), &test_context(), defaults).unwrap()
}

#[test]
fn test_first_open_creates_table_and_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let site = open(temp_dir.path(), test_defaults());

    assert!(temp_dir.path().join("data").join("site.db").exists());
    assert!(site.storage().table_exists().unwrap());
    assert_eq!(site.storage().table(), "uf_configuration");
    assert_eq!(site.get_core("site_title").unwrap(), "UserFrosting");
    assert!(site.fetch_settings().unwrap().is_empty());
}

#[test]
fn test_store_and_reopen() {
    let temp_dir = TempDir::new().unwrap();

    {
        let mut site = open(temp_dir.path(), test_defaults());
        site.set_core("site_title", "Persisted");
        let report = site.store().unwrap();
        assert_eq!(report.inserted.len(), 4);
    }

    let site = open(temp_dir.path(), test_defaults());
    assert_eq!(site.get_core("site_title").unwrap(), "Persisted");
    assert!(site.is_consistent().unwrap());
    assert!(site.store().unwrap().is_empty());
}

#[test]
fn test_upsert_against_existing_row() {
    let temp_dir = TempDir::new().unwrap();
    {
        let site = open(
            temp_dir.path(),
            Defaults::new().setting("p1", "n1", "a", "d1"),
        );
        site.store().unwrap();
    }

    let mut site = open(temp_dir.path(), Defaults::new());
    assert_eq!(site.value("p1", "n1"), Some("a"));

    site.set("p1", "n1", Some("b"), None);
    site.set("p1", "n2", Some("c"), Some("d2"));

    let report = site.store().unwrap();
    assert_eq!(report.updated, vec![SettingKey::new("p1", "n1")]);
    assert_eq!(report.inserted, vec![SettingKey::new("p1", "n2")]);
    assert!(site.store().unwrap().is_empty());

    let stored = site.fetch_settings().unwrap();
    assert_eq!(stored["p1"]["n1"].value, "b");
    assert_eq!(stored["p1"]["n1"].description, "d1");
    assert_eq!(stored["p1"]["n2"].description, "d2");
}

#[test]
fn test_legacy_table_with_duplicates_loads_last_row() {
    let temp_dir = TempDir::new().unwrap();
    let config = config(temp_dir.path());
    std::fs::create_dir_all(temp_dir.path().join("data")).unwrap();

    // A table created without the unique index
    let conn = Connection::open(&config.database_path).unwrap();
    conn.execute_batch(
        "CREATE TABLE uf_configuration (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            plugin VARCHAR(50) NOT NULL,
            name VARCHAR(150) NOT NULL,
            value TEXT NOT NULL,
            description TEXT NOT NULL
        );
        INSERT INTO uf_configuration (plugin, name, value, description)
            VALUES ('userfrosting', 'site_title', 'Old', '');
        INSERT INTO uf_configuration (plugin, name, value, description)
            VALUES ('userfrosting', 'site_title', 'New', '');",
    )
    .unwrap();

    let storage = SqliteStorage::from_connection(conn, &config).unwrap();
    let mut site = SiteSettings::new(config, storage, &test_context(), Defaults::new()).unwrap();
    assert_eq!(site.get_core("site_title").unwrap(), "New");

    // Updates reach every duplicate
    site.set_core("site_title", "Newest");
    site.store().unwrap();

    let count: i64 = site
        .storage()
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM uf_configuration WHERE value = 'Newest'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn test_system_info_reports_sqlite() {
    let temp_dir = TempDir::new().unwrap();
    let site = open(temp_dir.path(), Defaults::new());

    let info = site.system_info();
    assert!(info["database"].starts_with("SQLite "));
    assert_eq!(info["table"], "uf_configuration");
}
