//! Common test utilities for sitecfg integration tests
//!
//! Provides shared test fixtures, default settings, and helper functions.

#![allow(dead_code)]

use sitecfg::{
    Defaults, MemoryStorage, RequestContext, SettingRow, SiteConfig, SiteSettings, defaults,
};
use std::path::PathBuf;
use tempfile::TempDir;

// =============================================================================
// Test Defaults
// =============================================================================

/// Defaults covering the core plugin and one third-party plugin
pub fn test_defaults() -> Defaults {
    defaults! {
        "userfrosting" => {
            "site_title" => ("UserFrosting", "The title of the site."),
            "admin_email" => ("admin@example.com", "Site administrator address."),
            "can_register" => ("1", "Allow public registration."),
        },
        "blog" => {
            "posts_per_page" => ("10", "Posts shown on each page."),
        },
    }
}

/// The request context used across tests
pub fn test_context() -> RequestContext {
    RequestContext::new("https", "example.com", "/site")
}

pub fn row(plugin: &str, name: &str, value: &str, description: &str) -> SettingRow {
    SettingRow::new(plugin, name, value, description)
}

// =============================================================================
// Test Fixtures
// =============================================================================

/// Test fixture with an in-memory table shared with the settings store
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub storage: MemoryStorage,
    pub site: SiteSettings<MemoryStorage>,
}

impl TestFixture {
    /// Create a fixture whose settings table does not exist yet
    pub fn new() -> Self {
        Self::with_storage(MemoryStorage::new())
    }

    /// Create a fixture whose table already holds `rows`
    pub fn with_rows(rows: Vec<SettingRow>) -> Self {
        Self::with_storage(MemoryStorage::with_rows(rows))
    }

    fn with_storage(storage: MemoryStorage) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let site = SiteSettings::new(
            Self::config_for(&temp_dir),
            storage.clone(),
            &test_context(),
            test_defaults(),
        )
        .expect("Failed to create settings store");

        Self {
            temp_dir,
            storage,
            site,
        }
    }

    /// Load a second store over the same table, as a later request would
    pub fn reload(&self) -> SiteSettings<MemoryStorage> {
        SiteSettings::new(
            Self::config_for(&self.temp_dir),
            self.storage.clone(),
            &test_context(),
            test_defaults(),
        )
        .expect("Failed to reload settings store")
    }

    fn config_for(temp_dir: &TempDir) -> SiteConfig {
        SiteConfig::builder("test-site", "1.0.0")
            .database_path(temp_dir.path().join("site.db"))
            .table_prefix("uf_")
            .app_root(temp_dir.path())
            .build()
    }

    /// Get the temporary site directory
    pub fn site_dir(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Value stored for (plugin, name), if exactly one row holds it
pub fn stored_value(storage: &MemoryStorage, plugin: &str, name: &str) -> Option<String> {
    let matches: Vec<_> = storage
        .rows()
        .into_iter()
        .filter(|r| r.plugin == plugin && r.name == name)
        .collect();
    match matches.as_slice() {
        [only] => Some(only.value.clone()),
        _ => None,
    }
}
