//! # sitecfg - Site Configuration Store
//!
//! A plugin-partitioned key-value store for web site settings, persisted in a
//! single relational table.
//!
//! ## Features
//!
//! - **Defaults + Storage**: Stored values are merged over in-code defaults, one (plugin, name) entry at a time
//! - **Lazy Bootstrap**: A missing settings table is created on first load
//! - **Minimal Writes**: `store()` inserts new keys and updates changed ones, nothing else
//! - **Admin UI Registry**: Expose settings with a label, widget type and select options
//! - **Request Environment**: Public, JS, CSS, favicon and image URIs derived from the request
//! - **Site Information**: Installed locales, themes and plugins, error log tail and system summary
//!
//! ## Quick Start
//!
//! ```rust
//! use sitecfg::{MemoryStorage, RequestContext, SiteConfig, SiteSettings, defaults};
//!
//! let mut site = SiteSettings::new(
//!     SiteConfig::default(),
//!     MemoryStorage::new(),
//!     &RequestContext::new("https", "example.com", ""),
//!     defaults! {
//!         "userfrosting" => {
//!             "site_title" => ("UserFrosting", "The title of the site."),
//!             "can_register" => ("1", "Allow public registration."),
//!         },
//!     },
//! )?;
//!
//! assert_eq!(site.get_core("site_title")?, "UserFrosting");
//! assert_eq!(site.get_core("uri.css")?, "https://example.com/css/");
//!
//! site.set_core("site_title", "My Site");
//! let report = site.store()?;
//! assert_eq!(report.inserted.len(), 2);
//! # Ok::<(), sitecfg::Error>(())
//! ```
//!
//! ## SQLite Storage
//!
//! With the default `sqlite` feature, settings live in a SQLite table named
//! `{table_prefix}{table_name}`:
//!
//! ```rust,no_run
//! # #[cfg(feature = "sqlite")]
//! # {
//! use sitecfg::{ProcessEnv, RequestContext, SiteConfig, SiteSettings, defaults};
//!
//! let config = SiteConfig::builder("my-site", "1.0.0")
//!     .database_path("~/.local/share/my-site/site.db")
//!     .table_prefix("uf_")
//!     .build();
//!
//! let site = SiteSettings::open(
//!     config,
//!     &RequestContext::from_env(&ProcessEnv),
//!     defaults! { "userfrosting" => { "site_title" => ("UserFrosting", "") } },
//! )?;
//! println!("{:?}", site.system_info());
//! # }
//! # Ok::<(), sitecfg::Error>(())
//! ```
//!
//! ## Admin UI Registration
//!
//! ```rust
//! use sitecfg::{MemoryStorage, SiteSettings, opt};
//!
//! let mut site = SiteSettings::builder(MemoryStorage::new())
//!     .setting("userfrosting", "can_register", "1", "Allow public registration.")
//!     .build()?;
//!
//! site.register(
//!     "userfrosting",
//!     "can_register",
//!     "Public Registration",
//!     "toggle",
//!     vec![opt("0", "Off"), opt("1", "On")],
//! )?;
//!
//! let json = serde_json::to_string(site.registered_settings())?;
//! assert!(json.contains("\"type\":\"toggle\""));
//! # Ok::<(), sitecfg::Error>(())
//! ```

// Core modules
mod environment;
mod error;
mod manager;
mod site_info;
pub mod storage;
mod sync;

// Grouped modules
pub mod config;

// Re-exports from core
pub use environment::{EnvSource, Environment, ProcessEnv, RequestContext, SiteUris};
pub use error::{Error, Result};
pub use manager::{SettingKey, SiteSettings, SiteSettingsBuilder, StoreReport};
pub use site_info::{LOG_UNAVAILABLE, LogReport, list_files_with_extension, list_subdirectories};
#[cfg(feature = "sqlite")]
pub use storage::SqliteStorage;
pub use storage::{MemoryStorage, SettingRow, StorageBackend, StorageOp};

// =============================================================================
// Convenient Type Aliases
// =============================================================================

/// Site settings persisted in SQLite.
///
/// # Example
/// ```no_run
/// use sitecfg::{Defaults, RequestContext, SiteConfig, SqliteSiteSettings};
///
/// let config = SiteConfig::builder("my-site", "1.0.0")
///     .database_path("/tmp/my-site.db")
///     .build();
/// let site = SqliteSiteSettings::open(config, &RequestContext::new("http", "localhost", ""), Defaults::new())?;
/// # Ok::<(), sitecfg::Error>(())
/// ```
#[cfg(feature = "sqlite")]
pub type SqliteSiteSettings = SiteSettings<SqliteStorage>;

/// Site settings kept in process memory (useful for tests).
pub type MemorySiteSettings = SiteSettings<MemoryStorage>;

// Re-exports from config
pub use config::{
    CORE_PLUGIN, Defaults, RegisteredSetting, RegistryTable, Setting, SettingOption, SettingType,
    SettingsTable, SiteConfig, SiteConfigBuilder, opt,
};
