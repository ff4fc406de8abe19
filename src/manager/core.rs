use crate::config::{Defaults, RegistryTable, SettingsTable, SiteConfig};
use crate::environment::{Environment, RequestContext};
use crate::error::{Error, Result};
use crate::manager::io::merge_stored;
use crate::storage::StorageBackend;

use log::info;
use std::collections::BTreeMap;

/// Plugin-partitioned site settings backed by a storage table.
///
/// A `SiteSettings` is built once per request:
///
/// - **Load**: defaults are merged with the rows found in storage; stored
///   values win per (plugin, name)
/// - **Access**: `get_core`/`set_core` for the core plugin, `value`/`set` for any plugin
/// - **Register**: expose settings in the admin UI with a label and widget type
/// - **Store**: write back what changed, inserting new keys and updating modified ones
///
/// The store holds no locks. Mutating methods take `&mut self`; share an
/// instance across threads only behind external synchronization.
///
/// # Example
///
/// ```rust
/// use sitecfg::{MemoryStorage, RequestContext, SiteConfig, SiteSettings, defaults};
///
/// let mut site = SiteSettings::new(
///     SiteConfig::default(),
///     MemoryStorage::new(),
///     &RequestContext::new("https", "example.com", ""),
///     defaults! { "userfrosting" => { "site_title" => ("Foo", "The title of the site.") } },
/// )?;
///
/// assert_eq!(site.get_core("site_title")?, "Foo");
/// site.set_core("site_title", "Bar");
/// let report = site.store()?;
/// assert_eq!(report.inserted.len(), 1);
/// # Ok::<(), sitecfg::Error>(())
/// ```
pub struct SiteSettings<S: StorageBackend> {
    /// Configuration
    pub(crate) config: SiteConfig,

    /// Storage backend
    pub(crate) storage: S,

    /// Values derived from the request, read-only after construction
    pub(crate) environment: Environment,

    /// Current settings (defaults merged with storage, plus in-memory edits)
    pub(crate) settings: SettingsTable,

    /// Settings registered for the admin UI. Never persisted.
    pub(crate) registered: RegistryTable,
}

impl<S: StorageBackend> SiteSettings<S> {
    /// Build the settings store, loading stored values over `defaults`.
    ///
    /// If the settings table does not exist it is created and the store
    /// starts from the defaults alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, or if reading storage
    /// fails for any reason other than the table being absent.
    pub fn new(
        config: SiteConfig,
        storage: S,
        context: &RequestContext,
        defaults: Defaults,
    ) -> Result<Self> {
        config.validate()?;

        let mut site = Self {
            config,
            storage,
            environment: Environment::from_context(context),
            settings: defaults.into_table(),
            registered: BTreeMap::new(),
        };

        match site.fetch_settings() {
            Ok(stored) => {
                let merged = merge_stored(&mut site.settings, stored);
                info!(
                    "Loaded {merged} stored settings from {}",
                    site.storage.describe()
                );
            }
            Err(Error::SchemaMissing(table)) => {
                info!("Settings table '{table}' does not exist, creating it and using defaults");
                site.storage.ensure_schema()?;
            }
            Err(e) => return Err(e),
        }

        Ok(site)
    }

    /// Create the settings table if it is missing.
    ///
    /// Idempotent; call it once at startup to keep table creation out of
    /// request handling.
    pub fn ensure_schema(&self) -> Result<()> {
        self.storage.ensure_schema()
    }

    /// Get the configuration
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Get the storage backend
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Get the request environment
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// All current settings, keyed by plugin then name
    pub fn settings(&self) -> &SettingsTable {
        &self.settings
    }

    /// Consume the store, returning the storage backend
    pub fn into_storage(self) -> S {
        self.storage
    }
}

#[cfg(feature = "sqlite")]
impl SiteSettings<crate::storage::SqliteStorage> {
    /// Open the SQLite database named by `config` and load settings from it.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use sitecfg::{Defaults, RequestContext, SiteConfig, SiteSettings};
    ///
    /// let config = SiteConfig::builder("my-site", "1.0.0")
    ///     .database_path("~/.local/share/my-site/site.db")
    ///     .table_prefix("uf_")
    ///     .build();
    /// let site = SiteSettings::open(config, &RequestContext::new("http", "localhost", ""), Defaults::new())?;
    /// # Ok::<(), sitecfg::Error>(())
    /// ```
    pub fn open(config: SiteConfig, context: &RequestContext, defaults: Defaults) -> Result<Self> {
        let storage = crate::storage::SqliteStorage::open(&config)?;
        Self::new(config, storage, context, defaults)
    }
}
