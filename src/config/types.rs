//! Site configuration and its builder

use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result};

const TABLE_IDENT: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

/// Configuration for a [`SiteSettings`](crate::SiteSettings) instance.
///
/// Covers where the settings live (database file and table name) and the
/// filesystem locations used by the site information helpers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Application name (used for the default database location)
    pub app_name: String,

    /// Application version (reported by `system_info`)
    pub app_version: String,

    /// Path of the SQLite database file
    pub database_path: PathBuf,

    /// Prefix prepended to every table name (e.g., "uf_")
    pub table_prefix: String,

    /// Unprefixed name of the settings table
    pub table_name: String,

    /// Application root directory
    pub app_root: PathBuf,

    /// Directory holding one file per locale
    pub locales_path: Option<PathBuf>,

    /// File extension of locale files (without the dot)
    pub locale_extension: String,

    /// Directory holding one subdirectory per theme
    pub themes_path: Option<PathBuf>,

    /// Directory holding one subdirectory per plugin
    pub plugins_path: Option<PathBuf>,

    /// Error log file. `None` means no log is set up.
    pub log_path: Option<PathBuf>,

    /// Whether errors are written to `log_path`
    pub log_enabled: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfigBuilder::new("site", "0.1.0").build()
    }
}

impl SiteConfig {
    /// Create a new builder for SiteConfig
    ///
    /// # Example
    /// ```rust
    /// use sitecfg::SiteConfig;
    ///
    /// let config = SiteConfig::builder("my-site", "1.0.0")
    ///     .database_path("/tmp/my-site.db")
    ///     .table_prefix("uf_")
    ///     .build();
    /// assert_eq!(config.table(), "uf_configuration");
    /// ```
    pub fn builder(app_name: impl Into<String>, app_version: impl Into<String>) -> SiteConfigBuilder {
        SiteConfigBuilder::new(app_name, app_version)
    }

    /// Load a configuration from a JSON file.
    ///
    /// Missing fields take their default values and `~` is expanded in every path.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = crate::error::read_to_string(path)?;
        let mut config: SiteConfig = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config file '{}': {e}", path.display())))?;

        config.database_path = expand_home(config.database_path);
        config.app_root = expand_home(config.app_root);
        config.locales_path = config.locales_path.map(expand_home);
        config.themes_path = config.themes_path.map(expand_home);
        config.plugins_path = config.plugins_path.map(expand_home);
        config.log_path = config.log_path.map(expand_home);

        config.validate()?;
        Ok(config)
    }

    /// Full (prefixed) name of the settings table
    pub fn table(&self) -> String {
        format!("{}{}", self.table_prefix, self.table_name)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if the table name is not a plain SQL identifier. The name
    /// is interpolated into statements, so anything else is rejected.
    pub fn validate(&self) -> Result<()> {
        let table = self.table();
        let re = Regex::new(TABLE_IDENT).map_err(|e| Error::Config(e.to_string()))?;
        if !re.is_match(&table) {
            return Err(Error::Config(format!(
                "Table name '{table}' must contain only letters, digits and underscores"
            )));
        }
        Ok(())
    }
}

/// Builder for creating SiteConfig with a fluent API
#[derive(Debug, Clone)]
pub struct SiteConfigBuilder {
    app_name: String,
    app_version: String,
    database_path: Option<PathBuf>,
    table_prefix: String,
    table_name: String,
    app_root: Option<PathBuf>,
    locales_path: Option<PathBuf>,
    locale_extension: String,
    themes_path: Option<PathBuf>,
    plugins_path: Option<PathBuf>,
    log_path: Option<PathBuf>,
    log_enabled: bool,
}

impl SiteConfigBuilder {
    /// Create a new builder with required app name and version
    pub fn new(app_name: impl Into<String>, app_version: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            app_version: app_version.into(),
            database_path: None,
            table_prefix: String::new(),
            table_name: "configuration".into(),
            app_root: None,
            locales_path: None,
            locale_extension: "json".into(),
            themes_path: None,
            plugins_path: None,
            log_path: None,
            log_enabled: true,
        }
    }

    /// Set the SQLite database file
    ///
    /// Supports `~` expansion for home directory.
    pub fn database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = Some(expand_home(path.into()));
        self
    }

    /// Set the table prefix (default: none)
    pub fn table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    /// Set the unprefixed settings table name (default: "configuration")
    pub fn table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = name.into();
        self
    }

    /// Set the application root directory
    pub fn app_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.app_root = Some(expand_home(path.into()));
        self
    }

    /// Set the locales directory
    pub fn locales_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.locales_path = Some(expand_home(path.into()));
        self
    }

    /// Set the locale file extension (default: "json")
    pub fn locale_extension(mut self, ext: impl Into<String>) -> Self {
        self.locale_extension = ext.into();
        self
    }

    /// Set the themes directory
    pub fn themes_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.themes_path = Some(expand_home(path.into()));
        self
    }

    /// Set the plugins directory
    pub fn plugins_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.plugins_path = Some(expand_home(path.into()));
        self
    }

    /// Set the error log file
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(expand_home(path.into()));
        self
    }

    /// Enable or disable error logging (default: enabled)
    pub fn log_enabled(mut self, enabled: bool) -> Self {
        self.log_enabled = enabled;
        self
    }

    /// Build the SiteConfig
    ///
    /// If `database_path` is not set, uses `site.db` in the system data
    /// directory for the app.
    pub fn build(self) -> SiteConfig {
        let database_path = self.database_path.unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join(&self.app_name))
                .unwrap_or_else(|| PathBuf::from("."))
                .join("site.db")
        });

        SiteConfig {
            app_name: self.app_name,
            app_version: self.app_version,
            database_path,
            table_prefix: self.table_prefix,
            table_name: self.table_name,
            app_root: self.app_root.unwrap_or_else(|| PathBuf::from(".")),
            locales_path: self.locales_path,
            locale_extension: self.locale_extension,
            themes_path: self.themes_path,
            plugins_path: self.plugins_path,
            log_path: self.log_path,
            log_enabled: self.log_enabled,
        }
    }
}

/// Expand a leading `~` to the home directory
fn expand_home(path: PathBuf) -> PathBuf {
    if path.starts_with("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(path.strip_prefix("~").unwrap_or(&path));
        }
    }
    path
}
