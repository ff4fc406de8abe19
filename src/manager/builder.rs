//! Builder for SiteSettings
//!
//! This module contains [`SiteSettingsBuilder`] which provides a fluent API
//! for creating a [`SiteSettings`](super::SiteSettings).

use crate::config::{Defaults, SiteConfig};
use crate::environment::{ProcessEnv, RequestContext};
use crate::error::Result;
use crate::storage::StorageBackend;

use super::SiteSettings;

/// Builder for creating a [`SiteSettings`] with a fluent API.
///
/// # Example
///
/// ```rust
/// use sitecfg::{MemoryStorage, RequestContext, SiteSettings};
///
/// let site = SiteSettings::builder(MemoryStorage::new())
///     .context(RequestContext::new("https", "example.com", ""))
///     .setting("userfrosting", "site_title", "Foo", "The title of the site.")
///     .build()
///     .unwrap();
///
/// assert_eq!(site.get_core("uri.favicon").unwrap(), "https://example.com/css/favicon.ico");
/// ```
pub struct SiteSettingsBuilder<S: StorageBackend> {
    storage: S,
    config: Option<SiteConfig>,
    context: Option<RequestContext>,
    defaults: Defaults,
}

impl<S: StorageBackend> SiteSettingsBuilder<S> {
    /// Create a new builder around a storage backend.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            config: None,
            context: None,
            defaults: Defaults::new(),
        }
    }

    /// Set the site configuration (default: [`SiteConfig::default`]).
    pub fn config(mut self, config: SiteConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the request context.
    ///
    /// If not set, the context is read from the process environment.
    pub fn context(mut self, context: RequestContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Replace all default settings.
    pub fn defaults(mut self, defaults: Defaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Add one default setting.
    pub fn setting(
        mut self,
        plugin: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.defaults = self.defaults.setting(plugin, name, value, description);
        self
    }

    /// Build the [`SiteSettings`], loading stored values.
    ///
    /// # Errors
    ///
    /// Same as [`SiteSettings::new`].
    pub fn build(self) -> Result<SiteSettings<S>> {
        let context = self
            .context
            .unwrap_or_else(|| RequestContext::from_env(&ProcessEnv));
        SiteSettings::new(
            self.config.unwrap_or_default(),
            self.storage,
            &context,
            self.defaults,
        )
    }
}
