use crate::config::{
    CORE_PLUGIN, RegisteredSetting, RegistryTable, Setting, SettingOption, SettingType,
};
use crate::error::{Error, Result};
use crate::manager::core::SiteSettings;
use crate::storage::StorageBackend;

use log::debug;
use std::collections::BTreeMap;

impl<S: StorageBackend> SiteSettings<S> {
    // =========================================================================
    // Generic accessors
    // =========================================================================

    /// Set a setting value and/or description.
    ///
    /// A `None` value or description leaves the existing one untouched, and
    /// initializes it to the empty string if the setting is new.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use sitecfg::{MemoryStorage, RequestContext, SiteConfig, SiteSettings, Defaults};
    /// # let mut site = SiteSettings::new(SiteConfig::default(), MemoryStorage::new(),
    /// #     &RequestContext::new("http", "localhost", ""), Defaults::new())?;
    /// site.set("blog", "posts_per_page", Some("10"), Some("Posts shown per page"));
    /// site.set("blog", "posts_per_page", None, None);
    /// assert_eq!(site.value("blog", "posts_per_page"), Some("10"));
    ///
    /// site.set("blog", "comments", None, None);
    /// assert_eq!(site.value("blog", "comments"), Some(""));
    /// # Ok::<(), sitecfg::Error>(())
    /// ```
    pub fn set(
        &mut self,
        plugin: &str,
        name: &str,
        value: Option<&str>,
        description: Option<&str>,
    ) {
        let setting = self
            .settings
            .entry(plugin.to_string())
            .or_default()
            .entry(name.to_string())
            .or_default();

        if let Some(value) = value {
            setting.value = value.to_string();
        }
        if let Some(description) = description {
            setting.description = description.to_string();
        }
    }

    /// Current value of a setting
    pub fn value(&self, plugin: &str, name: &str) -> Option<&str> {
        self.setting(plugin, name).map(|s| s.value.as_str())
    }

    /// Current description of a setting
    pub fn description(&self, plugin: &str, name: &str) -> Option<&str> {
        self.setting(plugin, name).map(|s| s.description.as_str())
    }

    /// Current value and description of a setting
    pub fn setting(&self, plugin: &str, name: &str) -> Option<&Setting> {
        self.settings.get(plugin).and_then(|p| p.get(name))
    }

    /// All settings owned by `plugin`
    pub fn plugin_settings(&self, plugin: &str) -> Option<&BTreeMap<String, Setting>> {
        self.settings.get(plugin)
    }

    // =========================================================================
    // Core settings
    // =========================================================================

    /// Get a core setting.
    ///
    /// Environment values (such as `uri.public`) are looked up first, then
    /// the settings of the core plugin.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SettingNotFound`] if neither holds `name`.
    pub fn get_core(&self, name: &str) -> Result<&str> {
        if let Some(value) = self.environment.get(name) {
            return Ok(value);
        }
        self.value(CORE_PLUGIN, name)
            .ok_or_else(|| Error::SettingNotFound(name.to_string()))
    }

    /// Set the value of a core setting
    pub fn set_core(&mut self, name: &str, value: &str) {
        self.set(CORE_PLUGIN, name, Some(value), None);
    }

    /// Check whether `get_core(name)` would succeed
    pub fn has_core(&self, name: &str) -> bool {
        self.environment.contains(name) || self.value(CORE_PLUGIN, name).is_some()
    }

    // =========================================================================
    // Admin UI registration
    // =========================================================================

    /// Register a setting to appear in the site settings interface.
    ///
    /// The setting must already exist (call [`set`](Self::set) first).
    /// `setting_type` is one of `readonly`, `text`, `toggle` or `select`,
    /// given as a string or a [`SettingType`]. Registering again replaces the
    /// previous label, type and options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the plugin has no settings, the
    /// setting does not exist, or the type is unknown.
    pub fn register(
        &mut self,
        plugin: &str,
        name: &str,
        label: &str,
        setting_type: impl AsRef<str>,
        options: Vec<SettingOption>,
    ) -> Result<()> {
        let Some(entries) = self.settings.get(plugin) else {
            return Err(Error::InvalidArgument(format!(
                "The plugin '{plugin}' does not have any site settings. Add them first by calling set()."
            )));
        };

        let Some(setting) = entries.get(name) else {
            return Err(Error::InvalidArgument(format!(
                "The plugin '{plugin}' does not have a value for '{name}'. Add it first by calling set()."
            )));
        };

        let setting_type: SettingType = setting_type.as_ref().parse()?;

        let registered = RegisteredSetting {
            label: label.to_string(),
            setting_type,
            options,
            description: setting.description.clone(),
            value: None,
        };
        self.registered
            .entry(plugin.to_string())
            .or_default()
            .insert(name.to_string(), registered);

        debug!("Registered setting {plugin}.{name} as {setting_type}");
        Ok(())
    }

    /// Register a plain text setting
    pub fn register_text(&mut self, plugin: &str, name: &str, label: &str) -> Result<()> {
        self.register(plugin, name, label, SettingType::Text, Vec::new())
    }

    /// All registered settings, with values refreshed from the current settings
    pub fn registered_settings(&mut self) -> &RegistryTable {
        for (plugin, entries) in &mut self.registered {
            for (name, registered) in entries.iter_mut() {
                registered.value = self
                    .settings
                    .get(plugin)
                    .and_then(|p| p.get(name))
                    .map(|s| s.value.clone());
            }
        }
        &self.registered
    }
}

// =============================================================================
// Tests
// =============================================================================
