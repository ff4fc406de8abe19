//! Settings table types and the default settings a site starts from

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Plugin owning the framework-level (core) settings
pub const CORE_PLUGIN: &str = "userfrosting";

/// A single setting value with its human readable description
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Setting {
    pub value: String,
    pub description: String,
}

impl Setting {
    pub fn new(value: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            description: description.into(),
        }
    }
}

/// Settings keyed by plugin, then by setting name
pub type SettingsTable = BTreeMap<String, BTreeMap<String, Setting>>;

/// Default settings supplied when a [`SiteSettings`](crate::SiteSettings) is built.
///
/// Stored values replace these per (plugin, name); anything storage does not
/// know about keeps its default.
///
/// # Example
///
/// ```rust
/// use sitecfg::Defaults;
///
/// let defaults = Defaults::new()
///     .setting("userfrosting", "site_title", "UserFrosting", "The title of the site.")
///     .setting("userfrosting", "can_register", "1", "");
/// assert_eq!(defaults.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defaults {
    table: SettingsTable,
}

impl Defaults {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build defaults from separate value and description maps.
    ///
    /// A value without a description gets the empty description. A
    /// description without a value has nothing to describe and is dropped.
    #[must_use]
    pub fn from_maps(
        settings: BTreeMap<String, BTreeMap<String, String>>,
        mut descriptions: BTreeMap<String, BTreeMap<String, String>>,
    ) -> Self {
        let table = settings
            .into_iter()
            .map(|(plugin, values)| {
                let mut plugin_descriptions = descriptions.remove(&plugin).unwrap_or_default();
                let entries = values
                    .into_iter()
                    .map(|(name, value)| {
                        let description = plugin_descriptions.remove(&name).unwrap_or_default();
                        (name, Setting { value, description })
                    })
                    .collect();
                (plugin, entries)
            })
            .collect();

        Self { table }
    }

    /// Add (or replace) one default setting
    #[must_use]
    pub fn setting(
        mut self,
        plugin: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.table
            .entry(plugin.into())
            .or_default()
            .insert(name.into(), Setting::new(value, description));
        self
    }

    /// Number of default settings across all plugins
    pub fn len(&self) -> usize {
        self.table.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_table(self) -> SettingsTable {
        self.table
    }
}

impl From<SettingsTable> for Defaults {
    fn from(table: SettingsTable) -> Self {
        Self { table }
    }
}

/// Macro for building [`Defaults`] grouped by plugin
///
/// # Example
/// ```rust
/// use sitecfg::defaults;
///
/// let defaults = defaults! {
///     "userfrosting" => {
///         "site_title" => ("UserFrosting", "The title of the site."),
///         "admin_email" => ("admin@example.com", "Where notifications go."),
///     },
///     "blog" => {
///         "posts_per_page" => ("10", ""),
///     },
/// };
/// assert_eq!(defaults.len(), 3);
/// ```
#[macro_export]
macro_rules! defaults {
    ($($plugin:expr => { $($name:expr => ($value:expr, $desc:expr)),* $(,)? }),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut defaults = $crate::Defaults::new();
        $(
            $(
                defaults = defaults.setting($plugin, $name, $value, $desc);
            )*
        )*
        defaults
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str, &str)]) -> BTreeMap<String, BTreeMap<String, String>> {
        let mut out: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        for (plugin, name, value) in entries {
            out.entry((*plugin).to_string())
                .or_default()
                .insert((*name).to_string(), (*value).to_string());
        }
        out
    }

    #[test]
    fn test_from_maps_pairs_descriptions() {
        let defaults = Defaults::from_maps(
            map(&[("userfrosting", "site_title", "Foo"), ("userfrosting", "email", "a@b")]),
            map(&[("userfrosting", "site_title", "Title"), ("ghost", "x", "orphan")]),
        );

        let table = defaults.into_table();
        assert_eq!(table["userfrosting"]["site_title"], Setting::new("Foo", "Title"));
        assert_eq!(table["userfrosting"]["email"], Setting::new("a@b", ""));
        assert!(!table.contains_key("ghost"));
    }

    #[test]
    fn test_setting_replaces_existing_default() {
        let defaults = Defaults::new()
            .setting("p", "n", "1", "first")
            .setting("p", "n", "2", "second");

        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults.into_table()["p"]["n"], Setting::new("2", "second"));
    }

    #[test]
    fn test_macro_groups_by_plugin() {
        let defaults = crate::defaults! {
            "userfrosting" => { "site_title" => ("Foo", "Title") },
            "blog" => {
                "posts_per_page" => ("10", ""),
                "comments" => ("1", "Allow comments"),
            },
        };

        let table = defaults.into_table();
        assert_eq!(table.len(), 2);
        assert_eq!(table["blog"].len(), 2);
        assert_eq!(table[CORE_PLUGIN]["site_title"].value, "Foo");
    }

    #[test]
    fn test_empty_defaults() {
        assert!(Defaults::new().is_empty());
        assert!(crate::defaults! {}.is_empty());
    }
}
