use crate::config::{Setting, SettingsTable};
use crate::error::Result;
use crate::manager::core::SiteSettings;
use crate::storage::{SettingRow, StorageBackend};

use log::{debug, info, warn};
use std::fmt;

/// Identifies one setting
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SettingKey {
    pub plugin: String,
    pub name: String,
}

impl SettingKey {
    pub fn new(plugin: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.plugin, self.name)
    }
}

/// Writes issued by [`SiteSettings::store`], in plugin/name order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreReport {
    pub inserted: Vec<SettingKey>,
    pub updated: Vec<SettingKey>,
}

impl StoreReport {
    /// True if nothing had to be written
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.updated.is_empty()
    }
}

/// Merge `stored` over `settings`, one (plugin, name) entry at a time.
///
/// Stored entries replace both value and description; entries only present
/// in `settings` are kept. Returns the number of stored entries merged.
pub(crate) fn merge_stored(settings: &mut SettingsTable, stored: SettingsTable) -> usize {
    let mut merged = 0;
    for (plugin, entries) in stored {
        let partition = settings.entry(plugin).or_default();
        for (name, setting) in entries {
            partition.insert(name, setting);
            merged += 1;
        }
    }
    merged
}

impl<S: StorageBackend> SiteSettings<S> {
    /// Read every stored setting, grouped by plugin then name.
    ///
    /// The table does not enforce unique (plugin, name) pairs. When several
    /// rows share a key, the most recently inserted one wins.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaMissing`](crate::Error::SchemaMissing) if the
    /// settings table does not exist, or any other storage error.
    pub fn fetch_settings(&self) -> Result<SettingsTable> {
        let rows = self.storage.fetch_rows()?;
        let mut table = SettingsTable::new();

        for row in rows {
            let SettingRow {
                plugin,
                name,
                value,
                description,
            } = row;
            let partition = table.entry(plugin.clone()).or_default();
            let setting = Setting { value, description };
            if let Some(previous) = partition.insert(name.clone(), setting) {
                warn!(
                    "Duplicate rows for setting {plugin}.{name}; discarding earlier value '{}'",
                    previous.value
                );
            }
        }

        Ok(table)
    }

    /// Check that every in-memory setting has a row in storage.
    ///
    /// Only presence is checked, not whether the stored values match.
    /// Returns `false` if the settings table does not exist.
    pub fn is_consistent(&self) -> Result<bool> {
        if !self.storage.table_exists()? {
            return Ok(false);
        }

        let stored = self.fetch_settings()?;
        let consistent = self.settings.iter().all(|(plugin, entries)| {
            stored.get(plugin).is_some_and(|stored_entries| {
                entries.keys().all(|name| stored_entries.contains_key(name))
            })
        });

        Ok(consistent)
    }

    /// Write in-memory settings back to storage.
    ///
    /// Storage is read again first. Keys it lacks are inserted; keys whose
    /// value or description differ are updated; everything else is left
    /// alone. Rows for keys not held in memory are never deleted.
    ///
    /// Writes are not wrapped in a transaction: if one fails, the error is
    /// returned and the remaining keys are not written.
    pub fn store(&self) -> Result<StoreReport> {
        let stored = self.fetch_settings()?;
        let mut report = StoreReport::default();

        for (plugin, entries) in &self.settings {
            let stored_entries = stored.get(plugin);
            for (name, setting) in entries {
                let row = SettingRow::new(
                    plugin.as_str(),
                    name.as_str(),
                    setting.value.as_str(),
                    setting.description.as_str(),
                );

                match stored_entries.and_then(|e| e.get(name)) {
                    None => {
                        self.storage.insert(&row)?;
                        debug!("Inserted setting {plugin}.{name}");
                        report.inserted.push(SettingKey::new(plugin.as_str(), name.as_str()));
                    }
                    Some(current) if current != setting => {
                        self.storage.update(&row)?;
                        debug!("Updated setting {plugin}.{name}");
                        report.updated.push(SettingKey::new(plugin.as_str(), name.as_str()));
                    }
                    Some(_) => {}
                }
            }
        }

        info!(
            "Stored settings: {} inserted, {} updated",
            report.inserted.len(),
            report.updated.len()
        );
        Ok(report)
    }
}

// =============================================================================
// Tests
// =============================================================================
