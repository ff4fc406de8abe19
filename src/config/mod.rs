//! Core configuration types
//!
//! This module contains the foundational types for the settings store:
//! - `SiteConfig` - Where settings are stored and where site files live
//! - `Defaults` / `SettingsTable` - The plugin-partitioned settings data
//! - `SettingType` / `RegisteredSetting` - Admin UI registration metadata

mod defaults;
mod schema;
mod types;

pub use defaults::{CORE_PLUGIN, Defaults, Setting, SettingsTable};
pub use schema::{RegisteredSetting, RegistryTable, SettingOption, SettingType, opt};
pub use types::{SiteConfig, SiteConfigBuilder};
