//! Site settings store
//!
//! This module contains [`SiteSettings`], the entry point for loading,
//! reading, registering and storing site settings.

mod builder;
mod core;
mod io;
mod operations;

pub use self::builder::SiteSettingsBuilder;
pub use self::core::SiteSettings;
pub use self::io::{SettingKey, StoreReport};

use crate::storage::StorageBackend;

impl<S: StorageBackend> SiteSettings<S> {
    /// Create a builder for `SiteSettings` with a fluent API.
    pub fn builder(storage: S) -> SiteSettingsBuilder<S> {
        SiteSettingsBuilder::new(storage)
    }
}
