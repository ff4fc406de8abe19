//! Admin UI registration metadata
//!
//! Settings shown in the site settings page carry a label, a widget type and,
//! for selects, the list of choices. The registry built from these types is
//! serialized as-is for the admin UI:
//!
//! ```json
//! {
//!   "userfrosting": {
//!     "site_title": {
//!       "label": "Site Title",
//!       "type": "text",
//!       "options": [],
//!       "description": "The title of the site.",
//!       "value": "UserFrosting"
//!     }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

// =============================================================================
// Setting Types
// =============================================================================

/// Widget used to render a registered setting
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    /// Read-only display
    Readonly,
    /// Text input
    #[default]
    Text,
    /// On/off toggle
    Toggle,
    /// Dropdown with predefined options
    Select,
}

impl SettingType {
    /// Name as accepted by [`FromStr`] and used in serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingType::Readonly => "readonly",
            SettingType::Text => "text",
            SettingType::Toggle => "toggle",
            SettingType::Select => "select",
        }
    }
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for SettingType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for SettingType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "readonly" => Ok(SettingType::Readonly),
            "text" => Ok(SettingType::Text),
            "toggle" => Ok(SettingType::Toggle),
            "select" => Ok(SettingType::Select),
            other => Err(Error::InvalidArgument(format!(
                "Type '{other}' is invalid; must be one of 'readonly', 'text', 'toggle', or 'select'"
            ))),
        }
    }
}

// =============================================================================
// Setting Option
// =============================================================================

/// Choice offered by a `select` setting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettingOption {
    /// Value stored when the option is picked
    pub value: String,
    /// Display label
    pub label: String,
}

impl SettingOption {
    /// Create an option
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Shorthand for creating a `SettingOption`
///
/// # Example
/// ```rust
/// use sitecfg::opt;
/// let options = vec![opt("0", "Off"), opt("1", "On")];
/// ```
pub fn opt(value: impl Into<String>, label: impl Into<String>) -> SettingOption {
    SettingOption::new(value, label)
}

// =============================================================================
// Registered Setting
// =============================================================================

/// A setting exposed in the admin UI
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisteredSetting {
    /// Human readable label
    pub label: String,

    /// Widget type
    #[serde(rename = "type")]
    pub setting_type: SettingType,

    /// Choices for `select` settings, in display order
    pub options: Vec<SettingOption>,

    /// Description captured when the setting was registered
    pub description: String,

    /// Current value (refreshed by `registered_settings`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Registered settings keyed by plugin, then by setting name
pub type RegistryTable = BTreeMap<String, BTreeMap<String, RegisteredSetting>>;

// =============================================================================
// Tests
// =============================================================================
