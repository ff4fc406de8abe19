//! Site information for the admin dashboard
//!
//! Lists the locales, themes and plugins installed under the directories named
//! in [`SiteConfig`](crate::SiteConfig), tails the error log and summarizes the
//! running system.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use log::debug;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::manager::SiteSettings;
use crate::storage::StorageBackend;

/// Path reported when no error log is configured
pub const LOG_UNAVAILABLE: &str = "Unavailable";

/// Tail of the error log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogReport {
    /// Log file path, or [`LOG_UNAVAILABLE`]
    pub path: String,
    /// Log lines, newest first
    pub messages: Vec<String>,
}

impl<S: StorageBackend> SiteSettings<S> {
    /// Installed locales: names of the locale files, without extension.
    ///
    /// Returns an empty set if no locales directory is configured.
    pub fn locales(&self) -> Result<BTreeSet<String>> {
        match &self.config.locales_path {
            Some(dir) => list_files_with_extension(dir, &self.config.locale_extension),
            None => Ok(BTreeSet::new()),
        }
    }

    /// Installed themes: names of the subdirectories of the themes directory
    pub fn themes(&self) -> Result<BTreeSet<String>> {
        match &self.config.themes_path {
            Some(dir) => list_subdirectories(dir),
            None => Ok(BTreeSet::new()),
        }
    }

    /// Installed plugins: names of the subdirectories of the plugins directory
    pub fn plugins(&self) -> Result<BTreeSet<String>> {
        match &self.config.plugins_path {
            Some(dir) => list_subdirectories(dir),
            None => Ok(BTreeSet::new()),
        }
    }

    /// Last `lines` lines of the error log, newest first.
    ///
    /// `None` or `Some(0)` returns the whole log. Bytes that are not valid
    /// UTF-8 are replaced, not rejected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileRead`] if the configured log file cannot be read.
    pub fn log(&self, lines: Option<usize>) -> Result<LogReport> {
        let Some(path) = &self.config.log_path else {
            return Ok(LogReport {
                path: LOG_UNAVAILABLE.to_string(),
                messages: vec!["You don't have an error log set up.".to_string()],
            });
        };

        let display = path.display().to_string();
        if !self.config.log_enabled {
            return Ok(LogReport {
                path: display,
                messages: vec!["Error logging appears to be disabled.".to_string()],
            });
        }

        let content = crate::error::read(path)?;
        Ok(LogReport {
            path: display,
            messages: tail_newest_first(&String::from_utf8_lossy(&content), lines),
        })
    }

    /// Application, storage and path details for the dashboard
    pub fn system_info(&self) -> BTreeMap<String, String> {
        let mut info = BTreeMap::new();
        info.insert("app_name".into(), self.config.app_name.clone());
        info.insert("app_version".into(), self.config.app_version.clone());
        info.insert("sitecfg_version".into(), env!("CARGO_PKG_VERSION").to_string());
        info.insert("database".into(), self.storage.describe());
        info.insert("table".into(), self.config.table());
        info.insert(
            "application_root".into(),
            self.config.app_root.display().to_string(),
        );
        info.insert("document_root".into(), self.environment.uri().public.clone());
        info
    }
}

/// Names (without extension) of the files in `dir` ending in `.{extension}`
pub fn list_files_with_extension(dir: &Path, extension: &str) -> Result<BTreeSet<String>> {
    let suffix = format!(".{extension}");
    let mut names = BTreeSet::new();

    for entry in crate::error::read_dir(dir)? {
        let entry = entry.map_err(|e| Error::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        if entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if let Some(stem) = name.strip_suffix(&suffix) {
            if !stem.is_empty() {
                names.insert(stem.to_string());
            }
        }
    }

    debug!("Found {} files in {}", names.len(), dir.display());
    Ok(names)
}

/// Names of the directories directly under `dir`
pub fn list_subdirectories(dir: &Path) -> Result<BTreeSet<String>> {
    let mut names = BTreeSet::new();

    for entry in crate::error::read_dir(dir)? {
        let entry = entry.map_err(|e| Error::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        if entry.path().is_dir() {
            names.insert(entry.file_name().to_string_lossy().to_string());
        }
    }

    debug!("Found {} directories in {}", names.len(), dir.display());
    Ok(names)
}

fn tail_newest_first(content: &str, lines: Option<usize>) -> Vec<String> {
    let all: Vec<&str> = content.lines().collect();
    let start = match lines {
        Some(n) if n > 0 => all.len().saturating_sub(n),
        _ => 0,
    };
    all[start..].iter().rev().map(|l| (*l).to_string()).collect()
}

// =============================================================================
// Tests
// =============================================================================
