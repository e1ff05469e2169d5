//! Analytics policy configuration.
//!
//! Everything here is data the library staff may want to change without a rebuild, so it can be
//! loaded from TOML:
//!
//! ```toml
//! top_n = 10
//! title_denylist = ["notebook positivo master", "calculadora"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Entries the source system files as loans but that are not books.
pub const DEFAULT_TITLE_DENYLIST: &[&str] = &[
    "computador notebook positivo master",
    "notebook positivo master",
    "calculadora cientifica",
    "calculadora",
];

/// Default length of the top-N rankings.
pub const DEFAULT_TOP_N: usize = 10;

/// Policy knobs for the headline metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Length of `top_books` / `top_people`.
    pub top_n: usize,
    /// Case-insensitive substrings; a title containing any of them never ranks in `top_books`.
    pub title_denylist: Vec<String>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            title_denylist: DEFAULT_TITLE_DENYLIST.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AnalyticsConfig {
    /// Parse and validate a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validated()
    }

    /// Read, parse and validate a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Normalize the denylist (trimmed, lowercase, no blanks) and reject unusable values.
    pub fn validated(mut self) -> ConfigResult<Self> {
        if self.top_n == 0 {
            return Err(ConfigError::Invalid {
                message: "top_n must be > 0".to_string(),
            });
        }
        self.title_denylist = self
            .title_denylist
            .iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        Ok(self)
    }

    /// Whether `title` contains any denylisted substring, ignoring case.
    pub fn is_denied_title(&self, title: &str) -> bool {
        let lower = title.to_lowercase();
        self.title_denylist
            .iter()
            .any(|needle| lower.contains(needle.to_lowercase().as_str()))
    }
}
