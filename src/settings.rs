//! Registry configuration

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::domain::ShareCount;

/// Tunable limits for an [`AccountRegistry`](crate::registry::AccountRegistry)
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Largest guardian list an account may have (at most 255)
    pub max_guardians: u8,
    /// Longest label in bytes
    pub max_label_bytes: usize,
    /// How long a recovery session accepts shares
    pub session_ttl_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_guardians: ShareCount::MAX,
            max_label_bytes: 64,
            session_ttl_secs: 15 * 60,
        }
    }
}

impl RegistryConfig {
    /// Parses and validates a JSON config
    ///
    /// # Errors
    /// Returns an error on malformed JSON, unknown keys, or a zero guardian limit
    ///
    /// # Examples
    ///
    /// ```rust
    /// use guardian_recovery::settings::RegistryConfig;
    ///
    /// let config = RegistryConfig::from_json_str(r#"{ "max_guardians": 10 }"#).unwrap();
    /// assert_eq!(config.max_guardians, 10);
    /// assert_eq!(config.max_label_bytes, 64);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Failed to parse registry config")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON config file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or does not parse
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read registry config {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("Invalid registry config {}", path.display()))
    }

    /// # Errors
    /// Returns an error if `max_guardians` is zero
    pub fn validate(&self) -> Result<()> {
        if self.max_guardians == 0 {
            bail!("max_guardians must be at least 1");
        }
        Ok(())
    }

    #[must_use]
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}
