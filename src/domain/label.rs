//! Human-readable account labels

use serde::Serialize;

use crate::error::{RecoveryError, Result};

/// Free-text name for an account, never used in any computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    /// # Errors
    /// Returns `LabelTooLong` if the UTF-8 encoding exceeds `max_bytes`
    pub fn new(text: &str, max_bytes: usize) -> Result<Self> {
        if text.len() > max_bytes {
            return Err(RecoveryError::LabelTooLong {
                len: text.len(),
                max: max_bytes,
            });
        }
        Ok(Self(text.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
