//! Validated split parameters

use crate::error::{RecoveryError, Result};

use super::{ShareCount, Threshold};

/// Validated pair of threshold and share count
///
/// Enforces `1 <= threshold <= share_count` at construction so a split can
/// never require more shares than exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitConfig {
    threshold: Threshold,
    share_count: ShareCount,
}

impl SplitConfig {
    /// Creates a new split configuration
    ///
    /// # Errors
    /// Returns `InvalidThreshold` if threshold exceeds share count
    ///
    /// # Examples
    ///
    /// ```rust
    /// use guardian_recovery::domain::{ShareCount, SplitConfig, Threshold};
    ///
    /// let config = SplitConfig::new(
    ///     Threshold::new(3).unwrap(),
    ///     ShareCount::new(5).unwrap(),
    /// ).unwrap();
    /// assert_eq!(*config.threshold(), 3);
    ///
    /// assert!(SplitConfig::new(Threshold::new(5).unwrap(), ShareCount::new(3).unwrap()).is_err());
    /// ```
    pub fn new(threshold: Threshold, share_count: ShareCount) -> Result<Self> {
        if *threshold > *share_count {
            return Err(RecoveryError::InvalidThreshold {
                threshold: threshold.get(),
                share_count: share_count.get(),
            });
        }
        Ok(Self {
            threshold,
            share_count,
        })
    }

    /// Validates raw counts, reporting any out-of-range threshold against
    /// the actual guardian count
    ///
    /// # Errors
    /// Returns `InvalidThreshold`, `NoGuardians` or `TooManyGuardians`
    pub fn from_counts(threshold: usize, share_count: usize) -> Result<Self> {
        let count = ShareCount::new(share_count)?;
        let threshold = Threshold::new(threshold).map_err(|_| RecoveryError::InvalidThreshold {
            threshold,
            share_count,
        })?;
        Self::new(threshold, count)
    }

    #[must_use]
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    #[must_use]
    pub fn share_count(&self) -> ShareCount {
        self.share_count
    }
}
