//! `Threshold` newtype for guardian quorums

use crate::error::{RecoveryError, Result};

/// Minimum number of distinct shares needed to reconstruct a secret (1..=255)
///
/// A threshold of 1 is allowed: every guardian alone can then recover the
/// secret, which is a legitimate (if weak) backup arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Threshold(u8);

impl Threshold {
    /// Creates a new threshold
    ///
    /// # Errors
    /// Returns `ThresholdOutOfRange` if the value is zero or does not fit in a
    /// share index. Checking it against a guardian count is
    /// [`SplitConfig::from_counts`](super::SplitConfig::from_counts)'s job.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use guardian_recovery::RecoveryError;
    /// use guardian_recovery::domain::Threshold;
    ///
    /// let threshold = Threshold::new(3).unwrap();
    /// assert_eq!(*threshold, 3);
    ///
    /// assert_eq!(
    ///     Threshold::new(0).unwrap_err(),
    ///     RecoveryError::ThresholdOutOfRange(0)
    /// );
    /// assert!(Threshold::new(256).is_err());
    /// ```
    pub fn new(value: usize) -> Result<Self> {
        match u8::try_from(value) {
            Ok(v) if v >= 1 => Ok(Self(v)),
            _ => Err(RecoveryError::ThresholdOutOfRange(value)),
        }
    }

    #[must_use]
    pub fn get(self) -> usize {
        usize::from(self.0)
    }
}

impl std::ops::Deref for Threshold {
    type Target = u8;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
