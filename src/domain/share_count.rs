//! `ShareCount` newtype: how many guardians receive a share

use crate::error::{RecoveryError, Result};

/// Number of shares to create (1..=255)
///
/// Bounded by the one-byte share index: guardian `i` is evaluated at `x = i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShareCount(u8);

impl ShareCount {
    pub const MIN: u8 = 1;

    pub const MAX: u8 = u8::MAX;

    /// Creates a new share count
    ///
    /// # Errors
    /// Returns `NoGuardians` for zero and `TooManyGuardians` above 255
    ///
    /// # Examples
    ///
    /// ```rust
    /// use guardian_recovery::domain::ShareCount;
    ///
    /// assert_eq!(*ShareCount::new(5).unwrap(), 5);
    /// assert!(ShareCount::new(0).is_err());
    /// assert!(ShareCount::new(300).is_err());
    /// ```
    pub fn new(value: usize) -> Result<Self> {
        if value == 0 {
            return Err(RecoveryError::NoGuardians);
        }
        u8::try_from(value)
            .map(Self)
            .map_err(|_| RecoveryError::TooManyGuardians {
                count: value,
                max: usize::from(Self::MAX),
            })
    }

    #[must_use]
    pub fn get(self) -> usize {
        usize::from(self.0)
    }
}

impl std::ops::Deref for ShareCount {
    type Target = u8;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
