//! `ShareIndex` newtype: the x-coordinate a share was evaluated at

use crate::error::{RecoveryError, Result};
use crate::field::FieldElement;

/// 1-based share index (1..=255)
///
/// Index 0 is excluded because f(0) is the secret itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShareIndex(u8);

impl ShareIndex {
    pub const MIN: u8 = 1;

    /// Creates a new share index
    ///
    /// # Errors
    /// Returns `MalformedShare` for index 0
    ///
    /// # Examples
    ///
    /// ```rust
    /// use guardian_recovery::domain::ShareIndex;
    ///
    /// assert_eq!(*ShareIndex::new(1).unwrap(), 1);
    /// assert_eq!(*ShareIndex::new(255).unwrap(), 255);
    /// assert!(ShareIndex::new(0).is_err());
    /// ```
    pub fn new(value: u8) -> Result<Self> {
        if value < Self::MIN {
            return Err(RecoveryError::MalformedShare(
                "share index 0 would expose the secret".into(),
            ));
        }
        Ok(Self(value))
    }

    /// The index as a point in the field
    #[must_use]
    pub fn as_field(self) -> FieldElement {
        FieldElement::from(self.0)
    }
}

impl std::ops::Deref for ShareIndex {
    type Target = u8;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ShareIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
