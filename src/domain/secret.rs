//! The secret being protected

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{RecoveryError, Result};
use crate::field::{FIELD_BYTES, FieldElement};

/// Conventional secret width: a 256-bit key
pub const SECRET_BYTES: usize = 32;

/// A secret interpreted as a field element
///
/// Remembers the width it was supplied with so it can be handed back in the
/// same shape after recovery. Wiped on drop; `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Secret {
    value: FieldElement,
    width: usize,
}

impl Secret {
    /// Interprets big-endian bytes as a secret
    ///
    /// # Errors
    /// Returns `SecretOutOfRange` for empty input, input wider than a field
    /// element, or a value that is not below the field modulus
    ///
    /// # Examples
    ///
    /// ```rust
    /// use guardian_recovery::domain::Secret;
    ///
    /// let secret = Secret::from_be_bytes(&[0x06, 0xd6, 0x16]).unwrap();
    /// assert_eq!(&*secret.to_be_bytes(), &[0x06, 0xd6, 0x16]);
    ///
    /// assert!(Secret::from_be_bytes(&[0xff; 33]).is_err());
    /// ```
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() || bytes.len() > FIELD_BYTES {
            return Err(RecoveryError::SecretOutOfRange);
        }
        let value = FieldElement::from_canonical_bytes(bytes)
            .map_err(|_| RecoveryError::SecretOutOfRange)?;
        Ok(Self {
            value,
            width: bytes.len(),
        })
    }

    pub(crate) fn from_field(value: FieldElement, width: usize) -> Self {
        Self { value, width }
    }

    /// Big-endian bytes at the width the secret was created with
    ///
    /// Falls back to the full field width if the value no longer fits, which
    /// only happens when reconstruction was fed forged shares.
    #[must_use]
    pub fn to_be_bytes(&self) -> Zeroizing<Vec<u8>> {
        let full = Zeroizing::new(self.value.to_be_bytes());
        let skip = FIELD_BYTES - self.width;
        if full[..skip].iter().all(|&b| b == 0) {
            Zeroizing::new(full[skip..].to_vec())
        } else {
            Zeroizing::new(full.to_vec())
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    pub(crate) fn value(&self) -> &FieldElement {
        &self.value
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secret({} bytes, redacted)", self.width)
    }
}
