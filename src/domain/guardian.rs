//! Opaque guardian identifiers

use serde::{Serialize, Serializer};

use crate::error::{RecoveryError, Result};

/// Width of a guardian identifier (address-sized)
pub const GUARDIAN_ID_BYTES: usize = 20;

/// Address-like identifier of a guardian
///
/// The registry only compares these; it never acts on a guardian's behalf.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GuardianId([u8; GUARDIAN_ID_BYTES]);

impl GuardianId {
    #[must_use]
    pub const fn new(bytes: [u8; GUARDIAN_ID_BYTES]) -> Self {
        Self(bytes)
    }

    /// Builds an identifier from a raw byte slice
    ///
    /// # Errors
    /// Returns `InvalidGuardianId` unless exactly 20 bytes are given
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; GUARDIAN_ID_BYTES] = bytes.try_into().map_err(|_| {
            RecoveryError::InvalidGuardianId(format!(
                "expected {GUARDIAN_ID_BYTES} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(array))
    }

    /// Parses a hex address, with or without a `0x` prefix
    ///
    /// # Errors
    /// Returns `InvalidGuardianId` on bad length or non-hex characters
    ///
    /// # Examples
    ///
    /// ```rust
    /// use guardian_recovery::domain::GuardianId;
    ///
    /// let id = GuardianId::parse_hex("0x00000000000000000000000000000000000000ff").unwrap();
    /// assert_eq!(id.as_bytes()[19], 0xff);
    /// assert!(GuardianId::parse_hex("0x1234").is_err());
    /// ```
    pub fn parse_hex(s: &str) -> Result<Self> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() != GUARDIAN_ID_BYTES * 2 {
            return Err(RecoveryError::InvalidGuardianId(format!(
                "expected {} hex digits, got {}",
                GUARDIAN_ID_BYTES * 2,
                digits.len()
            )));
        }
        let mut out = [0u8; GUARDIAN_ID_BYTES];
        for (slot, pair) in out.iter_mut().zip(digits.as_bytes().chunks_exact(2)) {
            let pair = std::str::from_utf8(pair)
                .map_err(|_| RecoveryError::InvalidGuardianId(s.to_string()))?;
            *slot = u8::from_str_radix(pair, 16)
                .map_err(|_| RecoveryError::InvalidGuardianId(s.to_string()))?;
        }
        Ok(Self(out))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; GUARDIAN_ID_BYTES] {
        &self.0
    }
}

impl std::fmt::Display for GuardianId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("0x")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for GuardianId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GuardianId({self})")
    }
}

impl Serialize for GuardianId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
