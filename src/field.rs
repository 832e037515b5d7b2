//! Arithmetic in the prime field GF(P) with P = 2^257 - 93
//!
//! P exceeds 2^256, so every 256-bit key is a field element. Operations are
//! pure and reduce their inputs modulo P on entry, so they are total over any
//! `BigUint` a caller manages to construct.
//!
//! An element is stored as its fixed-width canonical encoding, which is
//! overwritten with zeros on drop. `BigUint` only appears as a temporary
//! inside a single operation; its limbs are private, so those temporaries
//! are released without being wiped.

use std::sync::LazyLock;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{RecoveryError, Result};

/// Width of a serialized field element in bytes
pub const FIELD_BYTES: usize = 33;

/// Distance of the modulus below 2^257
const MODULUS_OFFSET: u32 = 93;

/// The field modulus P = 2^257 - 93
pub static MODULUS: LazyLock<BigUint> =
    LazyLock::new(|| (BigUint::one() << 257u32) - BigUint::from(MODULUS_OFFSET));

/// P - 2, the Fermat exponent used for inversion
static INVERSE_EXPONENT: LazyLock<BigUint> = LazyLock::new(|| &*MODULUS - 2u32);

/// An element of GF(P), always kept in canonical form `[0, P)`
///
/// Big-endian at a fixed width, so the derived ordering is numeric order.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Zeroize, ZeroizeOnDrop)]
pub struct FieldElement([u8; FIELD_BYTES]);

impl FieldElement {
    #[must_use]
    pub fn zero() -> Self {
        Self([0u8; FIELD_BYTES])
    }

    #[must_use]
    pub fn one() -> Self {
        let mut bytes = [0u8; FIELD_BYTES];
        bytes[FIELD_BYTES - 1] = 1;
        Self(bytes)
    }

    /// Reduces an arbitrary integer into the field
    #[must_use]
    pub fn reduce(value: &BigUint) -> Self {
        Self::from_reduced(&(value % &*MODULUS))
    }

    /// Packs a value already below P
    fn from_reduced(value: &BigUint) -> Self {
        let mut out = [0u8; FIELD_BYTES];
        let mut raw = value.to_bytes_be();
        // `to_bytes_be` yields [0] for zero, which still fits
        out[FIELD_BYTES - raw.len()..].copy_from_slice(&raw);
        raw.zeroize();
        Self(out)
    }

    /// Parses a canonical big-endian encoding, rejecting values >= P
    ///
    /// # Errors
    /// Returns `MalformedShare` if the bytes encode a value outside the field
    pub fn from_canonical_bytes(bytes: &[u8]) -> Result<Self> {
        let value = BigUint::from_bytes_be(bytes);
        if value >= *MODULUS {
            return Err(RecoveryError::MalformedShare(
                "field element is not below the modulus".into(),
            ));
        }
        Ok(Self::from_reduced(&value))
    }

    /// Fixed-width big-endian encoding of `FIELD_BYTES` bytes
    #[must_use]
    pub fn to_be_bytes(&self) -> [u8; FIELD_BYTES] {
        self.0
    }

    /// Samples a uniformly random element by rejection
    ///
    /// Draws 257 bits and retries on values >= P; the rejection rate is about
    /// 93 / 2^257 so the loop practically never repeats.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut buf = [0u8; FIELD_BYTES];
        loop {
            rng.fill_bytes(&mut buf);
            buf[0] &= 0x01;
            if BigUint::from_bytes_be(&buf) < *MODULUS {
                let element = Self(buf);
                buf.zeroize();
                return element;
            }
        }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        Self::reduce(&(self.to_biguint() + other.to_biguint()))
    }

    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        // Both operands are canonical, so adding P keeps the difference non-negative
        Self::reduce(&(self.to_biguint() + &*MODULUS - other.to_biguint()))
    }

    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        Self::reduce(&(self.to_biguint() * other.to_biguint()))
    }

    #[must_use]
    pub fn neg(&self) -> Self {
        Self::zero().sub(self)
    }

    /// Multiplicative inverse via Fermat's little theorem, a^(P-2)
    ///
    /// # Errors
    /// Returns `DivisionByZero` if the element is zero
    pub fn inv(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(RecoveryError::DivisionByZero);
        }
        Ok(Self::from_reduced(
            &self.to_biguint().modpow(&INVERSE_EXPONENT, &MODULUS),
        ))
    }

    /// `self / other` in the field
    ///
    /// # Errors
    /// Returns `DivisionByZero` if `other` is zero
    pub fn div(&self, other: &Self) -> Result<Self> {
        Ok(self.mul(&other.inv()?))
    }

    pub(crate) fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.0)
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        let mut bytes = [0u8; FIELD_BYTES];
        bytes[FIELD_BYTES - 8..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }
}

impl From<u8> for FieldElement {
    fn from(value: u8) -> Self {
        Self::from(u64::from(value))
    }
}

impl std::fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FieldElement(0x{:x})", self.to_biguint())
    }
}
