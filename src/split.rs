//! Splitting a secret into guardian shares

use rand::{CryptoRng, RngCore};

use crate::domain::{Secret, Share, ShareIndex, SplitConfig};
use crate::field::FieldElement;

/// Splits `secret` into `share_count` shares, any `threshold` of which
/// reconstruct it
///
/// Samples `threshold - 1` uniformly random coefficients from `rng` and
/// evaluates `f(x) = secret + a_1 x + ... + a_{T-1} x^{T-1}` at `x = 1..=N`.
/// Fewer than `threshold` shares are independent of the secret.
///
/// The randomness source is injected: pass `rand::rngs::OsRng` in production.
/// A seeded generator makes the output reproducible and belongs in tests only.
///
/// # Examples
///
/// ```rust
/// use guardian_recovery::domain::{Secret, SplitConfig};
/// use guardian_recovery::reconstruct::reconstruct;
/// use guardian_recovery::split::split;
///
/// let secret = Secret::from_be_bytes(&[0x06, 0xd6, 0x16]).unwrap();
/// let config = SplitConfig::from_counts(3, 5).unwrap();
/// let shares = split(&secret, config, &mut rand::rngs::OsRng);
/// assert_eq!(shares.len(), 5);
///
/// let recovered = reconstruct(&shares[1..4], config.threshold()).unwrap();
/// assert_eq!(&recovered.to_be_bytes()[30..], &[0x06, 0xd6, 0x16]);
/// ```
pub fn split<R: RngCore + CryptoRng>(
    secret: &Secret,
    config: SplitConfig,
    rng: &mut R,
) -> Vec<Share> {
    let mut coefficients = Vec::with_capacity(config.threshold().get());
    coefficients.push(secret.value().clone());
    coefficients.extend((1..config.threshold().get()).map(|_| FieldElement::random(rng)));

    (1..=*config.share_count())
        .map(|i| {
            // i >= 1 by construction of the range
            let index = ShareIndex::new(i).unwrap_or_else(|_| unreachable!("index starts at 1"));
            Share::new(index, evaluate(&coefficients, &index.as_field()))
        })
        .collect()
}

/// Horner evaluation of the polynomial with the given coefficients
/// (lowest degree first)
pub(crate) fn evaluate(coefficients: &[FieldElement], x: &FieldElement) -> FieldElement {
    coefficients
        .iter()
        .rev()
        .fold(FieldElement::zero(), |acc, coefficient| {
            acc.mul(x).add(coefficient)
        })
}
