//! Reconstructing a secret from guardian shares
//!
//! Uses Lagrange interpolation at `x = 0` over exactly `threshold` shares,
//! taken in ascending index order. Any further shares are checked against the
//! interpolated polynomial, so a forged share in an over-threshold set is
//! reported as `InconsistentShares` instead of silently skewing the result.

use std::collections::BTreeSet;

use crate::domain::{Secret, Share, Threshold};
use crate::error::{RecoveryError, Result};
use crate::field::FieldElement;

/// Recovers `f(0)` from at least `threshold` shares with distinct indices
///
/// # Errors
/// - `DuplicateShareIndex` if two shares carry the same index
/// - `InsufficientShares` if fewer than `threshold` shares are given
/// - `InconsistentShares` if a share beyond the first `threshold` does not
///   lie on the polynomial they define
pub fn reconstruct(shares: &[Share], threshold: Threshold) -> Result<FieldElement> {
    let mut seen = BTreeSet::new();
    for share in shares {
        if !seen.insert(share.index()) {
            return Err(RecoveryError::DuplicateShareIndex(*share.index()));
        }
    }

    let needed = threshold.get();
    if shares.len() < needed {
        return Err(RecoveryError::InsufficientShares {
            threshold: needed,
            provided: shares.len(),
        });
    }

    let mut ordered: Vec<&Share> = shares.iter().collect();
    ordered.sort_by_key(|share| share.index());
    let (basis, extra) = ordered.split_at(needed);

    let secret = interpolate_at(basis, &FieldElement::zero())?;
    for share in extra {
        if interpolate_at(basis, &share.index().as_field())? != *share.value() {
            return Err(RecoveryError::InconsistentShares(*share.index()));
        }
    }
    Ok(secret)
}

/// [`reconstruct`], returning the secret at the given byte width
///
/// # Errors
/// Same as [`reconstruct`]
pub fn reconstruct_secret(shares: &[Share], threshold: Threshold, width: usize) -> Result<Secret> {
    reconstruct(shares, threshold).map(|value| Secret::from_field(value, width))
}

/// Evaluates the unique polynomial through `points` at `x`
fn interpolate_at(points: &[&Share], x: &FieldElement) -> Result<FieldElement> {
    let mut sum = FieldElement::zero();
    for (i, share_i) in points.iter().enumerate() {
        let x_i = share_i.index().as_field();
        let mut numerator = FieldElement::one();
        let mut denominator = FieldElement::one();
        for (j, share_j) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            let x_j = share_j.index().as_field();
            numerator = numerator.mul(&x.sub(&x_j));
            denominator = denominator.mul(&x_i.sub(&x_j));
        }
        let term = share_i.value().mul(&numerator.div(&denominator)?);
        sum = sum.add(&term);
    }
    Ok(sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ShareIndex, SplitConfig};
    use crate::split::split;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn threshold(t: usize) -> Threshold {
        Threshold::new(t).unwrap()
    }

    fn split_sample(t: usize, n: usize) -> (Secret, Vec<Share>) {
        let secret = Secret::from_be_bytes(&[0x06, 0xd6, 0x16]).unwrap();
        let config = SplitConfig::from_counts(t, n).unwrap();
        let shares = split(&secret, config, &mut ChaCha20Rng::seed_from_u64(42));
        (secret, shares)
    }

    #[test]
    fn test_known_line() {
        // f(x) = 5 + 3x -> (1, 8), (2, 11)
        let shares = [
            Share::new(ShareIndex::new(1).unwrap(), FieldElement::from(8u64)),
            Share::new(ShareIndex::new(2).unwrap(), FieldElement::from(11u64)),
        ];
        assert_eq!(
            reconstruct(&shares, threshold(2)).unwrap(),
            FieldElement::from(5u64)
        );
    }

    #[test]
    fn test_every_threshold_subset_recovers() {
        let (secret, shares) = split_sample(3, 5);
        for a in 0..5 {
            for b in a + 1..5 {
                for c in b + 1..5 {
                    let subset = [shares[a].clone(), shares[b].clone(), shares[c].clone()];
                    assert_eq!(&reconstruct(&subset, threshold(3)).unwrap(), secret.value());
                }
            }
        }
    }

    #[test]
    fn test_order_of_input_does_not_matter() {
        let (secret, shares) = split_sample(3, 5);
        let reversed: Vec<Share> = shares.iter().rev().cloned().collect();
        assert_eq!(&reconstruct(&reversed, threshold(3)).unwrap(), secret.value());
    }

    #[test]
    fn test_insufficient_shares() {
        let (_, shares) = split_sample(3, 5);
        assert_eq!(
            reconstruct(&shares[..2], threshold(3)).unwrap_err(),
            RecoveryError::InsufficientShares {
                threshold: 3,
                provided: 2
            }
        );
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let (_, shares) = split_sample(2, 3);
        let dup = [shares[0].clone(), shares[0].clone(), shares[1].clone()];
        assert_eq!(
            reconstruct(&dup, threshold(2)).unwrap_err(),
            RecoveryError::DuplicateShareIndex(1)
        );
    }

    #[test]
    fn test_altered_share_beyond_threshold_is_flagged() {
        let (_, mut shares) = split_sample(3, 5);
        let forged = shares[4].value().add(&FieldElement::one());
        shares[4] = Share::new(shares[4].index(), forged);

        let err = reconstruct(&shares, threshold(3)).unwrap_err();
        assert_eq!(err, RecoveryError::InconsistentShares(5));
        assert!(err.is_fraud_signal());
    }

    #[test]
    fn test_altered_share_within_threshold_yields_wrong_secret() {
        let (secret, mut shares) = split_sample(3, 5);
        let forged = shares[0].value().add(&FieldElement::one());
        shares[0] = Share::new(shares[0].index(), forged);

        let recovered = reconstruct(&shares[..3], threshold(3)).unwrap();
        assert_ne!(&recovered, secret.value());
    }

    #[test]
    fn test_all_consistent_extra_shares_accepted() {
        let (secret, shares) = split_sample(2, 6);
        assert_eq!(&reconstruct(&shares, threshold(2)).unwrap(), secret.value());
    }

    #[test]
    fn test_reconstruct_secret_keeps_width() {
        let (secret, shares) = split_sample(2, 3);
        let recovered = reconstruct_secret(&shares, threshold(2), secret.width()).unwrap();
        assert_eq!(recovered, secret);
    }
}
