//! Property tests for split/reconstruct workflows

use guardian_recovery::RecoveryError;
use guardian_recovery::domain::{SECRET_BYTES, Secret, Share, SplitConfig};
use guardian_recovery::field::FieldElement;
use guardian_recovery::reconstruct::{reconstruct, reconstruct_secret};
use guardian_recovery::split::split;
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Random secret of 1..=32 bytes
#[derive(Clone, Debug)]
struct ValidSecret(Vec<u8>);

impl Arbitrary for ValidSecret {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % SECRET_BYTES + 1;
        ValidSecret((0..len).map(|_| u8::arbitrary(g)).collect())
    }
}

/// Threshold and guardian count with 1 <= threshold <= count <= 12
#[derive(Clone, Copy, Debug)]
struct ValidParams {
    threshold: usize,
    count: usize,
}

impl Arbitrary for ValidParams {
    fn arbitrary(g: &mut Gen) -> Self {
        let count = usize::arbitrary(g) % 12 + 1;
        let threshold = usize::arbitrary(g) % count + 1;
        ValidParams { threshold, count }
    }
}

fn split_with(secret: &[u8], params: ValidParams, seed: u64) -> (Secret, SplitConfig, Vec<Share>) {
    let secret = Secret::from_be_bytes(secret).unwrap();
    let config = SplitConfig::from_counts(params.threshold, params.count).unwrap();
    let shares = split(&secret, config, &mut ChaCha20Rng::seed_from_u64(seed));
    (secret, config, shares)
}

/// Pseudo-random subset of `size` shares picked with `seed`
fn pick(shares: &[Share], size: usize, seed: u64) -> Vec<Share> {
    let mut pool: Vec<Share> = shares.to_vec();
    let mut state = seed | 1;
    let mut picked = Vec::with_capacity(size);
    while picked.len() < size {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let at = usize::try_from(state % pool.len() as u64).unwrap();
        picked.push(pool.swap_remove(at));
    }
    picked
}

#[quickcheck]
fn prop_any_threshold_subset_recovers(
    secret: ValidSecret,
    params: ValidParams,
    seed: u64,
    selection: u64,
) -> bool {
    let (original, config, shares) = split_with(&secret.0, params, seed);
    let subset = pick(&shares, params.threshold, selection);
    reconstruct_secret(&subset, config.threshold(), original.width())
        .is_ok_and(|recovered| recovered.to_be_bytes() == original.to_be_bytes())
}

#[quickcheck]
fn prop_every_share_together_recovers(secret: ValidSecret, params: ValidParams, seed: u64) -> bool {
    let (original, config, shares) = split_with(&secret.0, params, seed);
    reconstruct_secret(&shares, config.threshold(), original.width())
        .is_ok_and(|recovered| recovered == original)
}

#[quickcheck]
fn prop_below_threshold_fails_instead_of_guessing(
    secret: ValidSecret,
    params: ValidParams,
    seed: u64,
) -> bool {
    let (_, config, shares) = split_with(&secret.0, params, seed);
    let short = params.threshold - 1;
    matches!(
        reconstruct(&shares[..short], config.threshold()),
        Err(RecoveryError::InsufficientShares { threshold, provided })
            if threshold == params.threshold && provided == short
    )
}

#[quickcheck]
fn prop_forged_extra_share_is_detected(
    secret: ValidSecret,
    params: ValidParams,
    seed: u64,
) -> bool {
    // needs at least one share beyond the threshold
    if params.count == params.threshold {
        return true;
    }
    let (_, config, mut shares) = split_with(&secret.0, params, seed);
    let last = shares.len() - 1;
    let forged = shares[last].value().add(&FieldElement::one());
    shares[last] = Share::new(shares[last].index(), forged);

    matches!(
        reconstruct(&shares, config.threshold()),
        Err(RecoveryError::InconsistentShares(index)) if usize::from(index) == params.count
    )
}

#[quickcheck]
fn prop_reconstruction_is_deterministic(secret: ValidSecret, params: ValidParams, seed: u64) -> bool {
    let (_, config, shares) = split_with(&secret.0, params, seed);
    let subset = &shares[..params.threshold];
    reconstruct(subset, config.threshold()).ok() == reconstruct(subset, config.threshold()).ok()
}
