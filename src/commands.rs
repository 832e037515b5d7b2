//! Byte-level entry points for enrolling an account and recovering it
//!
//! These accept and return the raw formats external collaborators exchange:
//! big-endian secret bytes, 20-byte guardian ids and binary shares.

use std::collections::BTreeMap;

use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::domain::{GuardianId, Secret};
use crate::error::Result;
use crate::registry::{AccountId, AccountRegistry, ShareAssignment};

/// Result of [`enroll`]: the new account and the shares to distribute
#[derive(Debug)]
pub struct Enrollment {
    pub account_id: AccountId,
    pub assignments: Vec<ShareAssignment>,
}

/// Registers a secret under a guardian set and returns the shares to hand out
///
/// # Errors
/// `SecretOutOfRange`, or any error of [`AccountRegistry::add_account`]
pub fn enroll<R: RngCore + CryptoRng>(
    registry: &AccountRegistry,
    secret_bytes: &[u8],
    guardians: &[GuardianId],
    threshold: usize,
    label: &str,
    rng: &mut R,
) -> Result<Enrollment> {
    let secret = Secret::from_be_bytes(secret_bytes)?;
    let account_id = registry.add_account(secret, guardians, threshold, label, rng)?;
    let assignments = registry.distribution(account_id)?;
    Ok(Enrollment {
        account_id,
        assignments,
    })
}

/// Runs a complete recovery from guardian-submitted share bytes
///
/// Opens a new session, submits every share and attempts reconstruction.
/// The first rejected submission aborts the attempt with its specific error.
///
/// # Errors
/// Any submission error of [`RecoverySession::submit_encoded`] or recovery
/// error of [`RecoverySession::attempt_recovery`]
///
/// [`RecoverySession::submit_encoded`]: crate::session::RecoverySession::submit_encoded
/// [`RecoverySession::attempt_recovery`]: crate::session::RecoverySession::attempt_recovery
pub fn recover(
    registry: &AccountRegistry,
    account_id: AccountId,
    submissions: &BTreeMap<GuardianId, Vec<u8>>,
) -> Result<Zeroizing<Vec<u8>>> {
    let mut session = registry.open_session(account_id)?;
    for (guardian, bytes) in submissions {
        session.submit_encoded(*guardian, bytes)?;
    }
    let recovered = session.attempt_recovery()?;
    Ok(recovered.to_bytes())
}
