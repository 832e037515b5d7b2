//! Recovery sessions: collect guardian shares, then reconstruct
//!
//! A session moves `Collecting -> Reconstructing -> Succeeded | Failed`.
//! Every attempt gets its own session and submission set; two sessions for
//! the same account never see each other's shares. Submitted shares are wiped
//! when the session is dropped, whatever state it ended in.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::codec;
use crate::domain::{GuardianId, Secret, Share, Threshold};
use crate::error::{RecoveryError, Result};
use crate::events::{AccountEvent, AccountEventKind};
use crate::reconstruct::reconstruct_secret;
use crate::registry::{Account, AccountHandle, AccountId};

/// Token identifying one recovery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(u64);

impl SessionId {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Collecting,
    Reconstructing,
    Succeeded,
    Failed,
}

impl SessionState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// A secret recovered by a successful session
///
/// Only a session can produce one, which makes it usable as proof of a
/// recovery quorum for [`AccountRegistry::update_guardians`](crate::registry::AccountRegistry::update_guardians).
#[derive(Debug)]
pub struct RecoveredSecret {
    account_id: AccountId,
    generation: u64,
    secret: Secret,
}

impl RecoveredSecret {
    #[must_use]
    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// Guardian-set generation the shares belonged to
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn secret(&self) -> &Secret {
        &self.secret
    }

    /// Secret bytes at the width the account was created with
    #[must_use]
    pub fn to_bytes(&self) -> Zeroizing<Vec<u8>> {
        self.secret.to_be_bytes()
    }
}

/// One attempt at recovering an account's secret
pub struct RecoverySession {
    id: SessionId,
    account_id: AccountId,
    account: AccountHandle,
    generation: u64,
    threshold: Threshold,
    state: SessionState,
    submissions: BTreeMap<GuardianId, Share>,
    opened_at: Instant,
    ttl: Duration,
}

impl RecoverySession {
    pub(crate) fn new(
        id: SessionId,
        account_id: AccountId,
        account: AccountHandle,
        generation: u64,
        threshold: Threshold,
        ttl: Duration,
    ) -> Self {
        Self {
            id,
            account_id,
            account,
            generation,
            threshold,
            state: SessionState::Collecting,
            submissions: BTreeMap::new(),
            opened_at: Instant::now(),
            ttl,
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    #[must_use]
    pub fn submission_count(&self) -> usize {
        self.submissions.len()
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.opened_at.elapsed() > self.ttl
    }

    /// Records `guardian`'s share
    ///
    /// Resubmitting an identical share is a no-op.
    ///
    /// # Errors
    /// - `UnknownGuardian` if the guardian does not belong to the account
    /// - `ShareMismatch` if the share index is not the guardian's assigned one
    /// - `RetiredShare` if the share belongs to an earlier guardian set
    /// - `ConflictingShare` if the guardian already submitted a different share
    /// - `AccountRevoked`, `StaleSession`, `SessionClosed` or `SessionExpired`
    pub fn submit_share(&mut self, guardian: GuardianId, share: Share) -> Result<()> {
        self.ensure_open()?;
        let account = self.account.lock();
        self.check_account(&account)?;

        let position = account
            .position_of(&guardian)
            .ok_or_else(|| RecoveryError::UnknownGuardian(guardian.to_string()))?;
        let expected = account.shares[position].index();
        if share.index() != expected {
            return Err(RecoveryError::ShareMismatch {
                guardian: guardian.to_string(),
                expected: *expected,
                actual: *share.index(),
            });
        }
        if account.is_retired(&share) {
            warn!(session = %self.id, %guardian, "guardian submitted a retired share");
            return Err(RecoveryError::RetiredShare(guardian.to_string()));
        }
        drop(account);

        if let Some(previous) = self.submissions.get(&guardian) {
            if *previous == share {
                debug!(session = %self.id, %guardian, "duplicate share ignored");
                return Ok(());
            }
            warn!(session = %self.id, %guardian, "guardian submitted a conflicting share");
            return Err(RecoveryError::ConflictingShare(guardian.to_string()));
        }

        debug!(session = %self.id, %guardian, index = *share.index(), "share accepted");
        self.submissions.insert(guardian, share);
        Ok(())
    }

    /// Decodes a binary share and submits it
    ///
    /// # Errors
    /// `MalformedShare`, or any error of [`Self::submit_share`]
    pub fn submit_encoded(&mut self, guardian: GuardianId, bytes: &[u8]) -> Result<()> {
        let share = codec::decode_share(bytes)?;
        self.submit_share(guardian, share)
    }

    /// Decodes a word-encoded share and submits it
    ///
    /// # Errors
    /// `MalformedShare` or `ChecksumMismatch` (including a share made for a
    /// different threshold), or any error of [`Self::submit_share`]
    pub fn submit_words(&mut self, guardian: GuardianId, text: &str) -> Result<()> {
        let (threshold, share) = codec::decode_share_words(text)?;
        if threshold != self.threshold {
            return Err(RecoveryError::MalformedShare(format!(
                "share was issued for threshold {}, account requires {}",
                *threshold, *self.threshold
            )));
        }
        self.submit_share(guardian, share)
    }

    /// Reconstructs the secret once enough shares are in
    ///
    /// With fewer than `threshold` submissions the session keeps collecting.
    /// Otherwise it reconstructs once and ends in `Succeeded` or `Failed`;
    /// a failure is final because the same shares would fail again.
    ///
    /// # Errors
    /// - `InsufficientShares` while below threshold
    /// - `InconsistentShares` and other reconstruction errors (session fails)
    /// - `AccountRevoked`, `StaleSession`, `SessionClosed` or `SessionExpired`
    pub fn attempt_recovery(&mut self) -> Result<RecoveredSecret> {
        self.ensure_open()?;
        let account_handle = self.account.clone();
        let mut account = account_handle.lock();
        self.check_account(&account)?;

        let needed = self.threshold.get();
        if self.submissions.len() < needed {
            return Err(RecoveryError::InsufficientShares {
                threshold: needed,
                provided: self.submissions.len(),
            });
        }

        self.state = SessionState::Reconstructing;
        let shares: Vec<Share> = self.submissions.values().cloned().collect();
        match reconstruct_secret(&shares, self.threshold, account.secret_width) {
            Ok(secret) => {
                self.state = SessionState::Succeeded;
                let guardians: Vec<GuardianId> = self.submissions.keys().copied().collect();
                account
                    .history
                    .push(AccountEvent::now(AccountEventKind::RecoveryCompleted {
                        session: self.id,
                        guardians,
                    }));
                info!(
                    account = %self.account_id,
                    session = %self.id,
                    shares = shares.len(),
                    "recovery succeeded"
                );
                Ok(RecoveredSecret {
                    account_id: self.account_id,
                    generation: self.generation,
                    secret,
                })
            }
            Err(err) => {
                self.state = SessionState::Failed;
                if err.is_fraud_signal() {
                    warn!(account = %self.account_id, session = %self.id, error = %err, "recovery failed: inconsistent shares");
                } else {
                    info!(account = %self.account_id, session = %self.id, error = %err, "recovery failed");
                }
                Err(err)
            }
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.state.is_terminal() {
            return Err(RecoveryError::SessionClosed(self.id.to_string()));
        }
        if self.is_expired() {
            return Err(RecoveryError::SessionExpired(self.id.to_string()));
        }
        Ok(())
    }

    fn check_account(&self, account: &Account) -> Result<()> {
        if account.revoked {
            return Err(RecoveryError::AccountRevoked(self.account_id.to_string()));
        }
        if account.generation != self.generation {
            return Err(RecoveryError::StaleSession(self.account_id.to_string()));
        }
        Ok(())
    }
}

impl std::fmt::Debug for RecoverySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecoverySession")
            .field("id", &self.id)
            .field("account_id", &self.account_id)
            .field("state", &self.state)
            .field("submissions", &self.submissions.len())
            .finish_non_exhaustive()
    }
}
