//! Account registry: who guards which secret, and under what threshold
//!
//! The registry owns every account record and its share list. The plaintext
//! secret only passes through during a split and is dropped (and wiped) right
//! after. Each account sits behind its own mutex; the map lock is held only
//! long enough to look up, insert or remove a handle, so operations on
//! different accounts never wait on each other.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use rand::{CryptoRng, RngCore};
use serde::Serialize;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::codec::{self, SHARE_BYTES, ShareMnemonic};
use crate::domain::{GuardianId, Label, Secret, Share, SplitConfig, Threshold};
use crate::error::{RecoveryError, Result};
use crate::events::{AccountEvent, AccountEventKind};
use crate::session::{RecoveredSecret, RecoverySession, SessionId};
use crate::settings::RegistryConfig;
use crate::split::split;

/// Opaque account handle issued by [`AccountRegistry::add_account`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct AccountId(u64);

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "acct-{}", self.0)
    }
}

/// The share a guardian should receive, ready for distribution
#[derive(Debug, Clone)]
pub struct ShareAssignment {
    pub guardian: GuardianId,
    pub threshold: Threshold,
    pub share: Share,
}

impl ShareAssignment {
    #[must_use]
    pub fn to_bytes(&self) -> Zeroizing<[u8; SHARE_BYTES]> {
        codec::encode_share(&self.share)
    }

    #[must_use]
    pub fn to_words(&self) -> ShareMnemonic {
        codec::encode_share_words(&self.share, self.threshold)
    }
}

pub(crate) struct Account {
    pub(crate) label: Label,
    pub(crate) guardians: Vec<GuardianId>,
    /// Parallel to `guardians`: guardian `i` holds `shares[i]`, index `i + 1`
    pub(crate) shares: Vec<Share>,
    pub(crate) threshold: Threshold,
    pub(crate) secret_width: usize,
    /// Bumped whenever the share set is replaced
    pub(crate) generation: u64,
    /// Shares from earlier generations, refused if a guardian submits them
    pub(crate) retired: Vec<Share>,
    pub(crate) revoked: bool,
    pub(crate) history: Vec<AccountEvent>,
}

impl Account {
    pub(crate) fn is_retired(&self, share: &Share) -> bool {
        self.retired.iter().any(|old| old == share)
    }

    pub(crate) fn position_of(&self, guardian: &GuardianId) -> Option<usize> {
        self.guardians.iter().position(|g| g == guardian)
    }

    fn ensure_active(&self, id: AccountId) -> Result<()> {
        if self.revoked {
            return Err(RecoveryError::AccountRevoked(id.to_string()));
        }
        Ok(())
    }

    fn install(&mut self, guardians: &[GuardianId], config: SplitConfig, shares: Vec<Share>, width: usize) {
        self.guardians = guardians.to_vec();
        let previous = std::mem::replace(&mut self.shares, shares);
        self.retired.extend(previous);
        self.threshold = config.threshold();
        self.secret_width = width;
        self.generation += 1;
    }
}

pub(crate) type AccountHandle = Arc<Mutex<Account>>;

/// Registry of guardian-protected accounts
pub struct AccountRegistry {
    config: RegistryConfig,
    accounts: RwLock<HashMap<AccountId, AccountHandle>>,
    next_account: AtomicU64,
    next_session: AtomicU64,
}

impl Default for AccountRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl AccountRegistry {
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            accounts: RwLock::new(HashMap::new()),
            next_account: AtomicU64::new(1),
            next_session: AtomicU64::new(1),
        }
    }

    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Splits `secret` among `guardians` and records the new account
    ///
    /// Guardian `i` (0-based) in the list receives the share with index `i + 1`.
    /// The secret is consumed and wiped once the shares exist.
    ///
    /// # Errors
    /// `NoGuardians`, `TooManyGuardians`, `DuplicateGuardian`,
    /// `InvalidThreshold` or `LabelTooLong`
    pub fn add_account<R: RngCore + CryptoRng>(
        &self,
        secret: Secret,
        guardians: &[GuardianId],
        threshold: usize,
        label: &str,
        rng: &mut R,
    ) -> Result<AccountId> {
        let config = self.validate_guardians(guardians, threshold)?;
        let label = Label::new(label, self.config.max_label_bytes)?;

        let shares = split(&secret, config, rng);
        let secret_width = secret.width();
        drop(secret);

        let id = AccountId(self.next_account.fetch_add(1, Ordering::Relaxed));
        let created = AccountEvent::now(AccountEventKind::Created {
            account: id,
            label: label.clone(),
            guardians: guardians.to_vec(),
            threshold: *config.threshold(),
        });
        let account = Account {
            label,
            guardians: guardians.to_vec(),
            shares,
            threshold: config.threshold(),
            secret_width,
            generation: 0,
            retired: Vec::new(),
            revoked: false,
            history: vec![created],
        };
        self.accounts
            .write()
            .insert(id, Arc::new(Mutex::new(account)));

        info!(
            account = %id,
            guardians = guardians.len(),
            threshold,
            "account created"
        );
        Ok(id)
    }

    /// Replaces the guardian set of an account
    ///
    /// Shares cannot be re-derived for a new guardian set without the secret,
    /// so this requires `proof` of a successful recovery of this account at
    /// its current generation. The recovered secret is re-split for the new
    /// guardians and every earlier share stops being accepted, including the
    /// old share of a guardian who stays on the list.
    ///
    /// The proof is only borrowed: after a rejected call the caller still
    /// holds it and can retry with corrected arguments. A successful update
    /// bumps the generation, which makes the same proof stale.
    ///
    /// # Errors
    /// - `UnsupportedOperation` without a recovery proof
    /// - `StaleSession` if the proof is for another account or an older guardian set
    /// - `AccountRevoked`, plus the guardian validation errors of [`Self::add_account`]
    pub fn update_guardians<R: RngCore + CryptoRng>(
        &self,
        id: AccountId,
        proof: Option<&RecoveredSecret>,
        guardians: &[GuardianId],
        threshold: usize,
        rng: &mut R,
    ) -> Result<()> {
        let handle = self.handle(id)?;
        let mut account = handle.lock();
        account.ensure_active(id)?;
        let config = self.validate_guardians(guardians, threshold)?;

        let Some(proof) = proof else {
            return Err(RecoveryError::UnsupportedOperation(
                "guardian changes require a prior successful recovery",
            ));
        };
        if proof.account_id() != id || proof.generation() != account.generation {
            return Err(RecoveryError::StaleSession(id.to_string()));
        }

        let secret = proof.secret();
        let shares = split(secret, config, rng);
        account.install(guardians, config, shares, secret.width());

        let generation = account.generation;
        account
            .history
            .push(AccountEvent::now(AccountEventKind::GuardiansUpdated {
                guardians: guardians.to_vec(),
                threshold: *config.threshold(),
                generation,
            }));
        info!(account = %id, generation, guardians = guardians.len(), threshold, "guardians updated");
        Ok(())
    }

    /// Replaces the protected secret with a new one, re-splitting it for the
    /// given guardians
    ///
    /// Needs no recovery: the owner supplies the new secret, so nothing is
    /// derived from the old shares.
    ///
    /// # Errors
    /// `AccountRevoked`, plus the guardian validation errors of [`Self::add_account`]
    pub fn rotate_secret<R: RngCore + CryptoRng>(
        &self,
        id: AccountId,
        secret: Secret,
        guardians: &[GuardianId],
        threshold: usize,
        rng: &mut R,
    ) -> Result<()> {
        let handle = self.handle(id)?;
        let mut account = handle.lock();
        account.ensure_active(id)?;

        let config = self.validate_guardians(guardians, threshold)?;
        let shares = split(&secret, config, rng);
        account.install(guardians, config, shares, secret.width());
        drop(secret);

        let generation = account.generation;
        account
            .history
            .push(AccountEvent::now(AccountEventKind::SecretRotated {
                guardians: guardians.to_vec(),
                threshold: *config.threshold(),
                generation,
            }));
        info!(account = %id, generation, "secret rotated");
        Ok(())
    }

    /// Marks an account inactive; its shares are refused from now on
    ///
    /// The record and its history stay until [`Self::purge`].
    ///
    /// # Errors
    /// `UnknownAccount`, or `AccountRevoked` if it already was
    pub fn revoke(&self, id: AccountId) -> Result<()> {
        let handle = self.handle(id)?;
        let mut account = handle.lock();
        account.ensure_active(id)?;
        account.revoked = true;
        account
            .history
            .push(AccountEvent::now(AccountEventKind::Revoked));
        info!(account = %id, "account revoked");
        Ok(())
    }

    /// Deletes a revoked account together with its history
    ///
    /// # Errors
    /// `UnknownAccount`, or `UnsupportedOperation` for an active account
    pub fn purge(&self, id: AccountId) -> Result<()> {
        let mut accounts = self.accounts.write();
        let handle = accounts
            .get(&id)
            .ok_or_else(|| RecoveryError::UnknownAccount(id.to_string()))?;
        if !handle.lock().revoked {
            return Err(RecoveryError::UnsupportedOperation(
                "only revoked accounts can be purged",
            ));
        }
        accounts.remove(&id);
        info!(account = %id, "account purged");
        Ok(())
    }

    /// Starts a fresh recovery attempt for an account
    ///
    /// # Errors
    /// `UnknownAccount` or `AccountRevoked`
    pub fn open_session(&self, id: AccountId) -> Result<RecoverySession> {
        let handle = self.handle(id)?;
        let (generation, threshold) = {
            let account = handle.lock();
            account.ensure_active(id)?;
            (account.generation, account.threshold)
        };
        let session_id = SessionId::new(self.next_session.fetch_add(1, Ordering::Relaxed));
        debug!(account = %id, session = %session_id, "recovery session opened");
        Ok(RecoverySession::new(
            session_id,
            id,
            handle,
            generation,
            threshold,
            self.config.session_ttl(),
        ))
    }

    /// Shares to hand out, one per guardian in list order
    ///
    /// # Errors
    /// `UnknownAccount` or `AccountRevoked`
    pub fn distribution(&self, id: AccountId) -> Result<Vec<ShareAssignment>> {
        let handle = self.handle(id)?;
        let account = handle.lock();
        account.ensure_active(id)?;
        Ok(account
            .guardians
            .iter()
            .zip(&account.shares)
            .map(|(guardian, share)| ShareAssignment {
                guardian: *guardian,
                threshold: account.threshold,
                share: share.clone(),
            })
            .collect())
    }

    /// The share currently assigned to `guardian`
    ///
    /// # Errors
    /// `UnknownAccount`, `AccountRevoked` or `UnknownGuardian`
    pub fn share_for(&self, id: AccountId, guardian: &GuardianId) -> Result<Share> {
        let handle = self.handle(id)?;
        let account = handle.lock();
        account.ensure_active(id)?;
        let position = account
            .position_of(guardian)
            .ok_or_else(|| RecoveryError::UnknownGuardian(guardian.to_string()))?;
        Ok(account.shares[position].clone())
    }

    /// # Errors
    /// `UnknownAccount`
    pub fn guardians(&self, id: AccountId) -> Result<Vec<GuardianId>> {
        self.read(id, |account| account.guardians.clone())
    }

    /// # Errors
    /// `UnknownAccount`
    pub fn threshold(&self, id: AccountId) -> Result<Threshold> {
        self.read(id, |account| account.threshold)
    }

    /// # Errors
    /// `UnknownAccount`
    pub fn label(&self, id: AccountId) -> Result<Label> {
        self.read(id, |account| account.label.clone())
    }

    /// # Errors
    /// `UnknownAccount`
    pub fn is_revoked(&self, id: AccountId) -> Result<bool> {
        self.read(id, |account| account.revoked)
    }

    /// Number of times the share set has been replaced
    ///
    /// # Errors
    /// `UnknownAccount`
    pub fn generation(&self, id: AccountId) -> Result<u64> {
        self.read(id, |account| account.generation)
    }

    /// # Errors
    /// `UnknownAccount`
    pub fn history(&self, id: AccountId) -> Result<Vec<AccountEvent>> {
        self.read(id, |account| account.history.clone())
    }

    /// The account history as a JSON array, for external auditing
    ///
    /// # Errors
    /// Returns an error for an unknown account or if serialization fails
    pub fn history_json(&self, id: AccountId) -> anyhow::Result<String> {
        let history = self.history(id)?;
        let json = serde_json::to_string(&history)?;
        Ok(json)
    }

    /// Ids of every retained account, revoked ones included
    #[must_use]
    pub fn account_ids(&self) -> Vec<AccountId> {
        let mut ids: Vec<AccountId> = self.accounts.read().keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn handle(&self, id: AccountId) -> Result<AccountHandle> {
        self.accounts
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| RecoveryError::UnknownAccount(id.to_string()))
    }

    fn read<T>(&self, id: AccountId, f: impl FnOnce(&Account) -> T) -> Result<T> {
        let handle = self.handle(id)?;
        let account = handle.lock();
        Ok(f(&account))
    }

    fn validate_guardians(&self, guardians: &[GuardianId], threshold: usize) -> Result<SplitConfig> {
        if guardians.is_empty() {
            return Err(RecoveryError::NoGuardians);
        }
        let max = usize::from(self.config.max_guardians);
        if guardians.len() > max {
            return Err(RecoveryError::TooManyGuardians {
                count: guardians.len(),
                max,
            });
        }
        let mut seen = HashSet::with_capacity(guardians.len());
        for guardian in guardians {
            if !seen.insert(guardian) {
                return Err(RecoveryError::DuplicateGuardian(guardian.to_string()));
            }
        }
        SplitConfig::from_counts(threshold, guardians.len())
    }
}
