//! Append-only audit log of account lifecycle changes

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::domain::{GuardianId, Label};
use crate::registry::AccountId;
use crate::session::SessionId;

/// One entry in an account's history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountEvent {
    pub at_unix_secs: u64,
    #[serde(flatten)]
    pub kind: AccountEventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AccountEventKind {
    Created {
        account: AccountId,
        label: Label,
        guardians: Vec<GuardianId>,
        threshold: u8,
    },
    GuardiansUpdated {
        guardians: Vec<GuardianId>,
        threshold: u8,
        generation: u64,
    },
    SecretRotated {
        guardians: Vec<GuardianId>,
        threshold: u8,
        generation: u64,
    },
    RecoveryCompleted {
        session: SessionId,
        guardians: Vec<GuardianId>,
    },
    Revoked,
}

impl AccountEvent {
    pub(crate) fn now(kind: AccountEventKind) -> Self {
        let at_unix_secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs());
        Self { at_unix_secs, kind }
    }
}
