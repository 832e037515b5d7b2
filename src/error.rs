//! Error taxonomy for splitting, registration and recovery

use thiserror::Error;

/// Every way a recovery operation can fail
///
/// Validation errors surface immediately with their specific kind. None of
/// them are retried internally: all operations are deterministic over their
/// input, so only new input (more or different shares) can change the result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecoveryError {
    #[error("invalid threshold {threshold} for {share_count} guardians (need 1 <= T <= N)")]
    InvalidThreshold { threshold: usize, share_count: usize },

    #[error("threshold {0} is outside 1..=255")]
    ThresholdOutOfRange(usize),

    #[error("secret does not fit in the field")]
    SecretOutOfRange,

    #[error("guardian {0} appears more than once")]
    DuplicateGuardian(String),

    #[error("division by zero in the field")]
    DivisionByZero,

    #[error("share index {0} supplied more than once")]
    DuplicateShareIndex(u8),

    #[error("insufficient shares: need {threshold}, got {provided}")]
    InsufficientShares { threshold: usize, provided: usize },

    #[error("share with index {0} is inconsistent with the reconstructed polynomial")]
    InconsistentShares(u8),

    #[error("guardian {0} is not part of this account")]
    UnknownGuardian(String),

    #[error("guardian {guardian} holds index {expected}, share carries index {actual}")]
    ShareMismatch {
        guardian: String,
        expected: u8,
        actual: u8,
    },

    #[error("guardian {0} already submitted a different share")]
    ConflictingShare(String),

    #[error("guardian {0} submitted a share from a replaced guardian set")]
    RetiredShare(String),

    #[error("account {0} has been revoked")]
    AccountRevoked(String),

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    #[error("an account needs at least one guardian")]
    NoGuardians,

    #[error("{count} guardians exceeds the limit of {max}")]
    TooManyGuardians { count: usize, max: usize },

    #[error("label is {len} bytes, limit is {max}")]
    LabelTooLong { len: usize, max: usize },

    #[error("invalid guardian identifier: {0}")]
    InvalidGuardianId(String),

    #[error("malformed share: {0}")]
    MalformedShare(String),

    #[error("checksum verification failed: expected 0x{expected:08x}, got 0x{actual:08x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error("unknown account {0}")]
    UnknownAccount(String),

    #[error("session {0} has already finished")]
    SessionClosed(String),

    #[error("session {0} has expired")]
    SessionExpired(String),

    #[error("guardian set of account {0} changed since the recovery was started")]
    StaleSession(String),
}

impl RecoveryError {
    /// True when the error points at a malicious or corrupted share rather
    /// than at missing input.
    ///
    /// Callers react to `InsufficientShares` by contacting more guardians and
    /// to fraud signals by flagging the guardians involved.
    #[must_use]
    pub fn is_fraud_signal(&self) -> bool {
        matches!(
            self,
            Self::InconsistentShares(_) | Self::ConflictingShare(_)
        )
    }
}

pub type Result<T, E = RecoveryError> = std::result::Result<T, E>;
