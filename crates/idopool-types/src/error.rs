//! Error types for the idopool launch engine.
//!
//! All errors use the `IDO_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Phase errors
//! - 2xx: Allowlist / authority errors
//! - 3xx: Setup errors
//! - 4xx: Balance / allocation errors
//! - 5xx: Arithmetic errors
//! - 6xx: Escrow errors
//! - 7xx: Custody errors
//! - 8xx: Invariant errors
//! - 9xx: General / internal errors

use thiserror::Error;

use crate::{Amount, Asset, Identity, Operation, Phase, PoolId, UnixTimestamp};

/// Which part of the offered allocation a disbursement draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationKind {
    Public,
    Private,
}

impl std::fmt::Display for AllocationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Private => write!(f, "private"),
        }
    }
}

/// Central error enum for all idopool operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LaunchpadError {
    // =================================================================
    // Phase Errors (1xx)
    // =================================================================
    /// The operation is not permitted in the current time window.
    #[error("IDO_ERR_100: {operation} not permitted during {phase} at t={now}")]
    PhaseViolation {
        operation: Operation,
        phase: Phase,
        now: UnixTimestamp,
    },

    // =================================================================
    // Allowlist / Authority Errors (2xx)
    // =================================================================
    /// The membership proof did not reproduce the committed root, or no
    /// root is committed.
    #[error("IDO_ERR_200: Given proof is invalid")]
    ProofInvalid,

    /// A one-shot value was already set.
    #[error("IDO_ERR_201: {what} already set")]
    AlreadySet { what: &'static str },

    /// The caller lacks the capability required by the operation.
    #[error("IDO_ERR_202: Unauthorized: {caller} may not {operation}")]
    Unauthorized {
        caller: Identity,
        operation: Operation,
    },

    // =================================================================
    // Setup Errors (3xx)
    // =================================================================
    /// A pool with this id already exists.
    #[error("IDO_ERR_300: Pool already initialized: {0}")]
    PoolAlreadyInitialized(PoolId),

    /// No pool with this id is registered.
    #[error("IDO_ERR_301: Pool not found: {0}")]
    PoolNotFound(PoolId),

    /// The pool configuration is invalid.
    #[error("IDO_ERR_302: Invalid pool config: {reason}")]
    InvalidConfig { reason: String },

    /// The participant already has an account in this pool.
    #[error("IDO_ERR_303: Participant already initialized: {0}")]
    ParticipantAlreadyInitialized(Identity),

    /// The participant has no account in this pool.
    #[error("IDO_ERR_304: Participant not found: {0}")]
    ParticipantNotFound(Identity),

    // =================================================================
    // Balance / Allocation Errors (4xx)
    // =================================================================
    /// Amount exceeds the holder's redeemable or escrow balance.
    #[error("IDO_ERR_400: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Amount, available: Amount },

    /// Disbursement would exceed the configured allocation.
    #[error(
        "IDO_ERR_401: {kind} allocation exceeded: requested {requested}, remaining {remaining}"
    )]
    AllocationExceeded {
        kind: AllocationKind,
        requested: Amount,
        remaining: Amount,
    },

    /// The participant already used their one-shot direct swap.
    #[error("IDO_ERR_402: Direct swap already claimed by {0}")]
    AlreadyClaimed(Identity),

    /// Direct swap and redeemable deposit are mutually exclusive per participant.
    #[error("IDO_ERR_403: {0} already entered the pool through the other path")]
    PathConflict(Identity),

    /// Zero or otherwise unusable amount.
    #[error("IDO_ERR_404: Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// The caller's expected offered amount does not match the computed one.
    #[error("IDO_ERR_405: Given amount out is invalid: requested {requested}, computed {computed}")]
    InvalidAmountOut { requested: Amount, computed: Amount },

    // =================================================================
    // Arithmetic Errors (5xx)
    // =================================================================
    #[error("IDO_ERR_500: Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("IDO_ERR_501: Arithmetic underflow")]
    ArithmeticUnderflow,

    #[error("IDO_ERR_502: Division by zero")]
    DivisionByZero,

    // =================================================================
    // Escrow Errors (6xx)
    // =================================================================
    /// Escrow withdrawal attempted before the unlock time.
    #[error("IDO_ERR_600: Escrow locked until t={unlock_time} (now t={now})")]
    EscrowLocked {
        unlock_time: UnixTimestamp,
        now: UnixTimestamp,
    },

    /// The participant has no escrow entry.
    #[error("IDO_ERR_601: No escrow entry for {0}")]
    EscrowNotFound(Identity),

    // =================================================================
    // Custody Errors (7xx)
    // =================================================================
    /// The asset ledger rejected a transfer batch.
    #[error("IDO_ERR_700: Insufficient {asset} funds in {holder}: need {needed}, have {available}")]
    InsufficientFunds {
        holder: String,
        asset: Asset,
        needed: Amount,
        available: Amount,
    },

    // =================================================================
    // Invariant Errors (8xx)
    // =================================================================
    /// A ledger invariant does not hold. Critical safety alert.
    #[error("IDO_ERR_800: Invariant violation: {reason}")]
    InvariantViolation { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("IDO_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("IDO_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (unreadable pool definition, missing fields, etc.).
    #[error("IDO_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, LaunchpadError>;

impl From<serde_json::Error> for LaunchpadError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
