//! Journal event types for the pool audit trail.
//!
//! Every committed transition appends one [`PoolEvent`]. Rejected
//! operations append nothing.

use serde::{Deserialize, Serialize};

use crate::{Amount, Digest, EventId, Identity, UnixTimestamp};

/// What a committed transition did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    PoolInitialized {
        authority: Identity,
        total_offered: Amount,
    },
    AllowlistRootSet {
        root: Digest,
    },
    ParticipantCreated {
        participant: Identity,
    },
    DirectSwapped {
        participant: Identity,
        payment_in: Amount,
        offered_out: Amount,
    },
    Deposited {
        participant: Identity,
        payment_in: Amount,
        with_proof: bool,
    },
    Redeemed {
        participant: Identity,
        redeemable_in: Amount,
        offered_out: Amount,
    },
    EscrowDeposited {
        participant: Identity,
        amount: Amount,
    },
    EscrowWithdrawn {
        participant: Identity,
        amount: Amount,
    },
    PaymentCollected {
        authority: Identity,
        amount: Amount,
    },
    UnsoldOfferedWithdrawn {
        authority: Identity,
        amount: Amount,
    },
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::PoolInitialized { .. } => "POOL_INITIALIZED",
            Self::AllowlistRootSet { .. } => "ALLOWLIST_ROOT_SET",
            Self::ParticipantCreated { .. } => "PARTICIPANT_CREATED",
            Self::DirectSwapped { .. } => "DIRECT_SWAPPED",
            Self::Deposited { .. } => "DEPOSITED",
            Self::Redeemed { .. } => "REDEEMED",
            Self::EscrowDeposited { .. } => "ESCROW_DEPOSITED",
            Self::EscrowWithdrawn { .. } => "ESCROW_WITHDRAWN",
            Self::PaymentCollected { .. } => "PAYMENT_COLLECTED",
            Self::UnsoldOfferedWithdrawn { .. } => "UNSOLD_OFFERED_WITHDRAWN",
        };
        f.write_str(name)
    }
}

/// One entry in a pool's journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEvent {
    pub id: EventId,
    /// Position in the pool journal, starting at 0.
    pub seq: u64,
    /// The `now` the operation was executed at.
    pub at: UnixTimestamp,
    pub kind: EventKind,
}
