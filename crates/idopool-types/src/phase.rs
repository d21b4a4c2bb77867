//! Lifecycle phases of a launch pool and the operations gated by them.
//!
//! A pool moves through five non-overlapping phases, driven purely by the
//! configured timestamps:
//! **PENDING → WHITELIST → DEPOSIT → CLOSED → ESCROW_OPEN**
//!
//! During WHITELIST, allowlisted participants swap directly at the private
//! price or deposit with a proof. During DEPOSIT, anyone deposits payment for
//! redeemable units. CLOSED contains the `end_ido` milestone after which
//! redemption and authority withdrawals open. ESCROW_OPEN releases escrowed
//! payment.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The five lifecycle phases of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Phase {
    /// Before `start`. Only setup is allowed.
    Pending,
    /// `[start, end_whitelist)`: allowlisted participants only.
    Whitelist,
    /// `[end_whitelist, end_deposits)`: open deposits.
    Deposit,
    /// `[end_deposits, end_escrow)`: deposits closed.
    Closed,
    /// `[end_escrow, ∞)`: escrowed payment can be withdrawn.
    EscrowOpen,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Whitelist => write!(f, "WHITELIST"),
            Self::Deposit => write!(f, "DEPOSIT"),
            Self::Closed => write!(f, "CLOSED"),
            Self::EscrowOpen => write!(f, "ESCROW_OPEN"),
        }
    }
}

/// Every mutating pool operation, named so phase gates and authority checks
/// can report what was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    InitializePool,
    SetAllowlistRoot,
    CreateParticipantAccount,
    DirectSwap,
    DepositForRedeemable,
    RedeemForOffered,
    WithdrawCollectedPayment,
    WithdrawUnsoldOffered,
    DepositToEscrow,
    WithdrawFromEscrow,
}

impl Operation {
    /// Operations only the pool authority may invoke.
    #[must_use]
    pub fn requires_authority(self) -> bool {
        matches!(
            self,
            Self::SetAllowlistRoot | Self::WithdrawCollectedPayment | Self::WithdrawUnsoldOffered
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InitializePool => "INITIALIZE_POOL",
            Self::SetAllowlistRoot => "SET_ALLOWLIST_ROOT",
            Self::CreateParticipantAccount => "CREATE_PARTICIPANT_ACCOUNT",
            Self::DirectSwap => "DIRECT_SWAP",
            Self::DepositForRedeemable => "DEPOSIT_FOR_REDEEMABLE",
            Self::RedeemForOffered => "REDEEM_FOR_OFFERED",
            Self::WithdrawCollectedPayment => "WITHDRAW_COLLECTED_PAYMENT",
            Self::WithdrawUnsoldOffered => "WITHDRAW_UNSOLD_OFFERED",
            Self::DepositToEscrow => "DEPOSIT_TO_ESCROW",
            Self::WithdrawFromEscrow => "WITHDRAW_FROM_ESCROW",
        };
        f.write_str(name)
    }
}
