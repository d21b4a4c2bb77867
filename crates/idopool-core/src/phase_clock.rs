//! The phase clock: a pure function from schedule + `now` to a phase.
//!
//! Every time-window decision in the engine goes through [`check`], so each
//! operation's window can be tested in isolation. Intervals are half-open:
//!
//! ```text
//!   PENDING   WHITELIST        DEPOSIT          CLOSED              ESCROW_OPEN
//! ──────────┼──────────────┼──────────────┼──────────┬─────────┼──────────────▶ t
//!         start      end_whitelist   end_deposits   end_ido  end_escrow
//! ```
//!
//! `end_ido` is a milestone inside CLOSED: escrow deposits stop there, and
//! redemption and authority withdrawals start there. That fixes the pro-rata
//! denominator before the first redemption.

use idopool_types::{IdoTimes, LaunchpadError, Operation, Phase, Result, UnixTimestamp};

/// The phase the pool is in at `now`.
#[must_use]
pub fn phase(now: UnixTimestamp, times: &IdoTimes) -> Phase {
    if now < times.start {
        Phase::Pending
    } else if now < times.end_whitelist {
        Phase::Whitelist
    } else if now < times.end_deposits {
        Phase::Deposit
    } else if now < times.end_escrow {
        Phase::Closed
    } else {
        Phase::EscrowOpen
    }
}

/// Whether `operation` may run at `now`.
///
/// `WithdrawFromEscrow` is permitted in every phase here because each escrow
/// entry carries its own unlock time; see [`escrow_unlocked`].
#[must_use]
pub fn permits(operation: Operation, now: UnixTimestamp, times: &IdoTimes) -> bool {
    let current = phase(now, times);
    match operation {
        Operation::InitializePool | Operation::SetAllowlistRoot => current == Phase::Pending,
        Operation::CreateParticipantAccount | Operation::WithdrawFromEscrow => true,
        Operation::DirectSwap => current == Phase::Whitelist,
        Operation::DepositForRedeemable => matches!(current, Phase::Whitelist | Phase::Deposit),
        Operation::DepositToEscrow => {
            matches!(current, Phase::Deposit | Phase::Closed) && now < times.end_ido
        }
        Operation::RedeemForOffered
        | Operation::WithdrawCollectedPayment
        | Operation::WithdrawUnsoldOffered => {
            matches!(current, Phase::Closed | Phase::EscrowOpen) && now >= times.end_ido
        }
    }
}

/// Gate an operation: the current phase, or `PhaseViolation`.
///
/// # Errors
/// Returns [`LaunchpadError::PhaseViolation`] if the window is closed.
pub fn check(operation: Operation, now: UnixTimestamp, times: &IdoTimes) -> Result<Phase> {
    let current = phase(now, times);
    if permits(operation, now, times) {
        Ok(current)
    } else {
        tracing::debug!(%operation, phase = %current, now, "Phase gate refused operation");
        Err(LaunchpadError::PhaseViolation {
            operation,
            phase: current,
            now,
        })
    }
}

/// Whether an escrow entry with `unlock_time` may be withdrawn at `now`.
#[must_use]
pub fn escrow_unlocked(now: UnixTimestamp, unlock_time: UnixTimestamp) -> bool {
    now >= unlock_time
}
