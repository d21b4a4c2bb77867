//! Per-participant records: the redeemable account and the escrow entry.
//!
//! Both are created lazily and never deleted; balances drain to zero
//! instead. Mutators are checked and leave the record untouched on error,
//! so callers can stage a copy and commit it only when every step passed.

use serde::{Deserialize, Serialize};

use crate::{Amount, Identity, LaunchpadError, Result, UnixTimestamp};

/// A participant's position in one pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantAccount {
    /// The participant.
    pub owner: Identity,
    /// Redeemable units currently held (1 unit per deposited payment unit).
    pub redeemable_balance: Amount,
    /// Total payment ever deposited for redeemable units.
    pub cumulative_deposited: Amount,
    /// Redeemable units already converted to the offered asset.
    pub redeemed_total: Amount,
    /// Offered units received through redemption.
    pub offered_received: Amount,
    /// Whether the one-shot private direct swap was used.
    pub has_claimed_direct_swap: bool,
    /// Payment paid in the direct swap.
    pub direct_swap_payment: Amount,
    /// Offered units received from the direct swap.
    pub direct_swap_offered: Amount,
}

impl ParticipantAccount {
    #[must_use]
    pub fn new(owner: Identity) -> Self {
        Self {
            owner,
            redeemable_balance: 0,
            cumulative_deposited: 0,
            redeemed_total: 0,
            offered_received: 0,
            has_claimed_direct_swap: false,
            direct_swap_payment: 0,
            direct_swap_offered: 0,
        }
    }

    /// Whether the participant has used the deposit-then-redeem path.
    #[must_use]
    pub fn entered_redeemable_path(&self) -> bool {
        self.cumulative_deposited > 0
    }

    /// Mint `amount` redeemable units against a payment deposit.
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` if a counter would overflow.
    pub fn credit_deposit(&mut self, amount: Amount) -> Result<()> {
        let balance = self
            .redeemable_balance
            .checked_add(amount)
            .ok_or(LaunchpadError::ArithmeticOverflow)?;
        let deposited = self
            .cumulative_deposited
            .checked_add(amount)
            .ok_or(LaunchpadError::ArithmeticOverflow)?;
        self.redeemable_balance = balance;
        self.cumulative_deposited = deposited;
        Ok(())
    }

    /// Remove `amount` redeemable units (redemption or escrow).
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if the balance is smaller than `amount`.
    pub fn debit_redeemable(&mut self, amount: Amount) -> Result<()> {
        if amount > self.redeemable_balance {
            return Err(LaunchpadError::InsufficientBalance {
                needed: amount,
                available: self.redeemable_balance,
            });
        }
        self.redeemable_balance -= amount;
        Ok(())
    }

    /// Record a completed direct swap. One-shot.
    ///
    /// # Errors
    /// Returns `AlreadyClaimed` if the swap was already used.
    pub fn record_direct_swap(&mut self, payment: Amount, offered: Amount) -> Result<()> {
        if self.has_claimed_direct_swap {
            return Err(LaunchpadError::AlreadyClaimed(self.owner));
        }
        self.has_claimed_direct_swap = true;
        self.direct_swap_payment = payment;
        self.direct_swap_offered = offered;
        Ok(())
    }
}

/// Payment locked in escrow for one participant.
///
/// `unlock_time` is fixed at creation; there is no setter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowEntry {
    owner: Identity,
    amount: Amount,
    unlock_time: UnixTimestamp,
    total_escrowed: Amount,
    total_withdrawn: Amount,
}

impl EscrowEntry {
    #[must_use]
    pub fn new(owner: Identity, unlock_time: UnixTimestamp) -> Self {
        Self {
            owner,
            amount: 0,
            unlock_time,
            total_escrowed: 0,
            total_withdrawn: 0,
        }
    }

    #[must_use]
    pub fn owner(&self) -> Identity {
        self.owner
    }

    /// Payment currently locked.
    #[must_use]
    pub fn amount(&self) -> Amount {
        self.amount
    }

    #[must_use]
    pub fn unlock_time(&self) -> UnixTimestamp {
        self.unlock_time
    }

    #[must_use]
    pub fn total_escrowed(&self) -> Amount {
        self.total_escrowed
    }

    #[must_use]
    pub fn total_withdrawn(&self) -> Amount {
        self.total_withdrawn
    }

    /// Lock more payment.
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` if a counter would overflow.
    pub fn lock(&mut self, amount: Amount) -> Result<()> {
        let locked = self
            .amount
            .checked_add(amount)
            .ok_or(LaunchpadError::ArithmeticOverflow)?;
        let total = self
            .total_escrowed
            .checked_add(amount)
            .ok_or(LaunchpadError::ArithmeticOverflow)?;
        self.amount = locked;
        self.total_escrowed = total;
        Ok(())
    }

    /// Release locked payment. Does not check the unlock time; the escrow
    /// manager gates that.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if fewer than `amount` units are locked.
    pub fn release(&mut self, amount: Amount) -> Result<()> {
        if amount > self.amount {
            return Err(LaunchpadError::InsufficientBalance {
                needed: amount,
                available: self.amount,
            });
        }
        let withdrawn = self
            .total_withdrawn
            .checked_add(amount)
            .ok_or(LaunchpadError::ArithmeticOverflow)?;
        self.amount -= amount;
        self.total_withdrawn = withdrawn;
        Ok(())
    }
}
