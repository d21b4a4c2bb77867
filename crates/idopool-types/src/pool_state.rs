//! Mutable pool counters and the one-shot field primitive.
//!
//! ## OneShot
//!
//! ```text
//!   ┌───────┐  set(v)   ┌────────┐
//!   │ UNSET ├──────────▶│ SET(v) │
//!   └───────┘           └────────┘
//! ```
//!
//! The only legal transition is `Unset → Set`; a second `set` fails with
//! `AlreadySet` and leaves the stored value untouched.

use serde::{Deserialize, Serialize};

use crate::{AllocationKind, Amount, LaunchpadError, PoolConfig, Result};

/// A value that may be written exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OneShot<T> {
    #[default]
    Unset,
    Set(T),
}

impl<T> OneShot<T> {
    /// Write the value.
    ///
    /// # Errors
    /// Returns `AlreadySet { what }` if a value is already stored.
    pub fn set(&mut self, value: T, what: &'static str) -> Result<()> {
        match self {
            Self::Unset => {
                *self = Self::Set(value);
                Ok(())
            }
            Self::Set(_) => Err(LaunchpadError::AlreadySet { what }),
        }
    }

    #[must_use]
    pub fn get(&self) -> Option<&T> {
        match self {
            Self::Unset => None,
            Self::Set(value) => Some(value),
        }
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }
}

impl<T> From<Option<T>> for OneShot<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unset, Self::Set)
    }
}

/// Running totals of one pool. Every field only moves through the exchange
/// and escrow engines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    /// Redeemable units minted and not moved to escrow (includes redeemed).
    pub total_redeemable_minted: Amount,
    /// Payment received through redeemable deposits.
    pub total_payment_deposited: Amount,
    /// Redeemable units converted to the offered asset.
    pub total_redeemed: Amount,
    /// Offered units paid out by pro-rata redemption.
    pub public_disbursed: Amount,
    /// Offered units paid out by direct swaps.
    pub private_disbursed: Amount,
    /// Payment received through direct swaps.
    pub private_payment_collected: Amount,
    /// Payment moved into escrow custody.
    pub total_escrowed: Amount,
    /// Payment released from escrow custody.
    pub escrow_released: Amount,
    /// Payment swept to the authority.
    pub payment_withdrawn_by_authority: Amount,
    /// Unsold offered units swept back to the authority.
    pub offered_withdrawn_by_authority: Amount,
    pub is_initialized: bool,
}

impl PoolState {
    /// Fresh state for a newly initialized pool.
    #[must_use]
    pub fn initialized() -> Self {
        Self {
            is_initialized: true,
            ..Self::default()
        }
    }

    /// Redeemable units still held by participants.
    ///
    /// # Errors
    /// Returns `ArithmeticUnderflow` if more was redeemed than minted.
    pub fn outstanding_redeemable(&self) -> Result<Amount> {
        self.total_redeemable_minted
            .checked_sub(self.total_redeemed)
            .ok_or(LaunchpadError::ArithmeticUnderflow)
    }

    /// Whether unsold offered units were ever swept back.
    #[must_use]
    pub fn offered_withdrawn(&self) -> bool {
        self.offered_withdrawn_by_authority > 0
    }

    /// Public allocation not yet paid out.
    ///
    /// # Errors
    /// Returns `ArithmeticUnderflow` if more was paid out than allocated.
    pub fn public_remaining(&self, config: &PoolConfig) -> Result<Amount> {
        config
            .public_allocation
            .checked_sub(self.public_disbursed)
            .ok_or(LaunchpadError::ArithmeticUnderflow)
    }

    /// Private allocation not yet swapped.
    ///
    /// # Errors
    /// Returns `ArithmeticUnderflow` if more was swapped than allocated.
    pub fn private_remaining(&self, config: &PoolConfig) -> Result<Amount> {
        config
            .private_allocation
            .checked_sub(self.private_disbursed)
            .ok_or(LaunchpadError::ArithmeticUnderflow)
    }

    /// Counter-level invariants, cheap enough to run before every commit.
    ///
    /// # Errors
    /// Returns `InvariantViolation` or `AllocationExceeded` naming the first
    /// broken invariant.
    pub fn check(&self, config: &PoolConfig) -> Result<()> {
        if !self.is_initialized {
            return Err(LaunchpadError::InvariantViolation {
                reason: "pool state is not initialized".to_string(),
            });
        }
        if self.public_disbursed > config.public_allocation {
            return Err(LaunchpadError::AllocationExceeded {
                kind: AllocationKind::Public,
                requested: self.public_disbursed,
                remaining: config.public_allocation,
            });
        }
        if self.private_disbursed > config.private_allocation {
            return Err(LaunchpadError::AllocationExceeded {
                kind: AllocationKind::Private,
                requested: self.private_disbursed,
                remaining: config.private_allocation,
            });
        }
        if self.total_redeemed > self.total_redeemable_minted {
            return Err(LaunchpadError::InvariantViolation {
                reason: format!(
                    "redeemed {} exceeds minted {}",
                    self.total_redeemed, self.total_redeemable_minted
                ),
            });
        }
        if self.escrow_released > self.total_escrowed {
            return Err(LaunchpadError::InvariantViolation {
                reason: format!(
                    "escrow released {} exceeds escrowed {}",
                    self.escrow_released, self.total_escrowed
                ),
            });
        }
        Ok(())
    }
}
