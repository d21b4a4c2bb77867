//! Pool configuration: allocations, schedule and the optional allowlist root.
//!
//! A [`PoolConfig`] is immutable once the pool is initialized. It can be
//! built in code or loaded from a JSON pool definition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Amount, Asset, Digest, Identity, LaunchpadError, PoolId, Result, UnixTimestamp};

/// The five schedule timestamps of a pool, in UNIX seconds.
///
/// Must satisfy `start ≤ end_whitelist ≤ end_deposits ≤ end_ido ≤ end_escrow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdoTimes {
    pub start: UnixTimestamp,
    pub end_whitelist: UnixTimestamp,
    pub end_deposits: UnixTimestamp,
    pub end_ido: UnixTimestamp,
    pub end_escrow: UnixTimestamp,
}

impl IdoTimes {
    /// Build a schedule from UTC datetimes (sub-second precision is dropped).
    #[must_use]
    pub fn from_datetimes(
        start: DateTime<Utc>,
        end_whitelist: DateTime<Utc>,
        end_deposits: DateTime<Utc>,
        end_ido: DateTime<Utc>,
        end_escrow: DateTime<Utc>,
    ) -> Self {
        Self {
            start: start.timestamp(),
            end_whitelist: end_whitelist.timestamp(),
            end_deposits: end_deposits.timestamp(),
            end_ido: end_ido.timestamp(),
            end_escrow: end_escrow.timestamp(),
        }
    }

    /// Check the ordering constraint.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the timestamps are out of order.
    pub fn validate(&self) -> Result<()> {
        let ordered = self.start <= self.end_whitelist
            && self.end_whitelist <= self.end_deposits
            && self.end_deposits <= self.end_ido
            && self.end_ido <= self.end_escrow;
        if !ordered {
            return Err(LaunchpadError::InvalidConfig {
                reason: format!("IDO times are non-sequential: {self:?}"),
            });
        }
        Ok(())
    }
}

/// Immutable configuration of one launch pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Pool name; the registry key.
    pub pool_id: PoolId,
    /// Identity allowed to set the allowlist root and withdraw proceeds.
    pub authority: Identity,
    /// Asset participants pay with (e.g., "USDC").
    pub payment_asset: Asset,
    /// Asset being distributed (e.g., "WMELON").
    pub offered_asset: Asset,
    /// Offered units distributed pro-rata to redeemable holders.
    pub public_allocation: Amount,
    /// Offered units reserved for allowlisted direct swaps.
    pub private_allocation: Amount,
    /// Payment amount that fully subscribes the private allocation.
    pub private_target_amount: Amount,
    /// Phase schedule.
    pub times: IdoTimes,
    /// Allowlist root committed at creation, if any.
    #[serde(default)]
    pub allowlist_root: Option<Digest>,
}

impl PoolConfig {
    /// Total offered units the authority funds the pool with.
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` if the two allocations overflow `u64`.
    pub fn total_offered(&self) -> Result<Amount> {
        self.public_allocation
            .checked_add(self.private_allocation)
            .ok_or(LaunchpadError::ArithmeticOverflow)
    }

    /// Validate allocations, schedule and assets.
    ///
    /// # Errors
    /// Returns `InvalidConfig` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        self.times.validate()?;
        if self.payment_asset == self.offered_asset {
            return Err(LaunchpadError::InvalidConfig {
                reason: format!(
                    "payment and offered asset must differ (both {})",
                    self.payment_asset
                ),
            });
        }
        if self.total_offered()? == 0 {
            return Err(LaunchpadError::InvalidConfig {
                reason: "pool offers nothing".to_string(),
            });
        }
        if self.private_allocation > 0 && self.private_target_amount == 0 {
            return Err(LaunchpadError::InvalidConfig {
                reason: "private allocation requires a non-zero private target amount".to_string(),
            });
        }
        Ok(())
    }

    /// Load and validate a pool definition from JSON.
    ///
    /// # Errors
    /// Returns `Configuration` for unreadable JSON and `InvalidConfig` for a
    /// definition that parses but is inconsistent.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| LaunchpadError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Sample config for unit tests. **Never use in production.**
///
/// Mirrors the reference scenario: 10,000,000 public, 2,000,000 private,
/// private target 100,000; phases at 100/200/300/400/500.
#[cfg(any(test, feature = "test-helpers"))]
impl PoolConfig {
    pub fn sample(pool: &str, authority: Identity) -> Self {
        Self {
            pool_id: PoolId::new(pool).expect("sample pool id is valid"),
            authority,
            payment_asset: "USDC".to_string(),
            offered_asset: "WMELON".to_string(),
            public_allocation: 10_000_000,
            private_allocation: 2_000_000,
            private_target_amount: 100_000,
            times: IdoTimes {
                start: 100,
                end_whitelist: 200,
                end_deposits: 300,
                end_ido: 400,
                end_escrow: 500,
            },
            allowlist_root: None,
        }
    }
}
