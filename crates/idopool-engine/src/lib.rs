//! # idopool-engine
//!
//! **Stateful launch-pool engine**: pool ledgers, the exchange and escrow
//! operations, custody and the pool registry.
//!
//! ## Architecture
//!
//! 1. **Launchpad**: registry keyed by pool id; entry point for every operation
//! 2. **PoolLedger**: config, counters, participant/escrow tables, journal
//! 3. **exchange**: direct swap, deposits, pro-rata redemption, authority sweeps
//! 4. **escrow**: time-locked payment exit for redeemable holders
//! 5. **AssetLedger**: the custody capability; `InMemoryAssets` ships for hosts and tests
//! 6. **audit**: full-scan reconciliation of ledger against custody
//!
//! ## Operation Flow
//!
//! ```text
//! Launchpad → phase gate → allowlist / authority → stage Transition
//!           → PoolState::check → AssetLedger::apply (atomic) → records + journal
//! ```
//!
//! A failed operation changes nothing: not the ledger, not custody, not the
//! journal.

pub mod audit;
pub mod clock;
pub mod escrow;
pub mod exchange;
pub mod journal;
pub mod ledger;
pub mod registry;
pub mod shared;
pub mod vault;

pub use audit::AuditReport;
pub use clock::{Clock, ManualClock, SystemClock};
pub use journal::Journal;
pub use ledger::{PoolLedger, Transition};
pub use registry::Launchpad;
pub use shared::SharedLaunchpad;
pub use vault::{AssetLedger, Holder, InMemoryAssets, PoolVaults, Transfer, VaultDirectory, VaultRole};
