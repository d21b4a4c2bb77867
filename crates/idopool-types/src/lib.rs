//! # idopool-types
//!
//! Shared types, errors, and configuration for the **idopool** launch engine.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Identity`], [`PoolId`], [`Digest`], [`StorageHandle`], [`EventId`]
//! - **Configuration**: [`PoolConfig`], [`IdoTimes`]
//! - **Lifecycle**: [`Phase`], [`Operation`]
//! - **Ledger records**: [`PoolState`], [`OneShot`], [`ParticipantAccount`], [`EscrowEntry`]
//! - **Journal**: [`PoolEvent`], [`EventKind`]
//! - **Errors**: [`LaunchpadError`] with `IDO_ERR_` prefix codes
//! - **Constants**: system-wide limits and domain tags

pub mod account;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod phase;
pub mod pool_state;

pub use account::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use phase::*;
pub use pool_state::*;

// Constants are accessed via `idopool_types::constants::FOO`
// (not re-exported to avoid name collisions).
