//! # idopool-core
//!
//! **Pure launch-pool logic for idopool.**
//!
//! Everything here is a function of its inputs: no ledger, no custody, no
//! clock. The engine crate calls into it to decide and compute, then commits
//! the result itself.
//!
//! - **Phase clock**: one place that maps `now` to a phase and gates every operation
//! - **Allowlist**: sorted-pair SHA-256 membership proofs and a tree builder
//! - **Math**: checked `u64` arithmetic with `u128` intermediates for pro-rata payouts

pub mod allowlist;
pub mod math;
pub mod phase_clock;

pub use allowlist::{AllowlistTree, AllowlistVerifier};
