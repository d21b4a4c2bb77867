//! System-wide constants for the idopool launch engine.

/// Maximum length of a pool name in bytes.
pub const MAX_POOL_ID_LEN: usize = 10;

/// Length of every digest (allowlist roots, proof siblings, journal heads).
pub const DIGEST_LEN: usize = 32;

/// Maximum number of siblings accepted in a membership proof.
/// A tree of 2^64 members would need 64 levels.
pub const MAX_PROOF_LEN: usize = 64;

/// Domain tag for the journal hash chain.
pub const JOURNAL_DOMAIN_TAG: &[u8] = b"idopool:journal:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "idopool";
