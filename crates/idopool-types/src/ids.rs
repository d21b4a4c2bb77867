//! Identifiers used throughout idopool.
//!
//! Participants and authorities are identified by 32 raw key bytes (the
//! canonical byte form hashed into allowlist leaves). Pools are identified by
//! a short ASCII name. Journal events use UUIDv7 for time-ordered sorting.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::{LaunchpadError, Result, constants};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// An account identity: the raw ed25519 public key of a participant or
/// pool authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Identity(pub [u8; 32]);

impl Identity {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn from_verifying_key(key: &ed25519_dalek::VerifyingKey) -> Self {
        Self(key.to_bytes())
    }

    /// Canonical byte representation (what allowlist leaves commit to).
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id:{}", hex::encode(&self.0[..8]))
    }
}

/// Random identity for tests. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Identity {
    #[must_use]
    pub fn random() -> Self {
        Self(rand::random::<[u8; 32]>())
    }
}

// ---------------------------------------------------------------------------
// PoolId
// ---------------------------------------------------------------------------

/// Name of a launch pool. ASCII, non-empty, at most
/// [`constants::MAX_POOL_ID_LEN`] bytes, no whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct PoolId(String);

impl PoolId {
    /// Validate and wrap a pool name.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the name is empty, too long, non-ASCII or
    /// contains whitespace.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() || name.len() > constants::MAX_POOL_ID_LEN {
            return Err(LaunchpadError::InvalidConfig {
                reason: format!(
                    "pool id must be 1..={} bytes, got {}",
                    constants::MAX_POOL_ID_LEN,
                    name.len()
                ),
            });
        }
        if !name.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(LaunchpadError::InvalidConfig {
                reason: format!("pool id {name:?} must be printable ASCII without spaces"),
            });
        }
        Ok(Self(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for PoolId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pool:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Digest
// ---------------------------------------------------------------------------

/// A 32-byte hash value (allowlist roots, proof siblings, journal heads).
/// Serialized as a lowercase hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Default)]
pub struct Digest(pub [u8; constants::DIGEST_LEN]);

impl Digest {
    pub const ZERO: Self = Self([0u8; constants::DIGEST_LEN]);

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse a 64-character hex string.
    ///
    /// # Errors
    /// Returns `Serialization` on bad hex or wrong length.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| LaunchpadError::Serialization(e.to_string()))?;
        let arr: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
            LaunchpadError::Serialization(format!("digest must be 32 bytes, got {}", v.len()))
        })?;
        Ok(Self(arr))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_hex(&raw).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// StorageHandle
// ---------------------------------------------------------------------------

/// Opaque handle to a custody slot (pool vault) in the asset ledger.
///
/// Handles are handed out by the vault directory; the engine never derives
/// them from seeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct StorageHandle(pub u64);

impl StorageHandle {
    /// The handle after this one.
    ///
    /// # Errors
    /// `ArithmeticOverflow` once the handle space is exhausted.
    pub fn next(self) -> Result<Self> {
        self.0
            .checked_add(1)
            .map(Self)
            .ok_or(LaunchpadError::ArithmeticOverflow)
    }
}

impl fmt::Display for StorageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vault:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// EventId
// ---------------------------------------------------------------------------

/// Unique identifier of a journal event. Uses UUIDv7 for time-ordered sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "evt:{}", self.0)
    }
}

/// Amount of an asset in base units.
pub type Amount = u64;

/// Seconds since the UNIX epoch.
pub type UnixTimestamp = i64;

/// Asset identifier (e.g. "USDC", "WMELON").
pub type Asset = String;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
