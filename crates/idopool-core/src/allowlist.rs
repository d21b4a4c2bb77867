//! Allowlist membership proofs.
//!
//! Leaves are `SHA-256(identity bytes)`. Interior nodes hash the two child
//! digests **sorted** before concatenation, so a proof is just the ordered
//! list of siblings with no left/right flags.
//!
//! A leaf hashes 32 bytes and an interior node hashes 64, so an interior
//! node can never be passed off as a leaf.

use idopool_types::{Digest, Identity, LaunchpadError, OneShot, Result, constants};
use sha2::{Digest as _, Sha256};

/// Leaf digest for an identity.
#[must_use]
pub fn leaf_hash(identity: &Identity) -> Digest {
    Digest(Sha256::digest(identity.as_bytes()).into())
}

/// Commutative pair hash: `SHA-256(min(a, b) ‖ max(a, b))`.
#[must_use]
pub fn hash_pair(a: &Digest, b: &Digest) -> Digest {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut hasher = Sha256::new();
    hasher.update(lo.as_bytes());
    hasher.update(hi.as_bytes());
    Digest(hasher.finalize().into())
}

/// Fold a proof onto a leaf, returning the implied root.
#[must_use]
pub fn process_proof(leaf: Digest, proof: &[Digest]) -> Digest {
    proof
        .iter()
        .fold(leaf, |computed, sibling| hash_pair(&computed, sibling))
}

/// Whether `proof` links `identity` to `root`.
#[must_use]
pub fn verify(root: &Digest, identity: &Identity, proof: &[Digest]) -> bool {
    proof.len() <= constants::MAX_PROOF_LEN && process_proof(leaf_hash(identity), proof) == *root
}

// ---------------------------------------------------------------------------
// AllowlistVerifier
// ---------------------------------------------------------------------------

/// Holds a pool's committed allowlist root.
///
/// The root is a [`OneShot`]: once set, from the pool config or by the
/// authority, it never changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowlistVerifier {
    root: OneShot<Digest>,
}

impl AllowlistVerifier {
    /// Verifier with no root committed yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: OneShot::Unset,
        }
    }

    /// Verifier seeded from an optional configured root.
    #[must_use]
    pub fn with_root(root: Option<Digest>) -> Self {
        Self { root: root.into() }
    }

    /// The committed root, if any.
    #[must_use]
    pub fn root(&self) -> Option<&Digest> {
        self.root.get()
    }

    /// Commit the root. Authority and phase checks belong to the caller.
    ///
    /// # Errors
    /// Returns `AlreadySet` if a root is already committed.
    pub fn set_root(&mut self, root: Digest) -> Result<()> {
        self.root.set(root, "allowlist root")
    }

    /// Whether `identity` proves membership. `false` when no root is set.
    #[must_use]
    pub fn verify(&self, identity: &Identity, proof: &[Digest]) -> bool {
        self.root
            .get()
            .is_some_and(|root| verify(root, identity, proof))
    }

    /// Require membership.
    ///
    /// # Errors
    /// Returns `ProofInvalid` on mismatch or when no root is committed.
    pub fn require_member(&self, identity: &Identity, proof: &[Digest]) -> Result<()> {
        if self.verify(identity, proof) {
            Ok(())
        } else {
            tracing::warn!(
                participant = %identity,
                proof_len = proof.len(),
                root_set = self.root.is_set(),
                "Allowlist proof rejected"
            );
            Err(LaunchpadError::ProofInvalid)
        }
    }
}

// ---------------------------------------------------------------------------
// AllowlistTree
// ---------------------------------------------------------------------------

/// A full tree over a member list, for producing the root and member proofs.
///
/// Levels are built bottom-up by pairing adjacent nodes; an odd node at the
/// end of a level is promoted unchanged. The pool authority commits
/// [`AllowlistTree::root`]; members receive [`AllowlistTree::proof`].
#[derive(Debug, Clone)]
pub struct AllowlistTree {
    /// `levels[0]` are the leaves; the last level holds the root alone.
    levels: Vec<Vec<Digest>>,
}

impl AllowlistTree {
    /// Build a tree over `members` in the given order.
    ///
    /// # Errors
    /// Returns `InvalidConfig` for an empty member list.
    pub fn build(members: &[Identity]) -> Result<Self> {
        if members.is_empty() {
            return Err(LaunchpadError::InvalidConfig {
                reason: "allowlist needs at least one member".to_string(),
            });
        }
        let mut levels = vec![members.iter().map(leaf_hash).collect::<Vec<_>>()];
        while let Some(level) = levels.last().filter(|level| level.len() > 1) {
            let next = level
                .chunks(2)
                .map(|pair| match pair {
                    [a, b] => hash_pair(a, b),
                    // odd node is promoted unchanged
                    _ => pair[0],
                })
                .collect();
            levels.push(next);
        }
        Ok(Self { levels })
    }

    /// The root digest.
    #[must_use]
    pub fn root(&self) -> Digest {
        self.levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or(Digest::ZERO)
    }

    /// Number of leaves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Membership proof for `identity`, or `None` if it is not a member.
    #[must_use]
    pub fn proof(&self, identity: &Identity) -> Option<Vec<Digest>> {
        let leaf = leaf_hash(identity);
        let mut index = self.levels.first()?.iter().position(|l| *l == leaf)?;
        let mut proof = Vec::with_capacity(self.levels.len());
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = index ^ 1;
            if let Some(node) = level.get(sibling) {
                proof.push(*node);
            }
            index /= 2;
        }
        Some(proof)
    }
}
