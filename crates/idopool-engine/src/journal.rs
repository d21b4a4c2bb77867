//! Per-pool event journal with a SHA-256 hash chain.
//!
//! ```text
//! head_0 = 0³²
//! head_n = SHA-256(tag ‖ head_{n-1} ‖ seq_le ‖ json(kind))
//! ```
//!
//! Two replicas that executed the same transitions in the same order hold
//! the same head. Appending is two-step: [`Journal::prepare`] does all the
//! fallible work (serialization, hashing) so the ledger can finish it before
//! custody moves; [`Journal::commit`] only appends.

use idopool_types::{
    Digest, EventId, EventKind, LaunchpadError, PoolEvent, Result, UnixTimestamp, constants,
};
use sha2::{Digest as _, Sha256};

/// An event whose chain link is computed but not yet appended.
#[derive(Debug, Clone)]
pub struct PendingEvent {
    event: PoolEvent,
    head: Digest,
}

/// Append-only list of committed pool events.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    events: Vec<PoolEvent>,
    head: Digest,
}

/// One link of the chain.
fn link(prev: &Digest, seq: u64, kind: &EventKind) -> Result<Digest> {
    let body = serde_json::to_vec(kind)?;
    let mut hasher = Sha256::new();
    hasher.update(constants::JOURNAL_DOMAIN_TAG);
    hasher.update(prev.as_bytes());
    hasher.update(seq.to_le_bytes());
    hasher.update(&body);
    Ok(Digest(hasher.finalize().into()))
}

impl Journal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `kind` as the next event.
    ///
    /// # Errors
    /// `Serialization` if the event cannot be encoded.
    pub fn prepare(&self, kind: EventKind, at: UnixTimestamp) -> Result<PendingEvent> {
        let seq = self.events.len() as u64;
        let head = link(&self.head, seq, &kind)?;
        Ok(PendingEvent {
            event: PoolEvent {
                id: EventId::new(),
                seq,
                at,
                kind,
            },
            head,
        })
    }

    /// Append a staged event. A pending event staged against an older head
    /// is a programming error and is rejected.
    ///
    /// # Errors
    /// `Internal` if another event was committed since `pending` was staged.
    pub fn commit(&mut self, pending: PendingEvent) -> Result<&PoolEvent> {
        if pending.event.seq != self.events.len() as u64 {
            return Err(LaunchpadError::Internal(format!(
                "stale journal event seq {} (journal at {})",
                pending.event.seq,
                self.events.len()
            )));
        }
        self.head = pending.head;
        self.events.push(pending.event);
        tracing::trace!(head = %self.head, seq = self.events.len() - 1, "Journal appended");
        Ok(&self.events[self.events.len() - 1])
    }

    /// Current chain head.
    #[must_use]
    pub fn head(&self) -> Digest {
        self.head
    }

    #[must_use]
    pub fn events(&self) -> &[PoolEvent] {
        &self.events
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Recompute the head over `events` from genesis.
    ///
    /// # Errors
    /// `InvariantViolation` if sequence numbers are not `0, 1, 2, …`;
    /// `Serialization` if an event cannot be encoded.
    pub fn replay(events: &[PoolEvent]) -> Result<Digest> {
        events
            .iter()
            .enumerate()
            .try_fold(Digest::ZERO, |head, (index, event)| {
                if event.seq != index as u64 {
                    return Err(LaunchpadError::InvariantViolation {
                        reason: format!("journal seq {} at position {index}", event.seq),
                    });
                }
                link(&head, event.seq, &event.kind)
            })
    }

    /// Whether the stored head matches a replay of the stored events.
    ///
    /// # Errors
    /// `InvariantViolation` on mismatch.
    pub fn verify(&self) -> Result<()> {
        let replayed = Self::replay(&self.events)?;
        if replayed != self.head {
            return Err(LaunchpadError::InvariantViolation {
                reason: format!("journal head {} != replayed {replayed}", self.head),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use idopool_types::Identity;

    use super::*;

    fn created(id: Identity) -> EventKind {
        EventKind::ParticipantCreated { participant: id }
    }

    #[test]
    fn empty_journal_has_zero_head() {
        let j = Journal::new();
        assert_eq!(j.head(), Digest::ZERO);
        assert!(j.is_empty());
        assert!(j.verify().is_ok());
    }

    #[test]
    fn prepare_does_not_mutate() {
        let j = Journal::new();
        let _pending = j.prepare(created(Identity::random()), 10).unwrap();
        assert!(j.is_empty());
        assert_eq!(j.head(), Digest::ZERO);
    }

    #[test]
    fn commit_advances_head_and_seq() {
        let mut j = Journal::new();
        let p = j.prepare(created(Identity::random()), 10).unwrap();
        let seq = j.commit(p).unwrap().seq;
        assert_eq!(seq, 0);
        let first_head = j.head();
        assert_ne!(first_head, Digest::ZERO);

        let p = j.prepare(created(Identity::random()), 11).unwrap();
        assert_eq!(j.commit(p).unwrap().seq, 1);
        assert_ne!(j.head(), first_head);
        assert!(j.verify().is_ok());
    }

    #[test]
    fn same_history_same_head() {
        let ids = [Identity::random(), Identity::random()];
        let mut a = Journal::new();
        let mut b = Journal::new();
        for id in ids {
            let p = a.prepare(created(id), 1).unwrap();
            a.commit(p).unwrap();
            // timestamps and event ids are not part of the chain
            let p = b.prepare(created(id), 99).unwrap();
            b.commit(p).unwrap();
        }
        assert_eq!(a.head(), b.head());
    }

    #[test]
    fn different_order_different_head() {
        let (x, y) = (Identity::random(), Identity::random());
        let mut a = Journal::new();
        let mut b = Journal::new();
        for id in [x, y] {
            let p = a.prepare(created(id), 1).unwrap();
            a.commit(p).unwrap();
        }
        for id in [y, x] {
            let p = b.prepare(created(id), 1).unwrap();
            b.commit(p).unwrap();
        }
        assert_ne!(a.head(), b.head());
    }

    #[test]
    fn stale_pending_rejected() {
        let mut j = Journal::new();
        let first = j.prepare(created(Identity::random()), 1).unwrap();
        let stale = j.prepare(created(Identity::random()), 1).unwrap();
        j.commit(first).unwrap();
        assert!(matches!(j.commit(stale), Err(LaunchpadError::Internal(_))));
        assert_eq!(j.len(), 1);
    }

    #[test]
    fn replay_detects_reordering() {
        let mut j = Journal::new();
        for _ in 0..3 {
            let p = j.prepare(created(Identity::random()), 1).unwrap();
            j.commit(p).unwrap();
        }
        let mut events = j.events().to_vec();
        assert_eq!(Journal::replay(&events).unwrap(), j.head());
        events.swap(0, 1);
        assert!(Journal::replay(&events).is_err());
    }
}
