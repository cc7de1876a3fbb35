//! Ordered intake of bridge events and their checkpoint commitment.
//!
//! Events must arrive with gap-free, strictly increasing IDs. The tracker
//! refuses anything else instead of skipping, since a missing event would be
//! silently dropped from the bridge.

use quorum_types::{Hash, StateSyncEvent};
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Errors from the state-sync tracker.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateSyncError {
    #[error("event {got} already seen, expected {expected}")]
    Duplicate { expected: u64, got: u64 },

    #[error("event ID gap: expected {expected}, got {got}")]
    Gap { expected: u64, got: u64 },

    #[error("event {0} is the last representable ID and cannot be followed")]
    IdSpaceExhausted(u64),

    #[error("no pending events to commit")]
    NothingToCommit,

    #[error("cannot commit up to {up_to}, last received event is {last}")]
    NotReceived { up_to: u64, last: u64 },
}

/// Commitment to a contiguous range of events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateSyncCommitment {
    pub start_id: u64,
    pub end_id: u64,
    /// Merkle root over the event hashes, carried as a checkpoint's
    /// `event_root`.
    pub root: Hash,
}

/// Accepts events strictly in ID order and batches them into commitments.
#[derive(Debug, Clone)]
pub struct StateSyncTracker {
    next_id: u64,
    pending: VecDeque<StateSyncEvent>,
}

impl StateSyncTracker {
    /// Start expecting `next_id` as the first event.
    pub fn new(next_id: u64) -> Self {
        Self {
            next_id,
            pending: VecDeque::new(),
        }
    }

    /// ID the next pushed event must carry.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Events received but not yet committed.
    pub fn pending(&self) -> impl Iterator<Item = &StateSyncEvent> {
        self.pending.iter()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Accept the next event in sequence.
    pub fn push(&mut self, event: StateSyncEvent) -> Result<(), StateSyncError> {
        if event.id < self.next_id {
            debug!(id = event.id, expected = self.next_id, "Duplicate state-sync event");
            return Err(StateSyncError::Duplicate {
                expected: self.next_id,
                got: event.id,
            });
        }
        if event.id > self.next_id {
            warn!(id = event.id, expected = self.next_id, "State-sync event ID gap");
            return Err(StateSyncError::Gap {
                expected: self.next_id,
                got: event.id,
            });
        }

        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or(StateSyncError::IdSpaceExhausted(event.id))?;
        self.pending.push_back(event);
        Ok(())
    }

    /// Accept several events, stopping at the first out-of-order one.
    pub fn extend<I>(&mut self, events: I) -> Result<(), StateSyncError>
    where
        I: IntoIterator<Item = StateSyncEvent>,
    {
        for event in events {
            self.push(event)?;
        }
        Ok(())
    }

    /// Remove pending events up to and including `up_to` and commit to them.
    pub fn drain_commitment(
        &mut self,
        up_to: u64,
    ) -> Result<StateSyncCommitment, StateSyncError> {
        let start_id = match self.pending.front() {
            Some(first) if first.id <= up_to => first.id,
            _ => return Err(StateSyncError::NothingToCommit),
        };
        let last = self.next_id - 1;
        if up_to > last {
            return Err(StateSyncError::NotReceived { up_to, last });
        }

        let count = (up_to - start_id + 1) as usize;
        let leaves: Vec<Hash> = self.pending.drain(..count).map(|e| e.hash()).collect();
        let root = merkle_root(&leaves);
        debug!(start_id, end_id = up_to, ?root, "Committed state-sync events");

        Ok(StateSyncCommitment {
            start_id,
            end_id: up_to,
            root,
        })
    }
}

/// Binary Merkle root; an odd node at any level is promoted unchanged.
///
/// The root of no leaves is [`Hash::ZERO`].
pub fn merkle_root(leaves: &[Hash]) -> Hash {
    if leaves.is_empty() {
        return Hash::ZERO;
    }

    let mut level = leaves.to_vec();
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| match pair {
                [left, right] => {
                    Hash::from_parts(&[&left.as_bytes()[..], &right.as_bytes()[..]])
                }
                [single] => *single,
                _ => unreachable!("chunks(2) yields one or two items"),
            })
            .collect();
    }
    level[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_types::test_utils::test_address;
    use tracing_test::traced_test;

    fn events(count: u64, start: u64) -> Vec<StateSyncEvent> {
        (0..count)
            .map(|i| {
                StateSyncEvent::new(
                    start + i,
                    test_address(0x50 + i as u8),
                    Hash::from_bytes(&(start + i).to_le_bytes()).as_bytes().to_vec(),
                )
            })
            .collect()
    }

    #[traced_test]
    #[test]
    fn test_accepts_in_order() {
        let mut tracker = StateSyncTracker::new(1);
        tracker.extend(events(5, 1)).unwrap();
        assert_eq!(tracker.next_id(), 6);
        assert_eq!(tracker.pending_count(), 5);
    }

    #[traced_test]
    #[test]
    fn test_rejects_gap() {
        let mut tracker = StateSyncTracker::new(1);
        let mut batch = events(4, 1);
        batch.remove(2); // drop ID 3

        assert_eq!(
            tracker.extend(batch),
            Err(StateSyncError::Gap {
                expected: 3,
                got: 4
            })
        );
        // Accepted prefix stays; nothing past the gap was taken.
        assert_eq!(tracker.next_id(), 3);
        assert_eq!(tracker.pending_count(), 2);
    }

    #[traced_test]
    #[test]
    fn test_rejects_duplicate() {
        let mut tracker = StateSyncTracker::new(10);
        tracker.extend(events(2, 10)).unwrap();
        assert_eq!(
            tracker.push(events(1, 10).remove(0)),
            Err(StateSyncError::Duplicate {
                expected: 12,
                got: 10
            })
        );
    }

    #[traced_test]
    #[test]
    fn test_last_representable_id_is_refused() {
        let mut tracker = StateSyncTracker::new(u64::MAX);
        let event = StateSyncEvent::new(u64::MAX, test_address(0x50), vec![1]);

        assert_eq!(
            tracker.push(event),
            Err(StateSyncError::IdSpaceExhausted(u64::MAX))
        );
        assert_eq!(tracker.next_id(), u64::MAX);
        assert_eq!(tracker.pending_count(), 0);
    }

    #[traced_test]
    #[test]
    fn test_commit_drains_prefix() {
        let mut tracker = StateSyncTracker::new(1);
        let batch = events(5, 1);
        tracker.extend(batch.clone()).unwrap();

        let commitment = tracker.drain_commitment(3).unwrap();
        assert_eq!(commitment.start_id, 1);
        assert_eq!(commitment.end_id, 3);
        let leaves: Vec<_> = batch[..3].iter().map(|e| e.hash()).collect();
        assert_eq!(commitment.root, merkle_root(&leaves));

        let rest: Vec<_> = tracker.pending().map(|e| e.id).collect();
        assert_eq!(rest, vec![4, 5]);

        let commitment = tracker.drain_commitment(5).unwrap();
        assert_eq!((commitment.start_id, commitment.end_id), (4, 5));
        assert_eq!(tracker.drain_commitment(5), Err(StateSyncError::NothingToCommit));
    }

    #[traced_test]
    #[test]
    fn test_commit_beyond_received() {
        let mut tracker = StateSyncTracker::new(1);
        tracker.extend(events(2, 1)).unwrap();
        assert_eq!(
            tracker.drain_commitment(4),
            Err(StateSyncError::NotReceived { up_to: 4, last: 2 })
        );
        assert_eq!(tracker.pending_count(), 2);
    }

    #[test]
    fn test_merkle_root_shapes() {
        let leaves: Vec<Hash> = (0u8..3).map(|i| Hash::from_bytes(&[i])).collect();

        assert_eq!(merkle_root(&[]), Hash::ZERO);
        assert_eq!(merkle_root(&leaves[..1]), leaves[0]);

        let left = Hash::from_parts(&[&leaves[0].as_bytes()[..], &leaves[1].as_bytes()[..]]);
        assert_eq!(merkle_root(&leaves[..2]), left);
        assert_eq!(
            merkle_root(&leaves),
            Hash::from_parts(&[&left.as_bytes()[..], &leaves[2].as_bytes()[..]])
        );
    }
}
