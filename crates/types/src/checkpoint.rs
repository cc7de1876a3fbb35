//! Checkpoint metadata carried by every block.

use crate::{checkpoint_message, Hash};
use sbor::prelude::*;

/// Epoch and commitment data for one block.
///
/// Only `epoch_number` is interpreted by epoch handling; the remaining
/// fields are commitments passed through the codec untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, BasicSbor)]
pub struct CheckpointData {
    /// Consensus round in which the block was finalized.
    pub block_round: u64,
    /// 1-based epoch of the block; only genesis is in epoch 0.
    pub epoch_number: u64,
    /// Hash of the validator set that produced the block.
    pub current_validators_hash: Hash,
    /// Hash of the validator set for the next block.
    pub next_validators_hash: Hash,
    /// Merkle root of the state-sync events committed by this block.
    pub event_root: Hash,
}

impl CheckpointData {
    /// Checkpoint data that only carries an epoch number.
    pub fn for_epoch(epoch_number: u64) -> Self {
        Self {
            epoch_number,
            ..Self::default()
        }
    }

    /// The hash validators sign to finalize block `block_number`.
    pub fn hash(&self, chain_id: u64, block_number: u64, block_hash: &Hash) -> Hash {
        Hash::from_bytes(&checkpoint_message(chain_id, block_number, block_hash, self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_binds_every_input() {
        let block_hash = Hash::from_bytes(b"block");
        let checkpoint = CheckpointData {
            block_round: 1,
            epoch_number: 2,
            current_validators_hash: Hash::from_bytes(b"current"),
            next_validators_hash: Hash::from_bytes(b"next"),
            event_root: Hash::from_bytes(b"events"),
        };
        let base = checkpoint.hash(100, 20, &block_hash);

        assert_eq!(base, checkpoint.clone().hash(100, 20, &block_hash));
        assert_ne!(base, checkpoint.hash(101, 20, &block_hash));
        assert_ne!(base, checkpoint.hash(100, 21, &block_hash));
        assert_ne!(base, checkpoint.hash(100, 20, &Hash::ZERO));

        let mut other = checkpoint.clone();
        other.event_root = Hash::ZERO;
        assert_ne!(base, other.hash(100, 20, &block_hash));
    }
}
