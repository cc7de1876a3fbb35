//! Validator-set snapshots keyed by epoch.
//!
//! Each epoch is governed by one immutable [`ValidatorSet`]. Snapshots are
//! handed out as `Arc`s, so seal checks for old blocks can keep using the set
//! that signed them while newer epochs are added.

use quorum_types::{Extra, ValidatorSet};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::chain::ChainReader;
use crate::epoch::is_epoch_ending_block;
use crate::error::ConsensusError;

/// Versioned validator sets, one per epoch.
#[derive(Debug, Clone)]
pub struct ValidatorSnapshots {
    snapshots: BTreeMap<u64, Arc<ValidatorSet>>,
    /// How many epochs before the newest one are kept.
    retention: usize,
}

impl ValidatorSnapshots {
    /// Start from the genesis validators, which govern epoch 1.
    ///
    /// Genesis (epoch 0) resolves to the same set.
    pub fn new(genesis: ValidatorSet, retention: usize) -> Self {
        let mut snapshots = BTreeMap::new();
        snapshots.insert(1, Arc::new(genesis));
        Self {
            snapshots,
            retention,
        }
    }

    /// Validator set authoritative for `epoch`.
    pub fn for_epoch(&self, epoch: u64) -> Result<Arc<ValidatorSet>, ConsensusError> {
        self.snapshots
            .get(&epoch.max(1))
            .cloned()
            .ok_or(ConsensusError::UnknownEpoch(epoch))
    }

    /// Newest epoch with a known validator set.
    pub fn latest_epoch(&self) -> u64 {
        self.snapshots.keys().next_back().copied().unwrap_or(1)
    }

    /// Oldest epoch still retained.
    pub fn oldest_epoch(&self) -> u64 {
        self.snapshots.keys().next().copied().unwrap_or(1)
    }

    /// Process a block and, if it ends its epoch, derive the next epoch's set.
    ///
    /// Returns the new epoch number when a snapshot was added. Seeing the
    /// same epoch-ending block twice is a no-op.
    pub fn on_block<C>(
        &mut self,
        block_number: u64,
        extra: &Extra,
        chain: &C,
    ) -> Result<Option<u64>, ConsensusError>
    where
        C: ChainReader + ?Sized,
    {
        if !is_epoch_ending_block(block_number, extra, chain)? {
            return Ok(None);
        }

        let epoch = extra.checkpoint.epoch_number;
        let next_epoch = epoch
            .checked_add(1)
            .ok_or(ConsensusError::EpochOverflow(epoch))?;
        if self.snapshots.contains_key(&next_epoch) {
            debug!(block_number, next_epoch, "Snapshot for next epoch already present");
            return Ok(None);
        }

        let current = self.for_epoch(epoch)?;
        let next = current.apply(&extra.validators)?;
        info!(
            block_number,
            epoch = next_epoch,
            validators = next.len(),
            added = extra.validators.added.len(),
            removed = extra.validators.removed.count_ones(),
            total_voting_power = next.total_voting_power(),
            "Validator set for next epoch"
        );

        self.snapshots.insert(next_epoch, Arc::new(next));
        self.prune();
        Ok(Some(next_epoch))
    }

    fn prune(&mut self) {
        while self.snapshots.len() > self.retention + 1 {
            if let Some((epoch, _)) = self.snapshots.pop_first() {
                debug!(epoch, "Pruned validator snapshot");
            }
        }
    }
}
