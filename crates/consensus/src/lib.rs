//! Epoch transitions and committed-seal checks.
//!
//! Built on the value types in `quorum-types`, this crate answers the
//! questions a node asks while following the chain:
//!
//! - Which epoch does block N belong to? ([`epoch_number`])
//! - Is block N the last block of its epoch? ([`is_epoch_ending_block`])
//! - Which validator set governs epoch E? ([`ValidatorSnapshots`])
//! - Was block N finalized by a quorum of that set? ([`verify_committed_seal`])
//! - Are bridge events arriving without gaps? ([`StateSyncTracker`])
//!
//! # Epochs
//!
//! Block 0 is genesis and belongs to epoch 0. Every later block belongs to
//! epoch `ceil(n / epoch_size)`, so epoch `e` spans blocks
//! `(e - 1) * epoch_size + 1 ..= e * epoch_size`. The last block of an epoch
//! carries the validator-set delta that yields the next epoch's set.
//!
//! # Chain access
//!
//! The only chain query needed is a header lookup by number, expressed by
//! the [`ChainReader`] trait. Everything else is pure.

mod chain;
mod epoch;
mod error;
mod seal;
mod snapshots;
mod state_sync;

pub mod config;
pub mod telemetry;

pub use chain::ChainReader;
pub use config::{ConfigError, ConsensusConfig};
pub use epoch::{
    check_delta_placement, epoch_bounds, epoch_number, is_end_of_period, is_epoch_ending_block,
};
pub use error::ConsensusError;
pub use seal::{seal_hash, verify_committed_seal, verify_parent_seal};
pub use snapshots::ValidatorSnapshots;
pub use state_sync::{merkle_root, StateSyncCommitment, StateSyncError, StateSyncTracker};
