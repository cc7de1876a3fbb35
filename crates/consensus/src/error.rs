//! Consensus-layer errors.

use quorum_types::{DeltaError, ExtraError, SignatureError};

/// Errors from epoch handling and seal checks.
///
/// `NoBlock` is retryable once the block exists. Every other variant means
/// the block in question must be rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsensusError {
    #[error("no block at height {0}")]
    NoBlock(u64),

    #[error("malformed extra data: {0}")]
    Extra(#[from] ExtraError),

    #[error("inconsistent validator-set delta: {0}")]
    Delta(#[from] DeltaError),

    #[error("malformed quorum signature: {0}")]
    Signature(#[from] SignatureError),

    #[error("no validator snapshot for epoch {0}")]
    UnknownEpoch(u64),

    #[error("epoch {0} has no successor epoch")]
    EpochOverflow(u64),

    #[error("block {number} carries a validator-set delta but epoch {epoch} continues after it")]
    DeltaOffBoundary { number: u64, epoch: u64 },

    #[error("block {0} has no committed seal")]
    MissingCommittedSeal(u64),

    #[error("block {0} has no parent seal")]
    MissingParentSeal(u64),

    #[error("seal on block {0} does not verify")]
    InvalidSeal(u64),

    #[error("seal on block {number} has voting power {got}, quorum needs {required}")]
    InsufficientQuorum { number: u64, got: u64, required: u64 },
}
