//! Validator-set changes recorded on an epoch-ending block.

use crate::{Bitmap, ValidatorIdentity};
use sbor::prelude::*;

/// Added and removed validators taking effect at an epoch boundary.
///
/// `removed` indexes the *previous* set's ordering. An empty delta (nothing
/// added, no removed bit set) means the validator set does not change.
#[derive(Debug, Clone, PartialEq, Eq, Default, BasicSbor)]
pub struct ValidatorSetDelta {
    /// New validators, in the order they are appended.
    pub added: Vec<ValidatorIdentity>,
    /// Positions in the previous set that are dropped.
    pub removed: Bitmap,
}

impl ValidatorSetDelta {
    pub fn new(added: Vec<ValidatorIdentity>, removed: Bitmap) -> Self {
        Self { added, removed }
    }

    /// True when the delta carries no change at all.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Reasons a delta cannot be applied to a validator set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeltaError {
    #[error("removed index {index} is out of range for a set of {len} validators")]
    RemovedIndexOutOfRange { index: u64, len: usize },

    #[error("validator {0} is both added and removed")]
    AddedAndRemoved(crate::Address),

    #[error("validator {0} is already in the set")]
    DuplicateValidator(crate::Address),

    #[error("total voting power of the resulting set overflows")]
    VotingPowerOverflow,
}
