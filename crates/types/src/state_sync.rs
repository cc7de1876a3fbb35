//! Bridge messages relayed from the counterpart chain.

use crate::{Address, Hash};
use sbor::prelude::*;

/// One bridging message.
///
/// IDs are assigned by the bridge and form a gap-free, strictly increasing
/// sequence across the whole event stream.
#[derive(Debug, Clone, PartialEq, Eq, BasicSbor)]
pub struct StateSyncEvent {
    pub id: u64,
    /// Originating address on the counterpart chain.
    pub sender: Address,
    pub data: Vec<u8>,
}

impl StateSyncEvent {
    pub fn new(id: u64, sender: Address, data: Vec<u8>) -> Self {
        Self { id, sender, data }
    }

    /// Leaf hash used when committing events into a checkpoint.
    pub fn hash(&self) -> Hash {
        let encoded = sbor::basic_encode(self)
            .expect("event encoding must succeed - this is a bug if it fails");
        Hash::from_bytes(&encoded)
    }
}
