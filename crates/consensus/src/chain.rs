//! Read access to the canonical chain.

use quorum_types::BlockHeader;
use std::sync::Arc;

/// The one chain query the epoch logic needs.
///
/// Implementations must be read-only and idempotent. Lookups are synchronous;
/// callers apply whatever timeout discipline they use for other chain reads.
pub trait ChainReader: Send + Sync {
    /// Header at `number`, or `None` if the chain has no such block yet.
    fn header_by_number(&self, number: u64) -> Option<BlockHeader>;
}

impl<T: ChainReader + ?Sized> ChainReader for &T {
    fn header_by_number(&self, number: u64) -> Option<BlockHeader> {
        (**self).header_by_number(number)
    }
}

impl<T: ChainReader + ?Sized> ChainReader for Arc<T> {
    fn header_by_number(&self, number: u64) -> Option<BlockHeader> {
        (**self).header_by_number(number)
    }
}
