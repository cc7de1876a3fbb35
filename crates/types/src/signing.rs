//! Domain-separated signing messages.
//!
//! Every signed payload starts with a domain tag so a signature produced for
//! one purpose can never be replayed as another.

use crate::{CheckpointData, Hash};

/// Domain tag for checkpoint (block finality) signatures.
pub const DOMAIN_CHECKPOINT: &[u8] = b"checkpoint:v1:";

/// Build the message committed to by a block's quorum signature.
///
/// Layout: `DOMAIN_CHECKPOINT || chain_id (LE) || block_number (LE) ||
/// block_hash || SBOR(checkpoint)`.
pub fn checkpoint_message(
    chain_id: u64,
    block_number: u64,
    block_hash: &Hash,
    checkpoint: &CheckpointData,
) -> Vec<u8> {
    let encoded = sbor::basic_encode(checkpoint)
        .expect("checkpoint encoding must succeed - this is a bug if it fails");
    let mut message = Vec::with_capacity(DOMAIN_CHECKPOINT.len() + 16 + 32 + encoded.len());
    message.extend_from_slice(DOMAIN_CHECKPOINT);
    message.extend_from_slice(&chain_id.to_le_bytes());
    message.extend_from_slice(&block_number.to_le_bytes());
    message.extend_from_slice(block_hash.as_bytes());
    message.extend_from_slice(&encoded);
    message
}
