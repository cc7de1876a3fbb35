//! Core types for epoch transitions and quorum signatures.
//!
//! This crate provides the foundational types used by the consensus layer:
//!
//! - **Primitives**: Hash, Address, BLS keys and signatures
//! - **Bitmap**: compact set of validator positions
//! - **Validator sets**: identities, ordered snapshots, epoch deltas
//! - **Extra data**: the per-block consensus record and its wire codec
//! - **Quorum signatures**: aggregated BLS signature plus signer bitmap
//!
//! # Design Philosophy
//!
//! This crate is self-contained and does not depend on any other workspace
//! crate. Every type is a plain value; nothing here holds shared mutable
//! state.

mod crypto;
mod hash;
mod identifiers;
mod signing;

mod bitmap;
mod checkpoint;
mod delta;
mod extra;
mod header;
mod signature;
mod state_sync;
mod validator;

pub use crypto::{AggregateError, BlsSignature, CryptoError, KeyPair, PublicKey, BLS_DST};
pub use hash::{Hash, HexError};
pub use identifiers::{Address, VotePower};
pub use signing::{checkpoint_message, DOMAIN_CHECKPOINT};

pub use bitmap::Bitmap;
pub use checkpoint::CheckpointData;
pub use delta::{DeltaError, ValidatorSetDelta};
pub use extra::{Extra, ExtraError, EXTRA_VANITY};
pub use header::BlockHeader;
pub use signature::{QuorumSignature, QuorumVerification, SignatureError};
pub use state_sync::StateSyncEvent;
pub use validator::{ValidatorIdentity, ValidatorSet};

/// Test utilities.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils {
    use super::*;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    /// Create a test address from a seed byte.
    pub fn test_address(seed: u8) -> Address {
        Address([seed; 20])
    }

    /// Deterministic validator keys.
    pub fn test_keys(n: usize, seed: u64) -> Vec<KeyPair> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..n)
            .map(|_| {
                let mut key_seed = [0u8; 32];
                rng.fill_bytes(&mut key_seed);
                KeyPair::from_seed(&key_seed)
            })
            .collect()
    }

    /// A validator set of `n` members with voting power 1 each, plus their
    /// keys in the same order. Validator `i` has address `test_address(i + 1)`.
    pub fn test_validators(n: usize) -> (ValidatorSet, Vec<KeyPair>) {
        let keys = test_keys(n, 42);
        let validators = keys
            .iter()
            .enumerate()
            .map(|(i, k)| ValidatorIdentity::new(test_address(i as u8 + 1), k.public_key(), 1))
            .collect();
        (ValidatorSet::new(validators), keys)
    }

    /// Extra data carrying only an epoch number.
    pub fn test_extra(epoch_number: u64) -> Extra {
        Extra {
            checkpoint: CheckpointData::for_epoch(epoch_number),
            ..Extra::default()
        }
    }

    /// Header at `number` whose extra data is `extra`.
    pub fn test_header(number: u64, extra: &Extra) -> BlockHeader {
        BlockHeader::new(number, Hash::from_bytes(&number.to_le_bytes()), extra)
            .expect("test extra must encode")
    }

    /// Every validator signs `message`; returns the aggregated signature.
    pub fn sign_with_all(
        validators: &ValidatorSet,
        keys: &[KeyPair],
        message: &[u8],
    ) -> QuorumSignature {
        let signatures = validators
            .iter()
            .zip(keys)
            .map(|(v, k)| (v.address, k.sign(message)));
        QuorumSignature::aggregate(validators, signatures).expect("test signatures must aggregate")
    }
}
