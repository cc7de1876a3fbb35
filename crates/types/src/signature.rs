//! Aggregated quorum signature attesting to a block.

use crate::{
    AggregateError, Address, Bitmap, BlsSignature, PublicKey, ValidatorIdentity, ValidatorSet,
    VotePower,
};
use sbor::prelude::*;

/// One aggregated BLS signature plus the positions of the validators whose
/// signatures went into it.
///
/// Positions refer to the validator set that was authoritative when the
/// block was signed, which is not necessarily the current one.
#[derive(Debug, Clone, PartialEq, Eq, BasicSbor)]
pub struct QuorumSignature {
    pub aggregated_signature: BlsSignature,
    pub bitmap: Bitmap,
}

/// Outcome of checking a [`QuorumSignature`].
///
/// Whether `voting_power` is enough for a quorum is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuorumVerification {
    /// The aggregate signature matches the message and the signers' keys.
    pub valid: bool,
    /// Summed voting power of the validators marked in the bitmap.
    pub voting_power: VotePower,
}

/// Inputs that cannot be turned into, or checked as, a quorum signature.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("bitmap references validator {index} but the set has {len}")]
    BitmapOutOfRange { index: u64, len: usize },

    #[error("signer {0} is not in the validator set")]
    UnknownSigner(Address),

    #[error("signer {0} signed more than once")]
    DuplicateSigner(Address),

    #[error("signer voting power overflows")]
    VotingPowerOverflow,

    #[error("failed to aggregate signatures: {0}")]
    Aggregate(#[from] AggregateError),
}

impl QuorumSignature {
    /// Aggregate individual signatures over the same message.
    ///
    /// Each signature is paired with its signer's address; the bitmap marks
    /// the signer's position in `validators`, not the order signatures
    /// arrive in.
    pub fn aggregate<I>(validators: &ValidatorSet, signatures: I) -> Result<Self, SignatureError>
    where
        I: IntoIterator<Item = (Address, BlsSignature)>,
    {
        let mut bitmap = Bitmap::new();
        let mut collected = Vec::new();
        for (address, signature) in signatures {
            let index = validators
                .index_of(&address)
                .ok_or(SignatureError::UnknownSigner(address))? as u64;
            if bitmap.is_set(index) {
                return Err(SignatureError::DuplicateSigner(address));
            }
            bitmap.set(index);
            collected.push(signature);
        }

        let aggregated_signature = BlsSignature::aggregate(&collected)?;
        Ok(Self {
            aggregated_signature,
            bitmap,
        })
    }

    /// Number of validators that contributed.
    pub fn signer_count(&self) -> usize {
        self.bitmap.count_ones()
    }

    /// Resolve the bitmap against the validator set it was produced for.
    pub fn signers<'a>(
        &self,
        validators: &'a ValidatorSet,
    ) -> Result<Vec<&'a ValidatorIdentity>, SignatureError> {
        self.bitmap
            .set_indices()
            .map(|index| {
                validators
                    .get(index as usize)
                    .ok_or(SignatureError::BitmapOutOfRange {
                        index,
                        len: validators.len(),
                    })
            })
            .collect()
    }

    /// Check the aggregate against `message` and the marked validators.
    ///
    /// A forged or mismatched signature yields `valid: false`. A bitmap that
    /// points past the end of `validators`, or signers whose voting power
    /// does not fit in a u64, cannot be evaluated and is an error.
    pub fn verify(
        &self,
        message: &[u8],
        validators: &ValidatorSet,
    ) -> Result<QuorumVerification, SignatureError> {
        let signers = self.signers(validators)?;
        let voting_power = VotePower::checked_sum(signers.iter().map(|v| v.voting_power))
            .ok_or(SignatureError::VotingPowerOverflow)?;

        let keys: Vec<PublicKey> = signers.iter().map(|v| v.bls_public_key).collect();
        let valid = match PublicKey::aggregate(&keys) {
            Ok(aggregated_key) => aggregated_key.verify(message, &self.aggregated_signature),
            // No signers, or a key that is not a valid curve point.
            Err(_) => false,
        };

        Ok(QuorumVerification {
            valid,
            voting_power,
        })
    }
}
