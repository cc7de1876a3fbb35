//! Quorum checks on committed and parent seals.
//!
//! A seal is the [`QuorumSignature`](quorum_types::QuorumSignature) over a
//! block's checkpoint hash. It is checked against the validator set of the
//! epoch the block belongs to, which callers look up in
//! [`ValidatorSnapshots`](crate::ValidatorSnapshots).

use quorum_types::{BlockHeader, Extra, Hash, QuorumSignature, QuorumVerification, ValidatorSet};
use tracing::{trace, warn};

use crate::error::ConsensusError;

/// The hash validators sign to finalize `header`.
pub fn seal_hash(header: &BlockHeader, extra: &Extra, chain_id: u64) -> Hash {
    extra
        .checkpoint
        .hash(chain_id, header.number, &header.hash())
}

/// Verify the committed seal carried in `header` itself.
pub fn verify_committed_seal(
    header: &BlockHeader,
    validators: &ValidatorSet,
    chain_id: u64,
) -> Result<QuorumVerification, ConsensusError> {
    let extra = header.extra()?;
    let committed = extra
        .committed
        .as_ref()
        .ok_or(ConsensusError::MissingCommittedSeal(header.number))?;
    let hash = seal_hash(header, &extra, chain_id);
    check_seal(header.number, committed, &hash, validators)
}

/// Verify the seal over `parent` that `header` carries.
///
/// `validators` must be the set that governed the parent's epoch.
pub fn verify_parent_seal(
    header: &BlockHeader,
    parent: &BlockHeader,
    validators: &ValidatorSet,
    chain_id: u64,
) -> Result<QuorumVerification, ConsensusError> {
    let extra = header.extra()?;
    let seal = extra
        .parent
        .as_ref()
        .ok_or(ConsensusError::MissingParentSeal(header.number))?;
    let parent_extra = parent.extra()?;
    let hash = seal_hash(parent, &parent_extra, chain_id);
    check_seal(parent.number, seal, &hash, validators)
}

fn check_seal(
    number: u64,
    seal: &QuorumSignature,
    hash: &Hash,
    validators: &ValidatorSet,
) -> Result<QuorumVerification, ConsensusError> {
    let result = seal.verify(hash.as_bytes(), validators)?;
    let voting_power = result.voting_power.0;
    if !result.valid {
        warn!(number, signers = seal.signer_count(), "Seal does not verify");
        return Err(ConsensusError::InvalidSeal(number));
    }
    if !validators.has_quorum(voting_power) {
        warn!(
            number,
            voting_power,
            required = validators.quorum_threshold(),
            "Seal lacks quorum"
        );
        return Err(ConsensusError::InsufficientQuorum {
            number,
            got: voting_power,
            required: validators.quorum_threshold(),
        });
    }

    trace!(number, voting_power, "Seal verified");
    Ok(result)
}
