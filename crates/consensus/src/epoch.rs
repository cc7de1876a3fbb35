//! Epoch numbering and epoch-boundary detection.
//!
//! Blocks are grouped into fixed-size epochs. Block 0 alone forms epoch 0;
//! with an epoch size of `n`, blocks `1..=n` form epoch 1, `n+1..=2n` epoch
//! 2, and so on. The last block of an epoch carries the validator-set delta
//! for the next one.

use quorum_types::Extra;
use tracing::{debug, instrument, trace};

use crate::chain::ChainReader;
use crate::error::ConsensusError;

/// Whether `block_number` is a multiple of `period`.
///
/// # Panics
///
/// Panics if `period` is zero.
pub fn is_end_of_period(block_number: u64, period: u64) -> bool {
    assert!(period > 0, "period must be non-zero");
    block_number % period == 0
}

/// Epoch that `block_number` belongs to.
///
/// # Panics
///
/// Panics if `epoch_size` is zero.
pub fn epoch_number(block_number: u64, epoch_size: u64) -> u64 {
    if is_end_of_period(block_number, epoch_size) {
        block_number / epoch_size
    } else {
        block_number / epoch_size + 1
    }
}

/// First and last block of `epoch` (inclusive), or `None` if the epoch ends
/// beyond `u64::MAX`.
///
/// # Panics
///
/// Panics if `epoch_size` is zero.
pub fn epoch_bounds(epoch: u64, epoch_size: u64) -> Option<(u64, u64)> {
    assert!(epoch_size > 0, "epoch size must be non-zero");
    if epoch == 0 {
        return Some((0, 0));
    }
    let last = epoch.checked_mul(epoch_size)?;
    Some((last - epoch_size + 1, last))
}

/// Decide whether `block_number` is the last block of its epoch.
///
/// A non-empty validator-set delta is only ever attached to an epoch-ending
/// block, so its presence answers the question without touching the chain.
/// Otherwise the successor header is fetched and its epoch number compared
/// with this block's: a change means this block ended the epoch.
///
/// Fails with [`ConsensusError::NoBlock`] if the successor does not exist yet
/// and with [`ConsensusError::Extra`] if its extra data does not decode.
#[instrument(
    level = "trace",
    skip(extra, chain),
    fields(epoch = extra.checkpoint.epoch_number)
)]
pub fn is_epoch_ending_block<C>(
    block_number: u64,
    extra: &Extra,
    chain: &C,
) -> Result<bool, ConsensusError>
where
    C: ChainReader + ?Sized,
{
    if !extra.validators.is_empty() {
        trace!(
            added = extra.validators.added.len(),
            removed = extra.validators.removed.count_ones(),
            "Validator-set delta present, block ends its epoch"
        );
        return Ok(true);
    }

    let next_number = block_number
        .checked_add(1)
        .ok_or(ConsensusError::NoBlock(block_number))?;
    let next = chain
        .header_by_number(next_number)
        .ok_or(ConsensusError::NoBlock(next_number))?;
    let next_epoch = next.extra()?.checkpoint.epoch_number;

    let ending = next_epoch != extra.checkpoint.epoch_number;
    debug!(next_epoch, ending, "Compared epoch with successor block");
    Ok(ending)
}

/// Reject a validator-set delta on a block that does not end its epoch.
///
/// [`is_epoch_ending_block`] trusts a delta without looking further; this
/// check closes that gap by requiring the successor to start a new epoch.
/// Blocks with an empty delta always pass without a chain lookup.
pub fn check_delta_placement<C>(
    block_number: u64,
    extra: &Extra,
    chain: &C,
) -> Result<(), ConsensusError>
where
    C: ChainReader + ?Sized,
{
    if extra.validators.is_empty() {
        return Ok(());
    }

    let next_number = block_number
        .checked_add(1)
        .ok_or(ConsensusError::NoBlock(block_number))?;
    let next = chain
        .header_by_number(next_number)
        .ok_or(ConsensusError::NoBlock(next_number))?;
    let epoch = extra.checkpoint.epoch_number;
    if next.extra()?.checkpoint.epoch_number == epoch {
        return Err(ConsensusError::DeltaOffBoundary {
            number: block_number,
            epoch,
        });
    }
    Ok(())
}
