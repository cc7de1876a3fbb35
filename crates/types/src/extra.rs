//! Consensus metadata embedded in a block header's extra-data field.
//!
//! # Wire Format
//!
//! ```text
//! [vanity: EXTRA_VANITY bytes][payload: SBOR-encoded Extra]
//! ```
//!
//! - The vanity prefix is reserved and ignored on decode
//! - SBOR encoding is canonical for a given value, and the decoder rejects
//!   bitmaps with trailing zero bytes, so every validator derives the same
//!   bytes (and header hash) for the same record

use crate::{Bitmap, CheckpointData, QuorumSignature, ValidatorSetDelta};
use sbor::prelude::*;

/// Length of the reserved prefix before the encoded record.
pub const EXTRA_VANITY: usize = 32;

/// Errors encoding or decoding extra data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtraError {
    #[error("extra data is {len} bytes, shorter than the {vanity}-byte vanity prefix")]
    TooShort { len: usize, vanity: usize },

    #[error("SBOR decode error: {0}")]
    SborDecode(String),

    #[error("SBOR encode error: {0}")]
    SborEncode(String),

    #[error("bitmap in {0} has trailing zero bytes")]
    NonCanonicalBitmap(&'static str),
}

/// Per-block consensus record.
#[derive(Debug, Clone, PartialEq, Eq, Default, BasicSbor)]
pub struct Extra {
    /// Validator-set change; non-empty only on an epoch-ending block.
    pub validators: ValidatorSetDelta,
    /// Quorum signature over the parent block.
    pub parent: Option<QuorumSignature>,
    /// Quorum signature over this block, filled in once signing completes.
    pub committed: Option<QuorumSignature>,
    pub checkpoint: CheckpointData,
}

impl Extra {
    /// Encode with an all-zero vanity prefix.
    pub fn encode(&self) -> Result<Vec<u8>, ExtraError> {
        self.encode_with_vanity(&[0u8; EXTRA_VANITY])
    }

    /// Encode behind the given vanity prefix.
    pub fn encode_with_vanity(&self, vanity: &[u8; EXTRA_VANITY]) -> Result<Vec<u8>, ExtraError> {
        let payload =
            sbor::basic_encode(self).map_err(|e| ExtraError::SborEncode(format!("{:?}", e)))?;

        let mut bytes = Vec::with_capacity(EXTRA_VANITY + payload.len());
        bytes.extend_from_slice(vanity);
        bytes.extend(payload);
        Ok(bytes)
    }

    /// Decode a header's extra-data field, ignoring the vanity prefix.
    pub fn decode(extra_data: &[u8]) -> Result<Self, ExtraError> {
        if extra_data.len() < EXTRA_VANITY {
            return Err(ExtraError::TooShort {
                len: extra_data.len(),
                vanity: EXTRA_VANITY,
            });
        }

        let extra: Extra = sbor::basic_decode(&extra_data[EXTRA_VANITY..])
            .map_err(|e| ExtraError::SborDecode(format!("{:?}", e)))?;
        extra.check_canonical()?;
        Ok(extra)
    }

    fn check_canonical(&self) -> Result<(), ExtraError> {
        fn check(bitmap: &Bitmap, field: &'static str) -> Result<(), ExtraError> {
            if bitmap.is_canonical() {
                Ok(())
            } else {
                Err(ExtraError::NonCanonicalBitmap(field))
            }
        }

        check(&self.validators.removed, "validators.removed")?;
        if let Some(parent) = &self.parent {
            check(&parent.bitmap, "parent")?;
        }
        if let Some(committed) = &self.committed {
            check(&committed.bitmap, "committed")?;
        }
        Ok(())
    }
}
