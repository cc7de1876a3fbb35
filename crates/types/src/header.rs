//! Block header as seen by the epoch and signature logic.

use crate::{Extra, ExtraError, Hash, EXTRA_VANITY};
use sbor::prelude::*;

/// Block header carrying the consensus extra-data field.
#[derive(Debug, Clone, PartialEq, Eq, Default, BasicSbor)]
pub struct BlockHeader {
    pub number: u64,
    pub parent_hash: Hash,
    pub state_root: Hash,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// `[vanity][SBOR(Extra)]`; see [`Extra`].
    pub extra_data: Vec<u8>,
}

impl BlockHeader {
    /// Create a header at `number` carrying `extra`.
    pub fn new(number: u64, parent_hash: Hash, extra: &Extra) -> Result<Self, ExtraError> {
        Ok(Self {
            number,
            parent_hash,
            extra_data: extra.encode()?,
            ..Self::default()
        })
    }

    /// Decode the consensus record.
    pub fn extra(&self) -> Result<Extra, ExtraError> {
        Extra::decode(&self.extra_data)
    }

    /// Replace the consensus record, keeping the current vanity prefix.
    pub fn set_extra(&mut self, extra: &Extra) -> Result<(), ExtraError> {
        self.extra_data = extra.encode_with_vanity(&self.vanity())?;
        Ok(())
    }

    fn vanity(&self) -> [u8; EXTRA_VANITY] {
        let mut vanity = [0u8; EXTRA_VANITY];
        let len = self.extra_data.len().min(EXTRA_VANITY);
        vanity[..len].copy_from_slice(&self.extra_data[..len]);
        vanity
    }

    /// Hash identifying the block.
    ///
    /// The committed seal is left out: it is produced by signing over this
    /// hash, so it cannot be part of it. Extra data that does not decode is
    /// hashed as raw bytes.
    pub fn hash(&self) -> Hash {
        let extra_data = match self.extra() {
            Ok(mut extra) if extra.committed.is_some() => {
                extra.committed = None;
                extra
                    .encode_with_vanity(&self.vanity())
                    .unwrap_or_else(|_| self.extra_data.clone())
            }
            _ => self.extra_data.clone(),
        };

        let encoded = sbor::basic_encode(&(
            self.number,
            self.parent_hash,
            self.state_root,
            self.timestamp,
            extra_data,
        ))
        .expect("header encoding must succeed - this is a bug if it fails");
        Hash::from_bytes(&encoded)
    }
}
