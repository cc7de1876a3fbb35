//! Identifier newtypes.

use crate::HexError;
use sbor::prelude::*;
use std::fmt;

/// 20-byte account address of a validator or a bridge sender.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, BasicSbor)]
#[sbor(transparent)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const LENGTH: usize = 20;

    pub const ZERO: Self = Address([0u8; 20]);

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Parse a hex string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, HexError> {
        let bytes = hex::decode(s.trim_start_matches("0x"))?;
        let array: [u8; 20] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| HexError::InvalidLength {
                expected: Self::LENGTH,
                actual: bytes.len(),
            })?;
        Ok(Address(array))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(0x{})", hex::encode(self.0))
    }
}

/// Voting power (stake weight) of a validator or a group of signers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, BasicSbor)]
#[sbor(transparent)]
pub struct VotePower(pub u64);

impl VotePower {
    pub const ZERO: Self = VotePower(0);

    /// `None` when the sum does not fit in a u64.
    pub fn checked_add(self, other: VotePower) -> Option<VotePower> {
        self.0.checked_add(other.0).map(VotePower)
    }

    /// Sum of `powers`, or `None` on overflow.
    pub fn checked_sum<I>(powers: I) -> Option<VotePower>
    where
        I: IntoIterator<Item = VotePower>,
    {
        powers.into_iter().try_fold(Self::ZERO, Self::checked_add)
    }

    /// Check whether `voting_power` is strictly more than 2/3 of `total`.
    ///
    /// `total` is a u128 so a set whose stake does not fit in a u64 is still
    /// compared exactly.
    pub fn has_quorum(voting_power: u64, total: u128) -> bool {
        match total.checked_mul(2) {
            Some(doubled) => (voting_power as u128) * 3 > doubled,
            None => false,
        }
    }

    /// Smallest voting power that satisfies [`VotePower::has_quorum`],
    /// saturating at `u64::MAX` when no u64 power is enough.
    pub fn quorum_threshold(total: u128) -> u64 {
        let threshold = total.saturating_mul(2) / 3 + 1;
        u64::try_from(threshold).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quorum_threshold_agrees_with_has_quorum() {
        for total in [1u128, 3, 4, 7, 10, 100, 101] {
            let threshold = VotePower::quorum_threshold(total);
            assert!(VotePower::has_quorum(threshold, total), "total {}", total);
            assert!(
                !VotePower::has_quorum(threshold - 1, total),
                "total {}",
                total
            );
        }
    }

    #[test]
    fn test_quorum_on_totals_beyond_u64() {
        let total = 2 * u64::MAX as u128;
        assert!(!VotePower::has_quorum(u64::MAX, total));
        assert_eq!(VotePower::quorum_threshold(total), u64::MAX);
        assert!(VotePower::has_quorum(u64::MAX, u64::MAX as u128));
    }

    #[test]
    fn test_checked_sum_detects_overflow() {
        assert_eq!(
            VotePower::checked_sum([VotePower(1), VotePower(2)]),
            Some(VotePower(3))
        );
        assert_eq!(
            VotePower::checked_sum([VotePower(u64::MAX), VotePower(1)]),
            None
        );
        assert_eq!(VotePower::checked_sum([]), Some(VotePower::ZERO));
    }

    #[test]
    fn test_address_hex() {
        let addr = Address::from_hex("0x5000000000000000000000000000000000000001").unwrap();
        assert_eq!(addr.0[0], 0x50);
        assert_eq!(addr.0[19], 0x01);
        assert_eq!(
            addr.to_string(),
            "0x5000000000000000000000000000000000000001"
        );
    }
}
