//! Validator identities and ordered validator-set snapshots.

use crate::{Address, DeltaError, Hash, PublicKey, ValidatorSetDelta, VotePower};
use sbor::prelude::*;
use std::collections::HashSet;

/// Public identity of one validator.
#[derive(Debug, Clone, PartialEq, Eq, BasicSbor)]
pub struct ValidatorIdentity {
    pub address: Address,
    pub bls_public_key: PublicKey,
    pub voting_power: VotePower,
}

impl ValidatorIdentity {
    pub fn new(address: Address, bls_public_key: PublicKey, voting_power: u64) -> Self {
        Self {
            address,
            bls_public_key,
            voting_power: VotePower(voting_power),
        }
    }
}

/// Ordered validator list authoritative for one epoch.
///
/// Positions in this list are what bitmaps index, so the order is part of
/// consensus. A set is never mutated once built; [`ValidatorSet::apply`]
/// returns a new set.
#[derive(Debug, Clone, PartialEq, Eq, Default, BasicSbor)]
pub struct ValidatorSet {
    pub validators: Vec<ValidatorIdentity>,
}

impl ValidatorSet {
    pub fn new(validators: Vec<ValidatorIdentity>) -> Self {
        Self { validators }
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ValidatorIdentity> {
        self.validators.get(index)
    }

    /// Position of a validator in this set.
    pub fn index_of(&self, address: &Address) -> Option<usize> {
        self.validators.iter().position(|v| v.address == *address)
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.index_of(address).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidatorIdentity> {
        self.validators.iter()
    }

    /// Summed voting power, or `None` if it does not fit in a u64.
    pub fn checked_total_voting_power(&self) -> Option<u64> {
        VotePower::checked_sum(self.validators.iter().map(|v| v.voting_power)).map(|p| p.0)
    }

    /// Summed voting power, saturating at `u64::MAX`.
    ///
    /// Sets produced by [`ValidatorSet::apply`] never saturate.
    pub fn total_voting_power(&self) -> u64 {
        self.checked_total_voting_power().unwrap_or(u64::MAX)
    }

    fn exact_total_voting_power(&self) -> u128 {
        self.validators.iter().map(|v| v.voting_power.0 as u128).sum()
    }

    /// Minimum signer voting power for a quorum (> 2/3 of the total).
    pub fn quorum_threshold(&self) -> u64 {
        VotePower::quorum_threshold(self.exact_total_voting_power())
    }

    pub fn has_quorum(&self, voting_power: u64) -> bool {
        VotePower::has_quorum(voting_power, self.exact_total_voting_power())
    }

    /// Commitment to the ordered identities, as carried in checkpoints.
    pub fn hash(&self) -> Hash {
        let encoded = sbor::basic_encode(self)
            .expect("validator set encoding must succeed - this is a bug if it fails");
        Hash::from_bytes(&encoded)
    }

    /// Produce the set for the next epoch.
    ///
    /// Drops every position marked in `delta.removed` while keeping the
    /// relative order of survivors, then appends `delta.added` in order.
    /// `self` is left untouched so signatures made against it can still be
    /// checked.
    pub fn apply(&self, delta: &ValidatorSetDelta) -> Result<ValidatorSet, DeltaError> {
        let removed_len = delta.removed.len();
        if removed_len > self.validators.len() as u64 {
            return Err(DeltaError::RemovedIndexOutOfRange {
                index: removed_len - 1,
                len: self.validators.len(),
            });
        }

        let mut validators = Vec::with_capacity(self.validators.len() + delta.added.len());
        let mut removed = HashSet::new();
        for (index, validator) in self.validators.iter().enumerate() {
            if delta.removed.is_set(index as u64) {
                removed.insert(validator.address);
            } else {
                validators.push(validator.clone());
            }
        }

        let mut present: HashSet<Address> = validators.iter().map(|v| v.address).collect();
        for validator in &delta.added {
            if removed.contains(&validator.address) {
                return Err(DeltaError::AddedAndRemoved(validator.address));
            }
            if !present.insert(validator.address) {
                return Err(DeltaError::DuplicateValidator(validator.address));
            }
            validators.push(validator.clone());
        }

        let next = ValidatorSet { validators };
        if next.checked_total_voting_power().is_none() {
            return Err(DeltaError::VotingPowerOverflow);
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bitmap, KeyPair};

    fn identity(seed: u8, power: u64) -> ValidatorIdentity {
        ValidatorIdentity::new(
            Address([seed; 20]),
            KeyPair::from_seed(&[seed; 32]).public_key(),
            power,
        )
    }

    fn addresses(set: &ValidatorSet) -> Vec<u8> {
        set.iter().map(|v| v.address.0[0]).collect()
    }

    #[test]
    fn test_apply_removes_with_stable_order_then_appends() {
        let set = ValidatorSet::new((1..=5).map(|i| identity(i, 1)).collect());
        let delta = ValidatorSetDelta::new(
            vec![identity(9, 1), identity(8, 1)],
            Bitmap::from_indices([1, 3]),
        );

        let next = set.apply(&delta).unwrap();
        assert_eq!(addresses(&next), vec![1, 3, 5, 9, 8]);
        // Previous snapshot is untouched.
        assert_eq!(addresses(&set), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_apply_empty_delta_is_identity() {
        let set = ValidatorSet::new((1..=3).map(|i| identity(i, 2)).collect());
        let next = set.apply(&ValidatorSetDelta::default()).unwrap();
        assert_eq!(next, set);
        assert_eq!(next.hash(), set.hash());
    }

    #[test]
    fn test_apply_rejects_out_of_range_removal() {
        let set = ValidatorSet::new((1..=3).map(|i| identity(i, 1)).collect());
        let delta = ValidatorSetDelta::new(vec![], Bitmap::from_indices([3]));
        assert_eq!(
            set.apply(&delta),
            Err(DeltaError::RemovedIndexOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_apply_rejects_added_and_removed() {
        let set = ValidatorSet::new((1..=3).map(|i| identity(i, 1)).collect());
        let delta = ValidatorSetDelta::new(vec![identity(2, 1)], Bitmap::from_indices([1]));
        assert_eq!(
            set.apply(&delta),
            Err(DeltaError::AddedAndRemoved(Address([2; 20])))
        );
    }

    #[test]
    fn test_apply_rejects_duplicates() {
        let set = ValidatorSet::new((1..=3).map(|i| identity(i, 1)).collect());

        let existing = ValidatorSetDelta::new(vec![identity(3, 1)], Bitmap::new());
        assert_eq!(
            set.apply(&existing),
            Err(DeltaError::DuplicateValidator(Address([3; 20])))
        );

        let twice = ValidatorSetDelta::new(vec![identity(7, 1), identity(7, 1)], Bitmap::new());
        assert_eq!(
            set.apply(&twice),
            Err(DeltaError::DuplicateValidator(Address([7; 20])))
        );
    }

    #[test]
    fn test_voting_power_and_quorum() {
        let set = ValidatorSet::new(vec![identity(1, 10), identity(2, 20), identity(3, 30)]);
        assert_eq!(set.total_voting_power(), 60);
        assert_eq!(set.quorum_threshold(), 41);
        assert!(set.has_quorum(41));
        assert!(!set.has_quorum(40));
        assert_eq!(set.index_of(&Address([3; 20])), Some(2));
        assert_eq!(set.index_of(&Address([4; 20])), None);
    }

    #[test]
    fn test_apply_rejects_voting_power_overflow() {
        let set = ValidatorSet::new(vec![identity(1, u64::MAX)]);
        let delta = ValidatorSetDelta::new(vec![identity(2, u64::MAX)], Bitmap::new());
        assert_eq!(set.apply(&delta), Err(DeltaError::VotingPowerOverflow));

        // Replacing the heavy validator keeps the total in range.
        let swap = ValidatorSetDelta::new(vec![identity(2, u64::MAX)], Bitmap::from_indices([0]));
        assert_eq!(set.apply(&swap).unwrap().total_voting_power(), u64::MAX);
    }

    #[test]
    fn test_quorum_exact_when_total_exceeds_u64() {
        let set = ValidatorSet::new(vec![identity(1, u64::MAX), identity(2, u64::MAX)]);
        assert_eq!(set.checked_total_voting_power(), None);
        assert_eq!(set.total_voting_power(), u64::MAX);
        // One of two equal validators is never a quorum, wrapped total or not.
        assert!(!set.has_quorum(u64::MAX));
    }

    #[test]
    fn test_hash_depends_on_order() {
        let a = ValidatorSet::new(vec![identity(1, 1), identity(2, 1)]);
        let b = ValidatorSet::new(vec![identity(2, 1), identity(1, 1)]);
        assert_ne!(a.hash(), b.hash());
    }
}
