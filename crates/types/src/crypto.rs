//! BLS12-381 key material and signatures.
//!
//! Uses the `min_pk` variant: 48-byte compressed G1 public keys and 96-byte
//! compressed G2 signatures. Every validator signs the same message for a
//! block, so signatures aggregate into one constant-size value that checks
//! against the aggregate of the signers' public keys. The proof-of-possession
//! ciphersuite is used because same-message aggregation is only sound when
//! rogue keys are excluded at registration.

use blst::min_pk;
use blst::BLST_ERROR;
use rand::RngCore;
use sbor::prelude::*;
use std::fmt;

/// Domain separation tag for all consensus signatures.
pub const BLS_DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

/// Errors decoding key material.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid public key: {0:?}")]
    InvalidPublicKey(BLST_ERROR),

    #[error("invalid signature: {0:?}")]
    InvalidSignature(BLST_ERROR),

    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Errors combining several keys or signatures into one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
    #[error("nothing to aggregate")]
    Empty,

    #[error("point at index {index} is invalid: {error:?}")]
    InvalidPoint { index: usize, error: BLST_ERROR },

    #[error("aggregation failed: {0:?}")]
    Failed(BLST_ERROR),
}

/// Compressed BLS public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, BasicSbor)]
#[sbor(transparent)]
pub struct PublicKey(pub [u8; 48]);

/// Compressed BLS signature, either from one signer or aggregated.
#[derive(Clone, Copy, PartialEq, Eq, BasicSbor)]
#[sbor(transparent)]
pub struct BlsSignature(pub [u8; 96]);

impl PublicKey {
    pub const LENGTH: usize = 48;

    /// Parse and subgroup-check a compressed public key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; 48] = bytes.try_into().map_err(|_| CryptoError::InvalidLength {
            expected: Self::LENGTH,
            actual: bytes.len(),
        })?;
        min_pk::PublicKey::key_validate(&array).map_err(CryptoError::InvalidPublicKey)?;
        Ok(PublicKey(array))
    }

    pub fn as_bytes(&self) -> &[u8; 48] {
        &self.0
    }

    /// Verify `signature` over `message`.
    ///
    /// Malformed keys or signatures verify as `false`.
    pub fn verify(&self, message: &[u8], signature: &BlsSignature) -> bool {
        let Ok(pk) = min_pk::PublicKey::key_validate(&self.0) else {
            return false;
        };
        let Ok(sig) = min_pk::Signature::sig_validate(&signature.0, true) else {
            return false;
        };
        sig.verify(true, message, BLS_DST, &[], &pk, true) == BLST_ERROR::BLST_SUCCESS
    }

    /// Combine public keys into one that verifies their aggregated signature.
    pub fn aggregate(keys: &[PublicKey]) -> Result<PublicKey, AggregateError> {
        if keys.is_empty() {
            return Err(AggregateError::Empty);
        }
        let points = keys
            .iter()
            .enumerate()
            .map(|(index, key)| {
                min_pk::PublicKey::key_validate(&key.0)
                    .map_err(|error| AggregateError::InvalidPoint { index, error })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let refs: Vec<&min_pk::PublicKey> = points.iter().collect();
        let aggregate =
            min_pk::AggregatePublicKey::aggregate(&refs, false).map_err(AggregateError::Failed)?;
        Ok(PublicKey(aggregate.to_public_key().compress()))
    }
}

impl BlsSignature {
    pub const LENGTH: usize = 96;

    /// Parse and subgroup-check a compressed signature.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; 96] = bytes.try_into().map_err(|_| CryptoError::InvalidLength {
            expected: Self::LENGTH,
            actual: bytes.len(),
        })?;
        min_pk::Signature::sig_validate(&array, true).map_err(CryptoError::InvalidSignature)?;
        Ok(BlsSignature(array))
    }

    pub fn as_bytes(&self) -> &[u8; 96] {
        &self.0
    }

    /// Combine signatures over the same message into one.
    ///
    /// Aggregation is order-independent.
    pub fn aggregate(signatures: &[BlsSignature]) -> Result<BlsSignature, AggregateError> {
        if signatures.is_empty() {
            return Err(AggregateError::Empty);
        }
        let points = signatures
            .iter()
            .enumerate()
            .map(|(index, sig)| {
                min_pk::Signature::sig_validate(&sig.0, true)
                    .map_err(|error| AggregateError::InvalidPoint { index, error })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let refs: Vec<&min_pk::Signature> = points.iter().collect();
        let aggregate =
            min_pk::AggregateSignature::aggregate(&refs, false).map_err(AggregateError::Failed)?;
        Ok(BlsSignature(aggregate.to_signature().compress()))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({}..)", hex::encode(&self.0[..8]))
    }
}

impl fmt::Debug for BlsSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlsSignature({}..)", hex::encode(&self.0[..8]))
    }
}

/// A validator's BLS signing key.
#[derive(Clone)]
pub struct KeyPair {
    secret: min_pk::SecretKey,
    public: PublicKey,
}

impl KeyPair {
    /// Generate a fresh key from OS randomness.
    pub fn generate() -> Self {
        let mut seed = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut seed);
        Self::from_seed(&seed)
    }

    /// Derive a key deterministically from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        // key_gen only rejects input keying material shorter than 32 bytes.
        let secret = min_pk::SecretKey::key_gen(seed, &[])
            .expect("32-byte seed is valid keying material");
        let public = PublicKey(secret.sk_to_pk().compress());
        Self { secret, public }
    }

    pub fn public_key(&self) -> PublicKey {
        self.public
    }

    pub fn sign(&self, message: &[u8]) -> BlsSignature {
        BlsSignature(self.secret.sign(message, BLS_DST, &[]).compress())
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(n: u8) -> Vec<KeyPair> {
        (0..n).map(|i| KeyPair::from_seed(&[i + 1; 32])).collect()
    }

    #[test]
    fn test_sign_and_verify() {
        let key = KeyPair::from_seed(&[7; 32]);
        let sig = key.sign(b"checkpoint");
        assert!(key.public_key().verify(b"checkpoint", &sig));
        assert!(!key.public_key().verify(b"other", &sig));
    }

    #[test]
    fn test_from_seed_is_deterministic() {
        let a = KeyPair::from_seed(&[3; 32]);
        let b = KeyPair::from_seed(&[3; 32]);
        assert_eq!(a.public_key(), b.public_key());
        assert_eq!(a.sign(b"m"), b.sign(b"m"));
    }

    #[test]
    fn test_aggregate_verifies_against_aggregate_key() {
        let keys = keys(4);
        let sigs: Vec<_> = keys.iter().map(|k| k.sign(b"block")).collect();
        let pks: Vec<_> = keys.iter().map(|k| k.public_key()).collect();

        let agg_sig = BlsSignature::aggregate(&sigs).unwrap();
        let agg_pk = PublicKey::aggregate(&pks).unwrap();
        assert!(agg_pk.verify(b"block", &agg_sig));

        // Missing one signer's key breaks verification.
        let partial_pk = PublicKey::aggregate(&pks[..3]).unwrap();
        assert!(!partial_pk.verify(b"block", &agg_sig));
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let keys = keys(3);
        let mut sigs: Vec<_> = keys.iter().map(|k| k.sign(b"block")).collect();
        let forward = BlsSignature::aggregate(&sigs).unwrap();
        sigs.reverse();
        let backward = BlsSignature::aggregate(&sigs).unwrap();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_aggregate_empty() {
        assert_eq!(PublicKey::aggregate(&[]), Err(AggregateError::Empty));
        assert_eq!(BlsSignature::aggregate(&[]), Err(AggregateError::Empty));
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(matches!(
            PublicKey::from_bytes(&[1u8; 10]),
            Err(CryptoError::InvalidLength { .. })
        ));
        assert!(PublicKey::from_bytes(&[0xffu8; 48]).is_err());
        assert!(BlsSignature::from_bytes(&[0xffu8; 96]).is_err());
    }
}
