//! Ed25519 peer key pair generation.
//!
//! A peer's private key is a 32-byte seed drawn from the OS CSPRNG; the
//! public key is derived from it with the standard Ed25519 derivation.
//! Both travel as lower-case hex text.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use rand::RngCore;
use zeroize::Zeroize;

use crate::crypto::encoding;
use crate::error::{GenesisError, Result};

/// Length in bytes of both the private seed and the public key.
pub const KEY_LEN: usize = 32;

/// Message signed when checking that a loaded key pair is usable.
const CHECK_MESSAGE: &[u8] = b"iroha-genesis key pair check";

/// An Ed25519 key pair for one peer.
///
/// `SigningKey` zeroizes its seed on drop.
pub struct PeerKeyPair {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl PeerKeyPair {
    /// Generate a new key pair from a fresh random seed.
    pub fn generate() -> Self {
        let mut seed = random_seed();
        let pair = Self::from_seed(&seed);
        seed.zeroize();
        pair
    }

    /// Reconstruct a key pair from a raw 32-byte seed.
    pub fn from_seed(seed: &[u8; KEY_LEN]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Reconstruct a key pair from hex seed text.
    pub fn from_private_hex(field: &str, text: &str) -> Result<Self> {
        let mut seed = encoding::decode_key_hex(field, text)?;
        let pair = Self::from_seed(&seed);
        seed.zeroize();
        Ok(pair)
    }

    /// Return the private seed as lower-case hex.
    pub fn private_key_hex(&self) -> String {
        let mut bytes = self.signing_key.to_bytes();
        let text = hex::encode(bytes);
        bytes.zeroize();
        text
    }

    /// Return the public key bytes.
    pub fn public_key_bytes(&self) -> [u8; KEY_LEN] {
        self.verifying_key.to_bytes()
    }

    /// Return the public key as lower-case hex.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key_bytes())
    }

    /// Check that `public` belongs to this pair by signing a test
    /// message and verifying it under `public`.
    pub fn signs_for(&self, public: &[u8; KEY_LEN]) -> Result<bool> {
        let verifying_key =
            VerifyingKey::from_bytes(public).map_err(|e| GenesisError::Encoding {
                field: "public key".to_string(),
                reason: format!("not a valid Ed25519 point: {e}"),
            })?;
        let signature = self.signing_key.sign(CHECK_MESSAGE);
        Ok(verifying_key.verify(CHECK_MESSAGE, &signature).is_ok())
    }
}

/// Draw a fresh 32-byte seed from `rand`'s thread-local CSPRNG.
/// Caller must zeroize after use.
pub fn random_seed() -> [u8; KEY_LEN] {
    let mut seed = [0u8; KEY_LEN];
    rand::thread_rng().fill_bytes(&mut seed);
    seed
}

/// Derive the Ed25519 public key for a seed.
pub fn derive_public_key(seed: &[u8; KEY_LEN]) -> [u8; KEY_LEN] {
    SigningKey::from_bytes(seed).verifying_key().to_bytes()
}

/// Generate one peer identity, returned as `(public_hex, private_hex)`.
pub fn generate() -> (String, String) {
    let pair = PeerKeyPair::generate();
    (pair.public_key_hex(), pair.private_key_hex())
}
