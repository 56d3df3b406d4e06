//! Cryptographic primitives for peer identities.
//!
//! This module provides:
//! - Ed25519 seed generation from the OS CSPRNG and public key derivation
//! - Hex and base64 conversions for key material

pub mod encoding;
pub mod keys;
