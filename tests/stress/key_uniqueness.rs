//! Stress test: 10,000 generated identities never repeat a private or
//! public key, and every public key is derived from its private key.

use std::collections::HashSet;

use iroha_genesis::crypto::encoding::decode_key_hex;
use iroha_genesis::crypto::keys::{derive_public_key, generate};

#[test]
fn stress_10000_unique_private_keys() {
    let mut private_keys = HashSet::with_capacity(10_000);
    let mut public_keys = HashSet::with_capacity(10_000);

    for i in 0..10_000 {
        let (public, private) = generate();
        assert!(private_keys.insert(private), "duplicate private key at call {i}");
        assert!(public_keys.insert(public), "duplicate public key at call {i}");
    }

    assert_eq!(private_keys.len(), 10_000);
    assert_eq!(public_keys.len(), 10_000);
}

#[test]
fn stress_1000_keys_match_derivation() {
    for _ in 0..1_000 {
        let (public, private) = generate();
        let seed = decode_key_hex("private", &private).expect("generated key is valid hex");
        assert_eq!(hex::encode(derive_public_key(&seed)), public);
        assert_eq!(derive_public_key(&seed), derive_public_key(&seed));
    }
}
