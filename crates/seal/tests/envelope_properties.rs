//! Property-based tests for the envelope codec and KDF.
//!
//! 1. **Round-trip**: open(seal(p, k), k) == p for all plaintexts
//! 2. **Tamper detection**: any single bit flip after the nonce is rejected
//! 3. **Key binding**: a different key never opens the envelope
//! 4. **Determinism**: the KDF is a pure function of its inputs
//! 5. **Nonce freshness**: sealing twice never repeats an envelope

use std::thread;

use proptest::prelude::*;
use seal::{derive, open, seal, SealError, Value, KEY_LEN, NONCE_LEN, TAG_LEN};

fn key_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), KEY_LEN)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_seal_open_roundtrip(
        plaintext in prop::collection::vec(any::<u8>(), 0..512),
        key in key_strategy(),
    ) {
        let sealed = seal(&plaintext, &key).unwrap();
        prop_assert_eq!(sealed.len(), NONCE_LEN + plaintext.len() + TAG_LEN);
        prop_assert_eq!(open(&sealed, &key).unwrap(), plaintext);
    }

    #[test]
    fn prop_single_bit_flip_is_rejected(
        plaintext in prop::collection::vec(any::<u8>(), 1..128),
        key in key_strategy(),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let mut sealed = seal(&plaintext, &key).unwrap();
        // Ciphertext and tag region.
        let offset = NONCE_LEN + position.index(sealed.len() - NONCE_LEN);
        sealed[offset] ^= 1 << bit;
        prop_assert!(matches!(open(&sealed, &key), Err(SealError::AuthenticationFailed)));
    }

    #[test]
    fn prop_wrong_key_is_rejected(
        plaintext in prop::collection::vec(any::<u8>(), 0..128),
        key1 in key_strategy(),
        key2 in key_strategy(),
    ) {
        prop_assume!(key1 != key2);
        let sealed = seal(&plaintext, &key1).unwrap();
        prop_assert!(matches!(open(&sealed, &key2), Err(SealError::AuthenticationFailed)));
    }

    #[test]
    fn prop_short_input_is_malformed(
        input in prop::collection::vec(any::<u8>(), 0..(NONCE_LEN + TAG_LEN)),
    ) {
        prop_assert!(matches!(open(&input, &[0u8; KEY_LEN]), Err(SealError::MalformedEnvelope(_))));
    }

    #[test]
    fn prop_kdf_deterministic(
        password in prop::collection::vec(any::<u8>(), 0..64),
        salt in prop::collection::vec(any::<u8>(), 0..64),
        iterations in 1u32..20,
        len in 1usize..100,
    ) {
        let a = derive(&password, &salt, iterations, len).unwrap();
        let b = derive(&password, &salt, iterations, len).unwrap();
        prop_assert_eq!(a.len(), len);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_kdf_salt_sensitivity(
        password in prop::collection::vec(any::<u8>(), 0..32),
        salt in prop::collection::vec(any::<u8>(), 0..32),
        extra in any::<u8>(),
    ) {
        let mut other = salt.clone();
        other.push(extra);
        prop_assert_ne!(
            derive(&password, &salt, 3, 32).unwrap(),
            derive(&password, &other, 3, 32).unwrap()
        );
    }
}

#[test]
fn concurrent_seals_never_share_a_nonce() {
    let key = derive(b"pw", b"salt", 10, KEY_LEN).unwrap();
    let envelopes: Vec<Vec<u8>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| seal(b"same plaintext", &key).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let mut nonces: Vec<&[u8]> = envelopes.iter().map(|e| &e[..NONCE_LEN]).collect();
    nonces.sort_unstable();
    nonces.dedup();
    assert_eq!(nonces.len(), envelopes.len());

    for envelope in &envelopes {
        assert_eq!(open(envelope, &key).unwrap(), b"same plaintext");
    }
}

#[test]
fn value_transport_round_trip_through_json_model() {
    let key = derive(b"pw", b"salt", 10, KEY_LEN).unwrap();
    let json = serde_json::json!({"a": [1, 2.5, "x", null], "b": {"c": false}});
    let value = Value::from(json.clone());
    let sealed = seal(&seal::transport::to_bytes(&value).unwrap(), &key).unwrap();
    let opened: Value = seal::transport::from_bytes(&open(&sealed, &key).unwrap()).unwrap();
    assert_eq!(serde_json::Value::from(opened), json);
}
