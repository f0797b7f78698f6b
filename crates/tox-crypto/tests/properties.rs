//! Randomized checks of the cipher and nonce contracts.

use rand::{thread_rng, Rng};
use tox_crypto::{
    crypto_cmp, decrypt, encrypt, encrypt_symmetric, increment_nonce_by, precompute_shared_key,
    random_nonce, CryptoError, KeyPair, Nonce, MAC_SIZE, MAX_CRYPTO_REQUEST_SIZE,
};

#[test]
fn roundtrip_random_messages() {
    let mut rng = thread_rng();

    for _ in 0..100 {
        let alice = KeyPair::generate().unwrap();
        let bob = KeyPair::generate().unwrap();
        let nonce = random_nonce().unwrap();

        let len = rng.gen_range(0..=MAX_CRYPTO_REQUEST_SIZE);
        let mut message = vec![0u8; len];
        rng.fill(&mut message[..]);

        let ciphertext = encrypt(bob.public_key(), alice.secret_key(), &nonce, &message).unwrap();
        let plaintext = decrypt(alice.public_key(), bob.secret_key(), &nonce, &ciphertext).unwrap();
        assert_eq!(plaintext, message);
    }
}

#[test]
fn precompute_equivalence_random_messages() {
    let mut rng = thread_rng();
    let alice = KeyPair::generate().unwrap();
    let bob = KeyPair::generate().unwrap();
    let shared = precompute_shared_key(bob.public_key(), alice.secret_key()).unwrap();

    for _ in 0..100 {
        let nonce = random_nonce().unwrap();
        let len = rng.gen_range(0..512);
        let mut message = vec![0u8; len];
        rng.fill(&mut message[..]);

        assert_eq!(
            encrypt_symmetric(&shared, &nonce, &message).unwrap(),
            encrypt(bob.public_key(), alice.secret_key(), &nonce, &message).unwrap()
        );
    }
}

#[test]
fn single_bit_flips_are_detected() {
    let mut rng = thread_rng();
    let alice = KeyPair::generate().unwrap();
    let bob = KeyPair::generate().unwrap();
    let nonce = random_nonce().unwrap();

    let mut message = vec![0u8; 200];
    rng.fill(&mut message[..]);
    let ciphertext = encrypt(bob.public_key(), alice.secret_key(), &nonce, &message).unwrap();
    assert_eq!(ciphertext.len(), message.len() + MAC_SIZE);

    let samples = 2_000;
    let mut rejected = 0;
    for _ in 0..samples {
        let bit = rng.gen_range(0..ciphertext.len() * 8);
        let mut tampered = ciphertext.clone();
        tampered[bit / 8] ^= 1 << (bit % 8);

        match decrypt(alice.public_key(), bob.secret_key(), &nonce, &tampered) {
            Err(CryptoError::AuthenticationFailed) => rejected += 1,
            Err(other) => panic!("unexpected error kind: {:?}", other),
            Ok(_) => {}
        }
    }

    assert!(rejected * 1000 >= samples * 999, "only {rejected}/{samples} rejected");
}

#[test]
fn nonce_increment_composes() {
    let mut rng = thread_rng();

    for _ in 0..1_000 {
        let start = Nonce::from_bytes(rng.gen());
        let m: u64 = rng.gen();
        let k: u64 = rng.gen_range(0..=m);

        assert_eq!(
            increment_nonce_by(&increment_nonce_by(&start, k), m - k),
            increment_nonce_by(&start, m)
        );
    }
}

#[test]
fn constant_time_compare_matches_equality() {
    let mut rng = thread_rng();

    for _ in 0..1_000 {
        let a: [u8; 32] = rng.gen();
        let mut b = a;
        assert!(crypto_cmp(&a, &b));

        let idx = rng.gen_range(0..32);
        b[idx] ^= rng.gen_range(1..=255u8);
        assert!(!crypto_cmp(&a, &b));
    }
}
