use rand::{thread_rng, Rng};
use tox_crypto::{
    handle_request, request_id, CryptoError, KeyPair, RequestPacket, MAX_CRYPTO_REQUEST_SIZE,
};

#[test]
fn fuzz_decode_request_packet_never_panics() {
    let mut rng = thread_rng();
    for _ in 0..10_000 {
        let len: usize = rng.gen_range(0..2048);
        let mut data = vec![0u8; len];
        rng.fill(&mut data[..]);
        let _ = RequestPacket::decode(&data);
    }
}

#[test]
fn fuzz_handle_request_rejects_garbage() {
    let bob = KeyPair::generate().unwrap();
    let mut rng = thread_rng();

    for _ in 0..2_000 {
        let len: usize = rng.gen_range(0..2048);
        let mut data = vec![0u8; len];
        rng.fill(&mut data[..]);

        let result = handle_request(bob.public_key(), bob.secret_key(), &data);
        match result {
            Err(CryptoError::TooShort { .. })
            | Err(CryptoError::PayloadTooLarge { .. })
            | Err(CryptoError::AuthenticationFailed) => {}
            other => panic!("unexpected result for {} random bytes: {:?}", len, other),
        }
    }
}

#[test]
fn random_mutation_of_valid_request_is_handled() {
    let mut rng = thread_rng();
    let alice = KeyPair::generate().unwrap();
    let bob = KeyPair::generate().unwrap();

    let packet = tox_crypto::create_request(
        alice.public_key(),
        alice.secret_key(),
        bob.public_key(),
        request_id::FRIEND_REQ,
        b"mutate me",
    )
    .unwrap()
    .encode()
    .to_vec();

    for _ in 0..1_000 {
        let mut mutated = packet.clone();
        let flip_count = rng.gen_range(1..6);
        for _ in 0..flip_count {
            let idx = rng.gen_range(0..mutated.len());
            mutated[idx] ^= rng.gen_range(1..=255u8);
        }

        let result = handle_request(bob.public_key(), bob.secret_key(), &mutated);
        // Only the type byte is outside the authenticated region
        if mutated[1..] == packet[1..] {
            assert!(result.is_ok());
        } else {
            assert_eq!(result, Err(CryptoError::AuthenticationFailed));
        }
    }
}

#[test]
fn truncations_of_valid_request_are_handled() {
    let alice = KeyPair::generate().unwrap();
    let bob = KeyPair::generate().unwrap();

    let packet = tox_crypto::create_request(
        alice.public_key(),
        alice.secret_key(),
        bob.public_key(),
        request_id::NAT_PING,
        &[0xAA; 64],
    )
    .unwrap()
    .encode();

    for len in 0..packet.len() {
        let result = handle_request(bob.public_key(), bob.secret_key(), &packet[..len]);
        assert!(result.is_err(), "truncation to {} bytes accepted", len);
    }

    let mut extended = packet.to_vec();
    extended.resize(MAX_CRYPTO_REQUEST_SIZE + 1, 0);
    assert!(matches!(
        handle_request(bob.public_key(), bob.secret_key(), &extended),
        Err(CryptoError::PayloadTooLarge { .. })
    ));
}
