//! Cryptographic core for Tox.
//!
//! This crate provides:
//! - Constant-time comparison and CSPRNG-backed random values
//! - 24-byte nonces with random and big-endian counter generation
//! - NaCl `crypto_box` authenticated encryption between two key pairs,
//!   with a precomputed shared-key fast path
//! - Crypto request packets: sender key, purpose byte and encrypted
//!   payload in one self-describing datagram
//!
//! # Design
//!
//! Every operation is a pure function of its inputs plus the random
//! source. There is no nonce table and no connection registry, so all of it
//! can be called from any number of threads without locking. Sequencing
//! nonces per key is up to the caller.
//!
//! Decryption never says *why* it failed: wrong key, wrong nonce and
//! tampered bytes all return [`CryptoError::AuthenticationFailed`].
//!
//! # Example
//!
//! ```
//! use tox_crypto::{create_request, handle_request, request_id, KeyPair};
//!
//! let alice = KeyPair::generate().unwrap();
//! let bob = KeyPair::generate().unwrap();
//!
//! let packet = create_request(
//!     alice.public_key(),
//!     alice.secret_key(),
//!     bob.public_key(),
//!     request_id::FRIEND_REQ,
//!     b"hello",
//! )
//! .unwrap();
//!
//! let request = handle_request(bob.public_key(), bob.secret_key(), &packet.encode()).unwrap();
//! assert_eq!(&request.sender_public_key, alice.public_key());
//! assert_eq!(request.data, b"hello");
//! ```

#![forbid(unsafe_code)]

pub mod backend;
pub mod cipher;
pub mod compare;
pub mod engine;
pub mod error;
pub mod keys;
pub mod nonce;
pub mod random;
pub mod request;

/// Upper bound on the size of a crypto request packet.
pub const MAX_CRYPTO_REQUEST_SIZE: usize = 1024;

pub use backend::{CryptoBackend, NaclBackend};
pub use cipher::{
    decrypt, decrypt_symmetric, encrypt, encrypt_symmetric, new_symmetric_key,
    precompute_shared_key, MAC_SIZE,
};
pub use compare::{constant_time_eq, crypto_cmp};
pub use engine::CryptoCore;
pub use error::{CryptoError, Result};
pub use keys::{
    KeyPair, PublicKey, SecretKey, SharedKey, SymmetricKey, PUBLIC_KEY_SIZE, SECRET_KEY_SIZE,
    SHARED_KEY_SIZE,
};
pub use nonce::{increment_nonce, increment_nonce_by, new_nonce, random_nonce, Nonce, NONCE_SIZE};
pub use random::{random_64b, random_bytes, random_int};
pub use request::{
    create_request, handle_request, request_id, HandledRequest, RequestCodec, RequestPacket,
    MAX_REQUEST_DATA_SIZE, MIN_REQUEST_PACKET_SIZE, NET_PACKET_CRYPTO, REQUEST_HEADER_SIZE,
};
