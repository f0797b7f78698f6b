//! Authenticated encryption between two identities, or under a shared key.
//!
//! # Asymmetric path
//!
//! [`encrypt`] / [`decrypt`] take the peer's public key and our secret key
//! and perform key agreement on every call. [`precompute_shared_key`] does
//! the agreement once; feeding the result to [`encrypt_symmetric`] /
//! [`decrypt_symmetric`] yields byte-identical output.
//!
//! # Lengths
//!
//! ```text
//! ciphertext = [16 bytes: MAC] [plaintext.len() bytes]
//! ```
//!
//! Ciphertexts shorter than [`MAC_SIZE`] are rejected as `TooShort` before
//! the primitive runs. Any other decryption failure is
//! `AuthenticationFailed`, whatever the cause.

use crate::backend::CryptoBackend;
use crate::engine::CryptoCore;
use crate::error::{CryptoError, Result};
use crate::keys::{PublicKey, SecretKey, SharedKey, SymmetricKey, SHARED_KEY_SIZE};
use crate::nonce::Nonce;
use zeroize::Zeroize;

/// Poly1305 tag overhead added by every encryption.
pub const MAC_SIZE: usize = 16;

fn check_ciphertext_len(ciphertext: &[u8]) -> Result<()> {
    if ciphertext.len() < MAC_SIZE {
        return Err(CryptoError::TooShort {
            actual: ciphertext.len(),
            minimum: MAC_SIZE,
        });
    }
    Ok(())
}

impl<B: CryptoBackend> CryptoCore<B> {
    /// Encrypt `plaintext` from `my_secret_key` to `their_public_key`.
    pub fn encrypt(
        &self,
        their_public_key: &PublicKey,
        my_secret_key: &SecretKey,
        nonce: &Nonce,
        plaintext: &[u8],
    ) -> Result<Vec<u8>> {
        let shared = self.precompute_shared_key(their_public_key, my_secret_key)?;
        self.encrypt_symmetric(&shared, nonce, plaintext)
    }

    /// Decrypt a box sent by `their_public_key` to `my_secret_key`.
    pub fn decrypt(
        &self,
        their_public_key: &PublicKey,
        my_secret_key: &SecretKey,
        nonce: &Nonce,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>> {
        check_ciphertext_len(ciphertext)?;

        // A bad peer key must look exactly like a bad MAC.
        let shared = self
            .backend()
            .key_agree(their_public_key, my_secret_key)
            .map_err(|_| CryptoError::AuthenticationFailed)?;
        self.decrypt_symmetric(&shared, nonce, ciphertext)
    }

    /// Run key agreement once for reuse with the symmetric path.
    pub fn precompute_shared_key(
        &self,
        their_public_key: &PublicKey,
        my_secret_key: &SecretKey,
    ) -> Result<SharedKey> {
        self.backend().key_agree(their_public_key, my_secret_key)
    }

    pub fn encrypt_symmetric(
        &self,
        key: &SharedKey,
        nonce: &Nonce,
        plaintext: &[u8],
    ) -> Result<Vec<u8>> {
        let ciphertext = self.backend().seal(key, nonce, plaintext)?;
        if ciphertext.len() != plaintext.len() + MAC_SIZE {
            return Err(CryptoError::EncryptionFailed);
        }
        Ok(ciphertext)
    }

    pub fn decrypt_symmetric(
        &self,
        key: &SharedKey,
        nonce: &Nonce,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>> {
        check_ciphertext_len(ciphertext)?;

        self.backend()
            .open(key, nonce, ciphertext)
            .map_err(|_| CryptoError::AuthenticationFailed)
    }

    /// 32 random bytes for session-local symmetric encryption.
    pub fn new_symmetric_key(&self) -> Result<SymmetricKey> {
        let mut bytes = [0u8; SHARED_KEY_SIZE];
        self.backend().fill_random(&mut bytes)?;
        let key = SymmetricKey::from_bytes(bytes);
        bytes.zeroize();
        Ok(key)
    }
}

/// Encrypt `plaintext` to `their_public_key` using `my_secret_key`.
pub fn encrypt(
    their_public_key: &PublicKey,
    my_secret_key: &SecretKey,
    nonce: &Nonce,
    plaintext: &[u8],
) -> Result<Vec<u8>> {
    CryptoCore::nacl().encrypt(their_public_key, my_secret_key, nonce, plaintext)
}

/// Decrypt a box from `their_public_key` addressed to `my_secret_key`.
pub fn decrypt(
    their_public_key: &PublicKey,
    my_secret_key: &SecretKey,
    nonce: &Nonce,
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    CryptoCore::nacl().decrypt(their_public_key, my_secret_key, nonce, ciphertext)
}

/// Shared-key generation done once, for peers we talk to repeatedly.
pub fn precompute_shared_key(
    their_public_key: &PublicKey,
    my_secret_key: &SecretKey,
) -> Result<SharedKey> {
    CryptoCore::nacl().precompute_shared_key(their_public_key, my_secret_key)
}

pub fn encrypt_symmetric(key: &SharedKey, nonce: &Nonce, plaintext: &[u8]) -> Result<Vec<u8>> {
    CryptoCore::nacl().encrypt_symmetric(key, nonce, plaintext)
}

pub fn decrypt_symmetric(key: &SharedKey, nonce: &Nonce, ciphertext: &[u8]) -> Result<Vec<u8>> {
    CryptoCore::nacl().decrypt_symmetric(key, nonce, ciphertext)
}

/// Fresh random symmetric key.
pub fn new_symmetric_key() -> Result<SymmetricKey> {
    CryptoCore::nacl().new_symmetric_key()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyPair;
    use crate::nonce::random_nonce;
    use crate::MAX_CRYPTO_REQUEST_SIZE;
    use rand::{thread_rng, Rng};

    fn pair() -> (KeyPair, KeyPair) {
        (KeyPair::generate().unwrap(), KeyPair::generate().unwrap())
    }

    #[test]
    fn test_roundtrip_all_lengths() {
        let (alice, bob) = pair();
        let mut rng = thread_rng();

        for len in (0..=MAX_CRYPTO_REQUEST_SIZE).step_by(31).chain([MAX_CRYPTO_REQUEST_SIZE]) {
            let mut message = vec![0u8; len];
            rng.fill(&mut message[..]);
            let nonce = random_nonce().unwrap();

            let ciphertext =
                encrypt(bob.public_key(), alice.secret_key(), &nonce, &message).unwrap();
            assert_eq!(ciphertext.len(), len + MAC_SIZE);

            let plaintext =
                decrypt(alice.public_key(), bob.secret_key(), &nonce, &ciphertext).unwrap();
            assert_eq!(plaintext, message);
        }
    }

    #[test]
    fn test_precompute_matches_direct() {
        let (alice, bob) = pair();
        let nonce = random_nonce().unwrap();
        let message = b"precomputed and direct must agree";

        let direct = encrypt(bob.public_key(), alice.secret_key(), &nonce, message).unwrap();
        let shared = precompute_shared_key(bob.public_key(), alice.secret_key()).unwrap();
        let fast = encrypt_symmetric(&shared, &nonce, message).unwrap();
        assert_eq!(direct, fast);

        // Receiver side precomputes the same key from the other half
        let shared_rx = precompute_shared_key(alice.public_key(), bob.secret_key()).unwrap();
        assert_eq!(shared, shared_rx);
        assert_eq!(
            decrypt_symmetric(&shared_rx, &nonce, &direct).unwrap(),
            message
        );
    }

    #[test]
    fn test_decrypt_too_short() {
        let (alice, bob) = pair();
        let nonce = random_nonce().unwrap();

        for len in 0..MAC_SIZE {
            let result = decrypt(alice.public_key(), bob.secret_key(), &nonce, &vec![0u8; len]);
            assert_eq!(
                result,
                Err(CryptoError::TooShort {
                    actual: len,
                    minimum: MAC_SIZE
                })
            );
        }
    }

    #[test]
    fn test_empty_plaintext_is_just_a_mac() {
        let key = new_symmetric_key().unwrap();
        let nonce = random_nonce().unwrap();

        let ciphertext = encrypt_symmetric(&key, &nonce, &[]).unwrap();
        assert_eq!(ciphertext.len(), MAC_SIZE);
        assert!(decrypt_symmetric(&key, &nonce, &ciphertext).unwrap().is_empty());
    }

    #[test]
    fn test_failures_are_indistinguishable() {
        let (alice, bob) = pair();
        let eve = KeyPair::generate().unwrap();
        let nonce = random_nonce().unwrap();
        let ciphertext = encrypt(bob.public_key(), alice.secret_key(), &nonce, b"secret").unwrap();

        // Wrong key
        let wrong_key = decrypt(eve.public_key(), bob.secret_key(), &nonce, &ciphertext);
        // Wrong nonce
        let wrong_nonce = decrypt(
            alice.public_key(),
            bob.secret_key(),
            &nonce.incremented(),
            &ciphertext,
        );
        // Tampered ciphertext
        let mut tampered = ciphertext.clone();
        tampered[MAC_SIZE] ^= 0x80;
        let wrong_bytes = decrypt(alice.public_key(), bob.secret_key(), &nonce, &tampered);
        // Low-order peer key
        let bad_point = decrypt(
            &PublicKey::from_bytes([0u8; 32]),
            bob.secret_key(),
            &nonce,
            &ciphertext,
        );

        for result in [wrong_key, wrong_nonce, wrong_bytes, bad_point] {
            assert_eq!(result, Err(CryptoError::AuthenticationFailed));
        }
    }

    #[test]
    fn test_encrypt_to_low_order_key_fails() {
        let alice = KeyPair::generate().unwrap();
        let nonce = random_nonce().unwrap();
        assert_eq!(
            encrypt(&PublicKey::from_bytes([0u8; 32]), alice.secret_key(), &nonce, b"x"),
            Err(CryptoError::EncryptionFailed)
        );
    }

    #[test]
    fn test_symmetric_keys_are_random() {
        assert_ne!(new_symmetric_key().unwrap(), new_symmetric_key().unwrap());
    }
}
