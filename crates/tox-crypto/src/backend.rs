//! Cryptographic backend capability.
//!
//! The rest of the crate only talks to [`CryptoBackend`]. The default
//! [`NaclBackend`] reproduces NaCl's `crypto_box`:
//!
//! ```text
//! shared = HSalsa20(X25519(my_secret, their_public), 0^16)   // beforenm
//! box    = XSalsa20-Poly1305(shared, nonce, plaintext)        // afternm
//!        = [16 bytes: Poly1305 tag] [ciphertext]
//! ```
//!
//! Because the asymmetric path is literally "agree, then seal", a key
//! precomputed once and reused through the symmetric path produces the
//! same bytes as a one-shot asymmetric call.

use crate::error::{CryptoError, Result};
use crate::keys::{KeyPair, PublicKey, SecretKey, SharedKey, SECRET_KEY_SIZE, SHARED_KEY_SIZE};
use crate::nonce::Nonce;
use crypto_secretbox::aead::generic_array::GenericArray;
use crypto_secretbox::aead::{Aead, KeyInit};
use crypto_secretbox::XSalsa20Poly1305;
use rand::rngs::OsRng;
use rand::RngCore;
use salsa20::cipher::consts::U10;
use tracing::error;
use x25519_dalek::StaticSecret;
use zeroize::Zeroize;

/// Pluggable primitive set the core is built on.
///
/// Implementations must be usable from many threads at once; none of the
/// methods take `&mut self`.
pub trait CryptoBackend: Send + Sync {
    /// Fill `dest` from a cryptographically secure source.
    ///
    /// Must fail with [`CryptoError::EntropyUnavailable`] rather than
    /// return weak output.
    fn fill_random(&self, dest: &mut [u8]) -> Result<()>;

    /// Compute the public key belonging to `secret`.
    fn derive_public_key(&self, secret: &SecretKey) -> PublicKey;

    /// Key agreement plus derivation of a symmetric key.
    ///
    /// Fails with [`CryptoError::EncryptionFailed`] when the agreement does
    /// not yield a usable secret.
    fn key_agree(&self, their_public: &PublicKey, my_secret: &SecretKey) -> Result<SharedKey>;

    /// Authenticated encryption. Output is `plaintext.len() + MAC_SIZE` bytes.
    fn seal(&self, key: &SharedKey, nonce: &Nonce, plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Authenticated decryption. Every failure is `AuthenticationFailed`.
    fn open(&self, key: &SharedKey, nonce: &Nonce, ciphertext: &[u8]) -> Result<Vec<u8>>;

    /// Generate a fresh key pair from [`fill_random`](Self::fill_random).
    fn generate_keypair(&self) -> Result<KeyPair> {
        let mut bytes = [0u8; SECRET_KEY_SIZE];
        self.fill_random(&mut bytes)?;
        let secret = SecretKey::from_bytes(bytes);
        bytes.zeroize();

        let public = self.derive_public_key(&secret);
        Ok(KeyPair::from_parts(public, secret))
    }
}

/// NaCl-compatible backend: X25519, HSalsa20, XSalsa20-Poly1305, OS entropy.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaclBackend;

impl CryptoBackend for NaclBackend {
    fn fill_random(&self, dest: &mut [u8]) -> Result<()> {
        OsRng.try_fill_bytes(dest).map_err(|e| {
            error!("OS entropy source unavailable: {}", e);
            CryptoError::EntropyUnavailable
        })
    }

    fn derive_public_key(&self, secret: &SecretKey) -> PublicKey {
        let secret = StaticSecret::from(*secret.as_bytes());
        PublicKey::from_bytes(x25519_dalek::PublicKey::from(&secret).to_bytes())
    }

    fn key_agree(&self, their_public: &PublicKey, my_secret: &SecretKey) -> Result<SharedKey> {
        let secret = StaticSecret::from(*my_secret.as_bytes());
        let public = x25519_dalek::PublicKey::from(*their_public.as_bytes());
        let shared = secret.diffie_hellman(&public);

        // An all-zero result means the peer sent a low-order point.
        if !shared.was_contributory() {
            return Err(CryptoError::EncryptionFailed);
        }

        let zero_nonce = GenericArray::default();
        let mut derived =
            salsa20::hsalsa::<U10>(GenericArray::from_slice(shared.as_bytes()), &zero_nonce);

        let mut key = [0u8; SHARED_KEY_SIZE];
        key.copy_from_slice(&derived);
        derived.as_mut_slice().zeroize();

        let shared_key = SharedKey::from_bytes(key);
        key.zeroize();
        Ok(shared_key)
    }

    fn seal(&self, key: &SharedKey, nonce: &Nonce, plaintext: &[u8]) -> Result<Vec<u8>> {
        let cipher = XSalsa20Poly1305::new(GenericArray::from_slice(key.as_bytes()));
        cipher
            .encrypt(GenericArray::from_slice(nonce.as_bytes()), plaintext)
            .map_err(|_| CryptoError::EncryptionFailed)
    }

    fn open(&self, key: &SharedKey, nonce: &Nonce, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let cipher = XSalsa20Poly1305::new(GenericArray::from_slice(key.as_bytes()));
        cipher
            .decrypt(GenericArray::from_slice(nonce.as_bytes()), ciphertext)
            .map_err(|_| CryptoError::AuthenticationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_agreement_is_symmetric() {
        let backend = NaclBackend;
        let alice = backend.generate_keypair().unwrap();
        let bob = backend.generate_keypair().unwrap();

        let ab = backend.key_agree(bob.public_key(), alice.secret_key()).unwrap();
        let ba = backend.key_agree(alice.public_key(), bob.secret_key()).unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_low_order_public_key_rejected() {
        let backend = NaclBackend;
        let alice = backend.generate_keypair().unwrap();
        let identity_point = PublicKey::from_bytes([0u8; 32]);

        assert_eq!(
            backend.key_agree(&identity_point, alice.secret_key()),
            Err(CryptoError::EncryptionFailed)
        );
    }

    #[test]
    fn test_seal_open() {
        let backend = NaclBackend;
        let key = SharedKey::from_bytes([9u8; 32]);
        let nonce = Nonce::from_bytes([1u8; 24]);

        let sealed = backend.seal(&key, &nonce, b"payload").unwrap();
        assert_eq!(sealed.len(), b"payload".len() + 16);
        assert_eq!(backend.open(&key, &nonce, &sealed).unwrap(), b"payload");
    }

    #[test]
    fn test_fill_random() {
        let backend = NaclBackend;
        let mut a = [0u8; 64];
        let mut b = [0u8; 64];
        backend.fill_random(&mut a).unwrap();
        backend.fill_random(&mut b).unwrap();
        assert_ne!(a, b);
    }
}
