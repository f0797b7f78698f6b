//! Fixed-width key types.
//!
//! Keys are newtypes over byte arrays so a buffer can never be shorter
//! than the primitive expects. Secret material ([`SecretKey`], [`SharedKey`])
//! is zeroized on drop, compared in constant time and never printed.
//!
//! # Example
//!
//! ```
//! use tox_crypto::KeyPair;
//!
//! let alice = KeyPair::generate().unwrap();
//! let restored = KeyPair::from_secret_key(alice.secret_key().clone());
//! assert_eq!(restored.public_key(), alice.public_key());
//! ```

use crate::backend::{CryptoBackend, NaclBackend};
use crate::compare::crypto_cmp;
use crate::error::{CryptoError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// X25519 public key size.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// X25519 secret key size.
pub const SECRET_KEY_SIZE: usize = 32;

/// Precomputed shared key size (`crypto_box_BEFORENMBYTES`).
pub const SHARED_KEY_SIZE: usize = 32;

/// Copy a slice into a fixed-size array, rejecting any other width.
pub(crate) fn fixed_bytes<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    bytes.try_into().map_err(|_| CryptoError::InvalidLength {
        expected: N,
        actual: bytes.len(),
    })
}

/// Decode hex (either case) into a fixed-size array.
pub(crate) fn fixed_from_hex<const N: usize>(s: &str) -> Result<[u8; N]> {
    let bytes = hex::decode(s.trim()).map_err(|_| CryptoError::InvalidEncoding)?;
    fixed_bytes(&bytes)
}

/// Public half of an identity. Safe to publish and to log.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey([u8; PUBLIC_KEY_SIZE]);

impl PublicKey {
    pub const fn from_bytes(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Parse from an untrusted slice.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        fixed_bytes(bytes).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.0
    }

    /// Uppercase hex, the form Tox uses for IDs.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        fixed_from_hex(s).map(Self)
    }
}

impl From<[u8; PUBLIC_KEY_SIZE]> for PublicKey {
    fn from(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for PublicKey {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

/// X25519 secret key.
///
/// # Security
/// Never log, serialize or copy these bytes into untrusted memory.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; SECRET_KEY_SIZE]);

impl SecretKey {
    pub fn from_bytes(bytes: [u8; SECRET_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        fixed_bytes(bytes).map(Self)
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        fixed_from_hex(s).map(Self)
    }

    /// Raw secret bytes.
    ///
    /// # Security
    /// Handle with care! These bytes recreate the identity.
    pub fn as_bytes(&self) -> &[u8; SECRET_KEY_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        crypto_cmp(&self.0, &other.0)
    }
}

impl Eq for SecretKey {}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// Symmetric key for the secretbox path.
///
/// Either the result of precomputing a key agreement with one peer, or 32
/// fresh random bytes for session-local use. Immutable once built, so a
/// cached value can be shared read-only across threads. Regenerate it if
/// either party's key pair changes.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedKey([u8; SHARED_KEY_SIZE]);

/// A shared key that did not come from key agreement.
pub type SymmetricKey = SharedKey;

impl SharedKey {
    pub fn from_bytes(bytes: [u8; SHARED_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        fixed_bytes(bytes).map(Self)
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        fixed_from_hex(s).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; SHARED_KEY_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl PartialEq for SharedKey {
    fn eq(&self, other: &Self) -> bool {
        crypto_cmp(&self.0, &other.0)
    }
}

impl Eq for SharedKey {}

impl fmt::Debug for SharedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedKey(<redacted>)")
    }
}

/// An identity: public key plus the secret key it was derived from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPair {
    public_key: PublicKey,
    secret_key: SecretKey,
}

impl KeyPair {
    /// Generate a new random key pair using the OS CSPRNG.
    pub fn generate() -> Result<Self> {
        NaclBackend.generate_keypair()
    }

    /// Rebuild a key pair from a stored secret key.
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let public_key = NaclBackend.derive_public_key(&secret_key);
        Self::from_parts(public_key, secret_key)
    }

    /// Pair up keys the caller already knows belong together.
    pub fn from_parts(public_key: PublicKey, secret_key: SecretKey) -> Self {
        Self {
            public_key,
            secret_key,
        }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }
}
