//! 24-byte nonces and the rules for producing them.
//!
//! A (key, nonce) pair must never encrypt two different plaintexts. Two
//! strategies keep that true:
//!
//! - **Random**: [`random_nonce`] / [`new_nonce`] draw 24 bytes from the
//!   backend CSPRNG. Collisions are bounded by the birthday bound over
//!   2^192 values; nothing records previously issued nonces.
//! - **Counter**: [`increment_nonce`] / [`increment_nonce_by`] treat the
//!   nonce as a big-endian integer and add with carry, wrapping silently
//!   at the top. Once a session has an initial nonce, every following
//!   message gets the next counter value.
//!
//! Nonce sequencing per key is the caller's job (usually a per-connection
//! session object); nothing here holds mutable state.

use crate::backend::{CryptoBackend, NaclBackend};
use crate::error::Result;
use crate::keys::{fixed_bytes, fixed_from_hex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Nonce size (`crypto_box_NONCEBYTES`).
pub const NONCE_SIZE: usize = 24;

/// A 24-byte nonce.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Nonce([u8; NONCE_SIZE]);

impl Nonce {
    /// All-zero nonce, the usual counter origin in tests.
    pub const ZERO: Nonce = Nonce([0u8; NONCE_SIZE]);

    pub const fn from_bytes(bytes: [u8; NONCE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Parse from an untrusted slice.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        fixed_bytes(bytes).map(Self)
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        fixed_from_hex(s).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }

    /// Fresh nonce from `backend`'s CSPRNG.
    pub fn random_with<B: CryptoBackend + ?Sized>(backend: &B) -> Result<Self> {
        let mut bytes = [0u8; NONCE_SIZE];
        backend.fill_random(&mut bytes)?;
        Ok(Self(bytes))
    }

    /// Add one in place.
    pub fn increment(&mut self) {
        for byte in self.0.iter_mut().rev() {
            let (sum, carry) = byte.overflowing_add(1);
            *byte = sum;
            if !carry {
                return;
            }
        }
    }

    /// Add `num` in place.
    ///
    /// Lets a receiver jump straight to the nonce of the k-th packet
    /// without stepping through the ones in between.
    pub fn increment_by(&mut self, num: u64) {
        let addend = num.to_be_bytes();
        let offset = NONCE_SIZE - addend.len();
        let mut carry = 0u16;

        for i in (0..NONCE_SIZE).rev() {
            let add = if i >= offset { addend[i - offset] } else { 0 };
            if add == 0 && carry == 0 && i < offset {
                break;
            }
            let sum = u16::from(self.0[i]) + u16::from(add) + carry;
            self.0[i] = sum as u8;
            carry = sum >> 8;
        }
    }

    /// Copy of this nonce plus one.
    pub fn incremented(&self) -> Self {
        let mut next = *self;
        next.increment();
        next
    }

    /// Copy of this nonce plus `num`.
    pub fn incremented_by(&self, num: u64) -> Self {
        let mut next = *self;
        next.increment_by(num);
        next
    }
}

impl From<[u8; NONCE_SIZE]> for Nonce {
    fn from(bytes: [u8; NONCE_SIZE]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Nonce {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Nonce {
    type Err = crate::error::CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nonce({})", self.to_hex())
    }
}

/// Fill a nonce with random bytes.
pub fn random_nonce() -> Result<Nonce> {
    Nonce::random_with(&NaclBackend)
}

/// A nonce distinct from every one previously issued, with overwhelming
/// probability. Backed by the CSPRNG, not by a history table.
pub fn new_nonce() -> Result<Nonce> {
    Nonce::random_with(&NaclBackend)
}

/// `nonce + 1`, big-endian, wrapping.
pub fn increment_nonce(nonce: &Nonce) -> Nonce {
    nonce.incremented()
}

/// `nonce + num`, big-endian, wrapping.
pub fn increment_nonce_by(nonce: &Nonce, num: u64) -> Nonce {
    nonce.incremented_by(num)
}
