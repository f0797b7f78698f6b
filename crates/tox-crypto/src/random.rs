//! Random numbers from the backend CSPRNG.
//!
//! Every call either returns full-entropy output or
//! [`CryptoError::EntropyUnavailable`](crate::CryptoError::EntropyUnavailable).
//! There is no fallback generator.

use crate::backend::CryptoBackend;
use crate::engine::CryptoCore;
use crate::error::Result;

impl<B: CryptoBackend> CryptoCore<B> {
    /// Random 32-bit integer.
    pub fn random_int(&self) -> Result<u32> {
        let mut bytes = [0u8; 4];
        self.backend().fill_random(&mut bytes)?;
        Ok(u32::from_ne_bytes(bytes))
    }

    /// Random 64-bit integer.
    pub fn random_64b(&self) -> Result<u64> {
        let mut bytes = [0u8; 8];
        self.backend().fill_random(&mut bytes)?;
        Ok(u64::from_ne_bytes(bytes))
    }

    /// Fill `dest` with random bytes.
    pub fn random_bytes(&self, dest: &mut [u8]) -> Result<()> {
        self.backend().fill_random(dest)
    }
}

/// Random 32-bit integer from the OS CSPRNG.
pub fn random_int() -> Result<u32> {
    CryptoCore::nacl().random_int()
}

/// Random 64-bit integer from the OS CSPRNG.
pub fn random_64b() -> Result<u64> {
    CryptoCore::nacl().random_64b()
}

/// Fill `dest` from the OS CSPRNG.
pub fn random_bytes(dest: &mut [u8]) -> Result<()> {
    CryptoCore::nacl().random_bytes(dest)
}
