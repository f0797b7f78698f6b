//! The crypto core bound to a backend.
//!
//! [`CryptoCore`] is stateless apart from the backend it wraps, so one
//! value can be shared across threads and every method called
//! concurrently. The free functions at the crate root use
//! `CryptoCore<NaclBackend>`.

use crate::backend::{CryptoBackend, NaclBackend};
use crate::error::Result;
use crate::nonce::Nonce;

/// Every operation of the crypto core, routed through one backend.
///
/// Random-source, cipher and request operations are implemented in their
/// own modules as further `impl` blocks on this type.
#[derive(Debug, Clone, Default)]
pub struct CryptoCore<B = NaclBackend> {
    backend: B,
}

impl CryptoCore<NaclBackend> {
    /// Core backed by NaCl-compatible primitives and OS entropy.
    pub const fn nacl() -> Self {
        Self {
            backend: NaclBackend,
        }
    }
}

impl<B: CryptoBackend> CryptoCore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Fill a nonce with random bytes.
    pub fn random_nonce(&self) -> Result<Nonce> {
        Nonce::random_with(&self.backend)
    }

    /// A nonce distinct from all previously issued ones with overwhelming
    /// probability. There is no dedup table behind this.
    pub fn new_nonce(&self) -> Result<Nonce> {
        Nonce::random_with(&self.backend)
    }
}
