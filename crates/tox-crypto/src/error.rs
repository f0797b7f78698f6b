//! Error types for the crypto core.

use thiserror::Error;

/// Errors produced by crypto and request-framing operations.
///
/// Decryption failures of any kind surface as [`CryptoError::AuthenticationFailed`]
/// and nothing else: a wrong key, a wrong nonce and a tampered ciphertext
/// must look the same to whoever sent the packet.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CryptoError {
    /// Input is below the minimum structural size. Rejected before any crypto.
    #[error("input too short: {actual} bytes, minimum {minimum}")]
    TooShort { actual: usize, minimum: usize },

    /// Input exceeds `MAX_CRYPTO_REQUEST_SIZE`. Rejected before any crypto.
    #[error("payload too large: {actual} bytes, maximum {maximum}")]
    PayloadTooLarge { actual: usize, maximum: usize },

    #[error("authentication failed")]
    AuthenticationFailed,

    /// Decrypted successfully but the plaintext is structurally invalid.
    #[error("malformed payload")]
    MalformedPayload,

    /// The primitive reported an internal fault (e.g. a low-order public key).
    #[error("encryption failed")]
    EncryptionFailed,

    /// The OS CSPRNG could not be read. Never degrade to weaker randomness.
    #[error("entropy source unavailable")]
    EntropyUnavailable,

    /// A byte slice did not match the width of a fixed-size type.
    #[error("invalid length: {actual} bytes, expected {expected}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid hex encoding")]
    InvalidEncoding,
}

/// Result alias for crypto-core operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
