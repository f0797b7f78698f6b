//! Application-level error type for Tox crypto tools.

use thiserror::Error;
use tox_crypto::CryptoError;

/// Result type alias using the tools' error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for binaries built on the crypto core.
#[derive(Debug, Error)]
pub enum Error {
    /// Crypto core rejected the operation
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Hex or other textual encoding error
    #[error("encoding error: {0}")]
    Encoding(String),
}

impl Error {
    /// Create an encoding error from any displayable type.
    pub fn encoding(msg: impl std::fmt::Display) -> Self {
        Self::Encoding(msg.to_string())
    }
}

/// Decode a hex argument, naming it in the error.
pub fn decode_hex(what: &str, value: &str) -> Result<Vec<u8>> {
    hex::decode(value.trim()).map_err(|e| Error::encoding(format!("{}: {}", what, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crypto_error_converts() {
        let err: Error = CryptoError::AuthenticationFailed.into();
        assert!(matches!(err, Error::Crypto(CryptoError::AuthenticationFailed)));
        assert_eq!(err.to_string(), "crypto error: authentication failed");
    }

    #[test]
    fn test_decode_hex_names_argument() {
        assert_eq!(decode_hex("packet", "0aFF").unwrap(), vec![0x0a, 0xff]);

        let err = decode_hex("packet", "zz").unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
        assert!(err.to_string().contains("packet"));
    }
}
