//! Key arguments as they arrive from the command line or environment.

use crate::error::{Error, Result};
use tox_crypto::{KeyPair, PublicKey, SecretKey};

/// Rebuild a key pair from a hex secret key.
pub fn load_keypair(secret_hex: &str) -> Result<KeyPair> {
    let secret = SecretKey::from_hex(secret_hex)?;
    Ok(KeyPair::from_secret_key(secret))
}

/// Parse a hex public key, naming the argument on failure.
pub fn parse_public_key(what: &str, value: &str) -> Result<PublicKey> {
    PublicKey::from_hex(value).map_err(|e| Error::encoding(format!("{}: {}", what, e)))
}
