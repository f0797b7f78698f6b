//! Crypto request packets.
//!
//! A request is how two peers with no shared session state reach each
//! other: it carries the sender's identity, a purpose byte and an
//! encrypted payload in one self-contained datagram.
//!
//! # Wire Format
//!
//! ```text
//! [1 byte: packet type] [32 bytes: sender public key] [24 bytes: nonce] [ciphertext]
//!
//! ciphertext = box(recv_public_key, send_secret_key, nonce, [1 byte: request id] [data])
//! ```
//!
//! The packet type is set by the surrounding transport to tell this framing
//! apart from its other messages. The request id is the purpose (friend
//! request, NAT ping, ...) and is routed through untouched; the codec does
//! not interpret it. The whole packet never exceeds
//! [`MAX_CRYPTO_REQUEST_SIZE`].

use crate::backend::{CryptoBackend, NaclBackend};
use crate::cipher::MAC_SIZE;
use crate::engine::CryptoCore;
use crate::error::{CryptoError, Result};
use crate::keys::{PublicKey, SecretKey, PUBLIC_KEY_SIZE};
use crate::nonce::{Nonce, NONCE_SIZE};
use crate::MAX_CRYPTO_REQUEST_SIZE;
use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, trace};

/// Default packet type byte for crypto requests.
pub const NET_PACKET_CRYPTO: u8 = 32;

/// Type byte, sender key and nonce.
pub const REQUEST_HEADER_SIZE: usize = 1 + PUBLIC_KEY_SIZE + NONCE_SIZE;

/// Smallest parseable packet: header plus the MAC of an empty plaintext.
pub const MIN_REQUEST_PACKET_SIZE: usize = REQUEST_HEADER_SIZE + MAC_SIZE;

/// Largest `data` that still fits a packet of `MAX_CRYPTO_REQUEST_SIZE`.
///
/// 1024 minus the 57-byte header, the 1-byte request id and the 16-byte
/// MAC: 950 bytes.
pub const MAX_REQUEST_DATA_SIZE: usize = MAX_CRYPTO_REQUEST_SIZE - MIN_REQUEST_PACKET_SIZE - 1;

/// Well-known request ids (the purpose byte inside the ciphertext).
///
/// Some values are reused by different subsystems; the codec does not care.
pub mod request_id {
    pub const FRIEND_REQ: u8 = 32;
    pub const HARDENING: u8 = 48;
    pub const NAT_PING: u8 = 254;
    pub const GROUP_CHAT_GET_NODES: u8 = 48;
    pub const GROUP_CHAT_SEND_NODES: u8 = 49;
    pub const GROUP_CHAT_BROADCAST: u8 = 50;
}

/// A request packet split into its fixed-width fields.
///
/// Parsing and encoding are purely structural; nothing here is decrypted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPacket {
    pub packet_type: u8,
    pub sender_public_key: PublicKey,
    pub nonce: Nonce,
    pub ciphertext: Bytes,
}

impl RequestPacket {
    pub fn encoded_len(&self) -> usize {
        REQUEST_HEADER_SIZE + self.ciphertext.len()
    }

    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        buf.put_u8(self.packet_type);
        buf.put_slice(self.sender_public_key.as_bytes());
        buf.put_slice(self.nonce.as_bytes());
        buf.put_slice(&self.ciphertext);
        buf.freeze()
    }

    /// Split an untrusted datagram into fields.
    ///
    /// Rejects anything shorter than [`MIN_REQUEST_PACKET_SIZE`] or longer
    /// than [`MAX_CRYPTO_REQUEST_SIZE`].
    pub fn decode(packet: &[u8]) -> Result<Self> {
        if packet.len() < MIN_REQUEST_PACKET_SIZE {
            return Err(CryptoError::TooShort {
                actual: packet.len(),
                minimum: MIN_REQUEST_PACKET_SIZE,
            });
        }
        if packet.len() > MAX_CRYPTO_REQUEST_SIZE {
            return Err(CryptoError::PayloadTooLarge {
                actual: packet.len(),
                maximum: MAX_CRYPTO_REQUEST_SIZE,
            });
        }

        let key_end = 1 + PUBLIC_KEY_SIZE;
        let sender_public_key = PublicKey::from_slice(&packet[1..key_end])?;
        let nonce = Nonce::from_slice(&packet[key_end..REQUEST_HEADER_SIZE])?;

        Ok(Self {
            packet_type: packet[0],
            sender_public_key,
            nonce,
            ciphertext: Bytes::copy_from_slice(&packet[REQUEST_HEADER_SIZE..]),
        })
    }
}

/// A request that decrypted and parsed cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandledRequest {
    pub sender_public_key: PublicKey,
    pub request_id: u8,
    pub data: Vec<u8>,
}

/// Builds and opens request packets for one packet type.
#[derive(Debug, Clone)]
pub struct RequestCodec<B = NaclBackend> {
    packet_type: u8,
    core: CryptoCore<B>,
}

impl Default for RequestCodec<NaclBackend> {
    fn default() -> Self {
        Self::new(NET_PACKET_CRYPTO)
    }
}

impl RequestCodec<NaclBackend> {
    pub fn new(packet_type: u8) -> Self {
        Self::with_core(packet_type, CryptoCore::nacl())
    }
}

impl<B: CryptoBackend> RequestCodec<B> {
    pub fn with_core(packet_type: u8, core: CryptoCore<B>) -> Self {
        Self { packet_type, core }
    }

    pub fn packet_type(&self) -> u8 {
        self.packet_type
    }

    pub fn core(&self) -> &CryptoCore<B> {
        &self.core
    }

    /// Build a request from the sender's key pair to `recv_public_key`.
    ///
    /// Uses a fresh random nonce every time.
    pub fn create_request(
        &self,
        send_public_key: &PublicKey,
        send_secret_key: &SecretKey,
        recv_public_key: &PublicKey,
        request_id: u8,
        data: &[u8],
    ) -> Result<RequestPacket> {
        if data.len() > MAX_REQUEST_DATA_SIZE {
            return Err(CryptoError::PayloadTooLarge {
                actual: data.len(),
                maximum: MAX_REQUEST_DATA_SIZE,
            });
        }

        debug_assert_eq!(
            self.core.backend().derive_public_key(send_secret_key),
            *send_public_key,
            "sender key pair mismatch"
        );

        let nonce = self.core.new_nonce()?;

        let mut plain = Vec::with_capacity(1 + data.len());
        plain.push(request_id);
        plain.extend_from_slice(data);

        let ciphertext = self
            .core
            .encrypt(recv_public_key, send_secret_key, &nonce, &plain)
            .map_err(|_| CryptoError::EncryptionFailed)?;

        let packet = RequestPacket {
            packet_type: self.packet_type,
            sender_public_key: *send_public_key,
            nonce,
            ciphertext: Bytes::from(ciphertext),
        };
        trace!(
            request_id,
            data_len = data.len(),
            packet_len = packet.encoded_len(),
            "created crypto request"
        );

        Ok(packet)
    }

    /// Open a request addressed to `self_secret_key`.
    ///
    /// Errors here come from untrusted input: drop the packet and move on.
    pub fn handle_request(
        &self,
        self_public_key: &PublicKey,
        self_secret_key: &SecretKey,
        packet: &[u8],
    ) -> Result<HandledRequest> {
        let parsed = RequestPacket::decode(packet).map_err(|e| {
            debug!(len = packet.len(), "dropping crypto request: {}", e);
            e
        })?;

        debug_assert_eq!(
            self.core.backend().derive_public_key(self_secret_key),
            *self_public_key,
            "self key pair mismatch"
        );

        let mut plain = self
            .core
            .decrypt(
                &parsed.sender_public_key,
                self_secret_key,
                &parsed.nonce,
                &parsed.ciphertext,
            )
            .map_err(|e| {
                debug!(len = packet.len(), "dropping crypto request: {}", e);
                e
            })?;

        if plain.is_empty() {
            debug!(len = packet.len(), "dropping crypto request: missing request id");
            return Err(CryptoError::MalformedPayload);
        }

        let request_id = plain[0];
        let data = plain.split_off(1);
        trace!(request_id, data_len = data.len(), "handled crypto request");

        Ok(HandledRequest {
            sender_public_key: parsed.sender_public_key,
            request_id,
            data,
        })
    }
}

/// [`RequestCodec::create_request`] with packet type [`NET_PACKET_CRYPTO`].
pub fn create_request(
    send_public_key: &PublicKey,
    send_secret_key: &SecretKey,
    recv_public_key: &PublicKey,
    request_id: u8,
    data: &[u8],
) -> Result<RequestPacket> {
    RequestCodec::default().create_request(
        send_public_key,
        send_secret_key,
        recv_public_key,
        request_id,
        data,
    )
}

/// [`RequestCodec::handle_request`] with the default codec.
pub fn handle_request(
    self_public_key: &PublicKey,
    self_secret_key: &SecretKey,
    packet: &[u8],
) -> Result<HandledRequest> {
    RequestCodec::default().handle_request(self_public_key, self_secret_key, packet)
}
