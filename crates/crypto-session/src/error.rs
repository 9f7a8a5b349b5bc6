//! Crypto session error types

use shared_protocol::ProtocolError;
use thiserror::Error;

/// Cryptographic operation error
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The OS random source failed. Never fall back to a weaker generator.
    #[error("Secure random source unavailable: {0}")]
    Entropy(String),

    /// Peer public key has the wrong length or is a low-order point
    #[error("Invalid peer public key")]
    InvalidPeerKey,

    #[error("Invalid public key encoding: {0}")]
    InvalidPublicKey(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Tag did not verify. Deliberately carries no detail.
    #[error("Authentication failed")]
    AuthenticationFailure,

    /// Authenticated plaintext does not match the expected payload schema
    #[error("Malformed payload: {0}")]
    MalformedPayload(#[source] ProtocolError),

    #[error("Payload too large: {size} bytes (max: {max})")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Nonce overflow: maximum message count exceeded")]
    NonceOverflow,
}

pub type CryptoResult<T> = Result<T, CryptoError>;
