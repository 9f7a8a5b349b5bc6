//! Encrypted envelope and its wire format

use bincode::Options;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::{
    DEFAULT_MAX_PAYLOAD_SIZE, PROTOCOL_VERSION, ProtocolError, ProtocolResult, SCHEMA_ID_SIZE,
};

/// AEAD nonce size (96 bits / 12 bytes)
pub const NONCE_SIZE: usize = 12;

/// Authentication tag size (128 bits / 16 bytes)
pub const TAG_SIZE: usize = 16;

/// Fixed wire overhead: version, nonce, tag and the ciphertext length prefix
pub const ENVELOPE_OVERHEAD: usize = 4 + NONCE_SIZE + TAG_SIZE + 8;

/// Largest wire envelope accepted by [`EncryptedEnvelope::from_bytes`]
pub const MAX_ENVELOPE_SIZE: usize = DEFAULT_MAX_PAYLOAD_SIZE + SCHEMA_ID_SIZE + ENVELOPE_OVERHEAD;

/// Ciphertext with the metadata needed to verify and decrypt it.
///
/// Produced once per encryption and consumed by a single decryption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedEnvelope {
    /// Nonce the payload was sealed under
    pub nonce: [u8; NONCE_SIZE],
    /// Detached authentication tag
    pub tag: [u8; TAG_SIZE],
    /// Encrypted payload, same length as the encoded plaintext
    pub ciphertext: Vec<u8>,
}

impl EncryptedEnvelope {
    pub fn new(ciphertext: Vec<u8>, nonce: [u8; NONCE_SIZE], tag: [u8; TAG_SIZE]) -> Self {
        Self {
            nonce,
            tag,
            ciphertext,
        }
    }

    /// Serialize to bytes for transmission
    ///
    /// Layout: `[version: u32][nonce: 12][tag: 16][len: u64][ciphertext]`
    pub fn to_bytes(&self) -> ProtocolResult<Bytes> {
        let encoded = wire_options().serialize(&(PROTOCOL_VERSION, self))?;
        Ok(Bytes::from(encoded))
    }

    /// Deserialize from received bytes
    pub fn from_bytes(data: &[u8]) -> ProtocolResult<Self> {
        if data.len() > MAX_ENVELOPE_SIZE {
            return Err(ProtocolError::PacketTooLarge {
                size: data.len(),
                max: MAX_ENVELOPE_SIZE,
            });
        }

        let (version, envelope): (u32, Self) = wire_options()
            .with_limit(MAX_ENVELOPE_SIZE as u64)
            .deserialize(data)?;

        if version != PROTOCOL_VERSION {
            return Err(ProtocolError::VersionMismatch {
                expected: PROTOCOL_VERSION,
                actual: version,
            });
        }

        Ok(envelope)
    }

    /// Total size of the wire encoding
    pub fn wire_len(&self) -> usize {
        ENVELOPE_OVERHEAD + self.ciphertext.len()
    }
}

fn wire_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .reject_trailing_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EncryptedEnvelope {
        EncryptedEnvelope::new(vec![0xAB; 40], [7u8; NONCE_SIZE], [9u8; TAG_SIZE])
    }

    #[test]
    fn test_wire_layout() {
        let envelope = sample();
        let bytes = envelope.to_bytes().unwrap();

        assert_eq!(bytes.len(), envelope.wire_len());
        assert_eq!(&bytes[..4], &PROTOCOL_VERSION.to_le_bytes());
        assert_eq!(&bytes[4..16], &envelope.nonce);
        assert_eq!(&bytes[16..32], &envelope.tag);
        assert_eq!(EncryptedEnvelope::from_bytes(&bytes).unwrap(), envelope);
    }

    #[test]
    fn test_version_mismatch() {
        let mut bytes = sample().to_bytes().unwrap().to_vec();
        bytes[..4].copy_from_slice(&99u32.to_le_bytes());

        assert!(matches!(
            EncryptedEnvelope::from_bytes(&bytes),
            Err(ProtocolError::VersionMismatch { actual: 99, .. })
        ));
    }

    #[test]
    fn test_truncated_and_trailing_input() {
        let bytes = sample().to_bytes().unwrap();

        assert!(EncryptedEnvelope::from_bytes(&bytes[..bytes.len() - 1]).is_err());

        let mut padded = bytes.to_vec();
        padded.push(0);
        assert!(EncryptedEnvelope::from_bytes(&padded).is_err());
    }
}
