//! Authenticated encryption of typed payloads
//!
//! Payloads are encoded through the schema-framed codec in `shared-protocol`
//! and sealed with a detached tag. On the way back the tag is verified
//! before a single byte of plaintext is interpreted.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use shared_protocol::{
    EncryptedEnvelope, Payload, ProtocolError, SCHEMA_ID_SIZE, decode_payload, encode_payload,
};
use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::cipher::AeadCipher;
use crate::{
    CodecConfig, CounterNonces, CryptoError, CryptoResult, NonceSource, NonceStrategy,
    RandomNonces, SharedSecret,
};

/// Encrypt a payload under `key` with the default codec settings
pub fn encrypt<T: Payload>(
    payload: &T,
    key: &SharedSecret,
    associated_data: &[u8],
) -> CryptoResult<EncryptedEnvelope> {
    AuthenticatedCodec::new(key, CodecConfig::default())?.encrypt(payload, associated_data)
}

/// Verify and decrypt an envelope produced by [`encrypt`]
pub fn decrypt<T: Payload>(
    envelope: &EncryptedEnvelope,
    key: &SharedSecret,
    associated_data: &[u8],
) -> CryptoResult<T> {
    AuthenticatedCodec::new(key, CodecConfig::default())?.decrypt(envelope, associated_data)
}

/// Codec bound to one shared secret.
///
/// Shareable across threads; concurrent `encrypt` calls draw distinct nonces
/// from the codec's nonce source.
pub struct AuthenticatedCodec {
    cipher: AeadCipher,
    nonces: Box<dyn NonceSource>,
    config: CodecConfig,
    sealed: AtomicU64,
    opened: AtomicU64,
}

impl AuthenticatedCodec {
    /// Create a codec using the nonce strategy from `config`
    pub fn new(key: &SharedSecret, config: CodecConfig) -> CryptoResult<Self> {
        let nonces: Box<dyn NonceSource> = match config.nonce_strategy {
            NonceStrategy::Random => Box::new(RandomNonces),
            NonceStrategy::Counter(direction) => Box::new(CounterNonces::new(direction)),
        };
        Self::with_nonce_source(key, config, nonces)
    }

    /// Create a codec with a caller-supplied nonce source.
    ///
    /// `config.nonce_strategy` is ignored.
    pub fn with_nonce_source(
        key: &SharedSecret,
        config: CodecConfig,
        nonces: Box<dyn NonceSource>,
    ) -> CryptoResult<Self> {
        Ok(Self {
            cipher: AeadCipher::new(config.cipher_suite, key)?,
            nonces,
            config,
            sealed: AtomicU64::new(0),
            opened: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode and seal a payload
    pub fn encrypt<T: Payload>(
        &self,
        payload: &T,
        associated_data: &[u8],
    ) -> CryptoResult<EncryptedEnvelope> {
        let mut buffer = Zeroizing::new(
            encode_payload(payload, self.config.max_payload_size).map_err(|e| match e {
                ProtocolError::PacketTooLarge { size, max } => {
                    CryptoError::PayloadTooLarge { size, max }
                }
                other => CryptoError::Encryption(other.to_string()),
            })?,
        );

        let nonce = self.nonces.next_nonce()?;
        let tag = self.cipher.seal(&nonce, associated_data, &mut buffer[..])?;

        self.sealed.fetch_add(1, Ordering::Relaxed);
        trace!(
            len = buffer.len(),
            schema_id = T::SCHEMA_ID,
            "Sealed payload"
        );

        Ok(EncryptedEnvelope::new(
            std::mem::take(&mut *buffer),
            nonce,
            tag,
        ))
    }

    /// Verify and decode an envelope.
    ///
    /// Every verification failure is reported as
    /// [`CryptoError::AuthenticationFailure`], whatever was altered.
    /// Plaintext is only decoded after the tag verifies, and a schema or
    /// format problem at that point is [`CryptoError::MalformedPayload`].
    ///
    /// A ciphertext longer than the configured `max_payload_size` (plus the
    /// schema id) is refused with [`CryptoError::PayloadTooLarge`] before
    /// the tag is checked.
    pub fn decrypt<T: Payload>(
        &self,
        envelope: &EncryptedEnvelope,
        associated_data: &[u8],
    ) -> CryptoResult<T> {
        let max = self.config.max_payload_size + SCHEMA_ID_SIZE;
        if envelope.ciphertext.len() > max {
            return Err(CryptoError::PayloadTooLarge {
                size: envelope.ciphertext.len(),
                max,
            });
        }

        let mut buffer = Zeroizing::new(envelope.ciphertext.clone());
        self.cipher
            .open(
                &envelope.nonce,
                associated_data,
                &mut buffer[..],
                &envelope.tag,
            )
            .inspect_err(|_| debug!("Envelope failed authentication"))?;

        self.opened.fetch_add(1, Ordering::Relaxed);
        trace!(
            len = buffer.len(),
            schema_id = T::SCHEMA_ID,
            "Opened envelope"
        );

        decode_payload(&buffer, self.config.max_payload_size)
            .map_err(CryptoError::MalformedPayload)
    }

    /// Get the number of envelopes sealed (for debugging/stats)
    pub fn sealed_count(&self) -> u64 {
        self.sealed.load(Ordering::Relaxed)
    }

    /// Get the number of envelopes successfully opened (for debugging/stats)
    pub fn opened_count(&self) -> u64 {
        self.opened.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for AuthenticatedCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedCodec")
            .field("config", &self.config)
            .field("sealed", &self.sealed_count())
            .field("opened", &self.opened_count())
            .finish_non_exhaustive()
    }
}
