//! Key exchange and codec configuration
//!
//! Both parties must agree on every field here; nothing is negotiated.

use serde::{Deserialize, Serialize};
use shared_protocol::DEFAULT_MAX_PAYLOAD_SIZE;

use crate::Direction;

/// Default HKDF salt
pub const DEFAULT_KDF_SALT: &[u8] = b"entangle-crypto-session/kdf-salt/v1";

/// Default HKDF context label
pub const DEFAULT_KDF_CONTEXT: &str = "entangle-crypto-session/x25519-hkdf-sha256/v1";

/// Key derivation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyExchangeConfig {
    /// HKDF-Extract salt
    pub kdf_salt: Vec<u8>,
    /// Domain separation label fed into HKDF-Expand ahead of both public keys
    pub kdf_context: String,
}

impl Default for KeyExchangeConfig {
    fn default() -> Self {
        Self {
            kdf_salt: DEFAULT_KDF_SALT.to_vec(),
            kdf_context: DEFAULT_KDF_CONTEXT.to_string(),
        }
    }
}

/// AEAD algorithm
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CipherSuite {
    #[default]
    ChaCha20Poly1305,
    Aes256Gcm,
}

/// How nonces are issued for outgoing envelopes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NonceStrategy {
    /// 96 bits from the OS random source per envelope
    #[default]
    Random,
    /// Direction prefix plus a per-key monotonic counter
    Counter(Direction),
}

/// Authenticated codec settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub cipher_suite: CipherSuite,
    pub nonce_strategy: NonceStrategy,
    /// Maximum encoded payload body in bytes
    pub max_payload_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            cipher_suite: CipherSuite::ChaCha20Poly1305,
            nonce_strategy: NonceStrategy::Random,
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: CodecConfig =
            serde_json::from_str(r#"{ "cipher_suite": "Aes256Gcm" }"#).unwrap();
        assert_eq!(config.cipher_suite, CipherSuite::Aes256Gcm);
        assert_eq!(config.nonce_strategy, NonceStrategy::Random);
        assert_eq!(config.max_payload_size, DEFAULT_MAX_PAYLOAD_SIZE);

        let config: KeyExchangeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, KeyExchangeConfig::default());
    }

    #[test]
    fn test_counter_strategy_from_json() {
        let config: CodecConfig =
            serde_json::from_str(r#"{ "nonce_strategy": { "Counter": "Responder" } }"#).unwrap();
        assert_eq!(
            config.nonce_strategy,
            NonceStrategy::Counter(Direction::Responder)
        );
    }
}
