//! X25519 key agreement with HKDF-SHA256 key derivation

use hkdf::Hkdf;
use sha2::Sha256;
use tracing::debug;
use zeroize::Zeroizing;

use crate::{
    AuthenticatedCodec, CipherSuite, CodecConfig, CryptoError, CryptoResult, Direction,
    KeyExchangeConfig, KeyPair, NonceStrategy, PrivateKey, PublicKey, SHARED_SECRET_SIZE,
    SharedSecret,
};

/// Generate a fresh key pair from the OS random source
pub fn generate_keypair() -> CryptoResult<KeyPair> {
    KeyPair::generate()
}

/// Derive the shared secret with the default KDF settings
pub fn derive_shared_secret(
    peer_public: &[u8],
    own_private: &PrivateKey,
) -> CryptoResult<SharedSecret> {
    derive_shared_secret_with(&KeyExchangeConfig::default(), peer_public, own_private)
}

/// Derive the shared secret from our private key and the peer's public bytes.
///
/// The raw X25519 output is never used as a key. It goes through
/// HKDF-SHA256 with `info = kdf_context || lower public key || higher public key`,
/// so both sides feed identical input regardless of role.
///
/// Fails with [`CryptoError::InvalidPeerKey`] when `peer_public` is not 32
/// bytes or is a low-order point (including the identity), which would force
/// an all-zero exchange output.
pub fn derive_shared_secret_with(
    config: &KeyExchangeConfig,
    peer_public: &[u8],
    own_private: &PrivateKey,
) -> CryptoResult<SharedSecret> {
    let peer = PublicKey::from_slice(peer_public).inspect_err(|_| {
        debug!(
            len = peer_public.len(),
            "Rejected peer public key with wrong length"
        )
    })?;

    let raw = own_private.diffie_hellman(&peer);
    if !raw.was_contributory() {
        debug!(peer = %peer, "Rejected low-order peer public key");
        return Err(CryptoError::InvalidPeerKey);
    }

    let own_public = own_private.public_key();
    let (lower, higher) = if own_public.as_bytes() <= peer.as_bytes() {
        (own_public, peer)
    } else {
        (peer, own_public)
    };

    let hkdf = Hkdf::<Sha256>::new(Some(config.kdf_salt.as_slice()), raw.as_bytes());
    let mut okm = Zeroizing::new([0u8; SHARED_SECRET_SIZE]);
    hkdf.expand_multi_info(
        &[
            config.kdf_context.as_bytes(),
            lower.as_bytes(),
            higher.as_bytes(),
        ],
        &mut okm[..],
    )
    .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;

    debug!(peer = %peer, "Derived shared secret");
    Ok(SharedSecret::from_bytes(*okm))
}

/// One side of a key exchange.
///
/// Holds an ephemeral key pair until the peer's public key arrives;
/// completing the handshake consumes it so the private key is dropped right
/// after derivation.
#[derive(Debug)]
pub struct Handshake {
    keypair: KeyPair,
    direction: Direction,
    config: KeyExchangeConfig,
}

impl Handshake {
    /// Start a new handshake as initiator
    pub fn new_initiator() -> CryptoResult<Self> {
        Self::with_config(Direction::Initiator, KeyExchangeConfig::default())
    }

    /// Start a new handshake as responder
    pub fn new_responder() -> CryptoResult<Self> {
        Self::with_config(Direction::Responder, KeyExchangeConfig::default())
    }

    pub fn with_config(direction: Direction, config: KeyExchangeConfig) -> CryptoResult<Self> {
        Ok(Self {
            keypair: KeyPair::generate()?,
            direction,
            config,
        })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Get our public key to send to the peer
    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    /// Complete the handshake with the peer's public key
    pub fn complete(self, peer_public: &[u8]) -> CryptoResult<SharedSecret> {
        derive_shared_secret_with(&self.config, peer_public, self.keypair.private_key())
    }

    /// Complete the handshake and bind the result to a codec that issues
    /// counter nonces prefixed by our direction, so the two sides never
    /// collide under the shared key.
    pub fn establish(
        self,
        peer_public: &[u8],
        cipher_suite: CipherSuite,
    ) -> CryptoResult<AuthenticatedCodec> {
        let config = CodecConfig {
            cipher_suite,
            nonce_strategy: NonceStrategy::Counter(self.direction),
            ..CodecConfig::default()
        };
        let shared = self.complete(peer_public)?;
        AuthenticatedCodec::new(&shared, config)
    }
}
