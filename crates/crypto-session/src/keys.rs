//! Key material types
//!
//! Private scalars and derived secrets are wiped on drop and never printed.
//! Neither implements `Serialize` or `Clone`.

use std::fmt;

use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use tracing::debug;
use x25519_dalek::StaticSecret;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::{CryptoError, CryptoResult, PUBLIC_KEY_SIZE, SHARED_SECRET_SIZE};

/// X25519 private scalar
pub struct PrivateKey(StaticSecret);

impl PrivateKey {
    /// Draw a fresh scalar from the OS random source
    pub fn generate() -> CryptoResult<Self> {
        let mut bytes = Zeroizing::new([0u8; PUBLIC_KEY_SIZE]);
        OsRng
            .try_fill_bytes(&mut bytes[..])
            .map_err(|e| CryptoError::Entropy(e.to_string()))?;
        Ok(Self(StaticSecret::from(*bytes)))
    }

    /// Load a scalar from raw bytes (clamped on use, per RFC 7748)
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        Self(StaticSecret::from(bytes))
    }

    /// Public value for this scalar
    pub fn public_key(&self) -> PublicKey {
        PublicKey(x25519_dalek::PublicKey::from(&self.0).to_bytes())
    }

    pub(crate) fn diffie_hellman(&self, peer: &PublicKey) -> x25519_dalek::SharedSecret {
        self.0
            .diffie_hellman(&x25519_dalek::PublicKey::from(peer.to_bytes()))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// X25519 public value, safe to transmit
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey([u8; PUBLIC_KEY_SIZE]);

impl PublicKey {
    /// Parse a public key received from a peer.
    ///
    /// Only the length is checked here; low-order points are caught during
    /// derivation.
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let bytes: [u8; PUBLIC_KEY_SIZE] =
            bytes.try_into().map_err(|_| CryptoError::InvalidPeerKey)?;
        Ok(Self(bytes))
    }

    /// Parse from hex, with or without a `0x` prefix
    pub fn from_hex(hex: &str) -> CryptoResult<Self> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        let mut bytes = [0u8; PUBLIC_KEY_SIZE];
        hex::decode_to_slice(hex, &mut bytes)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; PUBLIC_KEY_SIZE] {
        self.0
    }
}

impl From<[u8; PUBLIC_KEY_SIZE]> for PublicKey {
    fn from(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Key pair for key agreement
pub struct KeyPair {
    private: PrivateKey,
    public: PublicKey,
}

impl KeyPair {
    /// Generate a new key pair
    pub fn generate() -> CryptoResult<Self> {
        let private = PrivateKey::generate()?;
        let public = private.public_key();
        debug!(public_key = %public, "Generated key pair");
        Ok(Self { private, public })
    }

    pub fn public_key(&self) -> PublicKey {
        self.public
    }

    /// Get the public key bytes
    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.public.to_bytes()
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private
    }
}

impl From<PrivateKey> for KeyPair {
    fn from(private: PrivateKey) -> Self {
        let public = private.public_key();
        Self { private, public }
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

/// Symmetric key both parties derive from the exchange
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret([u8; SHARED_SECRET_SIZE]);

impl SharedSecret {
    /// Wrap existing key material.
    ///
    /// The bytes must be uniformly random; prefer
    /// [`derive_shared_secret`](crate::derive_shared_secret).
    pub fn from_bytes(bytes: [u8; SHARED_SECRET_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SHARED_SECRET_SIZE] {
        &self.0
    }
}

impl ConstantTimeEq for SharedSecret {
    fn ct_eq(&self, other: &Self) -> subtle::Choice {
        self.0[..].ct_eq(&other.0[..])
    }
}

impl PartialEq for SharedSecret {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for SharedSecret {}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(<redacted>)")
    }
}
