//! Crypto Session - key agreement and sealed payloads for Entangle
//!
//! X25519 key exchange with HKDF-SHA256 key derivation, and single-message
//! authenticated encryption (ChaCha20Poly1305 or AES-256-GCM) of typed
//! payloads.
//!
//! ```
//! use crypto_session::{decrypt, derive_shared_secret, encrypt, generate_keypair};
//!
//! let alice = generate_keypair()?;
//! let bob = generate_keypair()?;
//!
//! // Only public bytes cross the channel
//! let alice_key = derive_shared_secret(&bob.public_key_bytes(), alice.private_key())?;
//! let bob_key = derive_shared_secret(&alice.public_key_bytes(), bob.private_key())?;
//!
//! let envelope = encrypt(&"Encrypt ME!!!".to_string(), &alice_key, b"")?;
//! let plaintext: String = decrypt(&envelope, &bob_key, b"")?;
//! assert_eq!(plaintext, "Encrypt ME!!!");
//! # Ok::<(), crypto_session::CryptoError>(())
//! ```

mod cipher;
mod codec;
mod config;
mod error;
mod exchange;
mod keys;
mod nonce;

pub use codec::*;
pub use config::*;
pub use error::*;
pub use exchange::*;
pub use keys::*;
pub use nonce::*;

pub use shared_protocol::{EncryptedEnvelope, Message, NONCE_SIZE, Payload, TAG_SIZE};

/// Public key size (256 bits / 32 bytes)
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Shared secret size (256 bits / 32 bytes)
pub const SHARED_SECRET_SIZE: usize = 32;
