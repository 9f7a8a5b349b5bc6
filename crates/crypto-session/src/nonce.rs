//! Nonce issuance for outgoing envelopes

use std::sync::atomic::{AtomicU64, Ordering};

use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::{CryptoError, CryptoResult, NONCE_SIZE};

/// Source of nonces for one key.
///
/// Implementations must never return the same value twice for the lifetime
/// of the key they are bound to, including under concurrent calls.
pub trait NonceSource: Send + Sync {
    fn next_nonce(&self) -> CryptoResult<[u8; NONCE_SIZE]>;
}

/// Draws every nonce from the OS random source.
///
/// Safe with any number of codecs sharing a key, up to roughly 2^32 envelopes
/// per key before the birthday bound becomes a concern.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomNonces;

impl NonceSource for RandomNonces {
    fn next_nonce(&self) -> CryptoResult<[u8; NONCE_SIZE]> {
        let mut nonce = [0u8; NONCE_SIZE];
        OsRng
            .try_fill_bytes(&mut nonce)
            .map_err(|e| CryptoError::Entropy(e.to_string()))?;
        Ok(nonce)
    }
}

/// Which side of the exchange we are (selects the counter nonce prefix)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// We initiated the exchange
    Initiator,
    /// We answered the exchange
    Responder,
}

impl Direction {
    /// Prefix ensures the two sides' counter nonces never collide
    pub fn nonce_prefix(self) -> u32 {
        match self {
            Direction::Initiator => 0x0000_0000,
            Direction::Responder => 0xFFFF_FFFF,
        }
    }
}

/// Counter nonces: `[4 bytes direction prefix][8 bytes counter]`, both
/// little-endian.
///
/// Only one `CounterNonces` per direction may exist for a given key.
#[derive(Debug)]
pub struct CounterNonces {
    prefix: u32,
    counter: AtomicU64,
}

impl CounterNonces {
    pub fn new(direction: Direction) -> Self {
        Self::starting_at(direction, 0)
    }

    fn starting_at(direction: Direction, start: u64) -> Self {
        Self {
            prefix: direction.nonce_prefix(),
            counter: AtomicU64::new(start),
        }
    }

    /// Number of nonces issued so far
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

impl NonceSource for CounterNonces {
    fn next_nonce(&self) -> CryptoResult<[u8; NONCE_SIZE]> {
        let counter = self
            .counter
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |c| c.checked_add(1))
            .map_err(|_| CryptoError::NonceOverflow)?;

        let mut nonce = [0u8; NONCE_SIZE];
        nonce[0..4].copy_from_slice(&self.prefix.to_le_bytes());
        nonce[4..12].copy_from_slice(&counter.to_le_bytes());
        Ok(nonce)
    }
}
