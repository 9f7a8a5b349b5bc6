//! AEAD cipher suites with detached tags

use aes_gcm::Aes256Gcm;
use chacha20poly1305::ChaCha20Poly1305;
use chacha20poly1305::aead::consts::{U12, U16};
use chacha20poly1305::aead::generic_array::GenericArray;
use chacha20poly1305::aead::{AeadInPlace, KeyInit};

use crate::{CipherSuite, CryptoError, CryptoResult, NONCE_SIZE, SharedSecret, TAG_SIZE};

/// Initialized cipher for one key
pub(crate) enum AeadCipher {
    ChaCha20Poly1305(ChaCha20Poly1305),
    Aes256Gcm(Aes256Gcm),
}

impl AeadCipher {
    pub(crate) fn new(suite: CipherSuite, key: &SharedSecret) -> CryptoResult<Self> {
        let cipher = match suite {
            CipherSuite::ChaCha20Poly1305 => Self::ChaCha20Poly1305(
                ChaCha20Poly1305::new_from_slice(key.as_bytes())
                    .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?,
            ),
            CipherSuite::Aes256Gcm => Self::Aes256Gcm(
                Aes256Gcm::new_from_slice(key.as_bytes())
                    .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?,
            ),
        };
        Ok(cipher)
    }

    /// Encrypt `buffer` in place and return the tag
    pub(crate) fn seal(
        &self,
        nonce: &[u8; NONCE_SIZE],
        associated_data: &[u8],
        buffer: &mut [u8],
    ) -> CryptoResult<[u8; TAG_SIZE]> {
        match self {
            Self::ChaCha20Poly1305(cipher) => seal_detached(cipher, nonce, associated_data, buffer),
            Self::Aes256Gcm(cipher) => seal_detached(cipher, nonce, associated_data, buffer),
        }
    }

    /// Verify the tag, then decrypt `buffer` in place.
    ///
    /// `buffer` is left untouched when verification fails.
    pub(crate) fn open(
        &self,
        nonce: &[u8; NONCE_SIZE],
        associated_data: &[u8],
        buffer: &mut [u8],
        tag: &[u8; TAG_SIZE],
    ) -> CryptoResult<()> {
        match self {
            Self::ChaCha20Poly1305(cipher) => {
                open_detached(cipher, nonce, associated_data, buffer, tag)
            }
            Self::Aes256Gcm(cipher) => open_detached(cipher, nonce, associated_data, buffer, tag),
        }
    }
}

fn seal_detached<C>(
    cipher: &C,
    nonce: &[u8; NONCE_SIZE],
    associated_data: &[u8],
    buffer: &mut [u8],
) -> CryptoResult<[u8; TAG_SIZE]>
where
    C: AeadInPlace<NonceSize = U12, TagSize = U16>,
{
    let tag = cipher
        .encrypt_in_place_detached(&GenericArray::from(*nonce), associated_data, buffer)
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;
    Ok(tag.into())
}

fn open_detached<C>(
    cipher: &C,
    nonce: &[u8; NONCE_SIZE],
    associated_data: &[u8],
    buffer: &mut [u8],
    tag: &[u8; TAG_SIZE],
) -> CryptoResult<()>
where
    C: AeadInPlace<NonceSize = U12, TagSize = U16>,
{
    cipher
        .decrypt_in_place_detached(
            &GenericArray::from(*nonce),
            associated_data,
            buffer,
            &GenericArray::from(*tag),
        )
        .map_err(|_| CryptoError::AuthenticationFailure)
}
