//! Two independent parties that share nothing but public bytes.

use std::sync::Once;

use crypto_session::{
    CipherSuite, CryptoError, EncryptedEnvelope, Handshake, KeyPair, Message, SharedSecret,
    decrypt, derive_shared_secret, encrypt,
};
use shared_protocol::Field;

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// One endpoint. Its key pair never leaves the struct; only
/// `public_bytes()` and envelope bytes are handed to the other side.
struct Party {
    keypair: KeyPair,
    shared: Option<SharedSecret>,
}

impl Party {
    fn new() -> Self {
        Self {
            keypair: KeyPair::generate().unwrap(),
            shared: None,
        }
    }

    fn public_bytes(&self) -> Vec<u8> {
        self.keypair.public_key_bytes().to_vec()
    }

    fn receive_public(&mut self, peer_public: &[u8]) -> Result<(), CryptoError> {
        self.shared = Some(derive_shared_secret(peer_public, self.keypair.private_key())?);
        Ok(())
    }

    fn key(&self) -> &SharedSecret {
        self.shared.as_ref().unwrap()
    }

    fn send(&self, text: &str) -> Vec<u8> {
        encrypt(&text.to_string(), self.key(), b"")
            .unwrap()
            .to_bytes()
            .unwrap()
            .to_vec()
    }

    fn receive(&self, wire: &[u8]) -> Result<String, CryptoError> {
        let envelope = EncryptedEnvelope::from_bytes(wire).unwrap();
        decrypt(&envelope, self.key(), b"")
    }
}

#[test]
fn test_encrypt_me_scenario() -> anyhow::Result<()> {
    init_tracing();

    let mut client = Party::new();
    let mut server = Party::new();

    // Public keys cross the untrusted channel as plain bytes
    let client_public = client.public_bytes();
    let server_public = server.public_bytes();
    client.receive_public(&server_public)?;
    server.receive_public(&client_public)?;

    assert_eq!(client.key(), server.key());

    let wire = client.send("Encrypt ME!!!");
    assert_eq!(server.receive(&wire)?, "Encrypt ME!!!");

    let reply = server.send("Decrypted");
    assert_eq!(client.receive(&reply)?, "Decrypted");
    Ok(())
}

#[test]
fn test_eavesdropper_cannot_decrypt() {
    init_tracing();

    let mut client = Party::new();
    let mut server = Party::new();
    let mut eve = Party::new();

    let client_public = client.public_bytes();
    let server_public = server.public_bytes();
    client.receive_public(&server_public).unwrap();
    server.receive_public(&client_public).unwrap();

    // Eve saw both public keys but holds neither private key
    eve.receive_public(&client_public).unwrap();

    let wire = client.send("secret");
    assert!(matches!(
        eve.receive(&wire),
        Err(CryptoError::AuthenticationFailure)
    ));
}

#[test]
fn test_degenerate_peer_key_aborts() {
    init_tracing();

    let mut party = Party::new();
    assert!(matches!(
        party.receive_public(&[0u8; 32]),
        Err(CryptoError::InvalidPeerKey)
    ));
    assert!(party.shared.is_none());
}

#[test]
fn test_established_codecs_talk_both_ways() {
    init_tracing();

    for suite in [CipherSuite::ChaCha20Poly1305, CipherSuite::Aes256Gcm] {
        let initiator = Handshake::new_initiator().unwrap();
        let responder = Handshake::new_responder().unwrap();

        let initiator_public = initiator.public_key().to_hex();
        let responder_public = responder.public_key().to_hex();

        let initiator_codec = initiator
            .establish(
                crypto_session::PublicKey::from_hex(&responder_public)
                    .unwrap()
                    .as_bytes(),
                suite,
            )
            .unwrap();
        let responder_codec = responder
            .establish(
                crypto_session::PublicKey::from_hex(&initiator_public)
                    .unwrap()
                    .as_bytes(),
                suite,
            )
            .unwrap();

        let request = Message::fields([Field::new("op", "ping"), Field::new("seq", "1")]);
        let envelope = initiator_codec.encrypt(&request, b"session-1").unwrap();
        let received: Message = responder_codec.decrypt(&envelope, b"session-1").unwrap();
        assert_eq!(received, request);

        let response = Message::text("pong");
        let envelope = responder_codec.encrypt(&response, b"session-1").unwrap();
        let received: Message = initiator_codec.decrypt(&envelope, b"session-1").unwrap();
        assert_eq!(received, response);

        // Each side's first counter nonce carries its own direction prefix
        let a = initiator_codec.encrypt(&Message::text("a"), b"").unwrap();
        let b = responder_codec.encrypt(&Message::text("b"), b"").unwrap();
        assert_ne!(a.nonce, b.nonce);
    }
}
