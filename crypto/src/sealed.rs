//! Authenticated value codec.
//!
//! Values are sealed with ChaCha20-Poly1305 under a key derived from a
//! shared secret via Blake2b. Each token carries its own random nonce:
//! `SEALED-` + base64(nonce ‖ ciphertext ‖ tag).

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::codec::decode_plain;
use crate::{DecodeError, EncodeError, KeyError, ValueCodec};

const KEY_CONTEXT: &[u8] = b"datafutures-value-codec";
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const VALUE_LEN: usize = 8;

/// Value codec that actually hides the value from anyone without the secret.
pub struct SealedCodec {
    cipher: ChaCha20Poly1305,
}

impl SealedCodec {
    pub const MARKER: &'static str = "SEALED-";

    /// Derive the sealing key from an arbitrary-length secret.
    pub fn new(secret: &[u8]) -> Result<Self, KeyError> {
        if secret.is_empty() {
            return Err(KeyError::EmptySecret);
        }
        let key = crate::hash::blake2b_256_multi(&[secret, KEY_CONTEXT]);
        Ok(Self {
            cipher: ChaCha20Poly1305::new(Key::from_slice(&key)),
        })
    }

    /// Derive the sealing key from a hex-encoded secret (configuration form).
    pub fn from_hex(secret_hex: &str) -> Result<Self, KeyError> {
        let secret = hex::decode(secret_hex.trim().trim_start_matches("0x"))
            .map_err(|e| KeyError::Hex(e.to_string()))?;
        Self::new(&secret)
    }
}

impl ValueCodec for SealedCodec {
    fn name(&self) -> &'static str {
        "sealed"
    }

    fn encode(&self, value: f64) -> Result<String, EncodeError> {
        if !value.is_finite() {
            return Err(EncodeError::NonFinite);
        }
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), value.to_le_bytes().as_ref())
            .map_err(|e| EncodeError::Cipher(e.to_string()))?;

        let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        payload.extend_from_slice(&nonce_bytes);
        payload.extend_from_slice(&ciphertext);
        Ok(format!("{}{}", Self::MARKER, STANDARD.encode(payload)))
    }

    fn decode(&self, token: &str) -> Result<f64, DecodeError> {
        let Some(encoded) = token.strip_prefix(Self::MARKER) else {
            return decode_plain(token);
        };
        let payload = STANDARD
            .decode(encoded.trim())
            .map_err(|e| DecodeError::Base64(e.to_string()))?;
        if payload.len() != NONCE_LEN + VALUE_LEN + TAG_LEN {
            return Err(DecodeError::Truncated(payload.len()));
        }
        let (nonce, ciphertext) = payload.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| DecodeError::Authentication)?;

        let bytes: [u8; VALUE_LEN] = plaintext
            .as_slice()
            .try_into()
            .map_err(|_| DecodeError::Truncated(plaintext.len()))?;
        let value = f64::from_le_bytes(bytes);
        if !value.is_finite() {
            return Err(DecodeError::NonFinite);
        }
        Ok(value)
    }
}
