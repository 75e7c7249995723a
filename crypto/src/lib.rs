//! Cryptographic primitives for data futures.
//!
//! - **Value codecs**: pluggable number ↔ opaque token mappings ([`ValueCodec`])
//! - **Ed25519** for signing and verifying authorization challenges
//! - **Blake2b** for key derivation
//! - Session key generation for binding signatures to one client session

pub mod codec;
pub mod error;
pub mod hash;
pub mod keys;
pub mod sealed;
pub mod session;
pub mod sign;

pub use codec::{decode_plain, MarkerCodec, ValueCodec};
pub use error::{DecodeError, EncodeError, KeyError};
pub use hash::{blake2b_256, blake2b_256_multi};
pub use keys::{
    generate_keypair, keypair_from_hex_seed, keypair_from_private, keypair_from_seed,
    public_from_private, public_key_from_hex,
};
pub use sealed::SealedCodec;
pub use session::{generate_session_key, SESSION_KEY_BYTES};
pub use sign::{sign_message, verify_signature};
