//! Session key generation.

use datafutures_types::SessionKey;
use rand::rngs::OsRng;
use rand::RngCore;

/// Random bytes per session key (rendered as 2000 hex digits).
pub const SESSION_KEY_BYTES: usize = 1000;

/// Generate a fresh high-entropy session key for binding authorization
/// signatures to one client session.
pub fn generate_session_key() -> SessionKey {
    let mut bytes = vec![0u8; SESSION_KEY_BYTES];
    OsRng.fill_bytes(&mut bytes);
    SessionKey::from_bytes(&bytes)
}
