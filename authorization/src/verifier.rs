//! Optional signature verification before a reveal is trusted.
//!
//! Without a verifier, a reveal only proves that *a* signer produced *a*
//! signature. A verifier checks that the signature covers this session's
//! exact challenge, that it was checked inside the validity window and,
//! when pinned, that it came from an expected key.

use std::collections::HashSet;

use datafutures_types::{PublicKey, Timestamp};

use crate::{AuthorizationError, ChallengeBuilder, ChallengeParams, SignedChallenge};

#[derive(Clone, Debug, Default)]
pub struct ChallengeVerifier {
    allowed: Option<HashSet<PublicKey>>,
}

impl ChallengeVerifier {
    /// Accept any key whose signature verifies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept only signatures made by one of `keys`.
    pub fn pinned(keys: impl IntoIterator<Item = PublicKey>) -> Self {
        Self {
            allowed: Some(keys.into_iter().collect()),
        }
    }

    pub fn verify(
        &self,
        params: &ChallengeParams,
        signed: &SignedChallenge,
        now: Timestamp,
    ) -> Result<(), AuthorizationError> {
        params.window().validate(now)?;

        if let Some(allowed) = &self.allowed {
            if !allowed.contains(&signed.public_key) {
                return Err(AuthorizationError::UnknownSigner(signed.public_key.to_string()));
            }
        }

        let message = ChallengeBuilder.build(params);
        if !datafutures_crypto::verify_signature(
            message.as_bytes(),
            &signed.signature,
            &signed.public_key,
        ) {
            return Err(AuthorizationError::BadSignature);
        }
        Ok(())
    }
}
