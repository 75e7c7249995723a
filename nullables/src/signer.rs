//! Nullable signer: scripted approve/decline with a deterministic key.

use async_trait::async_trait;
use datafutures_authorization::{SignError, SignedChallenge, Signer};
use datafutures_types::{KeyPair, PublicKey};
use std::sync::Mutex;

/// How the signer answers the next request.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Answer {
    Approve,
    Decline,
    Unavailable(String),
}

/// A signer that signs with a fixed seed and records every message it saw.
pub struct NullSigner {
    keypair: KeyPair,
    answer: Mutex<Answer>,
    messages: Mutex<Vec<String>>,
}

impl NullSigner {
    /// A signer that approves every request.
    pub fn approving() -> Self {
        Self::with_answer(Answer::Approve)
    }

    /// A signer whose user refuses every request.
    pub fn declining() -> Self {
        Self::with_answer(Answer::Decline)
    }

    /// A signer that cannot be reached.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::with_answer(Answer::Unavailable(reason.into()))
    }

    fn with_answer(answer: Answer) -> Self {
        Self {
            keypair: datafutures_crypto::keypair_from_seed(&[0x5A; 32]),
            answer: Mutex::new(answer),
            messages: Mutex::new(Vec::new()),
        }
    }

    /// Switch between approving and declining.
    pub fn set_approving(&self, approve: bool) {
        *self.answer.lock().unwrap() = if approve {
            Answer::Approve
        } else {
            Answer::Decline
        };
    }

    pub fn public_key(&self) -> PublicKey {
        self.keypair.public.clone()
    }

    /// All messages presented for signing, in order.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Signer for NullSigner {
    async fn sign(&self, message: &str) -> Result<SignedChallenge, SignError> {
        self.messages.lock().unwrap().push(message.to_string());
        let answer = self.answer.lock().unwrap().clone();
        match answer {
            Answer::Approve => Ok(SignedChallenge {
                public_key: self.keypair.public.clone(),
                signature: datafutures_crypto::sign_message(
                    message.as_bytes(),
                    &self.keypair.private,
                ),
            }),
            Answer::Decline => Err(SignError::Declined),
            Answer::Unavailable(reason) => Err(SignError::Unavailable(reason)),
        }
    }
}
