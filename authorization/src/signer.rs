//! Signer capability: an external party that signs challenges.

use async_trait::async_trait;
use datafutures_types::{KeyPair, PublicKey, Signature};

use crate::SignError;

/// A signature over a challenge, with the key that claims to have made it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedChallenge {
    pub public_key: PublicKey,
    pub signature: Signature,
}

/// Something that can sign a challenge on the viewer's behalf: a wallet, a
/// hardware key, a local key file. The user may decline.
#[async_trait]
pub trait Signer: Send + Sync {
    async fn sign(&self, message: &str) -> Result<SignedChallenge, SignError>;
}

/// Signs with a locally held Ed25519 key.
pub struct KeypairSigner {
    keypair: KeyPair,
}

impl KeypairSigner {
    pub fn new(keypair: KeyPair) -> Self {
        Self { keypair }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.keypair.public
    }
}

#[async_trait]
impl Signer for KeypairSigner {
    async fn sign(&self, message: &str) -> Result<SignedChallenge, SignError> {
        let signature = datafutures_crypto::sign_message(message.as_bytes(), &self.keypair.private);
        Ok(SignedChallenge {
            public_key: self.keypair.public.clone(),
            signature,
        })
    }
}
