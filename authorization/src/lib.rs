//! Reveal authorization.
//!
//! Before a future's value is decoded, the viewer signs a challenge that
//! binds the signature to one client session, one store instance and one
//! validity window:
//!
//! ```text
//! publickey:<session key>
//! contractAddresses:<contract address>
//! contractsChainId:<chain id>
//! startTimestamp:<unix secs>
//! durationDays:<days>
//! ```
//!
//! Producing the signature is delegated to a [`Signer`]. Checking it is
//! optional and delegated to a [`ChallengeVerifier`].

pub mod challenge;
pub mod error;
pub mod session;
pub mod signer;
pub mod state;
pub mod verifier;
pub mod window;

pub use challenge::{ChallengeBuilder, ChallengeParams};
pub use error::{AuthorizationError, SignError};
pub use session::{AuthorizationScope, AuthorizationSession};
pub use signer::{KeypairSigner, SignedChallenge, Signer};
pub use state::{RevealFlow, RevealState};
pub use verifier::ChallengeVerifier;
pub use window::AuthorizationWindow;
