//! Reveal interaction state machine.
//!
//! ```text
//! Idle → AwaitingSignature → Decrypting → Revealed
//!                 │               └──────→ Failed
//!                 ├──────────────────────→ Declined
//!                 └──────────────────────→ Failed
//! Revealed → Idle   (hide the value again, no re-fetch)
//! ```

use serde::{Deserialize, Serialize};

use crate::AuthorizationError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RevealState {
    Idle,
    AwaitingSignature,
    Decrypting,
    Revealed(f64),
    Declined,
    Failed(String),
}

impl RevealState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Revealed(_) | Self::Declined | Self::Failed(_))
    }
}

/// Tracks one viewer's reveal of one future.
#[derive(Clone, Debug)]
pub struct RevealFlow {
    state: RevealState,
}

impl Default for RevealFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl RevealFlow {
    pub fn new() -> Self {
        Self {
            state: RevealState::Idle,
        }
    }

    pub fn state(&self) -> &RevealState {
        &self.state
    }

    /// The plaintext, while revealed.
    pub fn value(&self) -> Option<f64> {
        match self.state {
            RevealState::Revealed(v) => Some(v),
            _ => None,
        }
    }

    fn transition(
        &mut self,
        event: &'static str,
        allowed: impl FnOnce(&RevealState) -> bool,
        next: RevealState,
    ) -> Result<(), AuthorizationError> {
        if !allowed(&self.state) {
            return Err(AuthorizationError::InvalidTransition {
                from: self.state.clone(),
                event,
            });
        }
        tracing::trace!(from = ?self.state, to = ?next, event, "reveal transition");
        self.state = next;
        Ok(())
    }

    /// A signature has been requested.
    pub fn request_signature(&mut self) -> Result<(), AuthorizationError> {
        self.transition(
            "request_signature",
            |s| matches!(s, RevealState::Idle),
            RevealState::AwaitingSignature,
        )
    }

    /// The signer produced a signature; decoding starts.
    pub fn signed(&mut self) -> Result<(), AuthorizationError> {
        self.transition(
            "signed",
            |s| matches!(s, RevealState::AwaitingSignature),
            RevealState::Decrypting,
        )
    }

    pub fn declined(&mut self) -> Result<(), AuthorizationError> {
        self.transition(
            "declined",
            |s| matches!(s, RevealState::AwaitingSignature),
            RevealState::Declined,
        )
    }

    pub fn revealed(&mut self, value: f64) -> Result<(), AuthorizationError> {
        self.transition(
            "revealed",
            |s| matches!(s, RevealState::Decrypting),
            RevealState::Revealed(value),
        )
    }

    /// Signing or decoding failed for a reason other than the user declining.
    pub fn failed(&mut self, reason: impl Into<String>) -> Result<(), AuthorizationError> {
        self.transition(
            "failed",
            |s| matches!(s, RevealState::AwaitingSignature | RevealState::Decrypting),
            RevealState::Failed(reason.into()),
        )
    }

    /// Hide a revealed value.
    pub fn hide(&mut self) -> Result<(), AuthorizationError> {
        self.transition(
            "hide",
            |s| matches!(s, RevealState::Revealed(_)),
            RevealState::Idle,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_and_hide() {
        let mut flow = RevealFlow::new();
        flow.request_signature().unwrap();
        flow.signed().unwrap();
        flow.revealed(23.5).unwrap();
        assert_eq!(flow.value(), Some(23.5));
        assert!(flow.state().is_terminal());
        flow.hide().unwrap();
        assert_eq!(flow.state(), &RevealState::Idle);
        assert_eq!(flow.value(), None);
    }

    #[test]
    fn declined_is_terminal() {
        let mut flow = RevealFlow::new();
        flow.request_signature().unwrap();
        flow.declined().unwrap();
        assert!(flow.state().is_terminal());
        assert!(flow.request_signature().is_err());
        assert!(flow.hide().is_err());
    }

    #[test]
    fn failure_from_either_pending_state() {
        let mut a = RevealFlow::new();
        a.request_signature().unwrap();
        a.failed("signer unavailable").unwrap();
        assert_eq!(a.state(), &RevealState::Failed("signer unavailable".into()));

        let mut b = RevealFlow::new();
        b.request_signature().unwrap();
        b.signed().unwrap();
        b.failed("decryption failed").unwrap();
        assert!(b.state().is_terminal());
    }

    #[test]
    fn out_of_order_events_rejected() {
        let mut flow = RevealFlow::new();
        assert!(matches!(
            flow.signed(),
            Err(AuthorizationError::InvalidTransition { from: RevealState::Idle, event: "signed" })
        ));
        assert!(flow.revealed(1.0).is_err());
        assert!(flow.failed("x").is_err());
        assert_eq!(flow.state(), &RevealState::Idle);
    }
}
