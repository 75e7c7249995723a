//! Nullable infrastructure for deterministic testing.
//!
//! All external dependencies (clock, record store, signer) are abstracted
//! behind traits. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically (availability, injected failures)
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod signer;
pub mod store;

pub use clock::NullClock;
pub use signer::NullSigner;
pub use store::NullStore;
