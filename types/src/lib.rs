//! Fundamental types for data futures.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! future records and their identifiers, categories, owner identities, key
//! material and timestamps.

pub mod address;
pub mod category;
pub mod error;
pub mod future;
pub mod keys;
pub mod time;

pub use address::OwnerAddress;
pub use category::Category;
pub use error::TypesError;
pub use future::{FutureId, FutureRecord};
pub use keys::{KeyPair, PrivateKey, PublicKey, SessionKey, Signature};
pub use time::{Clock, SystemClock, Timestamp, SECS_PER_DAY};
