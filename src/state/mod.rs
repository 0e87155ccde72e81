//! Durable per-target sync state.
//!
//! A small JSON file maps each target key to the checksum of the last image
//! successfully downloaded for it. Checksum comparison against this mapping
//! is what makes repeated runs idempotent.

pub mod error;
pub mod store;

pub use error::StateError;
pub use store::SyncState;
