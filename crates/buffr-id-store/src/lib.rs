//! # Buffr ID Store
//!
//! Storage abstraction for identity records.
//!
//! The [`IdentityStore`] trait keeps the registry storage-agnostic. Two
//! implementations ship here:
//!
//! - [`SqliteStore`] - primary backend, rusqlite with bundled SQLite
//! - [`MemoryStore`] - for tests, same semantics without persistence
//!
//! Both enforce the registry's two uniqueness guarantees: `identifier` is
//! globally unique, and at most one Active record exists per
//! (entity type, project, country, fingerprint) tuple. In SQLite the second
//! guarantee is a partial unique index, so revocation releases the slot.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{IdentityStore, IdentityTuple, InsertOutcome};
