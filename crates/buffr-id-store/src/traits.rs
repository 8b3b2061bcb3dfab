//! IdentityStore trait: the abstract interface for identity-record
//! persistence.
//!
//! This trait keeps the registry storage-agnostic. Implementations include
//! SQLite (primary) and in-memory (for tests). Both enforce the same two
//! uniqueness guarantees: `identifier` is globally unique, and at most one
//! Active record exists per (entity type, project, country, fingerprint)
//! tuple.

use async_trait::async_trait;
use buffr_id_core::{BuffrId, CountryCode, EntityType, Fingerprint, IdentityRecord, Project};

use crate::error::Result;

/// The uniqueness tuple for active records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentityTuple {
    pub entity_type: EntityType,
    pub project: Project,
    pub country: CountryCode,
    pub fingerprint: Fingerprint,
}

impl IdentityTuple {
    pub const fn new(
        entity_type: EntityType,
        project: Project,
        country: CountryCode,
        fingerprint: Fingerprint,
    ) -> Self {
        Self {
            entity_type,
            project,
            country,
            fingerprint,
        }
    }

    /// The tuple an identifier occupies.
    pub fn of(id: &BuffrId) -> Self {
        Self::new(id.entity_type, id.project, id.country, id.fingerprint)
    }
}

/// Result of a conditional insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The record was inserted; it now holds the Active slot.
    Inserted,
    /// An Active record already occupies the tuple. Carries the winner so
    /// the caller can resolve idempotency vs. entity mismatch without a
    /// second read.
    ActiveExists {
        existing: Box<IdentityRecord>,
    },
}

/// Async interface for identity-record persistence.
///
/// # Design notes
///
/// - **Conditional insert**: `insert_if_absent` is the single atomic
///   "insert if no active match, else return the active match" operation
///   the registry's idempotency depends on. Backends must make it safe
///   against concurrent callers (unique index, transaction, or lock).
/// - **Append-only**: records are never deleted. `set_status` only accepts
///   the Active -> Revoked transition.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Atomically insert `record` unless an Active record already occupies
    /// its uniqueness tuple.
    async fn insert_if_absent(&self, record: &IdentityRecord) -> Result<InsertOutcome>;

    /// Get a record by identifier.
    async fn get(&self, id: &BuffrId) -> Result<Option<IdentityRecord>>;

    /// Get the Active record for a tuple, if any.
    async fn find_active(&self, tuple: &IdentityTuple) -> Result<Option<IdentityRecord>>;

    /// All historical records for a tuple, active and revoked, ordered by
    /// creation time. Read-only, for cross-project deduplication and audit.
    async fn lookup_by_fingerprint(&self, tuple: &IdentityTuple) -> Result<Vec<IdentityRecord>>;

    /// Mark a record Revoked, releasing its uniqueness slot. Revoking an
    /// already-revoked record is a no-op. Returns the updated record.
    async fn revoke(&self, id: &BuffrId, now: i64) -> Result<IdentityRecord>;

    /// Flip the verified flag. Returns the updated record.
    async fn set_verified(&self, id: &BuffrId, verified: bool, now: i64)
        -> Result<IdentityRecord>;
}
