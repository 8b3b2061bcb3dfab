//! In-memory implementation of the IdentityStore trait.
//!
//! Primarily for testing. Same semantics as SQLite, including the
//! one-active-record-per-tuple guarantee, with no persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use buffr_id_core::{BuffrId, IdStatus, IdentityRecord};

use crate::error::{Result, StoreError};
use crate::traits::{IdentityStore, IdentityTuple, InsertOutcome};

/// In-memory identity store.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

struct MemoryStoreInner {
    /// Records indexed by encoded identifier.
    records: HashMap<String, IdentityRecord>,

    /// Active-slot index: tuple -> encoded identifier. Mirrors the SQLite
    /// partial unique index.
    active: HashMap<IdentityTuple, String>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner {
                records: HashMap::new(),
                active: HashMap::new(),
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn insert_if_absent(&self, record: &IdentityRecord) -> Result<InsertOutcome> {
        let mut inner = self.inner.write().unwrap();

        let tuple = IdentityTuple::of(&record.identifier);
        if let Some(existing_key) = inner.active.get(&tuple) {
            let existing = inner.records[existing_key].clone();
            return Ok(InsertOutcome::ActiveExists {
                existing: Box::new(existing),
            });
        }

        let key = record.identifier.encode();
        if inner.records.contains_key(&key) {
            // Same second as a revoked record with this tuple.
            return Err(StoreError::IdentifierExists(key));
        }
        inner.records.insert(key.clone(), record.clone());
        if record.status == IdStatus::Active {
            inner.active.insert(tuple, key);
        }

        Ok(InsertOutcome::Inserted)
    }

    async fn get(&self, id: &BuffrId) -> Result<Option<IdentityRecord>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.records.get(&id.encode()).cloned())
    }

    async fn find_active(&self, tuple: &IdentityTuple) -> Result<Option<IdentityRecord>> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .active
            .get(tuple)
            .and_then(|key| inner.records.get(key))
            .cloned())
    }

    async fn lookup_by_fingerprint(&self, tuple: &IdentityTuple) -> Result<Vec<IdentityRecord>> {
        let inner = self.inner.read().unwrap();

        let mut records: Vec<IdentityRecord> = inner
            .records
            .values()
            .filter(|r| IdentityTuple::of(&r.identifier) == *tuple)
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.identifier.encode().cmp(&b.identifier.encode()))
        });
        Ok(records)
    }

    async fn revoke(&self, id: &BuffrId, now: i64) -> Result<IdentityRecord> {
        let mut inner = self.inner.write().unwrap();

        let key = id.encode();
        let record = inner
            .records
            .get_mut(&key)
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;

        // Revoked is terminal; a second revoke is a no-op.
        if record.status == IdStatus::Revoked {
            return Ok(record.clone());
        }

        record.status = IdStatus::Revoked;
        record.updated_at = now;
        let updated = record.clone();

        inner.active.remove(&IdentityTuple::of(id));
        Ok(updated)
    }

    async fn set_verified(
        &self,
        id: &BuffrId,
        verified: bool,
        now: i64,
    ) -> Result<IdentityRecord> {
        let mut inner = self.inner.write().unwrap();

        let key = id.encode();
        let record = inner
            .records
            .get_mut(&key)
            .ok_or_else(|| StoreError::NotFound(key))?;

        record.verified = verified;
        record.updated_at = now;
        Ok(record.clone())
    }
}
