//! The identity registry: the one stateful component of Buffr ID.
//!
//! Binds each issued identifier to exactly one local entity and enforces
//! the idempotency invariant: at most one Active record per
//! (entity type, project, country, fingerprint) tuple. Concurrency
//! correctness rests on the store's conditional insert, not on in-process
//! locks.

use chrono::Utc;

use buffr_id_core::{
    canonicalize, BuffrId, CountryCode, EntityBinding, EntityType, Fingerprint, IdentityRecord,
    KeyScope, Project,
};
use buffr_id_crypto::KeyProvider;
use buffr_id_store::{IdentityStore, IdentityTuple, InsertOutcome, StoreError};

use crate::error::{RegistryError, Result};

/// Configuration for the registry.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// How many times `register_or_fetch` retries after losing an insert
    /// race before surfacing `Contention`.
    pub max_insert_attempts: u32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_insert_attempts: 3,
        }
    }
}

/// Outcome of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredId {
    /// The issued (or previously issued) identifier.
    pub identifier: BuffrId,
    /// False when an existing Active record satisfied the call.
    pub newly_created: bool,
}

/// The identity registry.
///
/// Generic over the storage backend and the key provider; both are chosen
/// at construction and threaded explicitly, never taken from ambient
/// context.
pub struct IdentityRegistry<S: IdentityStore, K: KeyProvider> {
    store: S,
    keys: K,
    config: RegistryConfig,
}

impl<S: IdentityStore, K: KeyProvider> IdentityRegistry<S, K> {
    /// Create a new registry.
    pub fn new(store: S, keys: K, config: RegistryConfig) -> Self {
        Self {
            store,
            keys,
            config,
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a raw identifier, or fetch the identifier already issued
    /// for it.
    ///
    /// Canonicalizes, fingerprints, and seals the source, then performs a
    /// conditional insert against the uniqueness tuple. Idempotent: a
    /// repeat call with the same binding returns the existing identifier.
    /// A matching tuple bound to a *different* entity is surfaced as
    /// [`RegistryError::EntityMismatch`], never merged.
    ///
    /// Key failure blocks issuance: no record is ever created without its
    /// encrypted source.
    pub async fn register_or_fetch(
        &self,
        binding: EntityBinding,
        project: Project,
        country: CountryCode,
        raw_identifier: &str,
    ) -> Result<RegisteredId> {
        let canonical = canonicalize(raw_identifier)?;
        let fingerprint = Fingerprint::derive(&canonical);
        let scope = KeyScope::new(project, country);
        let key = self.keys.encryption_key(&scope)?;

        let entity_type = binding.entity_type();
        let tuple = IdentityTuple::new(entity_type, project, country, fingerprint);

        let mut attempts = 0;
        while attempts < self.config.max_insert_attempts {
            attempts += 1;

            if let Some(existing) = self.store.find_active(&tuple).await? {
                return resolve_existing(existing, &binding);
            }

            let now = Utc::now();
            let now_ms = now.timestamp_millis();
            let identifier =
                BuffrId::assemble(entity_type, project, country, fingerprint, now);
            let record = IdentityRecord {
                identifier: identifier.clone(),
                binding: binding.clone(),
                fingerprint,
                encrypted_source: key.seal(scope, &canonical)?,
                status: buffr_id_core::IdStatus::Active,
                verified: false,
                created_at: now_ms,
                updated_at: now_ms,
            };

            match self.store.insert_if_absent(&record).await {
                Ok(InsertOutcome::Inserted) => {
                    tracing::debug!(identifier = %identifier, "issued new identifier");
                    return Ok(RegisteredId {
                        identifier,
                        newly_created: true,
                    });
                }
                Ok(InsertOutcome::ActiveExists { existing }) => {
                    // Another caller won between our lookup and insert.
                    return resolve_existing(*existing, &binding);
                }
                // A revoked record can share our identifier string when two
                // issuances for the tuple land in the same second. Retry
                // with a fresh timestamp.
                Err(StoreError::IdentifierExists(id)) => {
                    tracing::debug!(identifier = %id, attempt = attempts, "identifier taken, retrying");
                    tokio::time::sleep(std::time::Duration::from_millis(
                        250 * u64::from(attempts),
                    ))
                    .await;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(RegistryError::Contention { attempts })
    }

    /// Revoke an identifier. Terminal; releases the uniqueness slot so a
    /// later registration of the same fingerprint tuple may issue a fresh
    /// identifier. The record itself stays queryable forever.
    pub async fn revoke(&self, identifier: &BuffrId) -> Result<IdentityRecord> {
        match self.store.revoke(identifier, now_millis()).await {
            Ok(record) => Ok(record),
            Err(StoreError::NotFound(id)) => Err(RegistryError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// All historical records for a fingerprint tuple, active and revoked.
    /// Read-only; used for cross-project deduplication and audit.
    pub async fn lookup_by_fingerprint(
        &self,
        entity_type: EntityType,
        project: Project,
        country: CountryCode,
        fingerprint: Fingerprint,
    ) -> Result<Vec<IdentityRecord>> {
        let tuple = IdentityTuple::new(entity_type, project, country, fingerprint);
        Ok(self.store.lookup_by_fingerprint(&tuple).await?)
    }

    /// Recover the canonical source of an identifier.
    ///
    /// Privileged: `requester_scope` must be the record's own
    /// (project, country) scope, passed explicitly. This reverses the one
    /// privacy-preserving property of the system; callers are responsible
    /// for audit-logging every invocation.
    pub async fn decrypt_source(
        &self,
        identifier: &BuffrId,
        requester_scope: &KeyScope,
    ) -> Result<String> {
        let record = self
            .store
            .get(identifier)
            .await?
            .ok_or_else(|| RegistryError::NotFound(identifier.encode()))?;

        let owner = record.key_scope();
        if owner != *requester_scope {
            return Err(RegistryError::ScopeMismatch {
                owner,
                requested: *requester_scope,
            });
        }

        let key = self.keys.encryption_key(requester_scope)?;
        let source = key.open(&record.encrypted_source)?;
        tracing::debug!(identifier = %identifier, scope = %owner, "source decrypted");
        Ok(source)
    }

    /// Record that a separate verification step confirmed the underlying
    /// identifier.
    pub async fn mark_verified(&self, identifier: &BuffrId) -> Result<IdentityRecord> {
        match self.store.set_verified(identifier, true, now_millis()).await {
            Ok(record) => Ok(record),
            Err(StoreError::NotFound(id)) => Err(RegistryError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }
}

/// Decide between the idempotent return path and an entity mismatch.
fn resolve_existing(existing: IdentityRecord, binding: &EntityBinding) -> Result<RegisteredId> {
    if existing.binding == *binding {
        tracing::debug!(identifier = %existing.identifier, "idempotent registration hit");
        return Ok(RegisteredId {
            identifier: existing.identifier,
            newly_created: false,
        });
    }

    tracing::warn!(
        identifier = %existing.identifier,
        fingerprint = %existing.fingerprint,
        bound = %existing.binding.entity_ref(),
        requested = %binding.entity_ref(),
        "fingerprint tuple bound to a different entity"
    );
    Err(RegistryError::EntityMismatch {
        identifier: existing.identifier.encode(),
        fingerprint: existing.fingerprint,
        bound: existing.binding.entity_ref().clone(),
        requested: binding.entity_ref().clone(),
    })
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
