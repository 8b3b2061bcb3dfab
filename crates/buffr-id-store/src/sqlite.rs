//! SQLite implementation of the IdentityStore trait.
//!
//! The primary storage backend. Uses rusqlite with bundled SQLite, wrapped
//! in async via tokio::spawn_blocking. Atomicity of the conditional insert
//! rests on the partial unique index created by migration v1.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use buffr_id_core::{
    BuffrId, EntityBinding, EntityRef, EntityType, IdStatus, IdentityRecord, KeyScope,
    SourceEnvelope,
};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{IdentityStore, IdentityTuple, InsertOutcome};

/// SQLite-based identity store.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking to
/// avoid blocking the async runtime.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database. Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn lock_error(e: impl std::fmt::Display) -> StoreError {
    StoreError::Database(rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
        Some(format!("mutex poisoned: {}", e)),
    ))
}

fn join_error(e: impl std::fmt::Display) -> StoreError {
    StoreError::Database(rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
        Some(format!("spawn_blocking failed: {}", e)),
    ))
}

const RECORD_COLUMNS: &str = "identifier, entity_type, bound_entity, envelope_nonce, \
     envelope_ciphertext, status, verified, created_at, updated_at";

/// Convert a row to an IdentityRecord.
///
/// The identifier column is authoritative for the typed components; the
/// entity_type/project/country/fingerprint columns exist for indexing.
fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<IdentityRecord> {
    let identifier_text: String = row.get("identifier")?;
    let entity_code: String = row.get("entity_type")?;
    let bound_entity: String = row.get("bound_entity")?;
    let nonce_bytes: Vec<u8> = row.get("envelope_nonce")?;
    let ciphertext: Vec<u8> = row.get("envelope_ciphertext")?;
    let status_code: String = row.get("status")?;
    let verified: bool = row.get("verified")?;
    let created_at: i64 = row.get("created_at")?;
    let updated_at: i64 = row.get("updated_at")?;

    let invalid = |what: &str| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("{}: {}", what, identifier_text).into(),
        )
    };

    let identifier: BuffrId = identifier_text.parse().map_err(|_| invalid("unparseable identifier"))?;

    let entity_type =
        EntityType::from_code(&entity_code).ok_or_else(|| invalid("unknown entity_type"))?;
    if entity_type != identifier.entity_type {
        return Err(invalid("entity_type column disagrees with identifier"));
    }

    let entity_ref = EntityRef::new(bound_entity);
    let binding = match entity_type {
        EntityType::Individual => EntityBinding::Individual(entity_ref),
        EntityType::Property => EntityBinding::Property(entity_ref),
        EntityType::Organization => EntityBinding::Organization(entity_ref),
    };

    let nonce: [u8; 12] = nonce_bytes
        .try_into()
        .map_err(|_| invalid("envelope nonce is not 12 bytes"))?;

    let status = IdStatus::from_code(&status_code).ok_or_else(|| invalid("unknown status"))?;

    Ok(IdentityRecord {
        fingerprint: identifier.fingerprint,
        encrypted_source: SourceEnvelope {
            scope: KeyScope::new(identifier.project, identifier.country),
            nonce,
            ciphertext,
        },
        identifier,
        binding,
        status,
        verified,
        created_at,
        updated_at,
    })
}

fn select_active(
    conn: &Connection,
    tuple: &IdentityTuple,
) -> Result<Option<IdentityRecord>> {
    let record = conn
        .query_row(
            &format!(
                "SELECT {RECORD_COLUMNS} FROM identity_records
                 WHERE entity_type = ?1 AND project = ?2 AND country = ?3
                   AND fingerprint = ?4 AND status = 'active'"
            ),
            params![
                tuple.entity_type.code(),
                tuple.project.code(),
                tuple.country.code(),
                tuple.fingerprint.to_hex(),
            ],
            row_to_record,
        )
        .optional()?;
    Ok(record)
}

fn select_by_identifier(conn: &Connection, id: &BuffrId) -> Result<Option<IdentityRecord>> {
    let record = conn
        .query_row(
            &format!("SELECT {RECORD_COLUMNS} FROM identity_records WHERE identifier = ?1"),
            params![id.encode()],
            row_to_record,
        )
        .optional()?;
    Ok(record)
}

#[async_trait]
impl IdentityStore for SqliteStore {
    async fn insert_if_absent(&self, record: &IdentityRecord) -> Result<InsertOutcome> {
        let record = record.clone();
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock().map_err(lock_error)?;
            let tx = conn.transaction()?;

            let tuple = IdentityTuple::of(&record.identifier);
            if let Some(existing) = select_active(&tx, &tuple)? {
                return Ok(InsertOutcome::ActiveExists {
                    existing: Box::new(existing),
                });
            }

            let insert = tx.execute(
                "INSERT INTO identity_records (
                    identifier, entity_type, project, country, fingerprint,
                    bound_entity, envelope_nonce, envelope_ciphertext,
                    status, verified, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    record.identifier.encode(),
                    record.entity_type().code(),
                    record.project().code(),
                    record.country().code(),
                    record.fingerprint.to_hex(),
                    record.binding.entity_ref().as_str(),
                    record.encrypted_source.nonce.as_slice(),
                    record.encrypted_source.ciphertext.as_slice(),
                    record.status.code(),
                    record.verified,
                    record.created_at,
                    record.updated_at,
                ],
            );

            match insert {
                Ok(_) => {
                    tx.commit()?;
                    Ok(InsertOutcome::Inserted)
                }
                // Another connection won the partial-index race between our
                // check and the insert. Roll back and hand back the winner.
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == ErrorCode::ConstraintViolation =>
                {
                    tracing::debug!(
                        identifier = %record.identifier,
                        "conditional insert lost the active-slot race"
                    );
                    tx.rollback()?;
                    match select_active(&conn, &tuple)? {
                        Some(existing) => Ok(InsertOutcome::ActiveExists {
                            existing: Box::new(existing),
                        }),
                        // Tuple slot is free, so the collision was on the
                        // identifier primary key: a revoked record from the
                        // same second. Caller retries with a fresh timestamp.
                        None => Err(StoreError::IdentifierExists(record.identifier.encode())),
                    }
                }
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(join_error)?
    }

    async fn get(&self, id: &BuffrId) -> Result<Option<IdentityRecord>> {
        let id = id.clone();
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(lock_error)?;
            select_by_identifier(&conn, &id)
        })
        .await
        .map_err(join_error)?
    }

    async fn find_active(&self, tuple: &IdentityTuple) -> Result<Option<IdentityRecord>> {
        let tuple = *tuple;
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(lock_error)?;
            select_active(&conn, &tuple)
        })
        .await
        .map_err(join_error)?
    }

    async fn lookup_by_fingerprint(&self, tuple: &IdentityTuple) -> Result<Vec<IdentityRecord>> {
        let tuple = *tuple;
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(lock_error)?;

            let mut stmt = conn.prepare(&format!(
                "SELECT {RECORD_COLUMNS} FROM identity_records
                 WHERE entity_type = ?1 AND project = ?2 AND country = ?3
                   AND fingerprint = ?4
                 ORDER BY created_at ASC, identifier ASC"
            ))?;

            let rows = stmt.query_map(
                params![
                    tuple.entity_type.code(),
                    tuple.project.code(),
                    tuple.country.code(),
                    tuple.fingerprint.to_hex(),
                ],
                row_to_record,
            )?;

            let mut records = Vec::new();
            for row in rows {
                records.push(row?);
            }
            Ok(records)
        })
        .await
        .map_err(join_error)?
    }

    async fn revoke(&self, id: &BuffrId, now: i64) -> Result<IdentityRecord> {
        let id = id.clone();
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(lock_error)?;

            let existing = select_by_identifier(&conn, &id)?
                .ok_or_else(|| StoreError::NotFound(id.encode()))?;

            // Revoked is terminal; a second revoke is a no-op.
            if existing.status == IdStatus::Revoked {
                return Ok(existing);
            }

            conn.execute(
                "UPDATE identity_records
                 SET status = 'revoked', updated_at = ?2
                 WHERE identifier = ?1",
                params![id.encode(), now],
            )?;

            select_by_identifier(&conn, &id)?.ok_or_else(|| StoreError::NotFound(id.encode()))
        })
        .await
        .map_err(join_error)?
    }

    async fn set_verified(
        &self,
        id: &BuffrId,
        verified: bool,
        now: i64,
    ) -> Result<IdentityRecord> {
        let id = id.clone();
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(lock_error)?;

            let updated = conn.execute(
                "UPDATE identity_records
                 SET verified = ?2, updated_at = ?3
                 WHERE identifier = ?1",
                params![id.encode(), verified, now],
            )?;
            if updated == 0 {
                return Err(StoreError::NotFound(id.encode()));
            }

            select_by_identifier(&conn, &id)?.ok_or_else(|| StoreError::NotFound(id.encode()))
        })
        .await
        .map_err(join_error)?
    }
}
