//! Database schema migrations for SQLite.
//!
//! Simple versioned migrations: each version is a SQL batch that moves the
//! schema from N-1 to N.

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Initialize or migrate the database schema.
///
/// Idempotent; safe to call on every open.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    let current: u32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    if current < CURRENT_VERSION {
        let tx = conn.transaction()?;

        for version in (current + 1)..=CURRENT_VERSION {
            apply_migration(&tx, version)?;

            tx.execute(
                "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![version, now_millis()],
            )?;
        }

        tx.commit()?;
    }

    Ok(())
}

fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => apply_v1(conn),
        _ => Err(StoreError::Migration(format!(
            "unknown migration version: {}",
            version
        ))),
    }
}

/// Migration v1: identity records with both uniqueness guarantees.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- One row per issued identifier. Append-only: rows are revoked,
        -- never deleted.
        CREATE TABLE identity_records (
            identifier TEXT PRIMARY KEY,            -- full BFR-... string
            entity_type TEXT NOT NULL,              -- IND | PROP | ORG
            project TEXT NOT NULL,                  -- PAY | SIGN | LEND | HOST
            country TEXT NOT NULL,                  -- two-letter allow-list code
            fingerprint TEXT NOT NULL,              -- 8 lowercase hex chars
            bound_entity TEXT NOT NULL,             -- opaque local reference
            envelope_nonce BLOB NOT NULL,           -- 12 bytes
            envelope_ciphertext BLOB NOT NULL,      -- AEAD ciphertext + tag
            status TEXT NOT NULL DEFAULT 'active',  -- 'active' | 'revoked'
            verified INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,            -- Unix ms
            updated_at INTEGER NOT NULL             -- Unix ms
        );

        -- The idempotency invariant: at most one Active record per tuple.
        -- Partial index so revocation releases the slot.
        CREATE UNIQUE INDEX idx_identity_active_tuple
            ON identity_records(entity_type, project, country, fingerprint)
            WHERE status = 'active';

        -- Historical lookups across active and revoked records.
        CREATE INDEX idx_identity_tuple
            ON identity_records(entity_type, project, country, fingerprint);

        CREATE INDEX idx_identity_bound_entity
            ON identity_records(bound_entity);
        "#,
    )?;

    Ok(())
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_creates_tables() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"identity_records".to_string()));
        assert!(tables.contains(&"schema_migrations".to_string()));
    }

    #[test]
    fn test_migration_creates_partial_unique_index() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();

        let sql: String = conn
            .query_row(
                "SELECT sql FROM sqlite_master WHERE name = 'idx_identity_active_tuple'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(sql.contains("UNIQUE"));
        assert!(sql.contains("WHERE status = 'active'"));
    }

    #[test]
    fn test_migration_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        migrate(&mut conn).unwrap();
        migrate(&mut conn).unwrap();

        let version: u32 = conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(version, 1);
    }
}
