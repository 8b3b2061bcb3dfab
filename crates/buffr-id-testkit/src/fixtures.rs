//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use buffr_id::{IdentityRegistry, RegisteredId, RegistryConfig, Result};
use buffr_id_core::{CountryCode, EntityBinding, EntityRef, KeyScope, Project};
use buffr_id_crypto::{CryptoError, EncryptionKey, KeyProvider, StaticKeyring};
use buffr_id_store::MemoryStore;

/// A registry over a memory store with keys for every scope.
pub struct TestFixture {
    pub registry: IdentityRegistry<MemoryStore, StaticKeyring>,
}

impl TestFixture {
    /// Create a fixture with a fully provisioned keyring.
    pub fn new() -> Self {
        Self {
            registry: IdentityRegistry::new(
                MemoryStore::new(),
                StaticKeyring::with_all_scopes(),
                RegistryConfig::default(),
            ),
        }
    }

    /// Create a fixture whose keyring has no keys at all; every
    /// registration fails with `EncryptionUnavailable`.
    pub fn without_keys() -> Self {
        Self {
            registry: IdentityRegistry::new(
                MemoryStore::new(),
                StaticKeyring::new(),
                RegistryConfig::default(),
            ),
        }
    }

    /// Register a property in HOST/NA, the canonical onboarding case.
    pub async fn register_property(&self, owner: &str, raw: &str) -> Result<RegisteredId> {
        self.registry
            .register_or_fetch(
                EntityBinding::Property(EntityRef::new(owner)),
                Project::Host,
                CountryCode::Na,
                raw,
            )
            .await
    }

    /// Register an individual in PAY/NA.
    pub async fn register_individual(&self, user: &str, raw: &str) -> Result<RegisteredId> {
        self.registry
            .register_or_fetch(
                EntityBinding::Individual(EntityRef::new(user)),
                Project::Pay,
                CountryCode::Na,
                raw,
            )
            .await
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A key provider simulating a key-management outage: the retryable
/// `KeyUnavailable`, not the configuration error.
pub struct DownKeyring;

impl KeyProvider for DownKeyring {
    fn encryption_key(&self, scope: &KeyScope) -> buffr_id_crypto::Result<EncryptionKey> {
        Err(CryptoError::KeyUnavailable { scope: *scope })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_registers_and_fetches() {
        let fixture = TestFixture::new();

        let first = fixture
            .register_property("owner-001", "Buffr Host Resort")
            .await
            .unwrap();
        let second = fixture
            .register_property("owner-001", "Buffr Host Resort")
            .await
            .unwrap();

        assert!(first.newly_created);
        assert!(!second.newly_created);
        assert_eq!(first.identifier, second.identifier);
    }

    #[tokio::test]
    async fn keyless_fixture_blocks_issuance() {
        let fixture = TestFixture::without_keys();
        assert!(fixture
            .register_property("owner-001", "Buffr Host Resort")
            .await
            .is_err());
    }
}
