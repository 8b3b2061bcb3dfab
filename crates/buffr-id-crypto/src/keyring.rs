//! Key provisioning for encryption scopes.

use std::collections::HashMap;

use buffr_id_core::KeyScope;

use crate::error::{CryptoError, Result};
use crate::key::EncryptionKey;

/// Supplies the symmetric key for a (project, country) scope.
///
/// Implementations may be backed by an in-memory table ([`StaticKeyring`])
/// or an external key-management service. A missing key is
/// [`CryptoError::EncryptionUnavailable`] and blocks identifier issuance;
/// a transient outage is the retryable [`CryptoError::KeyUnavailable`].
pub trait KeyProvider: Send + Sync {
    fn encryption_key(&self, scope: &KeyScope) -> Result<EncryptionKey>;
}

/// In-memory key table for tests and single-node deployments.
#[derive(Default)]
pub struct StaticKeyring {
    keys: HashMap<KeyScope, EncryptionKey>,
}

impl StaticKeyring {
    /// Create an empty keyring. Every lookup fails with
    /// `EncryptionUnavailable` until keys are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the key for a scope.
    pub fn insert(&mut self, scope: KeyScope, key: EncryptionKey) {
        self.keys.insert(scope, key);
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with_key(mut self, scope: KeyScope, key: EncryptionKey) -> Self {
        self.insert(scope, key);
        self
    }

    /// Provision a fresh random key for every (project, country) pair.
    pub fn with_all_scopes() -> Self {
        use buffr_id_core::{CountryCode, Project};
        let mut ring = Self::new();
        for project in Project::ALL {
            for country in CountryCode::ALL {
                ring.insert(KeyScope::new(project, country), EncryptionKey::generate());
            }
        }
        ring
    }
}

impl KeyProvider for StaticKeyring {
    fn encryption_key(&self, scope: &KeyScope) -> Result<EncryptionKey> {
        self.keys
            .get(scope)
            .cloned()
            .ok_or(CryptoError::EncryptionUnavailable { scope: *scope })
    }
}
