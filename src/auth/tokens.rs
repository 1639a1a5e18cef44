use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

use super::credentials::{CredentialStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

/// Accessors for the stored access/refresh token pair.
///
/// Invariant: the two entries are only ever written or cleared together, so
/// a stale access token is never paired with a mismatched refresh token.
pub struct TokenStore {
    store: Arc<dyn CredentialStore>,
}

impl TokenStore {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// The stored access token, if any. Store read errors degrade to `None`.
    pub fn access_token(&self) -> Option<String> {
        self.read(ACCESS_TOKEN_KEY)
    }

    /// The stored refresh token, if any. Store read errors degrade to `None`.
    pub fn refresh_token(&self) -> Option<String> {
        self.read(REFRESH_TOKEN_KEY)
    }

    /// Store both tokens. If the second write fails, the first is rolled
    /// back so the pair stays consistent.
    pub fn store_pair(&self, access: &str, refresh: &str) -> Result<()> {
        self.store.set(ACCESS_TOKEN_KEY, access)?;
        if let Err(err) = self.store.set(REFRESH_TOKEN_KEY, refresh) {
            if let Err(rollback) = self.store.remove(ACCESS_TOKEN_KEY) {
                warn!(error = %rollback, "failed to roll back access token");
            }
            return Err(err);
        }
        Ok(())
    }

    /// Remove both tokens. Both removals are attempted even if the first
    /// fails; the first error is reported.
    pub fn clear(&self) -> Result<()> {
        let access = self.store.remove(ACCESS_TOKEN_KEY);
        let refresh = self.store.remove(REFRESH_TOKEN_KEY);
        access.and(refresh)
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "failed to read credential");
                None
            }
        }
    }
}
