//! In-memory credential store.

use std::sync::{PoisonError, RwLock};

use crate::record::CredentialRecord;
use crate::tokens::AccessToken;
use crate::traits::CredentialStore;
use crate::Result;

/// A [`CredentialStore`] that lives only as long as the process.
///
/// Useful for tests and for hosts that deliberately forget sessions on exit.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    record: RwLock<Option<CredentialRecord>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a record.
    pub fn with_record(record: CredentialRecord) -> Self {
        Self {
            record: RwLock::new(Some(record)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn save(&self, record: &CredentialRecord) -> Result<()> {
        let mut slot = self.record.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(record.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<CredentialRecord>> {
        let slot = self.record.read().unwrap_or_else(PoisonError::into_inner);
        Ok(slot.clone())
    }

    fn clear(&self) -> Result<()> {
        let mut slot = self.record.write().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
        Ok(())
    }

    fn replace_access_token(&self, token: AccessToken) -> Result<Option<CredentialRecord>> {
        let mut slot = self.record.write().unwrap_or_else(PoisonError::into_inner);
        let updated = slot.take().map(|record| record.with_access_token(token));
        *slot = updated.clone();
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::RefreshToken;

    fn record(access: &str) -> CredentialRecord {
        CredentialRecord::new(AccessToken::new(access), RefreshToken::new("R1"), "u1")
    }

    #[test]
    fn save_then_load_returns_same_record() {
        let store = MemoryCredentialStore::new();
        store.save(&record("T1")).unwrap();
        assert_eq!(store.load().unwrap(), Some(record("T1")));
    }

    #[test]
    fn clear_empties_store() {
        let store = MemoryCredentialStore::with_record(record("T1"));
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        assert!(store.access_token().unwrap().is_none());
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn replace_access_token_keeps_other_fields() {
        let store = MemoryCredentialStore::with_record(record("T1"));
        let updated = store
            .replace_access_token(AccessToken::new("T2"))
            .unwrap()
            .unwrap();

        assert_eq!(updated, record("T2"));
        assert_eq!(store.load().unwrap(), Some(record("T2")));
    }

    #[test]
    fn replace_access_token_on_empty_store_writes_nothing() {
        let store = MemoryCredentialStore::new();
        assert!(store
            .replace_access_token(AccessToken::new("T2"))
            .unwrap()
            .is_none());
        assert!(store.load().unwrap().is_none());
    }
}
