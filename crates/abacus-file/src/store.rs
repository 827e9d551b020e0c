//! Credential persistence in a single JSON file.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use abacus_core::error::{Error, StoreError};
use abacus_core::{AccessToken, CredentialRecord, CredentialStore, RefreshToken, Result};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

fn map_io(err: std::io::Error) -> Error {
    Error::Store(StoreError::Io {
        message: err.to_string(),
    })
}

fn map_format(err: serde_json::Error) -> Error {
    Error::Store(StoreError::Format {
        message: err.to_string(),
    })
}

/// On-disk layout. One plain string per key.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,
}

impl StoredCredentials {
    fn from_record(record: &CredentialRecord) -> Self {
        Self {
            token: Some(record.access_token().as_str().to_string()),
            refresh_token: Some(record.refresh_token().as_str().to_string()),
            username: Some(record.username().to_string()),
        }
    }

    fn into_record(self) -> Option<CredentialRecord> {
        match (self.token, self.refresh_token, self.username) {
            (Some(token), Some(refresh_token), Some(username)) => Some(CredentialRecord::new(
                AccessToken::new(token),
                RefreshToken::new(refresh_token),
                username,
            )),
            _ => None,
        }
    }
}

/// A [`CredentialStore`] backed by a JSON file that survives restarts.
///
/// Writes go to a temporary file that is renamed over the target, and every
/// operation holds an advisory lock on a sibling `.lock` file, so concurrent
/// processes see either the old record or the new one. A file missing any of
/// `token`, `refresh_token` or `username` loads as empty.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store persisting to the given file path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the credential file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the lock file path.
    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    fn open_lock(&self) -> Result<File> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(map_io)?;
        }

        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(map_io)
    }

    fn read_unlocked(&self) -> Result<Option<CredentialRecord>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(map_io(err)),
        };

        let stored: StoredCredentials = serde_json::from_str(&content).map_err(map_format)?;
        let record = stored.into_record();
        if record.is_none() {
            warn!(path = %self.path.display(), "Ignoring incomplete credential file");
        }
        Ok(record)
    }

    fn write_unlocked(&self, record: &CredentialRecord) -> Result<()> {
        let content =
            serde_json::to_string_pretty(&StoredCredentials::from_record(record)).map_err(map_format)?;

        let tmp_path = self
            .path
            .with_extension(format!("{}.tmp", Uuid::new_v4().simple()));

        let mut file = File::create(&tmp_path).map_err(map_io)?;

        // Set restrictive permissions before any secret is written (Unix only)
        #[cfg(unix)]
        {
            let mut perms = file.metadata().map_err(map_io)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&tmp_path, perms).map_err(map_io)?;
        }

        file.write_all(content.as_bytes()).map_err(map_io)?;
        file.sync_data().map_err(map_io)?;
        drop(file);

        if let Err(err) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(map_io(err));
        }

        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    #[instrument(skip(self, record), fields(path = %self.path.display(), username = %record.username()))]
    fn save(&self, record: &CredentialRecord) -> Result<()> {
        let lock = self.open_lock()?;
        lock.lock_exclusive().map_err(map_io)?;

        self.write_unlocked(record)?;
        debug!("Saved credentials");

        lock.unlock().map_err(map_io)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<CredentialRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let lock = self.open_lock()?;
        lock.lock_shared().map_err(map_io)?;

        let record = self.read_unlocked()?;

        lock.unlock().map_err(map_io)?;
        Ok(record)
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn clear(&self) -> Result<()> {
        let lock = self.open_lock()?;
        lock.lock_exclusive().map_err(map_io)?;

        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Cleared credentials"),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(map_io(err)),
        }

        lock.unlock().map_err(map_io)?;
        Ok(())
    }

    #[instrument(skip(self, token), fields(path = %self.path.display()))]
    fn replace_access_token(&self, token: AccessToken) -> Result<Option<CredentialRecord>> {
        let lock = self.open_lock()?;
        lock.lock_exclusive().map_err(map_io)?;

        // Read and write under one lock so a concurrent clear cannot be undone
        let updated = match self.read_unlocked()? {
            Some(record) => {
                let record = record.with_access_token(token);
                self.write_unlocked(&record)?;
                debug!("Replaced access token");
                Some(record)
            }
            None => None,
        };

        lock.unlock().map_err(map_io)?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, FileCredentialStore) {
        let tmp = TempDir::new().unwrap();
        let store = FileCredentialStore::new(tmp.path().join("nested").join("credentials.json"));
        (tmp, store)
    }

    fn record(access: &str, refresh: &str, username: &str) -> CredentialRecord {
        CredentialRecord::new(
            AccessToken::new(access),
            RefreshToken::new(refresh),
            username,
        )
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let (_tmp, store) = create_test_store();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let (_tmp, store) = create_test_store();
        let saved = record("T1", "R1", "u1");

        store.save(&saved).unwrap();

        assert_eq!(store.load().unwrap(), Some(saved));
    }

    #[test]
    fn test_persists_across_instances() {
        let (_tmp, store) = create_test_store();
        store.save(&record("T1", "R1", "u1")).unwrap();

        let reopened = FileCredentialStore::new(store.path());
        assert_eq!(reopened.load().unwrap(), Some(record("T1", "R1", "u1")));
    }

    #[test]
    fn test_file_uses_documented_keys() {
        let (_tmp, store) = create_test_store();
        store.save(&record("T1", "R1", "u1")).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["token"], "T1");
        assert_eq!(raw["refresh_token"], "R1");
        assert_eq!(raw["username"], "u1");
    }

    #[test]
    fn test_save_overwrites_previous_record() {
        let (_tmp, store) = create_test_store();
        store.save(&record("T1", "R1", "u1")).unwrap();
        store.save(&record("T9", "R9", "u9")).unwrap();

        assert_eq!(store.load().unwrap(), Some(record("T9", "R9", "u9")));
    }

    #[test]
    fn test_clear() {
        let (_tmp, store) = create_test_store();
        store.save(&record("T1", "R1", "u1")).unwrap();

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        assert!(!store.path().exists());

        // Clearing an empty store is not an error
        store.clear().unwrap();
    }

    #[test]
    fn test_partial_file_loads_as_empty() {
        let (_tmp, store) = create_test_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"token":"T1","username":"u1"}"#).unwrap();

        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let (_tmp, store) = create_test_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "not json").unwrap();

        assert!(matches!(
            store.load(),
            Err(Error::Store(StoreError::Format { .. }))
        ));
    }

    #[test]
    fn test_replace_access_token() {
        let (_tmp, store) = create_test_store();
        store.save(&record("T1", "R1", "u1")).unwrap();

        let updated = store
            .replace_access_token(AccessToken::new("T2"))
            .unwrap();

        assert_eq!(updated, Some(record("T2", "R1", "u1")));
        assert_eq!(store.load().unwrap(), Some(record("T2", "R1", "u1")));
    }

    #[test]
    fn test_replace_access_token_after_clear_writes_nothing() {
        let (_tmp, store) = create_test_store();
        store.save(&record("T1", "R1", "u1")).unwrap();
        store.clear().unwrap();

        assert!(store
            .replace_access_token(AccessToken::new("T2"))
            .unwrap()
            .is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_no_temporary_files_left_behind() {
        let (_tmp, store) = create_test_store();
        store.save(&record("T1", "R1", "u1")).unwrap();
        store.save(&record("T2", "R1", "u1")).unwrap();

        let leftovers: Vec<_> = fs::read_dir(store.path().parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_is_private() {
        let (_tmp, store) = create_test_store();
        store.save(&record("T1", "R1", "u1")).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
