//! Credential store trait.

use crate::record::CredentialRecord;
use crate::tokens::{AccessToken, RefreshToken};
use crate::Result;

/// Durable persistence for the current [`CredentialRecord`].
///
/// Implementations replace and clear the record as a whole: a reader never
/// observes a record whose fields come from two different saves.
pub trait CredentialStore: Send + Sync {
    /// Overwrite the stored record.
    fn save(&self, record: &CredentialRecord) -> Result<()>;

    /// Load the stored record, if any.
    fn load(&self) -> Result<Option<CredentialRecord>>;

    /// Remove the stored record. Clearing an empty store succeeds.
    fn clear(&self) -> Result<()>;

    /// Replace only the access token, keeping refresh token and username.
    ///
    /// Returns the updated record, or `None` without writing anything if the
    /// store was empty.
    fn replace_access_token(&self, token: AccessToken) -> Result<Option<CredentialRecord>> {
        match self.load()? {
            Some(record) => {
                let record = record.with_access_token(token);
                self.save(&record)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Returns the stored access token, if any.
    fn access_token(&self) -> Result<Option<AccessToken>> {
        Ok(self.load()?.map(|r| r.access_token().clone()))
    }

    /// Returns the stored refresh token, if any.
    fn refresh_token(&self) -> Result<Option<RefreshToken>> {
        Ok(self.load()?.map(|r| r.refresh_token().clone()))
    }
}
