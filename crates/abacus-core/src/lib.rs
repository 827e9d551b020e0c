//! abacus-core - Core types and traits for the abacus calculator client.
//!
//! This crate holds everything the session layer needs that does not touch the
//! network: the credential record and its token types, the [`CredentialStore`]
//! and [`SessionHost`] seams, the validated [`ApiUrl`], and the unified error type.

pub mod credentials;
pub mod error;
pub mod memory;
pub mod record;
pub mod tokens;
pub mod traits;
pub mod types;

pub use credentials::Credentials;
pub use error::Error;
pub use memory::MemoryCredentialStore;
pub use record::CredentialRecord;
pub use tokens::{AccessToken, RefreshToken};
pub use traits::{CredentialStore, SessionHost, TerminationReason};
pub use types::ApiUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
