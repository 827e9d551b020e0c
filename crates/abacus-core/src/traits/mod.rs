//! Core traits for credential persistence and the host environment.

mod host;
mod store;

pub use host::{SessionHost, TerminationReason};
pub use store::CredentialStore;
