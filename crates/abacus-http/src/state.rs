//! Observable session state for the host.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::warn;

use abacus_core::CredentialStore;

/// Whether a user is signed in, and who.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub authenticated: bool,
    pub username: Option<String>,
}

impl AuthSnapshot {
    fn signed_in(username: &str) -> Self {
        Self {
            authenticated: true,
            username: Some(username.to_string()),
        }
    }
}

/// In-memory session state derived from the [`CredentialStore`].
///
/// Initialized from the store at startup and updated only by the session
/// layer on login, signup, logout and refresh failure. Everything else reads
/// it, either by [`snapshot`](Self::snapshot) or by watching for changes with
/// [`subscribe`](Self::subscribe). Clones share the same state.
#[derive(Debug, Clone)]
pub struct AuthState {
    tx: Arc<watch::Sender<AuthSnapshot>>,
}

impl AuthState {
    /// Start signed out.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AuthSnapshot::default());
        Self { tx: Arc::new(tx) }
    }

    /// Derive the state from whatever record the store holds.
    ///
    /// An unreadable store counts as signed out.
    pub fn from_store(store: &dyn CredentialStore) -> Self {
        let state = Self::new();
        match store.load() {
            Ok(Some(record)) => state.sign_in(record.username()),
            Ok(None) => {}
            Err(err) => warn!(error = %err, "Could not read credential store, starting signed out"),
        }
        state
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.tx.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().authenticated
    }

    pub fn username(&self) -> Option<String> {
        self.tx.borrow().username.clone()
    }

    /// Watch for session transitions.
    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.tx.subscribe()
    }

    pub(crate) fn sign_in(&self, username: &str) {
        self.tx.send_replace(AuthSnapshot::signed_in(username));
    }

    pub(crate) fn sign_out(&self) {
        self.tx.send_replace(AuthSnapshot::default());
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}
