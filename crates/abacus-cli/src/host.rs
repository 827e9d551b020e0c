//! Session host for a one-shot CLI process.

use std::sync::atomic::{AtomicBool, Ordering};

use abacus_core::{SessionHost, TerminationReason};
use tracing::debug;

use crate::output;

/// Reacts to session termination by telling the user and remembering it.
///
/// A CLI has no login screen to return to. Expiry is reported once and the
/// process exits with a distinct status after the command finishes.
#[derive(Debug, Default)]
pub struct CliHost {
    expired: AtomicBool,
}

impl CliHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the session ended because it could not be refreshed.
    pub fn session_expired(&self) -> bool {
        self.expired.load(Ordering::SeqCst)
    }
}

impl SessionHost for CliHost {
    fn terminate_session(&self, reason: TerminationReason) {
        debug!(%reason, "Session terminated");

        if reason == TerminationReason::RefreshFailed && !self.expired.swap(true, Ordering::SeqCst)
        {
            output::error("Your session has expired. Run 'abacus login' to sign in again.");
        }
    }
}
