//! Host environment trait.

use std::fmt;

/// Why the session was terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The user logged out.
    LoggedOut,
    /// Credentials expired and could not be refreshed.
    RefreshFailed,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::LoggedOut => write!(f, "logged out"),
            TerminationReason::RefreshFailed => write!(f, "session expired"),
        }
    }
}

/// The environment hosting a session (a UI shell, a CLI, a test harness).
///
/// The session layer never navigates on its own. When a session ends it emits
/// a single terminate command and the host decides how to return the user to
/// the unauthenticated entry point. Hosts must drop any state derived from the
/// old session, as a full page reload would.
pub trait SessionHost: Send + Sync {
    /// Leave the authenticated area and return to the login entry point.
    fn terminate_session(&self, reason: TerminationReason);
}
