//! Channel-backed session host.

use tokio::sync::mpsc;
use tracing::debug;

use abacus_core::{SessionHost, TerminationReason};

/// A [`SessionHost`] that forwards terminate commands over a channel.
///
/// The receiving end belongs to whatever event loop owns navigation.
#[derive(Debug, Clone)]
pub struct ChannelHost {
    tx: mpsc::UnboundedSender<TerminationReason>,
}

impl ChannelHost {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TerminationReason>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl SessionHost for ChannelHost {
    fn terminate_session(&self, reason: TerminationReason) {
        if self.tx.send(reason).is_err() {
            debug!(%reason, "No listener for session termination");
        }
    }
}
