use tokio::sync::mpsc;

use crate::error::AuthError;
use crate::token::Token;

/// Notification emitted by a running authorization attempt.
///
/// Per attempt: `Code` at most once, `Authorized`/`Declined`/`Expired` at
/// most once each, `Error` zero or more times, and `Completed` exactly once
/// after whichever terminal outcome was reached.
#[derive(Debug)]
pub enum AuthEvent {
    /// Shortcode acquired; display this code to the user.
    Code(String),
    /// The attempt finished with a valid, persisted token.
    Authorized(Token),
    /// The user declined the authorization request.
    Declined,
    /// The shortcode session expired before the user acted on it.
    Expired,
    /// The attempt failed; terminal for the current attempt.
    Error(AuthError),
    /// Always the final event of an attempt.
    Completed,
}

/// Sending half of the attempt's event stream.
///
/// Sends are best-effort: a caller that dropped the receiver must never
/// bring down the attempt task.
pub(crate) struct EventSink {
    tx: mpsc::UnboundedSender<AuthEvent>,
}

impl EventSink {
    pub(crate) fn channel() -> (Self, mpsc::UnboundedReceiver<AuthEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub(crate) fn emit(&self, event: AuthEvent) {
        let _ = self.tx.send(event);
    }
}
