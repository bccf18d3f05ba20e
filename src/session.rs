use std::time::Duration;

use chrono::{DateTime, Utc};

/// Default delay between shortcode status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// One in-flight device-authorization attempt.
///
/// Owned exclusively by the attempt task; discarded on any terminal
/// outcome. The poll interval is per-session state so separate client
/// instances never share backoff.
#[derive(Debug, Clone)]
pub struct ShortcodeSession {
    /// User-facing code to enter on the trusted device.
    pub code: String,
    /// Opaque polling key; never shown to the user.
    pub handle: String,
    pub expires_at: DateTime<Utc>,
    pub poll_interval: Duration,
}

/// Status-coded outcome of one shortcode check against the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStatus {
    /// Authorization still pending (204).
    Pending,
    /// User approved; redeem this authorization code (200).
    Granted { code: String },
    /// User declined the request (403).
    Declined,
    /// Handle unknown or session expired (404).
    Expired,
    /// Provider asked us to back off (429).
    RateLimited,
}

/// Next step decided by the polling loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PollAction {
    Reschedule { interval: Duration },
    Redeem { code: String },
    Declined,
    Expired,
}

/// Maps a provider poll status onto the loop's next action.
///
/// Rate limiting doubles the interval with no upper bound; the attempt
/// keeps polling rather than giving up.
pub(crate) fn next_poll_action(status: PollStatus, interval: Duration) -> PollAction {
    match status {
        PollStatus::Pending => PollAction::Reschedule { interval },
        PollStatus::RateLimited => PollAction::Reschedule {
            interval: interval * 2,
        },
        PollStatus::Granted { code } => PollAction::Redeem { code },
        PollStatus::Declined => PollAction::Declined,
        PollStatus::Expired => PollAction::Expired,
    }
}
