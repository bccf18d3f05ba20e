use thiserror::Error;

/// Normalized errors for the shortcode authorization flow.
///
/// `Declined` and `Expired` outcomes are not errors; they surface as
/// dedicated [`AuthEvent`](crate::event::AuthEvent) variants instead.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid client identity or an attempt already in flight. Raised
    /// synchronously by `start()`, never via the event stream.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network/TLS failure talking to the provider.
    #[error("Network error: {0}")]
    Transport(String),

    /// Unexpected status code or malformed body from the provider.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Token store read/write failure, including corrupt stored records.
    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.to_string())
    }
}

impl From<std::io::Error> for AuthError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}
