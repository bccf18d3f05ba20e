use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Access/refresh token pair issued by the token endpoint.
///
/// `expires_at` is the normalized absolute expiry; token stores may hold
/// records where only the relative `expires_in` survived, which is why both
/// fields are optional here even though the exchange helper always fills in
/// `expires_at` on freshly minted tokens.
///
/// # Example
/// ```no_run
/// use shortcode_auth::Token;
/// use chrono::{Duration, Utc};
///
/// let token = Token {
///     access_token: "access".to_string(),
///     token_type: "Bearer".to_string(),
///     refresh_token: "refresh".to_string(),
///     expires_in: Some(3600),
///     expires_at: Some(Utc::now() + Duration::seconds(3600)),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub refresh_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Token {
    /// Whether the token carries any expiry information at all.
    ///
    /// Stores refuse to persist a token for which this is false.
    pub fn has_expiry(&self) -> bool {
        self.expires_in.is_some() || self.expires_at.is_some()
    }

    /// True when the token is already inside `margin` of its literal expiry
    /// (or carries no absolute expiry to check against).
    pub fn needs_renewal(&self, margin: Duration) -> bool {
        match self.expires_at {
            Some(at) => at - Utc::now() < margin,
            None => true,
        }
    }
}
