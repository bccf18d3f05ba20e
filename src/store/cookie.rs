use chrono::{DateTime, Duration, Utc};

use crate::error::AuthError;
use crate::token::Token;

use super::{ensure_storable, TokenStore};

/// Minimal cookie access capability.
///
/// Keeps [`CookieTokenStore`] polymorphic over the actual cookie medium
/// (embedded webview, HTTP response headers, a test jar).
pub trait CookieJar: Send + Sync {
    fn read(&self, name: &str) -> Option<String>;
    fn write(&self, name: &str, value: &str, expires: DateTime<Utc>);
}

/// Cookie-backed token store.
///
/// The whole token record is serialized into a single named cookie whose
/// expiry matches the token's own expiry, so the medium drops the record
/// at the same moment the token stops being usable.
pub struct CookieTokenStore<J> {
    jar: J,
    name: String,
}

impl<J: CookieJar> CookieTokenStore<J> {
    pub fn new(jar: J, name: impl Into<String>) -> Self {
        Self {
            jar,
            name: name.into(),
        }
    }
}

impl<J: CookieJar> TokenStore for CookieTokenStore<J> {
    fn load(&self) -> Result<Option<Token>, AuthError> {
        let raw = match self.jar.read(&self.name) {
            Some(value) => value,
            None => return Ok(None),
        };
        let token = serde_json::from_str(&raw)
            .map_err(|err| AuthError::Store(format!("stored cookie is corrupt: {err}")))?;
        Ok(Some(token))
    }

    fn save(&self, token: &Token) -> Result<(), AuthError> {
        ensure_storable(token)?;
        // ensure_storable guarantees at least one expiry source.
        let expires = match token.expires_at {
            Some(at) => at,
            None => Utc::now() + Duration::seconds(token.expires_in.unwrap_or(0)),
        };
        let serialized =
            serde_json::to_string(token).map_err(|err| AuthError::Store(err.to_string()))?;
        self.jar.write(&self.name, &serialized, expires);
        Ok(())
    }
}
