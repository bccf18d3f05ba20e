//! Token persistence adapters.
//!
//! Adapters are plain get/set over one serialized token record. An absent
//! record is the `Ok(None)` result, never an error; a record that exists
//! but fails to parse is reported as [`AuthError::Store`] so callers can
//! tell the two apart.

pub mod cookie;
pub mod file;

pub use cookie::{CookieJar, CookieTokenStore};
pub use file::FileTokenStore;

use crate::error::AuthError;
use crate::token::Token;

/// Storage abstraction for the persisted token record.
pub trait TokenStore: Send + Sync {
    /// Retrieve the stored token, `None` when no record exists.
    fn load(&self) -> Result<Option<Token>, AuthError>;

    /// Persist the token, superseding any existing record.
    ///
    /// Rejects tokens that carry no expiry information at all.
    fn save(&self, token: &Token) -> Result<(), AuthError>;
}

/// Shared structural check applied before any adapter persists a record.
pub(crate) fn ensure_storable(token: &Token) -> Result<(), AuthError> {
    if !token.has_expiry() {
        return Err(AuthError::Store(
            "token must have an expiry time".to_string(),
        ));
    }
    Ok(())
}
