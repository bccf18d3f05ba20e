use std::fs;
use std::path::PathBuf;

use crate::error::AuthError;
use crate::token::Token;

use super::{ensure_storable, TokenStore};

/// File-backed token store holding one JSON record.
///
/// A missing file means no token is stored; there is no separate expiry
/// metadata beyond what the record itself carries.
///
/// # Example
/// ```no_run
/// use shortcode_auth::{FileTokenStore, TokenStore};
///
/// let store = FileTokenStore::new_default();
/// let stored = store.load()?;
/// # Ok::<(), shortcode_auth::AuthError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store rooted at `~/.shortcode-auth/token.json`.
    pub fn new_default() -> Self {
        Self {
            path: default_token_path(),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<Token>, AuthError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(AuthError::Io(err.to_string())),
        };
        let token = serde_json::from_str(&raw)
            .map_err(|err| AuthError::Store(format!("stored token is corrupt: {err}")))?;
        Ok(Some(token))
    }

    fn save(&self, token: &Token) -> Result<(), AuthError> {
        ensure_storable(token)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let serialized = serde_json::to_string(token)
            .map_err(|err| AuthError::Store(err.to_string()))?;
        fs::write(&self.path, serialized)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }
}

fn default_token_path() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".shortcode-auth"))
        .unwrap_or_else(|| PathBuf::from(".shortcode-auth"))
        .join("token.json")
}
