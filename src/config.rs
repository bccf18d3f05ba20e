use crate::error::AuthError;

const DEFAULT_SHORTCODE_PATH: &str = "/oauth/shortcode";
const DEFAULT_SHORTCODE_CHECK_PATH: &str = "/oauth/shortcode/check/{handle}";
const DEFAULT_TOKEN_PATH: &str = "/oauth/token";
const DEFAULT_CURRENT_USER_PATH: &str = "/users/current";

/// Immutable OAuth client identity.
///
/// Validated once when an authorization attempt starts; never mutated.
///
/// # Example
/// ```
/// use shortcode_auth::ClientIdentity;
///
/// let identity = ClientIdentity::new("my-client", ["chat:connect", "chat:chat"])
///     .with_secret("s3cret");
/// ```
#[derive(Debug, Clone)]
pub struct ClientIdentity {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub scopes: Vec<String>,
}

impl ClientIdentity {
    pub fn new<I, S>(client_id: impl Into<String>, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            scopes: scopes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    /// Space-joined scope list as sent on the wire.
    pub(crate) fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }

    pub(crate) fn validate(&self) -> Result<(), AuthError> {
        if self.client_id.is_empty() {
            return Err(AuthError::Configuration("invalid client id".to_string()));
        }
        if let Some(secret) = &self.client_secret {
            if secret.is_empty() {
                return Err(AuthError::Configuration(
                    "invalid client secret".to_string(),
                ));
            }
        }
        if self.scopes.is_empty() {
            return Err(AuthError::Configuration(
                "client must request at least one scope".to_string(),
            ));
        }
        Ok(())
    }
}

/// Identity-provider endpoint layout.
///
/// Only the base URL is required; the relative paths default to the
/// provider's documented layout and can be overridden per endpoint.
///
/// # Example
/// ```
/// use shortcode_auth::ProviderEndpoints;
///
/// let endpoints = ProviderEndpoints::new("https://provider.example/api/v1");
/// ```
#[derive(Debug, Clone)]
pub struct ProviderEndpoints {
    base_url: String,
    shortcode_path: String,
    shortcode_check_path: String,
    token_path: String,
    current_user_path: String,
}

impl ProviderEndpoints {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            shortcode_path: DEFAULT_SHORTCODE_PATH.to_string(),
            shortcode_check_path: DEFAULT_SHORTCODE_CHECK_PATH.to_string(),
            token_path: DEFAULT_TOKEN_PATH.to_string(),
            current_user_path: DEFAULT_CURRENT_USER_PATH.to_string(),
        }
    }

    pub fn with_shortcode_path(mut self, path: impl Into<String>) -> Self {
        self.shortcode_path = path.into();
        self
    }

    pub fn with_shortcode_check_path(mut self, path: impl Into<String>) -> Self {
        self.shortcode_check_path = path.into();
        self
    }

    pub fn with_token_path(mut self, path: impl Into<String>) -> Self {
        self.token_path = path.into();
        self
    }

    pub fn with_current_user_path(mut self, path: impl Into<String>) -> Self {
        self.current_user_path = path.into();
        self
    }

    pub(crate) fn shortcode_url(&self) -> String {
        format!("{}{}", self.base_url, self.shortcode_path)
    }

    pub(crate) fn shortcode_check_url(&self, handle: &str) -> String {
        format!(
            "{}{}",
            self.base_url,
            self.shortcode_check_path.replace("{handle}", handle)
        )
    }

    pub(crate) fn token_url(&self) -> String {
        format!("{}{}", self.base_url, self.token_path)
    }

    pub(crate) fn current_user_url(&self) -> String {
        format!("{}{}", self.base_url, self.current_user_path)
    }
}
