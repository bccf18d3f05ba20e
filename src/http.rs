use chrono::{Duration, Utc};
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::{ClientIdentity, ProviderEndpoints};
use crate::error::AuthError;
use crate::session::PollStatus;
use crate::token::Token;

/// Single request/response exchanges against the identity provider.
///
/// Every network-touching step of the flow goes through one of these
/// helpers; each issues exactly one round trip and parses the JSON body
/// into a typed result.
pub struct ApiClient {
    http: reqwest::Client,
    endpoints: ProviderEndpoints,
}

/// Successful shortcode acquisition payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ShortcodeGrant {
    pub code: String,
    pub handle: String,
    pub expires_in: i64,
}

/// Credential presented to the token endpoint.
///
/// Exactly one of an authorization code or a refresh token backs a grant;
/// the enum makes supplying neither unrepresentable.
#[derive(Debug, Clone)]
pub enum TokenGrant {
    AuthorizationCode(String),
    RefreshToken(String),
}

#[derive(Debug, Deserialize)]
struct CheckGrantedBody {
    code: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    token_type: String,
    expires_in: i64,
    refresh_token: String,
}

impl ApiClient {
    pub fn new(endpoints: ProviderEndpoints) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoints,
        }
    }

    /// Request a new shortcode session for the given identity.
    pub async fn request_shortcode(
        &self,
        identity: &ClientIdentity,
    ) -> Result<ShortcodeGrant, AuthError> {
        let mut body = json!({
            "client_id": identity.client_id,
            "scope": identity.scope_string(),
        });
        if let Some(secret) = &identity.client_secret {
            body["client_secret"] = json!(secret);
        }
        let resp = self
            .http
            .post(self.endpoints.shortcode_url())
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(AuthError::Protocol(format!(
                "shortcode request failed with status {status}"
            )));
        }
        let grant: ShortcodeGrant = parse_json("shortcode response", &text)?;
        debug!(handle = %grant.handle, expires_in = grant.expires_in, "shortcode acquired");
        Ok(grant)
    }

    /// One status check of a shortcode session, keyed by its handle.
    pub async fn check_shortcode(&self, handle: &str) -> Result<PollStatus, AuthError> {
        let resp = self
            .http
            .get(self.endpoints.shortcode_check_url(handle))
            .send()
            .await?;
        let status = resp.status();
        match status {
            StatusCode::NO_CONTENT => Ok(PollStatus::Pending),
            StatusCode::OK => {
                let text = resp.text().await?;
                let body: CheckGrantedBody = parse_json("shortcode check response", &text)?;
                Ok(PollStatus::Granted { code: body.code })
            }
            StatusCode::FORBIDDEN => Ok(PollStatus::Declined),
            StatusCode::NOT_FOUND => Ok(PollStatus::Expired),
            StatusCode::TOO_MANY_REQUESTS => Ok(PollStatus::RateLimited),
            other => Err(AuthError::Protocol(format!(
                "shortcode check failed with status {other}"
            ))),
        }
    }

    /// Redeem an authorization code or refresh token for a token pair.
    ///
    /// On success the returned token always carries an absolute
    /// `expires_at` computed from the response's `expires_in`.
    pub async fn exchange_token(
        &self,
        identity: &ClientIdentity,
        grant: TokenGrant,
    ) -> Result<Token, AuthError> {
        let mut body = match &grant {
            TokenGrant::AuthorizationCode(code) => json!({
                "grant_type": "authorization_code",
                "client_id": identity.client_id,
                "code": code,
            }),
            TokenGrant::RefreshToken(refresh_token) => json!({
                "grant_type": "refresh_token",
                "client_id": identity.client_id,
                "refresh_token": refresh_token,
            }),
        };
        if let Some(secret) = &identity.client_secret {
            body["client_secret"] = json!(secret);
        }
        let resp = self
            .http
            .post(self.endpoints.token_url())
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(AuthError::Protocol(format!(
                "token exchange failed with status {status}: {}",
                text.trim()
            )));
        }
        let payload: TokenResponse = parse_json("token response", &text)?;
        let now = Utc::now();
        debug!(grant = ?grant_kind(&grant), "token exchange succeeded");
        Ok(Token {
            access_token: payload.access_token,
            token_type: payload.token_type,
            refresh_token: payload.refresh_token,
            expires_in: Some(payload.expires_in),
            expires_at: Some(now + Duration::seconds(payload.expires_in)),
        })
    }

    /// Lightweight liveness probe for a stored token.
    ///
    /// Any failure, transport included, counts as a failed probe; the
    /// caller falls back to the refresh path rather than erroring out.
    pub async fn probe_token(&self, token: &Token) -> bool {
        let request = self
            .http
            .get(self.endpoints.current_user_url())
            .header(
                AUTHORIZATION,
                format!("{} {}", token.token_type, token.access_token),
            )
            .send();
        match request.await {
            Ok(resp) => resp.status().is_success(),
            Err(err) => {
                debug!(error = %err, "liveness probe failed");
                false
            }
        }
    }
}

fn grant_kind(grant: &TokenGrant) -> &'static str {
    match grant {
        TokenGrant::AuthorizationCode(_) => "authorization_code",
        TokenGrant::RefreshToken(_) => "refresh_token",
    }
}

fn parse_json<T: DeserializeOwned>(context: &str, body: &str) -> Result<T, AuthError> {
    serde_json::from_str(body)
        .map_err(|err| AuthError::Protocol(format!("malformed {context}: {err}")))
}
