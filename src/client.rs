use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, warn};

use crate::config::{ClientIdentity, ProviderEndpoints};
use crate::error::AuthError;
use crate::event::{AuthEvent, EventSink};
use crate::http::{ApiClient, TokenGrant};
use crate::session::{next_poll_action, PollAction, ShortcodeSession, DEFAULT_POLL_INTERVAL};
use crate::store::TokenStore;
use crate::token::Token;

/// Stored tokens inside this window of their literal expiry are renewed
/// instead of reused.
const PRE_INVALIDATE_MARGIN_MINS: i64 = 30;

/// Shortcode (device-authorization) client.
///
/// Drives one authorization attempt at a time: reuse or refresh of a
/// stored token when a store is configured, otherwise shortcode
/// acquisition, polling, and token exchange. Progress is reported through
/// the [`AuthEvent`] stream of the returned [`AuthAttempt`].
///
/// # Example
/// ```no_run
/// use shortcode_auth::{AuthEvent, ClientIdentity, ProviderEndpoints, ShortcodeAuthClient};
///
/// # async fn example() -> Result<(), shortcode_auth::AuthError> {
/// let client = ShortcodeAuthClient::new(
///     ClientIdentity::new("my-client", ["chat:connect"]),
///     ProviderEndpoints::new("https://provider.example/api/v1"),
/// );
/// let mut attempt = client.start()?;
/// while let Some(event) = attempt.next_event().await {
///     match event {
///         AuthEvent::Code(code) => println!("enter {code} on your other device"),
///         AuthEvent::Authorized(token) => println!("logged in as {}", token.access_token),
///         AuthEvent::Completed => break,
///         _ => {}
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct ShortcodeAuthClient {
    identity: ClientIdentity,
    api: Arc<ApiClient>,
    store: Option<Arc<dyn TokenStore>>,
    poll_interval: Duration,
    in_flight: Arc<AtomicBool>,
}

/// Handle to a running authorization attempt.
pub struct AuthAttempt {
    events: mpsc::UnboundedReceiver<AuthEvent>,
}

impl AuthAttempt {
    /// Next event from the attempt, `None` once the attempt task is gone.
    pub async fn next_event(&mut self) -> Option<AuthEvent> {
        self.events.recv().await
    }

    /// The attempt's events as a [`tokio_stream::Stream`].
    pub fn into_stream(self) -> UnboundedReceiverStream<AuthEvent> {
        UnboundedReceiverStream::new(self.events)
    }
}

impl ShortcodeAuthClient {
    pub fn new(identity: ClientIdentity, endpoints: ProviderEndpoints) -> Self {
        Self {
            identity,
            api: Arc::new(ApiClient::new(endpoints)),
            store: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Attach a token store for reuse and persistence of token pairs.
    pub fn with_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Override the initial poll interval (default 1 second).
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Whether an attempt is currently running on this instance.
    pub fn in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Begin an authorization attempt.
    ///
    /// Rejects synchronously, before any network I/O, when an attempt is
    /// already in flight on this instance or the identity is invalid.
    /// Everything after that is reported through the returned attempt's
    /// event stream, which always ends with [`AuthEvent::Completed`].
    pub fn start(&self) -> Result<AuthAttempt, AuthError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(AuthError::Configuration(
                "an authorization attempt is already in flight".to_string(),
            ));
        }
        if let Err(err) = self.identity.validate() {
            self.in_flight.store(false, Ordering::SeqCst);
            return Err(err);
        }
        let (sink, events) = EventSink::channel();
        let task = AttemptTask {
            identity: self.identity.clone(),
            api: self.api.clone(),
            store: self.store.clone(),
            poll_interval: self.poll_interval,
            in_flight: self.in_flight.clone(),
            sink,
        };
        tokio::spawn(task.run());
        Ok(AuthAttempt { events })
    }
}

/// State and collaborators for one spawned attempt.
struct AttemptTask {
    identity: ClientIdentity,
    api: Arc<ApiClient>,
    store: Option<Arc<dyn TokenStore>>,
    poll_interval: Duration,
    in_flight: Arc<AtomicBool>,
    sink: EventSink,
}

impl AttemptTask {
    async fn run(self) {
        self.drive().await;
        // Clear before Completed so a caller reacting to the final event
        // can immediately start a fresh attempt.
        self.in_flight.store(false, Ordering::SeqCst);
        self.sink.emit(AuthEvent::Completed);
    }

    /// Runs the attempt to its terminal outcome, emitting every event
    /// except the trailing `Completed`.
    async fn drive(&self) {
        if let Some(store) = &self.store {
            match store.load() {
                Ok(Some(token)) if token.expires_at.is_some() => {
                    if self.reuse_stored_token(token).await {
                        return;
                    }
                }
                Ok(Some(_)) => {
                    debug!("stored token has no absolute expiry; starting shortcode flow")
                }
                Ok(None) => debug!("no stored token"),
                Err(err) => warn!(error = %err, "discarding unreadable stored token"),
            }
        }
        self.shortcode_flow().await;
    }

    /// Try to ride on a structurally complete stored token. Returns true
    /// when a terminal state was reached, false to fall back to the
    /// shortcode flow.
    async fn reuse_stored_token(&self, token: Token) -> bool {
        let margin = chrono::Duration::minutes(PRE_INVALIDATE_MARGIN_MINS);
        if !token.needs_renewal(margin) && self.api.probe_token(&token).await {
            debug!("stored token valid");
            self.finish_authorized(token).await;
            return true;
        }
        debug!("stored token stale; attempting refresh");
        let grant = TokenGrant::RefreshToken(token.refresh_token.clone());
        match self.api.exchange_token(&self.identity, grant).await {
            Ok(new_token) => {
                self.finish_authorized(new_token).await;
                true
            }
            Err(err) => {
                warn!(error = %err, "refresh failed; starting shortcode flow");
                false
            }
        }
    }

    async fn shortcode_flow(&self) {
        let grant = match self.api.request_shortcode(&self.identity).await {
            Ok(grant) => grant,
            Err(err) => {
                self.sink.emit(AuthEvent::Error(err));
                return;
            }
        };
        let mut session = ShortcodeSession {
            code: grant.code,
            handle: grant.handle,
            expires_at: Utc::now() + chrono::Duration::seconds(grant.expires_in),
            poll_interval: self.poll_interval,
        };
        self.sink.emit(AuthEvent::Code(session.code.clone()));
        self.poll_loop(&mut session).await;
    }

    /// Single sequential loop: one sleep, one check, one decision. At most
    /// one poll is ever outstanding for the session.
    async fn poll_loop(&self, session: &mut ShortcodeSession) {
        loop {
            tokio::time::sleep(session.poll_interval).await;
            if Utc::now() >= session.expires_at {
                self.sink.emit(AuthEvent::Expired);
                return;
            }
            let status = match self.api.check_shortcode(&session.handle).await {
                Ok(status) => status,
                Err(err) => {
                    self.sink.emit(AuthEvent::Error(err));
                    return;
                }
            };
            match next_poll_action(status, session.poll_interval) {
                PollAction::Reschedule { interval } => {
                    session.poll_interval = interval;
                }
                PollAction::Redeem { code } => {
                    self.redeem(code).await;
                    return;
                }
                PollAction::Declined => {
                    self.sink.emit(AuthEvent::Declined);
                    return;
                }
                PollAction::Expired => {
                    self.sink.emit(AuthEvent::Expired);
                    return;
                }
            }
        }
    }

    async fn redeem(&self, code: String) {
        let grant = TokenGrant::AuthorizationCode(code);
        match self.api.exchange_token(&self.identity, grant).await {
            Ok(token) => self.finish_authorized(token).await,
            Err(err) => self.sink.emit(AuthEvent::Error(err)),
        }
    }

    /// Persist first, notify second. A persistence failure surfaces as an
    /// error and suppresses `Authorized`.
    async fn finish_authorized(&self, token: Token) {
        if let Some(store) = &self.store {
            if let Err(err) = store.save(&token) {
                self.sink.emit(AuthEvent::Error(err));
                return;
            }
        }
        self.sink.emit(AuthEvent::Authorized(token));
    }
}
