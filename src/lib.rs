//! Shortcode (device-authorization) OAuth client.
//!
//! Authenticates against an OAuth-style identity provider using a short,
//! human-readable code the user enters on a separate trusted device. The
//! client polls until the authorization is granted, declined, or expires,
//! exchanges the result for an access/refresh token pair, and persists the
//! pair for reuse. On later runs a stored token is validated against the
//! provider and refreshed in place of a new shortcode flow whenever
//! possible.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use shortcode_auth::{
//!     AuthEvent, ClientIdentity, FileTokenStore, ProviderEndpoints, ShortcodeAuthClient,
//! };
//!
//! # async fn example() -> Result<(), shortcode_auth::AuthError> {
//! let client = ShortcodeAuthClient::new(
//!     ClientIdentity::new("my-client", ["chat:connect", "chat:chat"]),
//!     ProviderEndpoints::new("https://provider.example/api/v1"),
//! )
//! .with_store(Arc::new(FileTokenStore::new_default()));
//!
//! let mut attempt = client.start()?;
//! while let Some(event) = attempt.next_event().await {
//!     match event {
//!         AuthEvent::Code(code) => println!("go to the provider and enter: {code}"),
//!         AuthEvent::Authorized(token) => println!("authorized, expires {:?}", token.expires_at),
//!         AuthEvent::Declined => println!("authorization declined"),
//!         AuthEvent::Expired => println!("code expired, try again"),
//!         AuthEvent::Error(err) => eprintln!("authorization failed: {err}"),
//!         AuthEvent::Completed => break,
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod http;
pub mod session;
pub mod store;
pub mod token;

pub use client::{AuthAttempt, ShortcodeAuthClient};
pub use config::{ClientIdentity, ProviderEndpoints};
pub use error::AuthError;
pub use event::AuthEvent;
pub use http::{ApiClient, ShortcodeGrant, TokenGrant};
pub use session::{PollStatus, ShortcodeSession, DEFAULT_POLL_INTERVAL};
pub use store::{CookieJar, CookieTokenStore, FileTokenStore, TokenStore};
pub use token::Token;
