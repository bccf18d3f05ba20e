#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{Duration, Utc};
use shortcode_auth::{AuthError, ClientIdentity, Token, TokenStore};

/// In-memory token store with save accounting for persistence asserts.
#[derive(Default)]
pub struct InMemoryTokenStore {
    token: Mutex<Option<Token>>,
    saves: AtomicUsize,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, token: Token) {
        *self.token.lock().expect("store lock poisoned") = Some(token);
    }

    pub fn get(&self) -> Option<Token> {
        self.token.lock().expect("store lock poisoned").clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl TokenStore for InMemoryTokenStore {
    fn load(&self) -> Result<Option<Token>, AuthError> {
        Ok(self.get())
    }

    fn save(&self, token: &Token) -> Result<(), AuthError> {
        *self.token.lock().expect("store lock poisoned") = Some(token.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Store whose reads always report a corrupt record.
pub struct CorruptTokenStore;

impl TokenStore for CorruptTokenStore {
    fn load(&self) -> Result<Option<Token>, AuthError> {
        Err(AuthError::Store("stored token is corrupt: gibberish".to_string()))
    }

    fn save(&self, _token: &Token) -> Result<(), AuthError> {
        Ok(())
    }
}

/// Store whose writes always fail.
pub struct FailingTokenStore;

impl TokenStore for FailingTokenStore {
    fn load(&self) -> Result<Option<Token>, AuthError> {
        Ok(None)
    }

    fn save(&self, _token: &Token) -> Result<(), AuthError> {
        Err(AuthError::Store("disk full".to_string()))
    }
}

pub fn identity() -> ClientIdentity {
    ClientIdentity::new("client-1", ["chat:connect", "chat:chat"])
}

/// Token expiring comfortably outside the renewal margin.
pub fn fresh_token(access_token: &str) -> Token {
    Token {
        access_token: access_token.to_string(),
        token_type: "Bearer".to_string(),
        refresh_token: "refresh-1".to_string(),
        expires_in: Some(7200),
        expires_at: Some(Utc::now() + Duration::hours(2)),
    }
}

/// Token inside the 30 minute pre-invalidate margin.
pub fn stale_token(access_token: &str) -> Token {
    Token {
        access_token: access_token.to_string(),
        token_type: "Bearer".to_string(),
        refresh_token: "refresh-1".to_string(),
        expires_in: Some(300),
        expires_at: Some(Utc::now() + Duration::minutes(5)),
    }
}
