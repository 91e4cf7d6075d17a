//! Bearer-token lookup.
//!
//! The app keeps its session token in scoped persistent key-value storage.
//! The core never writes it on its own; it only reads `AUTH_TOKEN_KEY` when
//! building a request. Hosts plug their platform storage in through
//! `TokenStore`; `MemoryTokenStore` serves tests and hosts that mirror the
//! token into the core after login.

use std::collections::HashMap;

use parking_lot::RwLock;

/// Key the session token is stored under.
pub const AUTH_TOKEN_KEY: &str = "userToken";

/// Scoped key-value storage holding the session token.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);

    /// The stored bearer token, ignoring blank values.
    fn auth_token(&self) -> Option<String> {
        self.get(AUTH_TOKEN_KEY).filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::default();
        store.set(AUTH_TOKEN_KEY, token.into());
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.entries.write().insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }
}
