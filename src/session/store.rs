//! Where the bearer token lives between requests

use std::sync::Arc;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::debug;
use crate::utils::errors::Result;
use super::storage::{KeyValueStorage, MemoryStorage};

pub const TOKEN_KEY: &str = "token";
pub const TOKEN_EXPIRY_KEY: &str = "tokenExpiry";

/// Token store over a persistent and an ephemeral backend.
///
/// "Remember me" tokens go to the persistent side with an expiry stamp in
/// epoch milliseconds; the rest stay in memory without one.
pub struct SessionStore {
    persistent: Arc<dyn KeyValueStorage>,
    ephemeral: Arc<dyn KeyValueStorage>,
}

impl SessionStore {
    pub fn new(persistent: Arc<dyn KeyValueStorage>, ephemeral: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            persistent,
            ephemeral,
        }
    }

    /// Both sides in memory; nothing outlives the process
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()), Arc::new(MemoryStorage::new()))
    }

    pub fn persistent(&self) -> &Arc<dyn KeyValueStorage> {
        &self.persistent
    }

    /// Current token, persistent side first
    pub fn token(&self) -> Option<String> {
        self.persistent
            .get(TOKEN_KEY)
            .or_else(|| self.ephemeral.get(TOKEN_KEY))
            .filter(|t| !t.is_empty())
    }

    pub fn has_persistent_token(&self) -> bool {
        self.persistent.get(TOKEN_KEY).is_some()
    }

    /// Stored expiry, if any. Unparseable stamps count as absent.
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.persistent
            .get(TOKEN_EXPIRY_KEY)
            .or_else(|| self.ephemeral.get(TOKEN_EXPIRY_KEY))
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
    }

    /// A missing expiry never counts as expired; the server decides then
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry().map(|expiry| now > expiry).unwrap_or(false)
    }

    pub fn set_expiry(&self, expiry: DateTime<Utc>) -> Result<()> {
        self.persistent
            .set(TOKEN_EXPIRY_KEY, &expiry.timestamp_millis().to_string())
    }

    /// Replace whatever was stored with a fresh token
    pub fn store_token(&self, token: &str, remember_me: bool, ttl: Duration, now: DateTime<Utc>) -> Result<()> {
        self.clear()?;
        if remember_me {
            self.persistent.set(TOKEN_KEY, token)?;
            self.set_expiry(now + ttl)?;
        } else {
            self.ephemeral.set(TOKEN_KEY, token)?;
        }
        debug!(remember_me = remember_me, "Stored session token");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        for storage in [&self.persistent, &self.ephemeral] {
            storage.remove(TOKEN_KEY)?;
            storage.remove(TOKEN_EXPIRY_KEY)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remember_me_uses_persistent_side() {
        let store = SessionStore::in_memory();
        let now = Utc::now();
        store.store_token("abc", true, Duration::days(7), now).unwrap();

        assert!(store.has_persistent_token());
        assert_eq!(store.token().as_deref(), Some("abc"));
        assert_eq!(store.expiry().map(|e| e.timestamp_millis()), Some((now + Duration::days(7)).timestamp_millis()));
        assert!(!store.is_expired(now));
        assert!(store.is_expired(now + Duration::days(8)));
    }

    #[test]
    fn test_session_only_token_has_no_expiry() {
        let store = SessionStore::in_memory();
        store.store_token("abc", false, Duration::days(7), Utc::now()).unwrap();

        assert!(!store.has_persistent_token());
        assert_eq!(store.token().as_deref(), Some("abc"));
        assert_eq!(store.expiry(), None);
        assert!(!store.is_expired(Utc::now() + Duration::days(365)));
    }

    #[test]
    fn test_new_login_replaces_old_token() {
        let store = SessionStore::in_memory();
        store.store_token("old", true, Duration::days(7), Utc::now()).unwrap();
        store.store_token("new", false, Duration::days(7), Utc::now()).unwrap();
        assert_eq!(store.token().as_deref(), Some("new"));
        assert!(!store.has_persistent_token());
    }

    #[test]
    fn test_garbage_expiry_is_ignored() {
        let store = SessionStore::in_memory();
        store.persistent().set(TOKEN_EXPIRY_KEY, "soon").unwrap();
        assert_eq!(store.expiry(), None);
    }
}
