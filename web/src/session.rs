//! In-memory session store for the role gate.
//!
//! A login binds a random token to a role for a fixed lifetime. Sessions
//! are ephemeral; restarting the process logs everyone out, which is fine
//! for a single-process deployment.

use chrono::{DateTime, Duration, Utc};
use packstation_core::Role;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "packstation_session";

/// One authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Role the session is bound to.
    pub role: Role,
    /// User label recorded as the event actor (defaults to the role name).
    pub user: String,
    /// Expiry; sessions are not refreshed on access.
    pub expires_at: DateTime<Utc>,
}

/// Token → session map guarded by a mutex.
#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<Uuid, Session>>,
}

impl SessionStore {
    /// Creates a store whose sessions live for `ttl_hours`.
    #[must_use]
    pub fn new(ttl_hours: i64) -> Self {
        Self {
            ttl: Duration::hours(ttl_hours),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a session for `role` and returns its token.
    pub fn create(&self, role: Role, user: impl Into<String>, now: DateTime<Utc>) -> Uuid {
        let token = Uuid::new_v4();
        let session = Session {
            role,
            user: user.into(),
            expires_at: now + self.ttl,
        };
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.insert(token, session);
        }
        token
    }

    /// Looks up a session, dropping it when expired.
    #[must_use]
    pub fn get(&self, token: Uuid, now: DateTime<Utc>) -> Option<Session> {
        let mut sessions = self.sessions.lock().ok()?;
        match sessions.get(&token) {
            Some(session) if session.expires_at > now => Some(session.clone()),
            Some(_) => {
                sessions.remove(&token);
                None
            }
            None => None,
        }
    }

    /// Destroys a session; destroying an unknown token is a no-op.
    pub fn destroy(&self, token: Uuid) {
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.remove(&token);
        }
    }

    /// Session cookie lifetime in seconds, for `Max-Age`.
    #[must_use]
    pub const fn max_age_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;

    #[test]
    fn create_then_get() {
        let store = SessionStore::new(24);
        let now = Utc::now();
        let token = store.create(Role::Driver, "driver", now);
        let session = store.get(token, now).unwrap();
        assert_eq!(session.role, Role::Driver);
        assert_eq!(session.user, "driver");
    }

    #[test]
    fn expired_session_is_dropped() {
        let store = SessionStore::new(24);
        let now = Utc::now();
        let token = store.create(Role::Store, "store", now);
        let later = now + Duration::hours(25);
        assert!(store.get(token, later).is_none());
        // Gone for good, not just filtered.
        assert!(store.get(token, now).is_none());
    }

    #[test]
    fn destroy_removes_session() {
        let store = SessionStore::new(24);
        let now = Utc::now();
        let token = store.create(Role::Frontdesk, "frontdesk", now);
        store.destroy(token);
        assert!(store.get(token, now).is_none());
    }

    #[test]
    fn unknown_token_is_none() {
        let store = SessionStore::new(24);
        assert!(store.get(Uuid::new_v4(), Utc::now()).is_none());
    }
}
