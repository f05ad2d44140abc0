/*
[INPUT]:  Credentials produced by login
[OUTPUT]: Explicit per-caller session context
[POS]:    Auth layer - session lifecycle without global state
[UPDATE]: When session metadata or invalidation rules change
*/

use chrono::{DateTime, Utc};

use crate::http::Credentials;

/// Session context passed to every request-issuing call.
///
/// Nothing is persisted; dropping the value ends the session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    credentials: Option<Credentials>,
    established_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create an unauthenticated session
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session from credentials obtained elsewhere
    pub fn from_credentials(credentials: Credentials) -> Self {
        let mut session = Self::new();
        session.establish(credentials);
        session
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn established_at(&self) -> Option<DateTime<Utc>> {
        self.established_at
    }

    /// Replace the credentials held by this session
    pub fn establish(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
        self.established_at = Some(Utc::now());
    }

    /// Drop the credentials, e.g. after the upstream rejected them
    pub fn invalidate(&mut self) {
        self.credentials = None;
        self.established_at = None;
    }
}
