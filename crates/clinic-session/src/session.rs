use chrono::{DateTime, Duration, Utc};
use clinic_core::LoginGrant;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Schema version of the serialized session payload.
pub const SESSION_VERSION: u16 = 1;

/// An authenticated browser session.
///
/// Admin sessions are rebuilt from the raw token cookie and carry no
/// identity fields or issue time. Clinician sessions are serialized whole
/// into a signed cookie.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub version: u16,
    pub backend_token: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub clinic_id: Option<String>,
    #[serde(default)]
    pub role_id: Option<String>,
    #[serde(default)]
    pub issued_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            version: SESSION_VERSION,
            backend_token: token.into(),
            user_id: None,
            clinic_id: None,
            role_id: None,
            issued_at: None,
        }
    }

    pub fn from_grant(grant: LoginGrant, issued_at: DateTime<Utc>) -> Self {
        Self {
            version: SESSION_VERSION,
            backend_token: grant.token,
            user_id: grant.user_id,
            clinic_id: grant.clinic_id,
            role_id: grant.role_id,
            issued_at: Some(issued_at),
        }
    }

    /// Value for the `Authorization: Bearer` header.
    pub fn bearer(&self) -> &str {
        &self.backend_token
    }

    /// `None` when the session carries no issue time or the expiry does not
    /// fit in a `DateTime`.
    pub fn expires_at(&self, max_age: Duration) -> Option<DateTime<Utc>> {
        self.issued_at?.checked_add_signed(max_age)
    }

    /// A session with an issue time whose expiry overflows counts as expired.
    pub fn is_expired_at(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        match self.issued_at {
            None => false,
            Some(_) => self.expires_at(max_age).is_none_or(|exp| now >= exp),
        }
    }

    /// Past the halfway point of its lifetime.
    pub fn needs_refresh_at(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        self.issued_at
            .and_then(|t| t.checked_add_signed(max_age / 2))
            .is_some_and(|half| now >= half)
    }

    pub fn refreshed(mut self, now: DateTime<Utc>) -> Self {
        self.issued_at = Some(now);
        self
    }

    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// `None` for undecodable payloads, foreign versions and empty tokens.
    pub fn decode(raw: &str) -> Option<Self> {
        let session: Session = serde_json::from_str(raw).ok()?;
        if session.version != SESSION_VERSION || session.backend_token.is_empty() {
            return None;
        }
        Some(session)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("version", &self.version)
            .field("backend_token", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("clinic_id", &self.clinic_id)
            .field("role_id", &self.role_id)
            .field("issued_at", &self.issued_at)
            .finish()
    }
}
