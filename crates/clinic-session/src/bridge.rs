//! Login, session lookup and logout for the two areas.
//!
//! The admin area stores the raw backend token in an HttpOnly cookie. The
//! clinician area stores the whole [`Session`] in a signed cookie so the
//! identity fields travel with it and tampering is detected. In both cases a
//! failed login returns before the jar is touched.

use crate::policy::CookiePolicy;
use crate::session::Session;
use async_trait::async_trait;
use axum_extra::extract::cookie::{CookieJar, SignedCookieJar};
use chrono::{DateTime, Utc};
use clinic_api::BackendClient;
use clinic_core::{ClinicError, Credentials, LoginGrant, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Exchanges credentials for a backend grant.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<LoginGrant>;
}

#[async_trait]
impl Authenticator for BackendClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<LoginGrant> {
        self.login(credentials).await
    }
}

// ========== Admin area ==========

#[derive(Clone)]
pub struct AdminSessions {
    auth: Arc<dyn Authenticator>,
    policy: CookiePolicy,
}

impl AdminSessions {
    pub fn new(auth: Arc<dyn Authenticator>, policy: CookiePolicy) -> Self {
        Self { auth, policy }
    }

    pub fn policy(&self) -> &CookiePolicy {
        &self.policy
    }

    pub async fn login(&self, jar: CookieJar, credentials: &Credentials) -> Result<(CookieJar, Session)> {
        let grant = self.auth.authenticate(credentials).await?;
        let session = Session::from_token(grant.token);
        let jar = jar.add(self.policy.issue(session.backend_token.clone()));
        info!(email = %credentials.email, "admin session started");
        Ok((jar, session))
    }

    pub fn current_session(&self, jar: &CookieJar) -> Option<Session> {
        jar.get(&self.policy.name)
            .map(|c| c.value())
            .filter(|v| !v.is_empty())
            .map(Session::from_token)
    }

    pub fn logout(&self, jar: CookieJar) -> CookieJar {
        debug!(cookie = %self.policy.name, "admin session cleared");
        jar.remove(self.policy.removal())
    }
}

// ========== Clinician area ==========

#[derive(Clone)]
pub struct ClinicianSessions {
    auth: Arc<dyn Authenticator>,
    policy: CookiePolicy,
}

impl ClinicianSessions {
    pub fn new(auth: Arc<dyn Authenticator>, policy: CookiePolicy) -> Self {
        Self { auth, policy }
    }

    pub fn policy(&self) -> &CookiePolicy {
        &self.policy
    }

    pub async fn login(
        &self,
        jar: SignedCookieJar,
        credentials: &Credentials,
    ) -> Result<(SignedCookieJar, Session)> {
        let grant = self.auth.authenticate(credentials).await?;
        let session = Session::from_grant(grant, Utc::now());
        let value = session
            .encode()
            .map_err(|e| ClinicError::ServerError(format!("cannot encode session: {e}")))?;
        let jar = jar.add(self.policy.issue(value));
        info!(email = %credentials.email, user = ?session.user_id, "clinician session started");
        Ok((jar, session))
    }

    pub fn current_session(&self, jar: &SignedCookieJar) -> Option<Session> {
        self.current_session_at(jar, Utc::now())
    }

    /// Verified, decoded and unexpired session, if any.
    pub fn current_session_at(&self, jar: &SignedCookieJar, now: DateTime<Utc>) -> Option<Session> {
        let cookie = jar.get(&self.policy.name)?;
        let session = Session::decode(cookie.value())?;
        if session.is_expired_at(self.policy.max_age(), now) {
            debug!("clinician session expired");
            return None;
        }
        Some(session)
    }

    /// Look up the session and slide its expiry forward once it is past
    /// half of its lifetime. The returned jar must be sent back.
    pub fn resume(&self, jar: SignedCookieJar) -> Option<(SignedCookieJar, Session)> {
        self.resume_at(jar, Utc::now())
    }

    pub fn resume_at(
        &self,
        jar: SignedCookieJar,
        now: DateTime<Utc>,
    ) -> Option<(SignedCookieJar, Session)> {
        let session = self.current_session_at(&jar, now)?;
        if !session.needs_refresh_at(self.policy.max_age(), now) {
            return Some((jar, session));
        }
        let refreshed = session.clone().refreshed(now);
        match refreshed.encode() {
            Ok(value) => {
                debug!(user = ?refreshed.user_id, "clinician session refreshed");
                Some((jar.add(self.policy.issue(value)), refreshed))
            }
            Err(e) => {
                warn!(error = %e, "clinician session refresh skipped");
                Some((jar, session))
            }
        }
    }

    pub fn logout(&self, jar: SignedCookieJar) -> SignedCookieJar {
        debug!(cookie = %self.policy.name, "clinician session cleared");
        jar.remove(self.policy.removal())
    }
}
