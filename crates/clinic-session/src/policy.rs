use axum_extra::extract::cookie::{Cookie, SameSite};
use clinic_core::config::SessionConfig;

/// Attributes shared by every session cookie: HttpOnly, `SameSite=Lax`,
/// path `/`, a fixed max-age, and `Secure` when configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookiePolicy {
    pub name: String,
    pub max_age_secs: i64,
    pub secure: bool,
}

impl CookiePolicy {
    pub fn admin(config: &SessionConfig) -> Self {
        Self {
            name: config.admin_cookie.clone(),
            max_age_secs: config.max_age_secs,
            secure: config.secure,
        }
    }

    pub fn clinician(config: &SessionConfig) -> Self {
        Self {
            name: config.clinician_cookie.clone(),
            max_age_secs: config.max_age_secs,
            secure: config.secure,
        }
    }

    /// Saturates instead of panicking on values chrono cannot represent.
    pub fn max_age(&self) -> chrono::Duration {
        chrono::Duration::try_seconds(self.max_age_secs).unwrap_or(chrono::Duration::MAX)
    }

    pub fn issue(&self, value: String) -> Cookie<'static> {
        Cookie::build((self.name.clone(), value))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(time::Duration::seconds(self.max_age_secs))
            .build()
    }

    /// Cookie handed to `remove`; the path must match the issued one for
    /// the browser to drop it.
    pub fn removal(&self) -> Cookie<'static> {
        Cookie::build((self.name.clone(), "")).path("/").build()
    }
}
