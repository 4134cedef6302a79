use crate::error::{ClinicError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Minimum length of the cookie signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 64;

/// Longest accepted session lifetime: 400 days, the cap browsers apply to
/// cookie `Max-Age`.
pub const MAX_SESSION_AGE_SECS: i64 = 400 * 24 * 60 * 60;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub server: ServerConfig,
    pub probe: ProbeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Root of the external clinic API, without the `/api` suffix.
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub max_age_secs: i64,
    pub secure: bool,
    /// Signing secret for clinician sessions. A random key is generated
    /// when unset, so sessions do not survive a restart.
    pub secret: Option<String>,
    pub admin_cookie: String,
    pub clinician_cookie: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub attempts: u32,
    pub delay_secs: u64,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: "http://localhost:3000".into(), timeout_secs: 30 }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_age_secs: 60 * 60,
            secure: false,
            secret: None,
            admin_cookie: "adminSessionToken".into(),
            clinician_cookie: "clinicianSession".into(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".into(), port: 8080 }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { attempts: 3, delay_secs: 3, timeout_secs: 15 }
    }
}

impl ProbeConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ClinicConfig {
    /// Defaults, then the JSON file named by `CLINIC_CONFIG` if set, then
    /// the `CLINIC_*` environment variables.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var("CLINIC_CONFIG") {
            Ok(path) => Self::from_json_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ClinicError::Config(format!("cannot read {}: {e}", path.display())))?;
        let config = serde_json::from_str(&raw)
            .map_err(|e| ClinicError::Config(format!("cannot parse {}: {e}", path.display())))?;
        info!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Overlay values from a key lookup (normally the process environment).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup("CLINIC_API_URL") {
            self.api.base_url = url;
        }
        if let Some(host) = lookup("CLINIC_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("CLINIC_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ClinicError::Config(format!("CLINIC_PORT is not a port: {port}")))?;
        }
        if let Some(secret) = lookup("CLINIC_SESSION_SECRET") {
            self.session.secret = Some(secret);
        }
        if let Some(max_age) = lookup("CLINIC_SESSION_MAX_AGE") {
            self.session.max_age_secs = max_age.parse().map_err(|_| {
                ClinicError::Config(format!("CLINIC_SESSION_MAX_AGE is not a number: {max_age}"))
            })?;
        }
        if let Some(env) = lookup("CLINIC_ENV") {
            self.session.secure = env.eq_ignore_ascii_case("production");
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.api.base_url.trim();
        if url.is_empty() {
            return Err(ClinicError::Config("api.base_url is empty".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ClinicError::Config(format!(
                "api.base_url must be an http(s) URL: {url}"
            )));
        }
        if self.session.max_age_secs <= 0 {
            return Err(ClinicError::Config("session.max_age_secs must be positive".into()));
        }
        if self.session.max_age_secs > MAX_SESSION_AGE_SECS {
            return Err(ClinicError::Config(format!(
                "session.max_age_secs must be at most {MAX_SESSION_AGE_SECS}"
            )));
        }
        if let Some(secret) = &self.session.secret {
            if secret.len() < MIN_SECRET_LEN {
                return Err(ClinicError::Config(format!(
                    "session.secret must be at least {MIN_SECRET_LEN} bytes"
                )));
            }
        }
        if self.session.admin_cookie.is_empty() || self.session.clinician_cookie.is_empty() {
            return Err(ClinicError::Config("session cookie names must not be empty".into()));
        }
        if self.session.admin_cookie == self.session.clinician_cookie {
            return Err(ClinicError::Config("admin and clinician cookies must differ".into()));
        }
        if self.probe.attempts == 0 {
            return Err(ClinicError::Config("probe.attempts must be at least 1".into()));
        }
        Ok(())
    }
}
