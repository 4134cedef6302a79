use crate::response::{self, transport, Fallback};
use clinic_core::config::ApiConfig;
use clinic_core::types::de_opt_id;
use clinic_core::{ClinicError, Credentials, DashboardStats, LoginGrant, Result};
use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_LOGIN_ERROR: &str = "Credenciais inválidas. Verifique seu e-mail e senha.";

#[derive(Deserialize)]
struct LoginBody {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    usuario: Option<LoginUser>,
}

#[derive(Deserialize, Default)]
struct LoginUser {
    #[serde(default, deserialize_with = "de_opt_id")]
    id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_id")]
    clinica_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_id")]
    papel_id: Option<String>,
}

/// Client for the external clinic API. Cheap to clone.
#[derive(Clone, Debug)]
pub struct BackendClient {
    http: Client,
    base: Url,
}

impl BackendClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base = Url::parse(config.base_url.trim()).map_err(|e| {
            ClinicError::Config(format!("invalid API base URL {}: {e}", config.base_url))
        })?;
        if base.cannot_be_a_base() {
            return Err(ClinicError::Config(format!("API base URL cannot carry a path: {base}")));
        }

        let timeout = Duration::from_secs(config.timeout_secs);
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| ClinicError::Config(format!("failed to build HTTP client: {e}")))?;

        info!(base = %base, "backend client ready");
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Append path segments to the base URL, percent-encoding each one.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClinicError::Config(format!("API base URL cannot carry a path: {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `POST /api/auth/login`. Any non-2xx answer is a credential failure.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginGrant> {
        let url = self.endpoint(&["api", "auth", "login"])?;
        info!(email = %credentials.email, "login attempt");

        let resp = self.http.post(url).json(credentials).send().await.map_err(|e| {
            warn!(email = %credentials.email, error = %e, "login request failed");
            transport(e)
        })?;
        let status = resp.status();
        let text = resp.text().await.map_err(transport)?;

        if !status.is_success() {
            let message =
                response::erro_message(&text).unwrap_or_else(|| DEFAULT_LOGIN_ERROR.into());
            info!(email = %credentials.email, status = status.as_u16(), "login rejected");
            return Err(ClinicError::InvalidCredentials(message));
        }

        let body: LoginBody = serde_json::from_str(&text)
            .map_err(|e| ClinicError::ServerError(format!("malformed login response: {e}")))?;
        let token = body.token.filter(|t| !t.is_empty()).ok_or_else(|| {
            warn!(email = %credentials.email, "login accepted without a token");
            ClinicError::MissingToken
        })?;
        let user = body.usuario.unwrap_or_default();

        info!(email = %credentials.email, "login accepted");
        Ok(LoginGrant {
            token,
            user_id: user.id,
            clinic_id: user.clinica_id,
            role_id: user.papel_id,
        })
    }

    /// `GET /api/health`, successful on any 2xx.
    pub async fn health(&self) -> Result<()> {
        let url = self.endpoint(&["api", "health"])?;
        let resp = self.http.get(url).send().await.map_err(transport)?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ClinicError::ServerError(format!(
                "health check returned status {}",
                resp.status().as_u16()
            )))
        }
    }

    /// Patient and psychologist totals, fetched concurrently.
    pub async fn dashboard_stats(&self, token: &str) -> Result<DashboardStats> {
        let (patients, psychologists) =
            tokio::try_join!(self.list_patients(token), self.list_psychologists(token))?;
        Ok(DashboardStats {
            total_psicologos: psychologists.len(),
            total_pacientes: patients.len(),
        })
    }

    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        token: &str,
        segments: &[&str],
        fallback: Fallback,
    ) -> Result<T> {
        let url = self.endpoint(segments)?;
        debug!(%url, "GET");
        let resp = self.http.get(url).bearer_auth(token).send().await.map_err(transport)?;
        let resp = response::check(resp, fallback).await?;
        response::decode(resp).await
    }

    pub(crate) async fn write<B: Serialize + ?Sized>(
        &self,
        method: Method,
        token: &str,
        segments: &[&str],
        body: Option<&B>,
        fallback: Fallback,
    ) -> Result<()> {
        let url = self.endpoint(segments)?;
        debug!(%method, %url, "backend write");
        let mut req = self.http.request(method, url).bearer_auth(token);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await.map_err(transport)?;
        response::check(resp, fallback).await?;
        Ok(())
    }

    pub(crate) async fn remove(&self, token: &str, segments: &[&str], fallback: Fallback) -> Result<()> {
        self.write::<()>(Method::DELETE, token, segments, None, fallback).await
    }
}
