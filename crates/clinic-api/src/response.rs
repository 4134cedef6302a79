//! Mapping of backend HTTP responses onto `ClinicError`.

use clinic_core::{ClinicError, Result};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::warn;

/// The backend reports failures as `{ "erro": "..." }`.
#[derive(Deserialize)]
struct ErrorBody {
    erro: Option<String>,
}

/// Default messages for one backend operation, used when the response
/// carries no `erro` of its own.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fallback {
    pub failure: &'static str,
    pub not_found: &'static str,
}

pub(crate) fn transport(err: reqwest::Error) -> ClinicError {
    if err.is_decode() {
        ClinicError::ServerError(err.to_string())
    } else {
        ClinicError::ConnectionFailed(err.to_string())
    }
}

pub(crate) fn erro_message(text: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(text)
        .ok()?
        .erro
        .filter(|m| !m.is_empty())
}

pub(crate) async fn check(resp: Response, fallback: Fallback) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let url = resp.url().clone();
    let message = resp.text().await.ok().and_then(|t| erro_message(&t));
    warn!(status = status.as_u16(), %url, "backend rejected request");

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClinicError::NotAuthenticated,
        StatusCode::NOT_FOUND => {
            ClinicError::NotFound(message.unwrap_or_else(|| fallback.not_found.into()))
        }
        s if s.is_server_error() => ClinicError::ServerError(
            message.unwrap_or_else(|| format!("{} (status {})", fallback.failure, s.as_u16())),
        ),
        s => ClinicError::Rejected {
            status: s.as_u16(),
            message: message.unwrap_or_else(|| fallback.failure.into()),
        },
    })
}

pub(crate) async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let text = resp.text().await.map_err(transport)?;
    serde_json::from_str(&text)
        .map_err(|e| ClinicError::ServerError(format!("malformed JSON from backend: {e}")))
}
