//! JSON error responses for the HTTP API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use clinic_core::{ClinicError, ValidationErrors};
use serde_json::json;
use tracing::{debug, error, warn};

/// API error with status code, machine code, user-facing message and
/// optional per-field messages.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub errors: Option<ValidationErrors>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self { status, code, message: message.into(), errors: None }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", msg)
    }

    /// Attach the message as a form-level error, the way login failures
    /// are shown above the form.
    fn on_form(mut self) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add("_form", self.message.clone());
        self.errors = Some(errors);
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "success": false,
            "code": self.code,
            "message": self.message,
        });
        if let Some(errors) = self.errors {
            body["errors"] = json!(errors);
        }
        (self.status, Json(body)).into_response()
    }
}

impl From<ClinicError> for ApiError {
    fn from(err: ClinicError) -> Self {
        let message = err.user_message();
        match err {
            ClinicError::InvalidCredentials(_) => {
                debug!("login refused");
                ApiError::new(StatusCode::UNAUTHORIZED, "invalid_credentials", message).on_form()
            }
            ClinicError::MissingToken => {
                warn!("backend accepted login without a token");
                ApiError::new(StatusCode::BAD_GATEWAY, "missing_token", message).on_form()
            }
            ClinicError::ConnectionFailed(detail) => {
                warn!(%detail, "backend unreachable");
                ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "connection_failed", message)
                    .on_form()
            }
            ClinicError::NotAuthenticated => {
                ApiError::new(StatusCode::UNAUTHORIZED, "not_authenticated", message)
            }
            ClinicError::NotFound(_) => ApiError::new(StatusCode::NOT_FOUND, "not_found", message),
            ClinicError::ServerError(detail) => {
                error!(%detail, "backend error");
                ApiError::new(StatusCode::BAD_GATEWAY, "backend_error", message)
            }
            ClinicError::Rejected { status, .. } => {
                let status = StatusCode::from_u16(status)
                    .ok()
                    .filter(StatusCode::is_client_error)
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                ApiError::new(status, "rejected", message)
            }
            ClinicError::Validation(errors) => ApiError {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                code: "validation",
                message,
                errors: Some(errors),
            },
            ClinicError::Config(detail) => {
                error!(%detail, "configuration error");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        }
    }
}
