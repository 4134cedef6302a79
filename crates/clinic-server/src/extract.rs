//! Request extractors shared by the handlers.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRequest, FromRequestParts, Request},
    http::{header::CONTENT_TYPE, request::Parts},
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use clinic_core::ClinicError;
use clinic_session::Session;
use serde::de::DeserializeOwned;

/// Body accepted either as `application/json` or as an urlencoded form, so
/// plain HTML forms and script clients hit the same handler.
#[derive(Debug)]
pub struct FormOrJson<T>(pub T);

impl<S, T> FromRequest<S> for FormOrJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        if is_json {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            Ok(Self(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            Ok(Self(value))
        }
    }
}

/// Admin session taken from the request cookies.
///
/// The route guard only checks that the cookie exists; this is the data-layer
/// check, answering `NotAuthenticated` when no usable token is present.
#[derive(Debug)]
pub struct AdminAuth(pub Session);

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        state
            .admin
            .current_session(&jar)
            .map(AdminAuth)
            .ok_or_else(|| ClinicError::NotAuthenticated.into())
    }
}
