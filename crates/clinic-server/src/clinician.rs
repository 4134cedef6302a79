//! Clinician area handlers. The session lives in a signed cookie; every read
//! goes through `resume` so the cookie's expiry slides forward while in use.

use crate::admin::LoginForm;
use crate::error::ApiError;
use crate::extract::FormOrJson;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::Redirect,
    Json,
};
use axum_extra::extract::cookie::SignedCookieJar;
use clinic_core::{ClinicError, Patient};
use clinic_session::Session;
use serde_json::{json, Value};

pub const LOGIN_PATH: &str = "/login";
pub const LANDING_PATH: &str = "/dashboard";

fn resume(state: &AppState, jar: SignedCookieJar) -> Result<(SignedCookieJar, Session), ApiError> {
    state
        .clinician
        .resume(jar)
        .ok_or_else(|| ClinicError::NotAuthenticated.into())
}

pub async fn login_page() -> Json<Value> {
    Json(json!({ "area": "clinician", "authenticated": false }))
}

pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    FormOrJson(form): FormOrJson<LoginForm>,
) -> Result<(SignedCookieJar, Redirect), ApiError> {
    let (jar, _) = state.clinician.login(jar, &form.into_credentials()).await?;
    Ok((jar, Redirect::to(LANDING_PATH)))
}

pub async fn logout(State(state): State<AppState>, jar: SignedCookieJar) -> (SignedCookieJar, Redirect) {
    (state.clinician.logout(jar), Redirect::to(LOGIN_PATH))
}

pub async fn dashboard(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Json<Value>), ApiError> {
    let (jar, session) = resume(&state, jar)?;
    let body = json!({
        "user_id": session.user_id,
        "clinic_id": session.clinic_id,
        "role_id": session.role_id,
    });
    Ok((jar, Json(body)))
}

pub async fn list_patients(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Json<Vec<Patient>>), ApiError> {
    let (jar, session) = resume(&state, jar)?;
    let patients = state.backend.list_patients(session.bearer()).await?;
    Ok((jar, Json(patients)))
}

pub async fn get_patient(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<String>,
) -> Result<(SignedCookieJar, Json<Patient>), ApiError> {
    let (jar, session) = resume(&state, jar)?;
    let patient = state.backend.get_patient(session.bearer(), &id).await?;
    Ok((jar, Json(patient)))
}
