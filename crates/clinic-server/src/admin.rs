//! Admin area handlers.
//!
//! Login and logout answer with redirects so a plain HTML form works; the
//! data endpoints answer JSON and forward to the clinic API with the token
//! stored in the admin cookie.

use crate::error::ApiError;
use crate::extract::{AdminAuth, FormOrJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use clinic_api::ProbeOutcome;
use clinic_core::{
    Credentials, DashboardStats, NewPsychologist, Patient, PatientForm, Psychologist,
    PsychologistUpdate,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const LOGIN_PATH: &str = "/admin/login";
pub const LANDING_PATH: &str = "/admin/dashboard";

/// Login form body. Extra fields such as `clinicCode` are ignored.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    pub fn into_credentials(self) -> Credentials {
        Credentials::new(self.email.trim(), self.password)
    }
}

/// Result of a write operation.
#[derive(Debug, Serialize)]
pub struct Outcome {
    pub success: bool,
    pub message: &'static str,
}

impl Outcome {
    pub fn ok(message: &'static str) -> Json<Self> {
        Json(Self { success: true, message })
    }
}

// ========== Session ==========

pub async fn login_page() -> Json<Value> {
    Json(json!({ "area": "admin", "authenticated": false }))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    FormOrJson(form): FormOrJson<LoginForm>,
) -> Result<(CookieJar, Redirect), ApiError> {
    let (jar, _) = state.admin.login(jar, &form.into_credentials()).await?;
    Ok((jar, Redirect::to(LANDING_PATH)))
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    (state.admin.logout(jar), Redirect::to(LOGIN_PATH))
}

pub async fn dashboard(
    State(state): State<AppState>,
    AdminAuth(session): AdminAuth,
) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(state.backend.dashboard_stats(session.bearer()).await?))
}

/// Runs the wake-up probe; 503 when the backend never answered.
pub async fn backend_status(State(state): State<AppState>) -> Response {
    let outcome = state.probe.run(&state.backend).await;
    let status = match outcome {
        ProbeOutcome::Awake { .. } => StatusCode::OK,
        ProbeOutcome::Unreachable { .. } => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(outcome)).into_response()
}

// ========== Patients ==========

pub async fn list_patients(
    State(state): State<AppState>,
    AdminAuth(session): AdminAuth,
) -> Result<Json<Vec<Patient>>, ApiError> {
    Ok(Json(state.backend.list_patients(session.bearer()).await?))
}

pub async fn get_patient(
    State(state): State<AppState>,
    AdminAuth(session): AdminAuth,
    Path(id): Path<String>,
) -> Result<Json<Patient>, ApiError> {
    Ok(Json(state.backend.get_patient(session.bearer(), &id).await?))
}

pub async fn create_patient(
    State(state): State<AppState>,
    AdminAuth(session): AdminAuth,
    FormOrJson(form): FormOrJson<PatientForm>,
) -> Result<Json<Outcome>, ApiError> {
    state.backend.create_patient(session.bearer(), &form).await?;
    Ok(Outcome::ok("Paciente criado com sucesso!"))
}

pub async fn update_patient(
    State(state): State<AppState>,
    AdminAuth(session): AdminAuth,
    Path(id): Path<String>,
    FormOrJson(form): FormOrJson<PatientForm>,
) -> Result<Json<Outcome>, ApiError> {
    state.backend.update_patient(session.bearer(), &id, &form).await?;
    Ok(Outcome::ok("Paciente atualizado com sucesso!"))
}

pub async fn delete_patient(
    State(state): State<AppState>,
    AdminAuth(session): AdminAuth,
    Path(id): Path<String>,
) -> Result<Json<Outcome>, ApiError> {
    state.backend.delete_patient(session.bearer(), &id).await?;
    Ok(Outcome::ok("Paciente excluído com sucesso!"))
}

// ========== Psychologists ==========

pub async fn list_psychologists(
    State(state): State<AppState>,
    AdminAuth(session): AdminAuth,
) -> Result<Json<Vec<Psychologist>>, ApiError> {
    Ok(Json(state.backend.list_psychologists(session.bearer()).await?))
}

pub async fn get_psychologist(
    State(state): State<AppState>,
    AdminAuth(session): AdminAuth,
    Path(id): Path<String>,
) -> Result<Json<Psychologist>, ApiError> {
    Ok(Json(state.backend.get_psychologist(session.bearer(), &id).await?))
}

pub async fn create_psychologist(
    State(state): State<AppState>,
    AdminAuth(session): AdminAuth,
    FormOrJson(new): FormOrJson<NewPsychologist>,
) -> Result<Json<Outcome>, ApiError> {
    state.backend.create_psychologist(session.bearer(), &new).await?;
    Ok(Outcome::ok("Psicólogo criado com sucesso!"))
}

pub async fn update_psychologist(
    State(state): State<AppState>,
    AdminAuth(session): AdminAuth,
    Path(id): Path<String>,
    FormOrJson(update): FormOrJson<PsychologistUpdate>,
) -> Result<Json<Outcome>, ApiError> {
    state.backend.update_psychologist(session.bearer(), &id, &update).await?;
    Ok(Outcome::ok("Psicólogo atualizado com sucesso!"))
}

pub async fn delete_psychologist(
    State(state): State<AppState>,
    AdminAuth(session): AdminAuth,
    Path(id): Path<String>,
) -> Result<Json<Outcome>, ApiError> {
    state.backend.delete_psychologist(session.bearer(), &id).await?;
    Ok(Outcome::ok("Psicólogo excluído com sucesso!"))
}
