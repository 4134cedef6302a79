use crate::error::ApiError;
use crate::state::AppState;
use crate::{admin, clinician};
use axum::{
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(|| async { Redirect::to(admin::LANDING_PATH) }))
        .route("/admin/login", get(admin::login_page).post(admin::login))
        .route("/admin/logout", post(admin::logout))
        .route("/admin/dashboard", get(admin::dashboard))
        .route("/admin/backend-status", get(admin::backend_status))
        .route(
            "/admin/pacientes",
            get(admin::list_patients).post(admin::create_patient),
        )
        .route(
            "/admin/pacientes/{id}",
            get(admin::get_patient)
                .put(admin::update_patient)
                .delete(admin::delete_patient),
        )
        .route(
            "/admin/psicologos",
            get(admin::list_psychologists).post(admin::create_psychologist),
        )
        .route(
            "/admin/psicologos/{id}",
            get(admin::get_psychologist)
                .put(admin::update_psychologist)
                .delete(admin::delete_psychologist),
        )
}

pub fn clinician_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(clinician::login_page).post(clinician::login))
        .route("/logout", post(clinician::logout))
        .route("/dashboard", get(clinician::dashboard))
        .route("/patients", get(clinician::list_patients))
        .route("/patients/{id}", get(clinician::get_patient))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Unknown paths still pass through the guard first.
pub async fn not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "not_found", "Página não encontrada.")
}
