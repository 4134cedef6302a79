//! Clinic gateway HTTP server (Axum).
//!
//! Serves the admin and clinician areas: credential login into session
//! cookies, the cookie-presence route guard, and JSON endpoints that forward
//! patient and psychologist calls to the clinic API with the session's token.

pub mod admin;
pub mod clinician;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use clinic_core::ClinicConfig;
use state::AppState;

/// Build the application router from configuration.
pub fn app(config: ClinicConfig) -> clinic_core::Result<Router> {
    Ok(app_with_state(AppState::new(config)?))
}

/// Build the application router with a custom state.
pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::admin_routes())
        .merge(routes::clinician_routes())
        .fallback(routes::not_found)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::route_guard,
        ))
        .with_state(state)
}
