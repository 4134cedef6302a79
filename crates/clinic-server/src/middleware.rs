use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use clinic_session::GuardDecision;
use tracing::debug;

/// Cookie-presence gate run before every route.
pub async fn route_guard(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let decision = {
        let path = request.uri().path();
        state
            .guard
            .decide(path, |name| jar.get(name).is_some_and(|c| !c.value().is_empty()))
    };

    match decision {
        GuardDecision::Proceed => next.run(request).await,
        GuardDecision::Redirect(to) => {
            debug!(path = %request.uri().path(), %to, "guard redirect");
            Redirect::to(&to).into_response()
        }
    }
}
