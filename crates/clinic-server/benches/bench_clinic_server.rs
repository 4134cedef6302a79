use criterion::{black_box, criterion_group, criterion_main, Criterion};
use axum::body::Body;
use axum::http::{header::COOKIE, Request};
use tower::ServiceExt;
use clinic_core::ClinicConfig;
use clinic_server::{app_with_state, state::AppState};
use tokio::runtime::Runtime;

fn state() -> AppState {
    let mut config = ClinicConfig::default();
    config.session.secret = Some("b".repeat(64));
    AppState::new(config).unwrap()
}

fn bench_http_health(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let state = state();
    c.bench_function("http_health_1000", |b| {
        b.iter(|| {
            rt.block_on(async {
                for _ in 0..1000 {
                    let app = app_with_state(state.clone());
                    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
                    let resp = app.oneshot(req).await.unwrap();
                    black_box(resp.status());
                }
            })
        })
    });
}

fn bench_http_guard(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let state = state();

    c.bench_function("http_guard_redirect_1000", |b| {
        b.iter(|| {
            rt.block_on(async {
                for _ in 0..1000 {
                    let app = app_with_state(state.clone());
                    let req = Request::builder()
                        .uri("/admin/pacientes")
                        .body(Body::empty())
                        .unwrap();
                    let resp = app.oneshot(req).await.unwrap();
                    black_box(resp.status());
                }
            })
        })
    });

    c.bench_function("http_login_page_with_cookie_1000", |b| {
        b.iter(|| {
            rt.block_on(async {
                for _ in 0..1000 {
                    let app = app_with_state(state.clone());
                    let req = Request::builder()
                        .uri("/admin/login")
                        .header(COOKIE, "adminSessionToken=abc")
                        .body(Body::empty())
                        .unwrap();
                    let resp = app.oneshot(req).await.unwrap();
                    black_box(resp.status());
                }
            })
        })
    });
}

criterion_group!(benches, bench_http_health, bench_http_guard);
criterion_main!(benches);
