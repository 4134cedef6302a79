use anyhow::Context;
use clinic_core::ClinicConfig;
use clinic_server::state::AppState;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("building log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ClinicConfig::load().context("loading configuration")?;
    let addr = config.server.bind_addr();
    let state = AppState::new(config).context("building application state")?;

    // Hosted backends may be asleep; poke them without holding up startup.
    let probe = state.probe.clone();
    let backend = state.backend.clone();
    tokio::spawn(async move {
        let outcome = probe.run(&backend).await;
        if outcome.is_awake() {
            info!(attempts = outcome.attempts(), "backend is awake");
        } else {
            warn!(attempts = outcome.attempts(), "backend did not answer the wake-up probe");
        }
    });

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, api = %state.backend.base_url(), "clinic gateway listening");

    axum::serve(listener, clinic_server::app_with_state(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
