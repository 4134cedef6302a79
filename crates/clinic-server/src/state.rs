//! Application state shared across all handlers.

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use clinic_api::{BackendClient, WakeUpProbe};
use clinic_core::{ClinicConfig, Result};
use clinic_session::{AdminSessions, Authenticator, ClinicianSessions, CookiePolicy, Guard, GuardRule};
use std::sync::Arc;
use tracing::warn;

/// Immutable per-process state; cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ClinicConfig>,
    pub backend: BackendClient,
    pub admin: AdminSessions,
    pub clinician: ClinicianSessions,
    pub guard: Arc<Guard>,
    pub probe: WakeUpProbe,
    key: Key,
}

impl AppState {
    pub fn new(config: ClinicConfig) -> Result<Self> {
        config.validate()?;
        let backend = BackendClient::new(&config.api)?;
        let auth: Arc<dyn Authenticator> = Arc::new(backend.clone());

        // Length was checked by `validate`.
        let key = match &config.session.secret {
            Some(secret) => Key::from(secret.as_bytes()),
            None => {
                warn!("no session secret configured; clinician sessions end on restart");
                Key::generate()
            }
        };

        let admin_policy = CookiePolicy::admin(&config.session);
        let clinician_policy = CookiePolicy::clinician(&config.session);
        let guard = Guard::new(vec![
            GuardRule::admin(admin_policy.name.clone()),
            GuardRule::clinician(clinician_policy.name.clone()),
        ]);

        Ok(Self {
            admin: AdminSessions::new(auth.clone(), admin_policy),
            clinician: ClinicianSessions::new(auth, clinician_policy),
            guard: Arc::new(guard),
            probe: WakeUpProbe::from_config(&config.probe),
            backend,
            key,
            config: Arc::new(config),
        })
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.key.clone()
    }
}
