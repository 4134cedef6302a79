//! Backend wake-up probe.
//!
//! The backend host may be cold-started on first use, so the admin area
//! polls its health endpoint a bounded number of times before giving up.

use crate::client::BackendClient;
use async_trait::async_trait;
use clinic_core::config::ProbeConfig;
use clinic_core::Result;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn check(&self) -> Result<()>;
}

#[async_trait]
impl HealthCheck for BackendClient {
    async fn check(&self) -> Result<()> {
        self.health().await
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProbeOutcome {
    Awake { attempts: u32 },
    Unreachable { attempts: u32, last_error: String },
}

impl ProbeOutcome {
    pub fn is_awake(&self) -> bool {
        matches!(self, ProbeOutcome::Awake { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            ProbeOutcome::Awake { attempts } | ProbeOutcome::Unreachable { attempts, .. } => {
                *attempts
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct WakeUpProbe {
    attempts: u32,
    delay: Duration,
    timeout: Duration,
}

impl WakeUpProbe {
    pub fn new(attempts: u32, delay: Duration, timeout: Duration) -> Self {
        Self { attempts: attempts.max(1), delay, timeout }
    }

    pub fn from_config(config: &ProbeConfig) -> Self {
        Self::new(config.attempts, config.delay(), config.timeout())
    }

    /// Poll until the first healthy answer; each attempt is cut off after
    /// the per-attempt timeout and attempts are spaced by a fixed delay.
    pub async fn run<H: HealthCheck + ?Sized>(&self, target: &H) -> ProbeOutcome {
        let mut last_error = String::new();

        for attempt in 1..=self.attempts {
            match tokio::time::timeout(self.timeout, target.check()).await {
                Ok(Ok(())) => {
                    info!(attempt, "backend is awake");
                    return ProbeOutcome::Awake { attempts: attempt };
                }
                Ok(Err(e)) => last_error = e.to_string(),
                Err(_) => last_error = format!("timed out after {:?}", self.timeout),
            }
            warn!(attempt, max = self.attempts, error = %last_error, "backend health check failed");

            if attempt < self.attempts {
                tokio::time::sleep(self.delay).await;
            }
        }

        ProbeOutcome::Unreachable { attempts: self.attempts, last_error }
    }
}
