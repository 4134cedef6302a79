//! HTTP client for the external clinic API: the login exchange, patient and
//! psychologist CRUD calls, and the backend wake-up probe.

pub mod client;
pub mod patients;
pub mod probe;
pub mod psychologists;
mod response;

pub use client::BackendClient;
pub use probe::{HealthCheck, ProbeOutcome, WakeUpProbe};
