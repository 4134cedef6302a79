//! Shared records, form validation, configuration and the error taxonomy
//! used across the clinic gateway crates.

pub mod config;
pub mod error;
pub mod types;
pub mod validate;

pub use config::ClinicConfig;
pub use error::{ClinicError, Result};
pub use types::*;
pub use validate::ValidationErrors;
