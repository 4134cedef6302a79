use crate::validate::ValidationErrors;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),
    #[error("Login succeeded but no token was returned")]
    MissingToken,
    #[error("Connection to backend failed: {0}")]
    ConnectionFailed(String),
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Backend error: {0}")]
    ServerError(String),
    #[error("Backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClinicError {
    /// Message suitable for showing to the person filling in the form.
    pub fn user_message(&self) -> String {
        match self {
            ClinicError::InvalidCredentials(msg) => msg.clone(),
            ClinicError::MissingToken => "Token de autenticação não recebido do servidor.".into(),
            ClinicError::ConnectionFailed(_) => {
                "Erro de conexão com o servidor. Tente novamente mais tarde.".into()
            }
            ClinicError::NotAuthenticated => {
                "Erro de autenticação. Por favor, faça login novamente.".into()
            }
            ClinicError::NotFound(msg) => msg.clone(),
            ClinicError::ServerError(_) => "O servidor retornou uma resposta inválida.".into(),
            ClinicError::Rejected { message, .. } => message.clone(),
            ClinicError::Validation(_) => "Erro de validação.".into(),
            ClinicError::Config(_) => "Erro interno de configuração.".into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClinicError>;
