use crate::validate::ValidationErrors;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Role assigned to psychologists created from the admin area.
pub const PSYCHOLOGIST_ROLE: &str = "psicologo";

/// Login credentials. Never persisted; the password is redacted from `Debug`.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login exchange: the backend token plus whatever identity
/// fields the backend chose to send along.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginGrant {
    pub token: String,
    pub user_id: Option<String>,
    pub clinic_id: Option<String>,
    pub role_id: Option<String>,
}

impl LoginGrant {
    pub fn token_only(token: impl Into<String>) -> Self {
        Self { token: token.into(), user_id: None, clinic_id: None, role_id: None }
    }
}

impl fmt::Debug for LoginGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginGrant")
            .field("token", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("clinic_id", &self.clinic_id)
            .field("role_id", &self.role_id)
            .finish()
    }
}

// ========== Patients ==========

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub nome: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub data_nascimento: Option<String>,
    #[serde(default)]
    pub endereco: Option<String>,
}

/// Body for creating or replacing a patient.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientForm {
    pub nome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_nascimento: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endereco: Option<String>,
}

impl PatientForm {
    /// The e-mail may be left blank, otherwise it must look like an address.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check_name("nome", &self.nome);
        if let Some(email) = self.email.as_deref().filter(|e| !e.is_empty()) {
            errors.check_email("email", email);
        }
        errors.into_result()
    }
}

// ========== Psychologists ==========

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Psychologist {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub nome: String,
    pub email: String,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub clinica_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub papel_id: Option<String>,
}

#[derive(Clone, Deserialize)]
pub struct NewPsychologist {
    pub nome: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for NewPsychologist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewPsychologist")
            .field("nome", &self.nome)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Wire shape the backend expects when creating a user.
#[derive(Serialize)]
pub struct NewPsychologistPayload<'a> {
    pub nome: &'a str,
    pub email: &'a str,
    pub senha: &'a str,
    pub papel: &'static str,
}

impl NewPsychologist {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check_name("nome", &self.nome);
        errors.check_email("email", &self.email);
        errors.check_password("password", &self.password);
        errors.into_result()
    }

    pub fn payload(&self) -> NewPsychologistPayload<'_> {
        NewPsychologistPayload {
            nome: &self.nome,
            email: &self.email,
            senha: &self.password,
            papel: PSYCHOLOGIST_ROLE,
        }
    }
}

/// Partial update. Blank fields count as "not provided".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsychologistUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl PsychologistUpdate {
    pub fn normalized(self) -> Self {
        Self {
            nome: self.nome.filter(|n| !n.is_empty()),
            email: self.email.filter(|e| !e.is_empty()),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(nome) = self.nome.as_deref() {
            errors.check_name("nome", nome);
        }
        if let Some(email) = self.email.as_deref() {
            errors.check_email("email", email);
        }
        errors.into_result()
    }
}

/// Admin dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_psicologos: usize,
    pub total_pacientes: usize,
}

// ========== Identifier decoding ==========

fn id_from_value(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Backend ids arrive as strings or numbers depending on the table.
pub fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    id_from_value(value).ok_or_else(|| D::Error::custom("expected a string or numeric id"))
}

pub fn de_opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(id_from_value))
}
