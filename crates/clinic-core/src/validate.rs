//! Field validation for the patient and psychologist forms.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

pub const NAME_TOO_SHORT: &str = "O nome deve ter pelo menos 3 caracteres.";
pub const INVALID_EMAIL: &str = "Por favor, insira um e-mail válido.";
pub const PASSWORD_TOO_SHORT: &str = "A senha deve ter pelo menos 6 caracteres.";

pub const MIN_NAME_CHARS: usize = 3;
pub const MIN_PASSWORD_CHARS: usize = 6;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-']+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Field name -> messages, serialized as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub(crate) fn check_name(&mut self, field: &str, value: &str) {
        if value.chars().count() < MIN_NAME_CHARS {
            self.add(field, NAME_TOO_SHORT);
        }
    }

    pub(crate) fn check_email(&mut self, field: &str, value: &str) {
        if !is_valid_email(value) {
            self.add(field, INVALID_EMAIL);
        }
    }

    pub(crate) fn check_password(&mut self, field: &str, value: &str) {
        if value.chars().count() < MIN_PASSWORD_CHARS {
            self.add(field, PASSWORD_TOO_SHORT);
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, msgs)| format!("{}: {}", field, msgs.join(" ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}
