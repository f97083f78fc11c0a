use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Per-field validation messages keyed by field id.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct FieldErrors(pub BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn remove(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("VALIDATION: {0}")]
    Validation(FieldErrors),
    #[error("NOT_FOUND: {0}")]
    NotFound(String),
    #[error("UNSUPPORTED: {0}")]
    Unsupported(String),
    #[error("INTEGRATION: {0}")]
    Integration(String),
    #[error("STORE: {0}")]
    Store(String),
    #[error("CONFIG: {0}")]
    Config(String),
    #[error("INTERNAL: {0}")]
    Internal(String),
}

impl AppError {
    /// Validation failure that is not tied to a form field.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Validation(FieldErrors::single("form", message))
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Internal(value.to_string())
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Store(value.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Internal(value.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Config(value.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(value: anyhow::Error) -> Self {
        Self::Internal(value.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::{AppError, FieldErrors};

    #[test]
    fn validation_display_lists_fields() {
        let mut errors = FieldErrors::new();
        errors.insert("home-address", "This field is required");
        errors.insert("arrival-time", "This field is required");
        let rendered = AppError::Validation(errors).to_string();
        assert_eq!(
            rendered,
            "VALIDATION: arrival-time: This field is required; home-address: This field is required"
        );
    }

    #[test]
    fn invalid_uses_form_key() {
        let error = AppError::invalid("Task title cannot be empty");
        let errors = error.field_errors().expect("validation errors");
        assert_eq!(errors.get("form"), Some("Task title cannot be empty"));
    }
}
