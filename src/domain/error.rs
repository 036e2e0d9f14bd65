use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("{message}")]
    Validation { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// A required field is missing or blank.
    pub fn required(field: &str) -> Self {
        Self::validation(format!("`{field}` is required"))
    }
}

/// Reject missing or whitespace-only text for a required field.
pub fn ensure_present(value: &str, field: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        Err(DomainError::required(field))
    } else {
        Ok(())
    }
}
