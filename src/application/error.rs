use std::error::Error as StdError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::warn;

use crate::application::envelope::{Envelope, messages};
use crate::application::repos::RepoError;
use crate::domain::error::DomainError;
use crate::infra::error::InfraError;

/// Diagnostic detail attached to failed responses for the logging middleware.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, status: StatusCode, error: &dyn StdError) -> Self {
        let mut messages = vec![error.to_string()];
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self {
            source,
            status,
            messages,
        }
    }

    pub fn from_message(
        source: &'static str,
        status: StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source,
            status,
            messages: vec![message.into()],
        }
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

/// Failure of an entity service operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
    #[error("{message}")]
    Duplicate { message: String },
    #[error("failed to {action} {entity}")]
    Persistence {
        action: &'static str,
        entity: &'static str,
        #[source]
        source: RepoError,
    },
}

impl ServiceError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    /// Wrap a repository failure, keeping unique violations distinguishable.
    pub fn persistence(action: &'static str, entity: &'static str, source: RepoError) -> Self {
        match source {
            RepoError::Duplicate { constraint } => {
                warn!(action, entity, constraint = %constraint, "unique constraint violated");
                Self::Duplicate {
                    message: format!("{entity} already exists"),
                }
            }
            source => Self::Persistence {
                action,
                entity,
                source,
            },
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::Duplicate { .. } => StatusCode::CONFLICT,
            ServiceError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show callers; driver text never appears here.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::Validation(err) => err.to_string(),
            ServiceError::NotFound { .. } => messages::RESOURCE_NOT_FOUND.to_string(),
            ServiceError::Duplicate { message } => message.clone(),
            ServiceError::Persistence { action, entity, .. } => {
                format!("Failed to {action} {entity}")
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let report = ErrorReport::from_error("application::error::ServiceError", status, &self);
        let mut response = Envelope::<()>::failure(status, self.public_message()).into_response();
        report.attach(&mut response);
        response
    }
}

/// Process-level failure surfaced by `main`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}
