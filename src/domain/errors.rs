//! Domain error types
//!
//! These errors are framework-agnostic. The remote layer only hands back
//! human-readable messages, so every variant carries text rather than codes.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Resource not found
    NotFound,
    /// Validation error with message
    Validation(String),
    /// Database/persistence error
    Database(String),
    /// Remote store (PostgREST) error, message forwarded verbatim
    External(String),
    /// Generic internal error
    Internal(String),
}

impl DomainError {
    /// The message shown to the user, without the category prefix.
    pub fn message(&self) -> String {
        match self {
            DomainError::NotFound => "Resource not found".to_string(),
            DomainError::Validation(msg)
            | DomainError::Database(msg)
            | DomainError::External(msg)
            | DomainError::Internal(msg) => msg.clone(),
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::NotFound => write!(f, "Resource not found"),
            DomainError::Validation(msg) => write!(f, "Validation error: {}", msg),
            DomainError::Database(msg) => write!(f, "Database error: {}", msg),
            DomainError::External(msg) => write!(f, "Remote store error: {}", msg),
            DomainError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}

// Transport-level failures from the REST client (connect, timeout, decode)
impl From<reqwest::Error> for DomainError {
    fn from(e: reqwest::Error) -> Self {
        DomainError::External(e.to_string())
    }
}
