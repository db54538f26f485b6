use thiserror::Error;

/// Failures classified by the services. The display text is the exact
/// message returned to API clients.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Authentication secret is not configured")]
    Configuration,
    #[error("{0}")]
    Internal(String),
}

impl DomainError {
    /// Maps store-level failures onto the client-facing taxonomy;
    /// anything unrecognized propagates untouched.
    pub fn classify(err: anyhow::Error, not_found: &str, conflict: &str) -> anyhow::Error {
        match err.downcast_ref::<StoreError>() {
            Some(StoreError::RecordNotFound) => {
                DomainError::NotFound(not_found.to_string()).into()
            }
            Some(StoreError::UniqueViolation(_)) => {
                DomainError::Conflict(conflict.to_string()).into()
            }
            None => err,
        }
    }
}

/// Failures surfaced by the record stores themselves.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record not found")]
    RecordNotFound,
    #[error("Unique constraint violated on {0}")]
    UniqueViolation(&'static str),
}
