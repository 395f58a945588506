use thiserror::Error;

/// Errors raised by external collaborator clients
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Classification service error: {0}")]
    Classification(String),

    #[error("Audit store error: {0}")]
    Audit(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for collaborator calls
pub type ServiceResult<T> = Result<T, ServiceError>;
