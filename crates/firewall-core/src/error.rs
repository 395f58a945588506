//! Error types module
//!
//! Errors raised while decoding trigger input.
//! Configuration problems surface as `anyhow` errors from `Config`.
//! Collaborator failures (storage, classification, audit, alerting) have their
//! own error types in the crates that talk to those services.

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Invalid object key: {0}")]
    InvalidKey(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::InvalidEvent(err.to_string())
    }
}
