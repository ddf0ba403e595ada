use thiserror::Error;

/// Failure taxonomy for the logic core. Application glue wraps these in
/// `anyhow::Error`; library-level calls return them directly so callers can
/// tell a flaky backend from a bad definition.
#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Network request failed: {0}")]
    TransientNetwork(String),

    #[error("Failed to (de)serialize {context}: {message}")]
    Serialization { context: String, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DeskError {
    pub fn serialization(context: &str, err: impl ToString) -> DeskError {
        return DeskError::Serialization {
            context: context.to_string(),
            message: err.to_string(),
        };
    }
}

impl From<reqwest::Error> for DeskError {
    fn from(err: reqwest::Error) -> DeskError {
        return DeskError::TransientNetwork(err.to_string());
    }
}

impl From<std::io::Error> for DeskError {
    fn from(err: std::io::Error) -> DeskError {
        return DeskError::Storage(err.to_string());
    }
}

pub type DeskResult<T> = std::result::Result<T, DeskError>;
