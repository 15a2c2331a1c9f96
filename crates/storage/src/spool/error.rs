#![forbid(unsafe_code)]

use plug_core::RunnerError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}

impl From<StoreError> for RunnerError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::InvalidInput(message) => RunnerError::Rejected(message.to_string()),
            other => RunnerError::Unavailable(other.to_string()),
        }
    }
}
