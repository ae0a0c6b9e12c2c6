use thiserror::Error;

use crate::ports::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl AppError {
    pub fn invalid(message: impl Into<String>) -> Self {
        AppError::InvalidArgument(message.into())
    }

    /// Process exit code used by the CLI when a command fails with this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::InvalidArgument(_) => 2,
            AppError::Persistence(_) => 3,
            AppError::Serialization(_) | AppError::Csv(_) => 4,
            AppError::Io(_) => 5,
        }
    }

    /// Operational failures are expected at runtime; everything else points at a bug
    /// or bad input.
    pub fn is_operational(&self) -> bool {
        matches!(self, AppError::Persistence(_) | AppError::Io(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;
