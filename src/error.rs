use thiserror::Error;

pub type LabelTraderResult<T> = Result<T, LabelTraderError>;

#[derive(Debug, Error)]
pub enum LabelTraderError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    System(#[from] SystemError),
}

/// Errors related to bar validation, data frames and the values derived from them.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Column not found: '{0}'")]
    ColumnNotFound(String),

    #[error("Data frame error: {0}")]
    DataFrame(String),
}

/// Errors related to backtest configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid backtest configuration: {0}")]
    InvalidConfig(String),
}

/// Errors related to File I/O and serialization.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("IO operation failed")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed")]
    Json(#[from] serde_json::Error),

    #[error("File system error: {0}")]
    FileSystem(String),

    #[error("Failed to write data: {0}")]
    WriteFailed(String),
}

/// Errors related to internal invariants.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl From<polars::error::PolarsError> for LabelTraderError {
    fn from(e: polars::error::PolarsError) -> Self {
        Self::Data(DataError::DataFrame(e.to_string()))
    }
}
