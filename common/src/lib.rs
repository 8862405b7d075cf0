use arrow::error::ArrowError;
use datafusion::error::DataFusionError;
use parquet::errors::ParquetError;
use thiserror::Error;
use url::ParseError;

pub mod config;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing column '{column}' in trip records")]
    MissingColumn { column: String },

    #[error("Column '{column}' has type {found}, expected something castable to {expected}")]
    ColumnType {
        column: String,
        expected: String,
        found: String,
    },

    #[error("Null value in required column '{column}' at row {row}")]
    NullValue { column: String, row: usize },

    #[error("Row {row} has no key in {dimension}")]
    KeyConsistency { dimension: String, row: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    #[error("DataFusion error: {0}")]
    DataFusion(#[from] DataFusionError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid Uri: {0}")]
    InvalidUri(String),
}

impl Error {
    /// Structural errors mean the input table does not have the expected shape.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Error::MissingColumn { .. } | Error::ColumnType { .. } | Error::NullValue { .. }
        )
    }
}

impl From<object_store::path::Error> for Error {
    fn from(err: object_store::path::Error) -> Self {
        Error::Storage(format!("Invalid object path: {}", err))
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::InvalidUri(format!("URL parse error: {}", err))
    }
}
