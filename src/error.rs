use thiserror::Error;

use crate::duration::ParseError;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Render error: {0}")]
    Render(#[from] std::fmt::Error),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("InvalidData: {0}")]
    InvalidData(String),

    #[error("Duration in row {row}: {source}")]
    Duration {
        row: usize,
        #[source]
        source: ParseError,
    },
}

pub type Result<T> = std::result::Result<T, CatalogError>;
