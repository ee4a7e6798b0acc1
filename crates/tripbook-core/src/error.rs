//! Error types for Tripbook

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// A fetch or write against the mileage store failed for a reason other
    /// than the database itself
    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(String),

    /// User input rejected before any write
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    /// True for failures of the external store (as opposed to bad input)
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Pool(_) | Self::Store(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
