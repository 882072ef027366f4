use std::path::PathBuf;

use thiserror::Error;

/// Errors emitted by the aggregation engine.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("database not found at {}; run ingest first", .0.display())]
    MissingDatabase(PathBuf),
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store error: {0}")]
    Store(#[from] storeforge_load::LoadError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
