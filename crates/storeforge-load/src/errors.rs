use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sqlx::error::ErrorKind;
use thiserror::Error;

use storeforge_core::EntityKind;

/// Constraint family that rejected a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    PrimaryKey,
    Unique,
    ForeignKey,
    Check,
    NotNull,
}

/// A row rejected by the store.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind:?} violation in '{table}' at row {row_index}: {message}")]
pub struct IntegrityViolation {
    pub table: EntityKind,
    pub row_index: usize,
    pub kind: ViolationKind,
    pub message: String,
}

/// Errors emitted by the store and the load path.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("input for '{table}' not found: {}", path.display())]
    MissingInput { table: EntityKind, path: PathBuf },
    #[error("input for '{table}' is malformed ({}): {reason}", path.display())]
    MalformedInput {
        table: EntityKind,
        path: PathBuf,
        reason: String,
    },
    #[error(transparent)]
    Integrity(#[from] IntegrityViolation),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("core error: {0}")]
    Core(#[from] storeforge_core::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoadError {
    /// Map a failed insert into an integrity violation when the store
    /// rejected the row on a constraint; other database errors pass through.
    pub(crate) fn from_insert(err: sqlx::Error, table: EntityKind, row_index: usize) -> Self {
        let sqlx::Error::Database(db) = &err else {
            return LoadError::Database(err);
        };
        let kind = match db.kind() {
            ErrorKind::UniqueViolation
                if db.code().as_deref() == Some(SQLITE_CONSTRAINT_PRIMARYKEY) =>
            {
                ViolationKind::PrimaryKey
            }
            ErrorKind::UniqueViolation => ViolationKind::Unique,
            ErrorKind::ForeignKeyViolation => ViolationKind::ForeignKey,
            ErrorKind::CheckViolation => ViolationKind::Check,
            ErrorKind::NotNullViolation => ViolationKind::NotNull,
            _ => return LoadError::Database(err),
        };
        LoadError::Integrity(IntegrityViolation {
            table,
            row_index,
            kind,
            message: db.message().to_string(),
        })
    }
}

/// Extended result code SQLite reports for a duplicate primary key.
const SQLITE_CONSTRAINT_PRIMARYKEY: &str = "1555";
