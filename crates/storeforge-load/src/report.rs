use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use storeforge_core::EntityKind;

use crate::errors::{IntegrityViolation, LoadError};

/// Why a table was skipped without touching the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    MissingInput { path: PathBuf },
    Malformed { path: PathBuf, detail: String },
}

/// Outcome of loading one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TableOutcome {
    /// Batch committed; `row_count` is the table size afterwards.
    Loaded { inserted: u64, row_count: u64 },
    Skipped(SkipReason),
    /// Batch rolled back; the load sequence stopped here.
    Failed(IntegrityViolation),
    /// Not reached because an earlier table failed.
    NotAttempted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLoad {
    pub table: EntityKind,
    pub outcome: TableOutcome,
}

/// Per-table outcomes of one load sequence, in load order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub tables: Vec<TableLoad>,
}

impl LoadReport {
    pub fn outcome(&self, table: EntityKind) -> Option<&TableOutcome> {
        self.tables
            .iter()
            .find(|load| load.table == table)
            .map(|load| &load.outcome)
    }

    /// The integrity violation that stopped the sequence, if any.
    pub fn fatal(&self) -> Option<&IntegrityViolation> {
        self.tables.iter().find_map(|load| match &load.outcome {
            TableOutcome::Failed(violation) => Some(violation),
            _ => None,
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = (EntityKind, &SkipReason)> {
        self.tables.iter().filter_map(|load| match &load.outcome {
            TableOutcome::Skipped(reason) => Some((load.table, reason)),
            _ => None,
        })
    }

    /// Every table loaded; nothing skipped or failed.
    pub fn is_complete(&self) -> bool {
        self.tables
            .iter()
            .all(|load| matches!(load.outcome, TableOutcome::Loaded { .. }))
    }

    /// Turn a fatal outcome into an error, keeping skips as non-fatal.
    pub fn into_result(self) -> Result<Self, LoadError> {
        match self.fatal() {
            Some(violation) => Err(LoadError::Integrity(violation.clone())),
            None => Ok(self),
        }
    }
}
