use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use storeforge_core::EntityKind;

use crate::composer::CompositionPolicy;

/// Options for the generation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Directory where the five CSV files and the report are written.
    pub out_dir: PathBuf,
    /// Seed of the single RNG stream shared by every stage.
    pub seed: u64,
    pub customers: usize,
    pub products: usize,
    pub orders: usize,
    /// Total line items across all orders.
    pub order_items: usize,
    pub reviews: usize,
    pub min_items_per_order: usize,
    pub max_items_per_order: usize,
    pub max_stock: u32,
    /// Last day of the date window; dates never depend on the wall clock.
    pub reference_date: NaiveDate,
    /// Length of the date window ending at `reference_date`.
    pub history_years: u32,
    #[serde(flatten)]
    pub policy: CompositionPolicy,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("data"),
            seed: 42,
            customers: 100,
            products: 50,
            orders: 200,
            order_items: 400,
            reviews: 150,
            min_items_per_order: 1,
            max_items_per_order: 5,
            max_stock: 500,
            reference_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            history_years: 2,
            policy: CompositionPolicy::default(),
        }
    }
}

/// Summary of one written entity file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    pub table: EntityKind,
    pub file: String,
    pub rows_generated: u64,
    pub bytes_written: u64,
    /// Hex SHA-256 of the file contents.
    pub sha256: String,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub seed: u64,
    pub tables: Vec<TableReport>,
    /// Order lines that repeat a product after the retry budget ran out.
    pub duplicate_lines: u64,
    pub bytes_written: u64,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(run_id: String, seed: u64) -> Self {
        Self {
            run_id,
            seed,
            tables: Vec::new(),
            duplicate_lines: 0,
            bytes_written: 0,
            duration_ms: 0,
        }
    }

    pub fn table(&self, kind: EntityKind) -> Option<&TableReport> {
        self.tables.iter().find(|table| table.table == kind)
    }
}
