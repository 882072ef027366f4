use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::views::{MonthlySales, ProductPerformance, TopCustomer, View};

/// Options for an analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeOptions {
    pub output_dir: PathBuf,
    /// End of the monthly sales window.
    pub reference_date: NaiveDate,
    pub monthly_window_months: u32,
    pub top_customers: u32,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            reference_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            monthly_window_months: 12,
            top_customers: 10,
        }
    }
}

/// Headline figures written to `summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_revenue: f64,
    pub total_orders: i64,
    pub average_order_value: f64,
    pub total_customers: i64,
    pub top_customer: Option<TopCustomer>,
    pub best_selling_product: Option<ProductPerformance>,
    pub most_recent_month: Option<MonthlySales>,
}

/// One exported view file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewExport {
    pub view: View,
    pub path: PathBuf,
    pub rows: u64,
}

/// Result of an analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub output_dir: PathBuf,
    pub exports: Vec<ViewExport>,
    pub summary_path: PathBuf,
    pub summary: Summary,
}

impl AnalysisResult {
    pub fn export(&self, view: View) -> Option<&ViewExport> {
        self.exports.iter().find(|export| export.view == view)
    }
}
