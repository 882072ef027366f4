//! Aggregate analytics over a committed Storeforge store.
//!
//! The five views are read-only queries against the loaded tables; each is
//! exported as `<view>.csv` and summarized in `summary.json`.

pub mod engine;
pub mod errors;
pub mod model;
pub mod views;

pub use engine::AggregationEngine;
pub use errors::AnalyzeError;
pub use model::{AnalysisResult, AnalyzeOptions, Summary, ViewExport};
pub use views::{
    CategoryAnalysis, CustomerReviews, MonthlySales, ProductPerformance, TopCustomer, View,
};
