use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{Months, NaiveDate};
use serde::Serialize;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteRow;
use tracing::info;

use storeforge_load::open_existing_store;

use crate::errors::AnalyzeError;
use crate::model::{AnalysisResult, AnalyzeOptions, Summary, ViewExport};
use crate::views::{
    AVERAGE_ORDER_VALUE_SQL, CATEGORY_ANALYSIS_SQL, CUSTOMER_REVIEWS_SQL, CategoryAnalysis,
    CustomerReviews, MONTHLY_SALES_SQL, MonthlySales, PRODUCT_PERFORMANCE_SQL, ProductPerformance,
    TOP_CUSTOMERS_SQL, TOTAL_CUSTOMERS_SQL, TOTAL_ORDERS_SQL, TOTAL_REVENUE_SQL, TopCustomer,
    View,
};

/// Computes the analytic views over a committed store.
#[derive(Debug, Clone)]
pub struct AggregationEngine {
    pool: SqlitePool,
    options: AnalyzeOptions,
}

impl AggregationEngine {
    pub fn new(pool: SqlitePool, options: AnalyzeOptions) -> Self {
        Self { pool, options }
    }

    /// Open the store at `database_path`, which must already exist.
    pub async fn open(database_path: &Path, options: AnalyzeOptions) -> Result<Self, AnalyzeError> {
        if !database_path.is_file() {
            return Err(AnalyzeError::MissingDatabase(database_path.to_path_buf()));
        }
        let pool = open_existing_store(database_path).await?;
        Ok(Self::new(pool, options))
    }

    pub fn options(&self) -> &AnalyzeOptions {
        &self.options
    }

    pub async fn top_customers(&self) -> Result<Vec<TopCustomer>, AnalyzeError> {
        let rows = sqlx::query_as::<_, TopCustomer>(TOP_CUSTOMERS_SQL)
            .bind(i64::from(self.options.top_customers))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn product_performance(&self) -> Result<Vec<ProductPerformance>, AnalyzeError> {
        self.fetch(PRODUCT_PERFORMANCE_SQL).await
    }

    /// Orders per calendar month inside the window ending at the reference
    /// date, oldest month first.
    pub async fn monthly_sales(&self) -> Result<Vec<MonthlySales>, AnalyzeError> {
        let (start, end) = self.monthly_window()?;
        let rows = sqlx::query_as::<_, MonthlySales>(MONTHLY_SALES_SQL)
            .bind(start.to_string())
            .bind(end.to_string())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn category_analysis(&self) -> Result<Vec<CategoryAnalysis>, AnalyzeError> {
        self.fetch(CATEGORY_ANALYSIS_SQL).await
    }

    pub async fn customer_reviews(&self) -> Result<Vec<CustomerReviews>, AnalyzeError> {
        self.fetch(CUSTOMER_REVIEWS_SQL).await
    }

    pub async fn total_revenue(&self) -> Result<f64, AnalyzeError> {
        let total = sqlx::query_scalar::<_, f64>(TOTAL_REVENUE_SQL)
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn total_orders(&self) -> Result<i64, AnalyzeError> {
        self.count(TOTAL_ORDERS_SQL).await
    }

    pub async fn total_customers(&self) -> Result<i64, AnalyzeError> {
        self.count(TOTAL_CUSTOMERS_SQL).await
    }

    /// Mean order total over every order, `0.0` for an empty store.
    pub async fn average_order_value(&self) -> Result<f64, AnalyzeError> {
        let average = sqlx::query_scalar::<_, f64>(AVERAGE_ORDER_VALUE_SQL)
            .fetch_one(&self.pool)
            .await?;
        Ok(average)
    }

    /// Compute every view, write `<view>.csv` files and `summary.json` into
    /// the output directory.
    pub async fn run(&self) -> Result<AnalysisResult, AnalyzeError> {
        let start = Instant::now();
        let output_dir = self.options.output_dir.clone();
        std::fs::create_dir_all(&output_dir)?;

        let top_customers = self.top_customers().await?;
        let products = self.product_performance().await?;
        let monthly = self.monthly_sales().await?;
        let categories = self.category_analysis().await?;
        let reviewers = self.customer_reviews().await?;

        let exports = vec![
            export(&output_dir, View::TopCustomers, &top_customers)?,
            export(&output_dir, View::ProductPerformance, &products)?,
            export(&output_dir, View::MonthlySales, &monthly)?,
            export(&output_dir, View::CategoryAnalysis, &categories)?,
            export(&output_dir, View::CustomerReviews, &reviewers)?,
        ];

        let summary = Summary {
            total_revenue: self.total_revenue().await?,
            total_orders: self.total_orders().await?,
            average_order_value: self.average_order_value().await?,
            total_customers: self.total_customers().await?,
            top_customer: top_customers.into_iter().next(),
            best_selling_product: products.into_iter().next(),
            most_recent_month: monthly.into_iter().last(),
        };
        let summary_path = output_dir.join("summary.json");
        let file = BufWriter::new(File::create(&summary_path)?);
        serde_json::to_writer_pretty(file, &summary)?;

        info!(
            output_dir = %output_dir.display(),
            total_revenue = summary.total_revenue,
            duration_ms = start.elapsed().as_millis() as u64,
            "analysis finished"
        );

        Ok(AnalysisResult {
            output_dir,
            exports,
            summary_path,
            summary,
        })
    }

    async fn count(&self, sql: &'static str) -> Result<i64, AnalyzeError> {
        let count = sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn fetch<T>(&self, sql: &'static str) -> Result<Vec<T>, AnalyzeError>
    where
        T: for<'r> sqlx::FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let rows = sqlx::query_as::<_, T>(sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    fn monthly_window(&self) -> Result<(NaiveDate, NaiveDate), AnalyzeError> {
        let end = self.options.reference_date;
        let start = end
            .checked_sub_months(Months::new(self.options.monthly_window_months))
            .ok_or_else(|| {
                AnalyzeError::InvalidOptions(format!(
                    "monthly window of {} months before {end} is out of range",
                    self.options.monthly_window_months
                ))
            })?;
        Ok((start, end))
    }
}

fn export<T: Serialize>(
    output_dir: &Path,
    view: View,
    rows: &[T],
) -> Result<ViewExport, AnalyzeError> {
    let path: PathBuf = output_dir.join(view.file_name());
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&path)?;
    writer.write_record(view.columns())?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(view = %view, rows = rows.len(), path = %path.display(), "view exported");
    Ok(ViewExport {
        view,
        path,
        rows: rows.len() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn monthly_window_ends_at_reference_date() {
        let pool = storeforge_load::open_in_memory().await.expect("pool");
        let engine = AggregationEngine::new(pool, AnalyzeOptions::default());
        let (start, end) = engine.monthly_window().expect("window");
        assert_eq!(start, NaiveDate::from_ymd_opt(2023, 1, 1).expect("date"));
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"));
    }
}
