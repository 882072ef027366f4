mod config;
mod logging;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::info;

use config::{ConfigError, PipelineConfig};
use logging::{LoggingError, init_logging};
use storeforge_analyze::{AggregationEngine, AnalyzeError, Summary};
use storeforge_generate::{GenerationEngine, GenerationError};
use storeforge_load::{IntegrityLoader, LoadError, LoadReport, SchemaLoader, open_store};

#[derive(Debug, Error)]
enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),
    #[error("generation failed: {0}")]
    Generate(#[from] GenerationError),
    #[error("load failed: {0}")]
    Load(#[from] LoadError),
    #[error("analysis failed: {0}")]
    Analyze(#[from] AnalyzeError),
    #[error("input directory not found: {}; run generate first", .0.display())]
    MissingDataDir(PathBuf),
}

#[derive(Parser, Debug)]
#[command(name = "storeforge", version, about = "Synthetic e-commerce data pipeline")]
struct Cli {
    /// Pipeline configuration (TOML). Defaults apply when the file is absent.
    #[arg(long, global = true, default_value = "storeforge.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the five CSV files into the data directory.
    Generate,
    /// Append the CSV files to the store, creating its schema if needed.
    Ingest,
    /// Export the analytic views and summary from the store.
    Analyze,
    /// Generate, replace the store contents, and analyze.
    Run,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let config = PipelineConfig::load(&cli.config)?;
    init_logging(config.log_path.as_deref())?;

    match cli.command {
        Command::Generate => generate(&config),
        Command::Ingest => ingest(&config, false).await,
        Command::Analyze => analyze(&config).await,
        Command::Run => {
            let timer = Instant::now();
            generate(&config)?;
            ingest(&config, true).await?;
            analyze(&config).await?;
            info!(duration_ms = timer.elapsed().as_millis() as u64, "pipeline finished");
            Ok(())
        }
    }
}

fn generate(config: &PipelineConfig) -> Result<(), CliError> {
    let result = GenerationEngine::new(config.generate_options()).run()?;
    info!(
        run_id = %result.report.run_id,
        out_dir = %result.out_dir.display(),
        "dataset written"
    );
    Ok(())
}

/// Load the data directory into the store. With `replace`, existing tables
/// are dropped first so a regenerated snapshot does not collide with the
/// previous one.
async fn ingest(config: &PipelineConfig, replace: bool) -> Result<(), CliError> {
    if !config.data_dir.is_dir() {
        return Err(CliError::MissingDataDir(config.data_dir.clone()));
    }
    let pool = open_store(&config.database_path).await?;
    let schema = SchemaLoader::default();
    if replace {
        schema.reset(&pool).await?;
    }
    schema.init(&pool).await?;

    let loader = IntegrityLoader::new(pool.clone())?;
    let report = loader.load_dir(&config.data_dir).await?;
    print_load_report(&report);
    pool.close().await;

    report.into_result()?;
    Ok(())
}

async fn analyze(config: &PipelineConfig) -> Result<(), CliError> {
    let engine = AggregationEngine::open(&config.database_path, config.analyze_options()).await?;
    let result = engine.run().await?;
    for export in &result.exports {
        println!("Wrote {} rows to {}", export.rows, export.path.display());
    }
    print_summary(&result.summary);
    Ok(())
}

fn print_load_report(report: &LoadReport) {
    use storeforge_load::TableOutcome;

    for load in &report.tables {
        match &load.outcome {
            TableOutcome::Loaded { row_count, .. } => {
                println!("Loaded {row_count} rows into '{}'", load.table)
            }
            TableOutcome::Skipped(reason) => println!("Skipped '{}': {reason:?}", load.table),
            TableOutcome::Failed(violation) => println!("Failed '{}': {violation}", load.table),
            TableOutcome::NotAttempted => println!("Not attempted '{}'", load.table),
        }
    }
}

fn print_summary(summary: &Summary) {
    println!();
    println!("Summary");
    println!("-------");
    println!("Total revenue: ${:.2}", summary.total_revenue);
    println!(
        "Orders: {} (average ${:.2}), customers: {}",
        summary.total_orders, summary.average_order_value, summary.total_customers
    );
    if let Some(top) = &summary.top_customer {
        println!(
            "Top customer: {} (${:.2} across {} orders)",
            top.customer_name, top.total_spent, top.orders_count
        );
    }
    if let Some(product) = &summary.best_selling_product {
        println!(
            "Best-selling product: {} (revenue ${:.2}, units sold {})",
            product.product_name, product.total_revenue, product.units_sold
        );
    }
    if let Some(month) = &summary.most_recent_month {
        println!(
            "Most recent month ({}): revenue ${:.2} across {} orders",
            month.month, month.total_revenue, month.orders_count
        );
    }
}
