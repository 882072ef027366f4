use std::path::PathBuf;
use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{info, warn};

use storeforge_core::{Dataset, EntityKind, Table, catalog, validate_dataset};

use crate::allocator::allocate;
use crate::composer::OrderComposer;
use crate::dates::DateWindow;
use crate::errors::GenerationError;
use crate::factory::EntityFactory;
use crate::model::{GenerateOptions, GenerationReport, TableReport};
use crate::output::csv::write_table_csv;
use crate::reviews::ReviewSampler;

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub out_dir: PathBuf,
    pub report: GenerationReport,
}

/// Entry point for generating the five entity pools.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Generate the dataset in memory.
    ///
    /// The stages draw from one RNG stream in a fixed order, so this is a pure
    /// function of the options.
    pub fn build_dataset(&self) -> Result<Dataset, GenerationError> {
        Ok(self.build()?.0)
    }

    /// Generate the dataset and write one CSV per entity plus
    /// `generation_report.json` into `out_dir`.
    pub fn run(&self) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let out_dir = self.options.out_dir.clone();
        std::fs::create_dir_all(&out_dir)?;

        info!(
            run_id = %run_id,
            seed = self.options.seed,
            out_dir = %out_dir.display(),
            "generation started"
        );

        let (dataset, duplicate_lines) = self.build()?;

        let mut report = GenerationReport::new(run_id.clone(), self.options.seed);
        report.duplicate_lines = duplicate_lines;

        for table in catalog() {
            let table_report = match table.kind {
                EntityKind::Customers => write_pool(&out_dir, &table, &dataset.customers)?,
                EntityKind::Products => write_pool(&out_dir, &table, &dataset.products)?,
                EntityKind::Orders => write_pool(&out_dir, &table, &dataset.orders)?,
                EntityKind::OrderItems => write_pool(&out_dir, &table, &dataset.order_items)?,
                EntityKind::Reviews => write_pool(&out_dir, &table, &dataset.reviews)?,
            };
            info!(
                table = %table.kind,
                rows = table_report.rows_generated,
                bytes = table_report.bytes_written,
                "table written"
            );
            report.bytes_written += table_report.bytes_written;
            report.tables.push(table_report);
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        let report_path = out_dir.join("generation_report.json");
        std::fs::write(&report_path, serde_json::to_vec_pretty(&report)?)?;

        info!(
            run_id = %run_id,
            tables = report.tables.len(),
            duration_ms = report.duration_ms,
            bytes_written = report.bytes_written,
            "generation completed"
        );

        Ok(GenerationResult { out_dir, report })
    }

    fn build(&self) -> Result<(Dataset, u64), GenerationError> {
        let options = &self.options;
        for (pool, count) in [
            ("customers", options.customers),
            ("products", options.products),
            ("orders", options.orders),
            ("order_items", options.order_items),
            ("reviews", options.reviews),
        ] {
            check_id_space(pool, count)?;
        }
        let window = DateWindow::new(options.reference_date, options.history_years).ok_or_else(
            || {
                GenerationError::InvalidOptions(format!(
                    "history_years {} reaches before the earliest supported date from {}",
                    options.history_years, options.reference_date
                ))
            },
        )?;
        let mut rng = ChaCha8Rng::seed_from_u64(options.seed);
        let factory = EntityFactory::new(window, options.max_stock);

        let customers = factory.customers(options.customers, &mut rng);
        let products = factory.products(options.products, &mut rng);

        let item_counts = allocate(
            options.orders,
            options.order_items,
            options.min_items_per_order,
            options.max_items_per_order,
            &mut rng,
        )?;

        let composer =
            OrderComposer::new(&customers, &products, options.policy.clone(), window)?;
        let mut orders = Vec::with_capacity(options.orders);
        let mut order_items = Vec::with_capacity(options.order_items);
        let mut duplicate_lines = 0_u64;
        let mut next_item_id = 1_u32;

        for (order_id, item_count) in (1_u32..).zip(item_counts) {
            let composed = composer.compose(order_id, item_count, next_item_id, &mut rng)?;
            next_item_id = u32::try_from(composed.items.len())
                .ok()
                .and_then(|added| next_item_id.checked_add(added))
                .ok_or_else(|| {
                    GenerationError::InvalidOptions("order item ids exceed u32".to_string())
                })?;
            duplicate_lines += composed.duplicate_lines as u64;
            orders.push(composed.order);
            order_items.extend(composed.items);
        }

        let reviews = ReviewSampler::new(&customers, &products, window)
            .sample(options.reviews, &mut rng)?;

        let dataset = Dataset {
            customers,
            products,
            orders,
            order_items,
            reviews,
        };

        let violations = validate_dataset(&dataset);
        if !violations.is_empty() {
            for violation in violations.iter().take(10) {
                warn!(
                    table = %violation.table,
                    row = violation.row_index,
                    code = %violation.code,
                    "{}",
                    violation.message
                );
            }
            return Err(GenerationError::Invariant(violations));
        }

        if duplicate_lines > 0 {
            info!(duplicate_lines, "orders kept duplicate products after retries");
        }

        Ok((dataset, duplicate_lines))
    }
}

/// Ids are dense `u32`s starting at 1, and the id after the last row must
/// still be representable.
fn check_id_space(pool: &str, count: usize) -> Result<(), GenerationError> {
    match u32::try_from(count) {
        Ok(count) if count < u32::MAX => Ok(()),
        _ => Err(GenerationError::InvalidOptions(format!(
            "{pool} count {count} exceeds the {} ids available",
            u32::MAX - 1
        ))),
    }
}

fn write_pool<T: Serialize>(
    out_dir: &std::path::Path,
    table: &Table,
    rows: &[T],
) -> Result<TableReport, GenerationError> {
    let file = table.kind.file_name();
    let written = write_table_csv(&out_dir.join(&file), table, rows)?;
    Ok(TableReport {
        table: table.kind,
        file,
        rows_generated: rows.len() as u64,
        bytes_written: written.bytes,
        sha256: written.sha256,
    })
}
