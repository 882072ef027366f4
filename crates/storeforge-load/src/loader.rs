use std::path::Path;

use sqlx::SqlitePool;
use tracing::{error, info, warn};

use storeforge_core::{
    Customer, Dataset, EntityKind, Order, OrderItem, Product, Review, Table, catalog,
    dependency_order,
};

use crate::errors::LoadError;
use crate::input::read_pool;
use crate::records::LoadRecord;
use crate::report::{LoadReport, SkipReason, TableLoad, TableOutcome};

/// Appends entity pools to the store in dependency order.
///
/// Each table is one transaction: a rejected row rolls back that table only.
/// Tables committed earlier in the sequence stay committed.
#[derive(Debug, Clone)]
pub struct IntegrityLoader {
    pool: SqlitePool,
    tables: Vec<Table>,
    order: Vec<EntityKind>,
}

impl IntegrityLoader {
    pub fn new(pool: SqlitePool) -> Result<Self, LoadError> {
        let tables = catalog();
        let order = dependency_order(&tables)?;
        Ok(Self {
            pool,
            tables,
            order,
        })
    }

    /// Load order: parents before children.
    pub fn order(&self) -> &[EntityKind] {
        &self.order
    }

    /// Append `rows` to their table and return the table's row count.
    ///
    /// Fails with `LoadError::Integrity` on the first row the store rejects;
    /// the whole batch is rolled back in that case.
    pub async fn load_table<T: LoadRecord>(&self, rows: &[T]) -> Result<u64, LoadError> {
        let table = self.table(T::KIND)?;
        let sql = insert_sql(table);

        let mut tx = self.pool.begin().await?;
        for (row_index, row) in rows.iter().enumerate() {
            if let Err(err) = row.bind(sqlx::query(&sql)).execute(&mut *tx).await {
                tx.rollback().await?;
                return Err(LoadError::from_insert(err, T::KIND, row_index));
            }
        }
        tx.commit().await?;

        self.row_count(T::KIND).await
    }

    pub async fn row_count(&self, kind: EntityKind) -> Result<u64, LoadError> {
        let sql = format!("SELECT COUNT(*) FROM {}", kind.table_name());
        let count = sqlx::query_scalar::<_, i64>(&sql).fetch_one(&self.pool).await?;
        Ok(count.max(0) as u64)
    }

    /// Load the five CSV files under `data_dir`.
    ///
    /// Missing or malformed files are skipped; an integrity violation stops
    /// the sequence. Other database failures are returned as errors.
    pub async fn load_dir(&self, data_dir: &Path) -> Result<LoadReport, LoadError> {
        let mut report = LoadReport::default();
        for &kind in &self.order {
            if report.fatal().is_some() {
                report.tables.push(TableLoad {
                    table: kind,
                    outcome: TableOutcome::NotAttempted,
                });
                continue;
            }
            let outcome = match kind {
                EntityKind::Customers => self.load_file::<Customer>(data_dir).await?,
                EntityKind::Products => self.load_file::<Product>(data_dir).await?,
                EntityKind::Orders => self.load_file::<Order>(data_dir).await?,
                EntityKind::OrderItems => self.load_file::<OrderItem>(data_dir).await?,
                EntityKind::Reviews => self.load_file::<Review>(data_dir).await?,
            };
            report.tables.push(TableLoad {
                table: kind,
                outcome,
            });
        }
        Ok(report)
    }

    /// Load in-memory pools with the same sequencing as `load_dir`.
    pub async fn load_dataset(&self, dataset: &Dataset) -> Result<LoadReport, LoadError> {
        let mut report = LoadReport::default();
        for &kind in &self.order {
            if report.fatal().is_some() {
                report.tables.push(TableLoad {
                    table: kind,
                    outcome: TableOutcome::NotAttempted,
                });
                continue;
            }
            let outcome = match kind {
                EntityKind::Customers => self.load_rows(&dataset.customers).await?,
                EntityKind::Products => self.load_rows(&dataset.products).await?,
                EntityKind::Orders => self.load_rows(&dataset.orders).await?,
                EntityKind::OrderItems => self.load_rows(&dataset.order_items).await?,
                EntityKind::Reviews => self.load_rows(&dataset.reviews).await?,
            };
            report.tables.push(TableLoad {
                table: kind,
                outcome,
            });
        }
        Ok(report)
    }

    async fn load_file<T: LoadRecord>(&self, data_dir: &Path) -> Result<TableOutcome, LoadError> {
        let path = data_dir.join(T::KIND.file_name());
        match read_pool::<T>(&path, self.table(T::KIND)?) {
            Ok(rows) => self.load_rows(&rows).await,
            Err(LoadError::MissingInput { table, path }) => {
                warn!(table = %table, path = %path.display(), "input missing, table skipped");
                Ok(TableOutcome::Skipped(SkipReason::MissingInput { path }))
            }
            Err(LoadError::MalformedInput {
                table,
                path,
                reason,
            }) => {
                warn!(table = %table, path = %path.display(), reason = %reason, "input malformed, table skipped");
                Ok(TableOutcome::Skipped(SkipReason::Malformed {
                    path,
                    detail: reason,
                }))
            }
            Err(other) => Err(other),
        }
    }

    async fn load_rows<T: LoadRecord>(&self, rows: &[T]) -> Result<TableOutcome, LoadError> {
        match self.load_table(rows).await {
            Ok(row_count) => {
                info!(table = %T::KIND, inserted = rows.len(), row_count, "table loaded");
                Ok(TableOutcome::Loaded {
                    inserted: rows.len() as u64,
                    row_count,
                })
            }
            Err(LoadError::Integrity(violation)) => {
                error!(
                    table = %violation.table,
                    row = violation.row_index,
                    kind = ?violation.kind,
                    message = %violation.message,
                    "integrity violation, load aborted"
                );
                Ok(TableOutcome::Failed(violation))
            }
            Err(other) => Err(other),
        }
    }

    fn table(&self, kind: EntityKind) -> Result<&Table, LoadError> {
        self.tables
            .iter()
            .find(|table| table.kind == kind)
            .ok_or_else(|| storeforge_core::Error::UnknownTable(kind.to_string()).into())
    }
}

fn insert_sql(table: &Table) -> String {
    let columns = table.column_names();
    let placeholders = vec!["?"; columns.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({placeholders})",
        table.name,
        columns.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_lists_columns_in_catalog_order() {
        let tables = catalog();
        let items = tables
            .iter()
            .find(|table| table.kind == EntityKind::OrderItems)
            .expect("order_items");
        assert_eq!(
            insert_sql(items),
            "INSERT INTO order_items (order_item_id, order_id, product_id, quantity, \
             unit_price, subtotal) VALUES (?, ?, ?, ?, ?, ?)"
        );
    }
}
