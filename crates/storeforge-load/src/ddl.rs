use sqlx::SqlitePool;
use tracing::info;

use storeforge_core::{Constraint, Table, catalog, dependency_order, validate_catalog};

use crate::errors::LoadError;

/// Declares the catalog tables in the store.
#[derive(Debug, Clone)]
pub struct SchemaLoader {
    tables: Vec<Table>,
}

impl Default for SchemaLoader {
    fn default() -> Self {
        Self { tables: catalog() }
    }
}

impl SchemaLoader {
    pub fn new(tables: Vec<Table>) -> Result<Self, LoadError> {
        validate_catalog(&tables)?;
        Ok(Self { tables })
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Create every table that does not exist yet, in dependency order, inside
    /// one transaction. Safe to call against an initialized store.
    pub async fn init(&self, pool: &SqlitePool) -> Result<(), LoadError> {
        let order = dependency_order(&self.tables)?;
        let mut tx = pool.begin().await?;
        for kind in order {
            if let Some(table) = self.tables.iter().find(|table| table.kind == kind) {
                sqlx::query(&create_table_sql(table)).execute(&mut *tx).await?;
            }
        }
        tx.commit().await?;
        info!(tables = self.tables.len(), "schema initialized");
        Ok(())
    }

    /// Drop every catalog table, children first, so a regenerated snapshot
    /// can replace the previous one.
    pub async fn reset(&self, pool: &SqlitePool) -> Result<(), LoadError> {
        let mut order = dependency_order(&self.tables)?;
        order.reverse();
        let mut tx = pool.begin().await?;
        for kind in order {
            let sql = format!("DROP TABLE IF EXISTS {}", kind.table_name());
            sqlx::query(&sql).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        info!("schema reset");
        Ok(())
    }
}

/// Render `CREATE TABLE IF NOT EXISTS` for a catalog table.
pub fn create_table_sql(table: &Table) -> String {
    let mut lines: Vec<String> = table
        .columns
        .iter()
        .map(|column| {
            let null = if column.is_nullable { "" } else { " NOT NULL" };
            format!("    {} {}{null}", column.name, column.column_type.sql())
        })
        .collect();

    for constraint in &table.constraints {
        lines.push(match constraint {
            Constraint::PrimaryKey(pk) => format!("    PRIMARY KEY ({})", pk.columns.join(", ")),
            Constraint::Unique(unique) => format!(
                "    {}UNIQUE ({})",
                constraint_name(unique.name.as_deref()),
                unique.columns.join(", ")
            ),
            Constraint::ForeignKey(fk) => format!(
                "    FOREIGN KEY ({}) REFERENCES {} ({})",
                fk.columns.join(", "),
                fk.referenced_table,
                fk.referenced_columns.join(", ")
            ),
            Constraint::Check(check) => format!(
                "    {}CHECK ({})",
                constraint_name(check.name.as_deref()),
                check.expression
            ),
        });
    }

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
        table.name,
        lines.join(",\n")
    )
}

fn constraint_name(name: Option<&str>) -> String {
    name.map(|name| format!("CONSTRAINT {name} "))
        .unwrap_or_default()
}
