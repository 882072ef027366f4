use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constraints::Constraint;
use crate::entities::Dataset;
use crate::error::{Error, Result};
use crate::money::Money;
use crate::schema::{EntityKind, Table};
use crate::{MAX_RATING, MIN_RATING};

/// Structured invariant violation found in a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub code: String,
    pub table: EntityKind,
    pub row_index: usize,
    pub message: String,
}

impl Violation {
    fn new(code: &str, table: EntityKind, row_index: usize, message: String) -> Self {
        Self {
            code: code.to_string(),
            table,
            row_index,
            message,
        }
    }
}

/// Validate internal consistency of a table catalog.
///
/// This checks:
/// - duplicate tables/columns
/// - primary key and unique columns exist
/// - foreign key columns and referenced targets exist
pub fn validate_catalog(tables: &[Table]) -> Result<()> {
    let mut catalog: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

    for table in tables {
        let mut columns = BTreeSet::new();
        for column in &table.columns {
            if !columns.insert(column.name.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "duplicate column name: {}.{}",
                    table.name, column.name
                )));
            }
        }
        if catalog.insert(table.name.as_str(), columns).is_some() {
            return Err(Error::InvalidSchema(format!(
                "duplicate table name: {}",
                table.name
            )));
        }
    }

    for table in tables {
        let columns = &catalog[table.name.as_str()];
        let require = |column: &str, what: &str| -> Result<()> {
            if columns.contains(column) {
                Ok(())
            } else {
                Err(Error::InvalidSchema(format!(
                    "{what} column not found: {}.{}",
                    table.name, column
                )))
            }
        };

        for constraint in &table.constraints {
            match constraint {
                Constraint::PrimaryKey(pk) => {
                    for column in &pk.columns {
                        require(column, "primary key")?;
                    }
                }
                Constraint::Unique(unique) => {
                    for column in &unique.columns {
                        require(column, "unique")?;
                    }
                }
                Constraint::ForeignKey(fk) => {
                    for column in &fk.columns {
                        require(column, "foreign key")?;
                    }
                    let ref_columns =
                        catalog.get(fk.referenced_table.as_str()).ok_or_else(|| {
                            Error::InvalidSchema(format!(
                                "referenced table not found: {}",
                                fk.referenced_table
                            ))
                        })?;
                    for column in &fk.referenced_columns {
                        if !ref_columns.contains(column.as_str()) {
                            return Err(Error::InvalidSchema(format!(
                                "referenced column not found: {}.{}",
                                fk.referenced_table, column
                            )));
                        }
                    }
                }
                Constraint::Check(_) => {}
            }
        }
    }

    Ok(())
}

/// Check every cross-entity reference and quantitative invariant of a dataset.
///
/// Returns all violations found; an empty vector means the dataset is safe to
/// load into a store enforcing the catalog constraints.
pub fn validate_dataset(dataset: &Dataset) -> Vec<Violation> {
    let mut violations = Vec::new();

    let customer_ids = collect_ids(
        dataset.customers.iter().map(|c| c.customer_id),
        EntityKind::Customers,
        &mut violations,
    );
    let product_ids = collect_ids(
        dataset.products.iter().map(|p| p.product_id),
        EntityKind::Products,
        &mut violations,
    );
    let order_ids = collect_ids(
        dataset.orders.iter().map(|o| o.order_id),
        EntityKind::Orders,
        &mut violations,
    );
    collect_ids(
        dataset.order_items.iter().map(|i| i.order_item_id),
        EntityKind::OrderItems,
        &mut violations,
    );
    collect_ids(
        dataset.reviews.iter().map(|r| r.review_id),
        EntityKind::Reviews,
        &mut violations,
    );

    let mut emails = HashSet::new();
    for (idx, customer) in dataset.customers.iter().enumerate() {
        if !is_email_shaped(&customer.email) {
            violations.push(Violation::new(
                "email_shape",
                EntityKind::Customers,
                idx,
                format!("malformed email '{}'", customer.email),
            ));
        }
        if !emails.insert(customer.email.as_str()) {
            violations.push(Violation::new(
                "email_unique",
                EntityKind::Customers,
                idx,
                format!("duplicate email '{}'", customer.email),
            ));
        }
    }

    for (idx, product) in dataset.products.iter().enumerate() {
        if !product.price.is_positive() {
            violations.push(Violation::new(
                "price_positive",
                EntityKind::Products,
                idx,
                format!("product {} has price {}", product.product_id, product.price),
            ));
        }
    }

    // `None` marks an order whose item sum overflowed.
    let mut totals: HashMap<u32, Option<Money>> = HashMap::new();
    for (idx, item) in dataset.order_items.iter().enumerate() {
        if !order_ids.contains(&item.order_id) {
            violations.push(fk_violation(EntityKind::OrderItems, idx, "order", item.order_id));
        }
        if !product_ids.contains(&item.product_id) {
            violations.push(fk_violation(
                EntityKind::OrderItems,
                idx,
                "product",
                item.product_id,
            ));
        }
        if item.quantity == 0 {
            violations.push(Violation::new(
                "quantity_positive",
                EntityKind::OrderItems,
                idx,
                format!("order item {} has zero quantity", item.order_item_id),
            ));
        }
        if item.unit_price.checked_mul(item.quantity) != Some(item.subtotal) {
            violations.push(Violation::new(
                "subtotal",
                EntityKind::OrderItems,
                idx,
                format!(
                    "subtotal {} != {} x {}",
                    item.subtotal, item.unit_price, item.quantity
                ),
            ));
        }
        let total = totals.entry(item.order_id).or_insert(Some(Money::ZERO));
        *total = total.and_then(|sum| sum.checked_add(item.subtotal));
    }

    for (idx, order) in dataset.orders.iter().enumerate() {
        if !customer_ids.contains(&order.customer_id) {
            violations.push(fk_violation(
                EntityKind::Orders,
                idx,
                "customer",
                order.customer_id,
            ));
        }
        let expected = totals
            .get(&order.order_id)
            .copied()
            .unwrap_or(Some(Money::ZERO));
        if expected != Some(order.total_amount) {
            let expected = expected.map_or_else(|| "overflow".to_string(), |sum| sum.to_string());
            violations.push(Violation::new(
                "order_total",
                EntityKind::Orders,
                idx,
                format!(
                    "order {} total {} != item sum {}",
                    order.order_id, order.total_amount, expected
                ),
            ));
        }
    }

    for (idx, review) in dataset.reviews.iter().enumerate() {
        if !(MIN_RATING..=MAX_RATING).contains(&review.rating) {
            violations.push(Violation::new(
                "rating_range",
                EntityKind::Reviews,
                idx,
                format!("rating {} outside {MIN_RATING}..={MAX_RATING}", review.rating),
            ));
        }
        if !product_ids.contains(&review.product_id) {
            violations.push(fk_violation(
                EntityKind::Reviews,
                idx,
                "product",
                review.product_id,
            ));
        }
        if !customer_ids.contains(&review.customer_id) {
            violations.push(fk_violation(
                EntityKind::Reviews,
                idx,
                "customer",
                review.customer_id,
            ));
        }
    }

    violations
}

fn collect_ids(
    ids: impl Iterator<Item = u32>,
    table: EntityKind,
    violations: &mut Vec<Violation>,
) -> HashSet<u32> {
    let mut seen = HashSet::new();
    for (idx, id) in ids.enumerate() {
        if !seen.insert(id) {
            violations.push(Violation::new(
                "primary_key",
                table,
                idx,
                format!("duplicate id {id}"),
            ));
        }
    }
    seen
}

fn fk_violation(table: EntityKind, idx: usize, parent: &str, id: u32) -> Violation {
    Violation::new(
        "foreign_key",
        table,
        idx,
        format!("{parent} {id} does not exist"),
    )
}

/// Local part, `@`, and a dotted domain with an alphabetic TLD.
pub fn is_email_shaped(value: &str) -> bool {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(value))
}
