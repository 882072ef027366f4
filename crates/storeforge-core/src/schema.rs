use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constraints::Constraint;
use crate::error::Error;

/// The five entity collections, one table and one intermediate file each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Customers,
    Products,
    Orders,
    OrderItems,
    Reviews,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Customers,
        EntityKind::Products,
        EntityKind::Orders,
        EntityKind::OrderItems,
        EntityKind::Reviews,
    ];

    pub fn table_name(self) -> &'static str {
        match self {
            EntityKind::Customers => "customers",
            EntityKind::Products => "products",
            EntityKind::Orders => "orders",
            EntityKind::OrderItems => "order_items",
            EntityKind::Reviews => "reviews",
        }
    }

    /// Intermediate CSV file name for this entity.
    pub fn file_name(self) -> String {
        format!("{}.csv", self.table_name())
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.table_name() == value)
            .ok_or_else(|| Error::UnknownTable(value.to_string()))
    }
}

/// SQLite storage class of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    Real,
    Text,
}

impl ColumnType {
    pub fn sql(self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        }
    }
}

/// Column metadata for a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub ordinal_position: i16,
    pub name: String,
    pub column_type: ColumnType,
    pub is_nullable: bool,
}

/// A table of the relational store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub kind: EntityKind,
    pub name: String,
    pub columns: Vec<Column>,
    pub constraints: Vec<Constraint>,
}

impl Table {
    fn new(kind: EntityKind, columns: &[(&str, ColumnType, bool)]) -> Self {
        let columns = columns
            .iter()
            .enumerate()
            .map(|(idx, (name, column_type, is_nullable))| Column {
                ordinal_position: idx as i16 + 1,
                name: name.to_string(),
                column_type: *column_type,
                is_nullable: *is_nullable,
            })
            .collect();
        Self {
            kind,
            name: kind.table_name().to_string(),
            columns,
            constraints: Vec::new(),
        }
    }

    fn with(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Column names in ordinal order; this is also the CSV header.
    pub fn column_names(&self) -> Vec<&str> {
        let mut columns: Vec<&Column> = self.columns.iter().collect();
        columns.sort_by_key(|col| col.ordinal_position);
        columns.into_iter().map(|col| col.name.as_str()).collect()
    }

    /// Tables this table references through foreign keys.
    pub fn parents(&self) -> impl Iterator<Item = &str> {
        self.constraints.iter().filter_map(|constraint| match constraint {
            Constraint::ForeignKey(fk) => Some(fk.referenced_table.as_str()),
            _ => None,
        })
    }
}

/// The five-table e-commerce catalog, in declaration order.
pub fn catalog() -> Vec<Table> {
    use ColumnType::{Integer, Real, Text};

    let customers = Table::new(
        EntityKind::Customers,
        &[
            ("customer_id", Integer, false),
            ("first_name", Text, false),
            ("last_name", Text, false),
            ("email", Text, false),
            ("phone", Text, true),
            ("address", Text, true),
            ("city", Text, true),
            ("state", Text, true),
            ("zip_code", Text, true),
            ("registration_date", Text, true),
        ],
    )
    .with(Constraint::primary_key(&["customer_id"]))
    .with(Constraint::unique("customers_email_key", &["email"]));

    let products = Table::new(
        EntityKind::Products,
        &[
            ("product_id", Integer, false),
            ("product_name", Text, false),
            ("category", Text, true),
            ("price", Real, false),
            ("stock_quantity", Integer, true),
            ("supplier", Text, true),
            ("description", Text, true),
        ],
    )
    .with(Constraint::primary_key(&["product_id"]))
    .with(Constraint::check("products_price_positive", "price > 0"));

    let orders = Table::new(
        EntityKind::Orders,
        &[
            ("order_id", Integer, false),
            ("customer_id", Integer, false),
            ("order_date", Text, true),
            ("total_amount", Real, true),
            ("status", Text, true),
            ("shipping_address", Text, true),
        ],
    )
    .with(Constraint::primary_key(&["order_id"]))
    .with(Constraint::foreign_key("customer_id", "customers", "customer_id"));

    let order_items = Table::new(
        EntityKind::OrderItems,
        &[
            ("order_item_id", Integer, false),
            ("order_id", Integer, false),
            ("product_id", Integer, false),
            ("quantity", Integer, false),
            ("unit_price", Real, false),
            ("subtotal", Real, false),
        ],
    )
    .with(Constraint::primary_key(&["order_item_id"]))
    .with(Constraint::foreign_key("order_id", "orders", "order_id"))
    .with(Constraint::foreign_key("product_id", "products", "product_id"))
    .with(Constraint::check("order_items_quantity_positive", "quantity >= 1"));

    let reviews = Table::new(
        EntityKind::Reviews,
        &[
            ("review_id", Integer, false),
            ("product_id", Integer, false),
            ("customer_id", Integer, false),
            ("rating", Integer, false),
            ("review_text", Text, true),
            ("review_date", Text, true),
        ],
    )
    .with(Constraint::primary_key(&["review_id"]))
    .with(Constraint::foreign_key("product_id", "products", "product_id"))
    .with(Constraint::foreign_key("customer_id", "customers", "customer_id"))
    .with(Constraint::check("reviews_rating_range", "rating BETWEEN 1 AND 5"));

    vec![customers, products, orders, order_items, reviews]
}
