use serde::de::DeserializeOwned;
use sqlx::Sqlite;
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;

use storeforge_core::{Customer, EntityKind, Order, OrderItem, Product, Review};

pub type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// An entity that can be appended to its catalog table.
///
/// `bind` must bind values in catalog column order; the loader builds the
/// `INSERT` column list from the catalog. Dates bind as `YYYY-MM-DD` text and
/// money as `REAL`.
pub trait LoadRecord: DeserializeOwned + Send + Sync {
    const KIND: EntityKind;

    fn bind<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q>;
}

impl LoadRecord for Customer {
    const KIND: EntityKind = EntityKind::Customers;

    fn bind<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(i64::from(self.customer_id))
            .bind(self.first_name.as_str())
            .bind(self.last_name.as_str())
            .bind(self.email.as_str())
            .bind(self.phone.as_str())
            .bind(self.address.as_str())
            .bind(self.city.as_str())
            .bind(self.state.as_str())
            .bind(self.zip_code.as_str())
            .bind(self.registration_date.to_string())
    }
}

impl LoadRecord for Product {
    const KIND: EntityKind = EntityKind::Products;

    fn bind<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(i64::from(self.product_id))
            .bind(self.product_name.as_str())
            .bind(self.category.as_str())
            .bind(self.price.as_f64())
            .bind(i64::from(self.stock_quantity))
            .bind(self.supplier.as_str())
            .bind(self.description.as_str())
    }
}

impl LoadRecord for Order {
    const KIND: EntityKind = EntityKind::Orders;

    fn bind<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(i64::from(self.order_id))
            .bind(i64::from(self.customer_id))
            .bind(self.order_date.to_string())
            .bind(self.total_amount.as_f64())
            .bind(self.status.as_str())
            .bind(self.shipping_address.as_str())
    }
}

impl LoadRecord for OrderItem {
    const KIND: EntityKind = EntityKind::OrderItems;

    fn bind<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(i64::from(self.order_item_id))
            .bind(i64::from(self.order_id))
            .bind(i64::from(self.product_id))
            .bind(i64::from(self.quantity))
            .bind(self.unit_price.as_f64())
            .bind(self.subtotal.as_f64())
    }
}

impl LoadRecord for Review {
    const KIND: EntityKind = EntityKind::Reviews;

    fn bind<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(i64::from(self.review_id))
            .bind(i64::from(self.product_id))
            .bind(i64::from(self.customer_id))
            .bind(i64::from(self.rating))
            .bind(self.review_text.as_str())
            .bind(self.review_date.to_string())
    }
}
