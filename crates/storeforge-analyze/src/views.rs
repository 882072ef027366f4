use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The exported analytic views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    TopCustomers,
    ProductPerformance,
    MonthlySales,
    CategoryAnalysis,
    CustomerReviews,
}

impl View {
    pub const ALL: [View; 5] = [
        View::TopCustomers,
        View::ProductPerformance,
        View::MonthlySales,
        View::CategoryAnalysis,
        View::CustomerReviews,
    ];

    pub fn name(self) -> &'static str {
        match self {
            View::TopCustomers => "top_customers",
            View::ProductPerformance => "product_performance",
            View::MonthlySales => "monthly_sales",
            View::CategoryAnalysis => "category_analysis",
            View::CustomerReviews => "customer_reviews",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.csv", self.name())
    }

    /// CSV header, in row-struct field order.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            View::TopCustomers => &[
                "customer_id",
                "customer_name",
                "email",
                "orders_count",
                "total_spent",
            ],
            View::ProductPerformance => &[
                "product_id",
                "product_name",
                "category",
                "total_revenue",
                "units_sold",
                "average_rating",
            ],
            View::MonthlySales => &["month", "total_revenue", "orders_count"],
            View::CategoryAnalysis => &[
                "category",
                "total_revenue",
                "orders_count",
                "average_order_value",
            ],
            View::CustomerReviews => &[
                "customer_id",
                "customer_name",
                "reviews_count",
                "products_reviewed",
                "average_rating",
            ],
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Customers ranked by total spend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TopCustomer {
    pub customer_id: i64,
    pub customer_name: String,
    pub email: String,
    pub orders_count: i64,
    pub total_spent: f64,
}

/// Revenue, units and rating per product; unsold or unreviewed products
/// report zero revenue and no rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProductPerformance {
    pub product_id: i64,
    pub product_name: String,
    pub category: String,
    pub total_revenue: f64,
    pub units_sold: i64,
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MonthlySales {
    /// `YYYY-MM`
    pub month: String,
    pub total_revenue: f64,
    pub orders_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CategoryAnalysis {
    pub category: String,
    pub total_revenue: f64,
    pub orders_count: i64,
    pub average_order_value: Option<f64>,
}

/// Review activity per customer; customers without reviews are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CustomerReviews {
    pub customer_id: i64,
    pub customer_name: String,
    pub reviews_count: i64,
    pub products_reviewed: i64,
    pub average_rating: f64,
}

pub(crate) const TOP_CUSTOMERS_SQL: &str = "\
SELECT
    c.customer_id,
    c.first_name || ' ' || c.last_name AS customer_name,
    c.email,
    COUNT(o.order_id) AS orders_count,
    ROUND(SUM(o.total_amount), 2) AS total_spent
FROM customers c
JOIN orders o ON o.customer_id = c.customer_id
GROUP BY c.customer_id
ORDER BY total_spent DESC, c.customer_id
LIMIT ?";

// Sales and ratings are aggregated separately; joining both fan-outs at once
// would multiply each product's revenue by its review count.
pub(crate) const PRODUCT_PERFORMANCE_SQL: &str = "\
SELECT
    p.product_id,
    p.product_name,
    p.category,
    ROUND(COALESCE(s.revenue, 0.0), 2) AS total_revenue,
    COALESCE(s.units, 0) AS units_sold,
    ROUND(r.rating, 2) AS average_rating
FROM products p
LEFT JOIN (
    SELECT product_id, SUM(subtotal) AS revenue, SUM(quantity) AS units
    FROM order_items
    GROUP BY product_id
) s ON s.product_id = p.product_id
LEFT JOIN (
    SELECT product_id, AVG(rating) AS rating
    FROM reviews
    GROUP BY product_id
) r ON r.product_id = p.product_id
ORDER BY total_revenue DESC, p.product_id";

pub(crate) const MONTHLY_SALES_SQL: &str = "\
SELECT
    strftime('%Y-%m', o.order_date) AS month,
    ROUND(SUM(o.total_amount), 2) AS total_revenue,
    COUNT(o.order_id) AS orders_count
FROM orders o
WHERE o.order_date >= ? AND o.order_date <= ?
GROUP BY month
ORDER BY month";

pub(crate) const CATEGORY_ANALYSIS_SQL: &str = "\
SELECT
    p.category,
    ROUND(SUM(oi.subtotal), 2) AS total_revenue,
    COUNT(DISTINCT oi.order_id) AS orders_count,
    ROUND(SUM(oi.subtotal) / NULLIF(COUNT(DISTINCT oi.order_id), 0), 2) AS average_order_value
FROM order_items oi
JOIN products p ON p.product_id = oi.product_id
GROUP BY p.category
ORDER BY total_revenue DESC, p.category";

pub(crate) const CUSTOMER_REVIEWS_SQL: &str = "\
SELECT
    c.customer_id,
    c.first_name || ' ' || c.last_name AS customer_name,
    COUNT(r.review_id) AS reviews_count,
    COUNT(DISTINCT r.product_id) AS products_reviewed,
    ROUND(AVG(r.rating), 2) AS average_rating
FROM customers c
JOIN reviews r ON r.customer_id = c.customer_id
GROUP BY c.customer_id
ORDER BY reviews_count DESC, average_rating DESC, c.customer_id";

pub(crate) const TOTAL_REVENUE_SQL: &str =
    "SELECT ROUND(COALESCE(SUM(total_amount), 0.0), 2) FROM orders";

pub(crate) const TOTAL_ORDERS_SQL: &str = "SELECT COUNT(*) FROM orders";

pub(crate) const TOTAL_CUSTOMERS_SQL: &str = "SELECT COUNT(*) FROM customers";

pub(crate) const AVERAGE_ORDER_VALUE_SQL: &str =
    "SELECT ROUND(COALESCE(AVG(total_amount), 0.0), 2) FROM orders";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_match_row_struct_fields() {
        let row = TopCustomer {
            customer_id: 1,
            customer_name: "Ada Byron".to_string(),
            email: "ada@example.com".to_string(),
            orders_count: 2,
            total_spent: 10.5,
        };
        let json = serde_json::to_value(&row).expect("serialize");
        let keys: Vec<&str> = json
            .as_object()
            .expect("object")
            .keys()
            .map(String::as_str)
            .collect();
        let mut expected = View::TopCustomers.columns().to_vec();
        expected.sort_unstable();
        let mut keys = keys;
        keys.sort_unstable();
        assert_eq!(keys, expected);
    }

    #[test]
    fn file_names_follow_view_names() {
        assert_eq!(View::MonthlySales.file_name(), "monthly_sales.csv");
        assert_eq!(View::ALL.len(), 5);
    }
}
