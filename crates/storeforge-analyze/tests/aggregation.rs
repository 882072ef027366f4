use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use sqlx::SqlitePool;

use storeforge_analyze::{AggregationEngine, AnalyzeError, AnalyzeOptions, View};
use storeforge_core::{
    Category, Customer, Dataset, Money, Order, OrderItem, OrderStatus, Product, Review, Supplier,
};
use storeforge_generate::{GenerateOptions, GenerationEngine};
use storeforge_load::{IntegrityLoader, SchemaLoader, open_in_memory, open_store};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn temp_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("storeforge_analyze_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn customer(id: u32, first: &str, email: &str) -> Customer {
    Customer {
        customer_id: id,
        first_name: first.to_string(),
        last_name: "Tester".to_string(),
        email: email.to_string(),
        phone: "555-0100".to_string(),
        address: "1 Main St".to_string(),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        zip_code: "62701".to_string(),
        registration_date: day(2022, 1, 1),
    }
}

fn product(id: u32, category: Category, cents: i64) -> Product {
    Product {
        product_id: id,
        product_name: format!("Product {id}"),
        category,
        price: Money::from_cents(cents),
        stock_quantity: 10,
        supplier: Supplier::ALL[0],
        description: "Sturdy.".to_string(),
    }
}

fn order(id: u32, customer_id: u32, date: NaiveDate, cents: i64) -> Order {
    Order {
        order_id: id,
        customer_id,
        order_date: date,
        total_amount: Money::from_cents(cents),
        status: OrderStatus::ALL[0],
        shipping_address: "1 Main St, Springfield, IL 62701".to_string(),
    }
}

fn item(id: u32, order_id: u32, product_id: u32, quantity: u32, unit_cents: i64) -> OrderItem {
    OrderItem {
        order_item_id: id,
        order_id,
        product_id,
        quantity,
        unit_price: Money::from_cents(unit_cents),
        subtotal: Money::from_cents(unit_cents * i64::from(quantity)),
    }
}

fn review(id: u32, product_id: u32, customer_id: u32, rating: u8) -> Review {
    Review {
        review_id: id,
        product_id,
        customer_id,
        rating,
        review_text: "Fine.".to_string(),
        review_date: day(2023, 12, 1),
    }
}

/// Two buyers, one idle customer, two products in different categories, and
/// one order outside the twelve-month window.
fn small_dataset() -> Dataset {
    Dataset {
        customers: vec![
            customer(1, "Ada", "ada@example.com"),
            customer(2, "Grace", "grace@example.com"),
            customer(3, "Alan", "alan@example.com"),
        ],
        products: vec![
            product(1, Category::ALL[0], 1_000),
            product(2, Category::ALL[1], 500),
        ],
        orders: vec![
            order(1, 1, day(2023, 6, 15), 2_500),
            order(2, 2, day(2023, 11, 2), 1_000),
            order(3, 1, day(2022, 3, 1), 500),
        ],
        order_items: vec![
            item(1, 1, 1, 2, 1_000),
            item(2, 1, 2, 1, 500),
            item(3, 2, 1, 1, 1_000),
            item(4, 3, 2, 1, 500),
        ],
        reviews: vec![review(1, 1, 1, 5), review(2, 1, 2, 4), review(3, 2, 1, 3)],
    }
}

async fn loaded_store(dataset: &Dataset) -> Result<SqlitePool> {
    let pool = open_in_memory().await?;
    SchemaLoader::default().init(&pool).await?;
    IntegrityLoader::new(pool.clone())?
        .load_dataset(dataset)
        .await?
        .into_result()?;
    Ok(pool)
}

fn options(label: &str) -> AnalyzeOptions {
    AnalyzeOptions {
        output_dir: temp_dir(label),
        ..AnalyzeOptions::default()
    }
}

#[tokio::test]
async fn top_customers_rank_by_spend() -> Result<()> {
    let engine = AggregationEngine::new(loaded_store(&small_dataset()).await?, options("top"));
    let rows = engine.top_customers().await?;

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].customer_id, 1);
    assert_eq!(rows[0].customer_name, "Ada Tester");
    assert_eq!(rows[0].orders_count, 2);
    assert_eq!(rows[0].total_spent, 30.0);
    assert_eq!(rows[1].customer_id, 2);
    Ok(())
}

#[tokio::test]
async fn product_revenue_is_not_inflated_by_reviews() -> Result<()> {
    let engine = AggregationEngine::new(loaded_store(&small_dataset()).await?, options("products"));
    let rows = engine.product_performance().await?;

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].product_id, 1);
    assert_eq!(rows[0].total_revenue, 30.0);
    assert_eq!(rows[0].units_sold, 3);
    assert_eq!(rows[0].average_rating, Some(4.5));
    assert_eq!(rows[1].total_revenue, 10.0);
    assert_eq!(rows[1].average_rating, Some(3.0));
    Ok(())
}

#[tokio::test]
async fn monthly_sales_cover_the_window_before_the_reference_date() -> Result<()> {
    let engine = AggregationEngine::new(loaded_store(&small_dataset()).await?, options("monthly"));
    let rows = engine.monthly_sales().await?;

    let months: Vec<&str> = rows.iter().map(|row| row.month.as_str()).collect();
    assert_eq!(months, ["2023-06", "2023-11"]);
    assert_eq!(rows[0].total_revenue, 25.0);
    assert_eq!(rows[1].orders_count, 1);
    Ok(())
}

#[tokio::test]
async fn category_and_reviewer_views() -> Result<()> {
    let engine = AggregationEngine::new(loaded_store(&small_dataset()).await?, options("categories"));

    let categories = engine.category_analysis().await?;
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].category, Category::ALL[0].as_str());
    assert_eq!(categories[0].total_revenue, 30.0);
    assert_eq!(categories[0].orders_count, 2);
    assert_eq!(categories[0].average_order_value, Some(15.0));

    let reviewers = engine.customer_reviews().await?;
    assert_eq!(reviewers.len(), 2, "customers without reviews are omitted");
    assert_eq!(reviewers[0].customer_id, 1);
    assert_eq!(reviewers[0].reviews_count, 2);
    assert_eq!(reviewers[0].products_reviewed, 2);
    assert_eq!(reviewers[0].average_rating, 4.0);
    Ok(())
}

#[tokio::test]
async fn run_writes_views_and_summary() -> Result<()> {
    let engine = AggregationEngine::new(loaded_store(&small_dataset()).await?, options("run"));
    let result = engine.run().await?;

    for view in View::ALL {
        let export = result.export(view).expect("exported view");
        let contents = fs::read_to_string(&export.path)?;
        let header = contents.lines().next().expect("header row");
        assert_eq!(header, view.columns().join(","));
        assert_eq!(contents.lines().count() as u64, export.rows + 1);
    }

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&result.summary_path)?)?;
    assert_eq!(summary["total_revenue"], 40.0);
    assert_eq!(summary["total_orders"], 3);
    assert_eq!(summary["average_order_value"], 13.33);
    assert_eq!(summary["total_customers"], 3);
    assert_eq!(summary["top_customer"]["customer_id"], 1);
    assert_eq!(summary["best_selling_product"]["product_id"], 1);
    assert_eq!(summary["most_recent_month"]["month"], "2023-11");
    Ok(())
}

#[tokio::test]
async fn empty_store_yields_headers_only() -> Result<()> {
    let pool = open_in_memory().await?;
    SchemaLoader::default().init(&pool).await?;
    let result = AggregationEngine::new(pool, options("empty")).run().await?;

    assert_eq!(result.summary.total_revenue, 0.0);
    assert_eq!(result.summary.total_orders, 0);
    assert_eq!(result.summary.average_order_value, 0.0);
    assert_eq!(result.summary.total_customers, 0);
    assert!(result.summary.top_customer.is_none());
    let export = result.export(View::TopCustomers).expect("exported view");
    assert_eq!(export.rows, 0);
    assert_eq!(fs::read_to_string(&export.path)?.lines().count(), 1);
    Ok(())
}

#[tokio::test]
async fn missing_database_is_reported() {
    let path = temp_dir("missing").join("absent.db");
    let err = AggregationEngine::open(&path, AnalyzeOptions::default())
        .await
        .expect_err("database does not exist");
    assert!(matches!(err, AnalyzeError::MissingDatabase(ref missing) if missing == &path));
}

#[tokio::test]
async fn generated_pipeline_end_to_end() -> Result<()> {
    let data_dir = temp_dir("pipeline_data");
    let generation = GenerationEngine::new(GenerateOptions {
        out_dir: data_dir.clone(),
        ..GenerateOptions::default()
    })
    .run()?;

    let db_path = temp_dir("pipeline_db").join("storeforge.db");
    let pool = open_store(&db_path).await?;
    SchemaLoader::default().init(&pool).await?;
    IntegrityLoader::new(pool.clone())?
        .load_dir(&generation.out_dir)
        .await?
        .into_result()?;
    pool.close().await;

    let options = AnalyzeOptions {
        reference_date: GenerateOptions::default().reference_date,
        ..options("pipeline_out")
    };
    let result = AggregationEngine::open(&db_path, options).await?.run().await?;

    let top = result.summary.top_customer.clone().expect("some customer ordered");
    let products = result.export(View::ProductPerformance).expect("products");
    assert_eq!(products.rows, 50);
    assert_eq!(result.summary.total_orders, 200);
    assert_eq!(result.summary.total_customers, 100);
    assert!(top.total_spent > 0.0);
    assert!(result.summary.total_revenue >= top.total_spent);
    Ok(())
}
