use std::collections::{HashMap, HashSet};

use storeforge_core::{Money, validate_dataset};
use storeforge_generate::{GenerateOptions, GenerationEngine};

fn options(seed: u64) -> GenerateOptions {
    GenerateOptions {
        seed,
        ..GenerateOptions::default()
    }
}

#[test]
fn order_totals_match_item_subtotals() {
    for seed in [1, 42, 7_000] {
        let dataset = GenerationEngine::new(options(seed))
            .build_dataset()
            .expect("generate");

        let mut sums: HashMap<u32, Money> = HashMap::new();
        for item in &dataset.order_items {
            let sum = sums.entry(item.order_id).or_default();
            *sum = *sum + item.subtotal;
        }
        for order in &dataset.orders {
            assert_eq!(
                order.total_amount,
                sums.get(&order.order_id).copied().unwrap_or_default(),
                "seed {seed}, order {}",
                order.order_id
            );
        }
    }
}

#[test]
fn order_items_resolve_and_price_exactly() {
    let dataset = GenerationEngine::new(options(42))
        .build_dataset()
        .expect("generate");

    let orders: HashSet<u32> = dataset.orders.iter().map(|o| o.order_id).collect();
    let prices: HashMap<u32, Money> = dataset
        .products
        .iter()
        .map(|p| (p.product_id, p.price))
        .collect();

    assert_eq!(dataset.order_items.len(), 400);
    for item in &dataset.order_items {
        assert!(orders.contains(&item.order_id));
        assert_eq!(prices.get(&item.product_id), Some(&item.unit_price));
        assert_eq!(item.subtotal, item.unit_price * item.quantity);
        assert!((1..=4).contains(&item.quantity));
    }
}

#[test]
fn every_order_has_between_one_and_five_items() {
    let dataset = GenerationEngine::new(options(3))
        .build_dataset()
        .expect("generate");

    for order in &dataset.orders {
        let count = dataset.items_of(order.order_id).count();
        assert!((1..=5).contains(&count), "order {} has {count}", order.order_id);
    }
}

#[test]
fn reviews_are_rated_one_to_five() {
    let dataset = GenerationEngine::new(options(42))
        .build_dataset()
        .expect("generate");
    assert_eq!(dataset.reviews.len(), 150);
    assert!(dataset.reviews.iter().all(|r| (1..=5).contains(&r.rating)));
}

#[test]
fn generated_dataset_passes_full_validation() {
    let dataset = GenerationEngine::new(options(123))
        .build_dataset()
        .expect("generate");
    assert!(validate_dataset(&dataset).is_empty());
}

#[test]
fn infeasible_item_total_aborts_generation() {
    let options = GenerateOptions {
        orders: 3,
        order_items: 20,
        ..GenerateOptions::default()
    };
    let err = GenerationEngine::new(options)
        .build_dataset()
        .expect_err("3 orders cannot hold 20 items");
    assert!(matches!(
        err,
        storeforge_generate::GenerationError::Allocation(_)
    ));
}

#[test]
fn oversized_date_window_is_rejected() {
    let options = GenerateOptions {
        history_years: 1_000_000,
        ..GenerateOptions::default()
    };
    let err = GenerationEngine::new(options)
        .build_dataset()
        .expect_err("window starts before the earliest date");
    assert!(
        matches!(
            &err,
            storeforge_generate::GenerationError::InvalidOptions(message)
                if message.contains("history_years")
        ),
        "unexpected error: {err}"
    );
}

#[test]
fn pool_sizes_beyond_u32_ids_are_rejected() {
    let options = GenerateOptions {
        customers: usize::try_from(u64::from(u32::MAX) + 1).unwrap_or(usize::MAX),
        ..GenerateOptions::default()
    };
    let err = GenerationEngine::new(options)
        .build_dataset()
        .expect_err("customer ids would not fit");
    assert!(
        matches!(
            &err,
            storeforge_generate::GenerationError::InvalidOptions(message)
                if message.contains("customers")
        ),
        "unexpected error: {err}"
    );
}
