use std::collections::HashSet;

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use storeforge_core::{Customer, Money, Order, OrderItem, OrderStatus, Product};

use crate::dates::DateWindow;
use crate::errors::GenerationError;
use crate::factory::postal_address;

/// Relative weight of each order status.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusWeights {
    pub pending: f64,
    pub processing: f64,
    pub shipped: f64,
    pub delivered: f64,
    pub cancelled: f64,
}

impl StatusWeights {
    fn as_array(&self) -> [f64; 5] {
        [
            self.pending,
            self.processing,
            self.shipped,
            self.delivered,
            self.cancelled,
        ]
    }
}

impl Default for StatusWeights {
    fn default() -> Self {
        Self {
            pending: 0.10,
            processing: 0.20,
            shipped: 0.35,
            delivered: 0.30,
            cancelled: 0.05,
        }
    }
}

/// Tuning knobs for order composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionPolicy {
    /// Redraws allowed when a product is already on the order. Once spent,
    /// the duplicate line is kept, so an order may list a product twice.
    pub duplicate_product_attempts: u32,
    pub min_quantity: u32,
    pub max_quantity: u32,
    pub status_weights: StatusWeights,
}

impl Default for CompositionPolicy {
    fn default() -> Self {
        Self {
            duplicate_product_attempts: 5,
            min_quantity: 1,
            max_quantity: 4,
            status_weights: StatusWeights::default(),
        }
    }
}

/// One order and its line items.
#[derive(Debug, Clone)]
pub struct ComposedOrder {
    pub order: Order,
    pub items: Vec<OrderItem>,
    /// Lines whose product repeats an earlier line of the same order.
    pub duplicate_lines: usize,
}

/// Composes orders over fixed customer and product pools.
#[derive(Debug)]
pub struct OrderComposer<'a> {
    customers: &'a [Customer],
    products: &'a [Product],
    policy: CompositionPolicy,
    statuses: WeightedIndex<f64>,
    window: DateWindow,
}

impl<'a> OrderComposer<'a> {
    pub fn new(
        customers: &'a [Customer],
        products: &'a [Product],
        policy: CompositionPolicy,
        window: DateWindow,
    ) -> Result<Self, GenerationError> {
        if policy.min_quantity == 0 || policy.min_quantity > policy.max_quantity {
            return Err(GenerationError::InvalidOptions(format!(
                "quantity range {}..={} must be non-empty and start at 1 or more",
                policy.min_quantity, policy.max_quantity
            )));
        }
        let statuses = WeightedIndex::new(policy.status_weights.as_array()).map_err(|err| {
            GenerationError::InvalidOptions(format!("status weights: {err}"))
        })?;

        Ok(Self {
            customers,
            products,
            policy,
            statuses,
            window,
        })
    }

    /// Build order `order_id` with `item_count` lines numbered from `first_item_id`.
    pub fn compose(
        &self,
        order_id: u32,
        item_count: usize,
        first_item_id: u32,
        rng: &mut impl Rng,
    ) -> Result<ComposedOrder, GenerationError> {
        let customer = self.customers.choose(rng).ok_or(GenerationError::EmptyPool {
            pool: "customer",
            wanted: 1,
        })?;
        let order_date = self.window.sample(rng);
        let shipping_address = postal_address(rng);

        let mut items = Vec::with_capacity(item_count);
        let mut used = HashSet::with_capacity(item_count);
        let mut duplicate_lines = 0;

        for (offset, order_item_id) in (first_item_id..).take(item_count).enumerate() {
            let product = self.pick_product(&used, rng).ok_or(GenerationError::EmptyPool {
                pool: "product",
                wanted: item_count - offset,
            })?;
            if !used.insert(product.product_id) {
                duplicate_lines += 1;
            }

            let quantity = rng.random_range(self.policy.min_quantity..=self.policy.max_quantity);
            let unit_price = product.price;
            items.push(OrderItem {
                order_item_id,
                order_id,
                product_id: product.product_id,
                quantity,
                unit_price,
                subtotal: unit_price * quantity,
            });
        }

        let total_amount: Money = items.iter().map(|item| item.subtotal).sum();
        let status = OrderStatus::ALL[self.statuses.sample(rng)];

        Ok(ComposedOrder {
            order: Order {
                order_id,
                customer_id: customer.customer_id,
                order_date,
                total_amount,
                status,
                shipping_address,
            },
            items,
            duplicate_lines,
        })
    }

    /// Uniform pick, redrawn while it repeats a product already on the order
    /// and attempts remain.
    fn pick_product(&self, used: &HashSet<u32>, rng: &mut impl Rng) -> Option<&'a Product> {
        let mut product = self.products.choose(rng)?;
        let mut attempts = 0;
        while used.contains(&product.product_id)
            && attempts < self.policy.duplicate_product_attempts
        {
            product = self.products.choose(rng)?;
            attempts += 1;
        }
        Some(product)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::factory::EntityFactory;

    fn window() -> DateWindow {
        DateWindow::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 2).unwrap()
    }

    fn pools(customers: usize, products: usize) -> (Vec<Customer>, Vec<Product>) {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let factory = EntityFactory::new(window(), 500);
        (
            factory.customers(customers, &mut rng),
            factory.products(products, &mut rng),
        )
    }

    #[test]
    fn total_is_sum_of_subtotals() {
        let (customers, products) = pools(10, 20);
        let composer =
            OrderComposer::new(&customers, &products, CompositionPolicy::default(), window())
                .expect("composer");
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let mut next_item = 1;
        for order_id in 1..=50 {
            let composed = composer
                .compose(order_id, 4, next_item, &mut rng)
                .expect("compose");
            next_item += composed.items.len() as u32;

            let sum: Money = composed.items.iter().map(|item| item.subtotal).sum();
            assert_eq!(composed.order.total_amount, sum);
            for item in &composed.items {
                assert_eq!(item.order_id, order_id);
                assert_eq!(item.subtotal, item.unit_price * item.quantity);
                assert!((1..=4).contains(&item.quantity));
                let product = &products[item.product_id as usize - 1];
                assert_eq!(item.unit_price, product.price);
            }
        }
    }

    #[test]
    fn single_product_pool_accepts_duplicates_after_bounded_retries() {
        let (customers, products) = pools(3, 1);
        let composer =
            OrderComposer::new(&customers, &products, CompositionPolicy::default(), window())
                .expect("composer");
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let composed = composer.compose(1, 3, 1, &mut rng).expect("compose");
        assert_eq!(composed.items.len(), 3);
        assert!(composed.items.iter().all(|item| item.product_id == 1));
        assert_eq!(composed.duplicate_lines, 2);
    }

    #[test]
    fn line_ids_continue_from_first_item_id() {
        let (customers, products) = pools(3, 10);
        let composer =
            OrderComposer::new(&customers, &products, CompositionPolicy::default(), window())
                .expect("composer");
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let composed = composer.compose(7, 3, 40, &mut rng).expect("compose");
        let ids: Vec<u32> = composed.items.iter().map(|item| item.order_item_id).collect();
        assert_eq!(ids, vec![40, 41, 42]);
    }

    #[test]
    fn empty_product_pool_is_an_error() {
        let (customers, _) = pools(3, 0);
        let composer = OrderComposer::new(&customers, &[], CompositionPolicy::default(), window())
            .expect("composer");
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        assert!(matches!(
            composer.compose(1, 2, 1, &mut rng),
            Err(GenerationError::EmptyPool { pool: "product", .. })
        ));
    }

    #[test]
    fn all_zero_status_weights_are_rejected() {
        let (customers, products) = pools(1, 1);
        let policy = CompositionPolicy {
            status_weights: StatusWeights {
                pending: 0.0,
                processing: 0.0,
                shipped: 0.0,
                delivered: 0.0,
                cancelled: 0.0,
            },
            ..CompositionPolicy::default()
        };
        assert!(matches!(
            OrderComposer::new(&customers, &products, policy, window()),
            Err(GenerationError::InvalidOptions(_))
        ));
    }

    #[test]
    fn zero_weight_status_never_drawn() {
        let (customers, products) = pools(5, 5);
        let policy = CompositionPolicy {
            status_weights: StatusWeights {
                cancelled: 0.0,
                ..StatusWeights::default()
            },
            ..CompositionPolicy::default()
        };
        let composer = OrderComposer::new(&customers, &products, policy, window()).expect("composer");
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for order_id in 1..=200 {
            let composed = composer.compose(order_id, 1, order_id, &mut rng).expect("compose");
            assert_ne!(composed.order.status, OrderStatus::Cancelled);
        }
    }
}
