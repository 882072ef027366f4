use fake::Fake;
use fake::faker::lorem::en::Sentence;
use rand::Rng;
use rand::seq::IndexedRandom;

use storeforge_core::{Customer, MAX_RATING, MIN_RATING, Product, Review};

use crate::dates::DateWindow;
use crate::errors::GenerationError;

const REVIEW_WORDS: (usize, usize) = (12, 25);

/// Draws independent reviews over the customer and product pools.
///
/// Pairs are not deduplicated: a customer may review the same product more
/// than once.
#[derive(Debug)]
pub struct ReviewSampler<'a> {
    customers: &'a [Customer],
    products: &'a [Product],
    window: DateWindow,
}

impl<'a> ReviewSampler<'a> {
    pub fn new(customers: &'a [Customer], products: &'a [Product], window: DateWindow) -> Self {
        Self {
            customers,
            products,
            window,
        }
    }

    pub fn sample(&self, count: usize, rng: &mut impl Rng) -> Result<Vec<Review>, GenerationError> {
        if count > 0 && self.customers.is_empty() {
            return Err(GenerationError::EmptyPool {
                pool: "customer",
                wanted: count,
            });
        }
        if count > 0 && self.products.is_empty() {
            return Err(GenerationError::EmptyPool {
                pool: "product",
                wanted: count,
            });
        }

        let mut reviews = Vec::with_capacity(count);
        for review_id in (1..).take(count) {
            let (Some(customer), Some(product)) =
                (self.customers.choose(rng), self.products.choose(rng))
            else {
                break;
            };
            let rating = rng.random_range(MIN_RATING..=MAX_RATING);
            let words = rng.random_range(REVIEW_WORDS.0..=REVIEW_WORDS.1);
            reviews.push(Review {
                review_id,
                product_id: product.product_id,
                customer_id: customer.customer_id,
                rating,
                review_text: Sentence(words..words + 1).fake_with_rng(rng),
                review_date: self.window.sample(rng),
            });
        }
        Ok(reviews)
    }
}
