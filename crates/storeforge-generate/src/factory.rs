use fake::Fake;
use fake::faker::address::en::{BuildingNumber, CityName, StateAbbr, StreetName, ZipCode};
use fake::faker::company::en::CatchPhrase;
use fake::faker::internet::en::FreeEmailProvider;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::PhoneNumber;
use rand::Rng;
use rand::seq::IndexedRandom;

use storeforge_core::{Category, Customer, Money, Product, Supplier};

use crate::dates::DateWindow;

/// Cheapest and most expensive generated price, in cents.
const PRICE_RANGE_CENTS: (i64, i64) = (500, 50_000);
const DESCRIPTION_WORDS: usize = 12;

/// Builds the independent entity pools: customers and products.
///
/// Identifiers are dense and start at 1; pool sizes are bounded by
/// [`GenerationEngine`](crate::GenerationEngine) so they fit in `u32`. Emails embed the customer id, so
/// they are unique within a pool by construction.
#[derive(Debug, Clone)]
pub struct EntityFactory {
    window: DateWindow,
    max_stock: u32,
}

impl EntityFactory {
    pub fn new(window: DateWindow, max_stock: u32) -> Self {
        Self { window, max_stock }
    }

    pub fn customers(&self, count: usize, rng: &mut impl Rng) -> Vec<Customer> {
        (1..)
            .take(count)
            .map(|customer_id| self.customer(customer_id, rng))
            .collect()
    }

    pub fn products(&self, count: usize, rng: &mut impl Rng) -> Vec<Product> {
        (1..)
            .take(count)
            .map(|product_id| self.product(product_id, rng))
            .collect()
    }

    fn customer(&self, customer_id: u32, rng: &mut impl Rng) -> Customer {
        let first_name: String = FirstName().fake_with_rng(rng);
        let last_name: String = LastName().fake_with_rng(rng);
        let provider: String = FreeEmailProvider().fake_with_rng(rng);
        let email = format!(
            "{}.{}{}@{}",
            email_token(&first_name),
            email_token(&last_name),
            customer_id,
            provider
        );
        let phone: String = PhoneNumber().fake_with_rng(rng);
        let address = street_address(rng);
        let city: String = CityName().fake_with_rng(rng);
        let state: String = StateAbbr().fake_with_rng(rng);
        let zip_code: String = ZipCode().fake_with_rng(rng);

        Customer {
            customer_id,
            first_name,
            last_name,
            email,
            phone,
            address,
            city,
            state,
            zip_code,
            registration_date: self.window.sample(rng),
        }
    }

    fn product(&self, product_id: u32, rng: &mut impl Rng) -> Product {
        let category = *Category::ALL.choose(rng).unwrap_or(&Category::Electronics);
        let price = Money::from_cents(rng.random_range(PRICE_RANGE_CENTS.0..=PRICE_RANGE_CENTS.1));

        Product {
            product_id,
            product_name: CatchPhrase().fake_with_rng(rng),
            category,
            price,
            stock_quantity: rng.random_range(0..=self.max_stock),
            supplier: *Supplier::ALL.choose(rng).unwrap_or(&Supplier::Initech),
            description: Sentence(DESCRIPTION_WORDS..DESCRIPTION_WORDS + 1).fake_with_rng(rng),
        }
    }
}

/// House number and street, e.g. `"4821 Maple Street"`.
pub fn street_address(rng: &mut impl Rng) -> String {
    let number: String = BuildingNumber().fake_with_rng(rng);
    let street: String = StreetName().fake_with_rng(rng);
    format!("{number} {street}")
}

/// Full single-line postal address used for order shipping.
pub fn postal_address(rng: &mut impl Rng) -> String {
    let street = street_address(rng);
    let city: String = CityName().fake_with_rng(rng);
    let state: String = StateAbbr().fake_with_rng(rng);
    let zip_code: String = ZipCode().fake_with_rng(rng);
    format!("{street}, {city}, {state} {zip_code}")
}

fn email_token(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn factory() -> EntityFactory {
        let reference = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        EntityFactory::new(DateWindow::new(reference, 2).unwrap(), 500)
    }

    #[test]
    fn customer_ids_are_dense_and_emails_unique() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let customers = factory().customers(250, &mut rng);

        let ids: Vec<u32> = customers.iter().map(|c| c.customer_id).collect();
        assert_eq!(ids, (1..=250).collect::<Vec<u32>>());

        let emails: HashSet<&str> = customers.iter().map(|c| c.email.as_str()).collect();
        assert_eq!(emails.len(), customers.len());
        assert!(
            customers
                .iter()
                .all(|c| storeforge_core::is_email_shaped(&c.email))
        );
    }

    #[test]
    fn products_have_positive_prices_and_bounded_stock() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let products = factory().products(200, &mut rng);

        assert_eq!(products.first().map(|p| p.product_id), Some(1));
        for product in &products {
            assert!(product.price.is_positive());
            assert!(product.price.cents() >= 500 && product.price.cents() <= 50_000);
            assert!(product.stock_quantity <= 500);
        }
    }

    #[test]
    fn email_token_drops_punctuation() {
        assert_eq!(email_token("O'Conner"), "oconner");
        assert_eq!(email_token("Mary-Jo"), "maryjo");
    }
}
