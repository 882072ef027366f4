use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::schema::EntityKind;

/// Registered shopper. Field order matches the `customers` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: u32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub registration_date: NaiveDate,
}

/// Catalog item. Field order matches the `products` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: u32,
    pub product_name: String,
    pub category: Category,
    pub price: Money,
    pub stock_quantity: u32,
    pub supplier: Supplier,
    pub description: String,
}

/// Order header. `total_amount` is the exact sum of its line subtotals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: u32,
    pub customer_id: u32,
    pub order_date: NaiveDate,
    pub total_amount: Money,
    pub status: OrderStatus,
    pub shipping_address: String,
}

/// Order line. `unit_price` is copied from the product when the order is composed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub order_item_id: u32,
    pub order_id: u32,
    pub product_id: u32,
    pub quantity: u32,
    pub unit_price: Money,
    pub subtotal: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub review_id: u32,
    pub product_id: u32,
    pub customer_id: u32,
    pub rating: u8,
    pub review_text: String,
    pub review_date: NaiveDate,
}

/// Product category. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Electronics,
    #[serde(rename = "Home & Kitchen")]
    HomeAndKitchen,
    Sports,
    Beauty,
    Books,
    Toys,
    Clothing,
    Health,
    Automotive,
    #[serde(rename = "Office Supplies")]
    OfficeSupplies,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Electronics,
        Category::HomeAndKitchen,
        Category::Sports,
        Category::Beauty,
        Category::Books,
        Category::Toys,
        Category::Clothing,
        Category::Health,
        Category::Automotive,
        Category::OfficeSupplies,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::HomeAndKitchen => "Home & Kitchen",
            Category::Sports => "Sports",
            Category::Beauty => "Beauty",
            Category::Books => "Books",
            Category::Toys => "Toys",
            Category::Clothing => "Clothing",
            Category::Health => "Health",
            Category::Automotive => "Automotive",
            Category::OfficeSupplies => "Office Supplies",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Supplier {
    #[serde(rename = "Northwind Traders")]
    NorthwindTraders,
    #[serde(rename = "Globex Corporation")]
    GlobexCorporation,
    Initech,
    #[serde(rename = "Umbrella Supplies")]
    UmbrellaSupplies,
    #[serde(rename = "Soylent Corp")]
    SoylentCorp,
    #[serde(rename = "Acme Wholesale")]
    AcmeWholesale,
}

impl Supplier {
    pub const ALL: [Supplier; 6] = [
        Supplier::NorthwindTraders,
        Supplier::GlobexCorporation,
        Supplier::Initech,
        Supplier::UmbrellaSupplies,
        Supplier::SoylentCorp,
        Supplier::AcmeWholesale,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Supplier::NorthwindTraders => "Northwind Traders",
            Supplier::GlobexCorporation => "Globex Corporation",
            Supplier::Initech => "Initech",
            Supplier::UmbrellaSupplies => "Umbrella Supplies",
            Supplier::SoylentCorp => "Soylent Corp",
            Supplier::AcmeWholesale => "Acme Wholesale",
        }
    }
}

/// Fulfillment status. Affects reporting only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

/// The five entity pools of one generation pass.
///
/// Pools are built once and never mutated afterwards; regeneration replaces
/// the whole dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub customers: Vec<Customer>,
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    pub order_items: Vec<OrderItem>,
    pub reviews: Vec<Review>,
}

impl Dataset {
    /// Number of rows in the pool for `kind`.
    pub fn len_of(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Customers => self.customers.len(),
            EntityKind::Products => self.products.len(),
            EntityKind::Orders => self.orders.len(),
            EntityKind::OrderItems => self.order_items.len(),
            EntityKind::Reviews => self.reviews.len(),
        }
    }

    /// Line items belonging to `order_id`, in generation order.
    pub fn items_of(&self, order_id: u32) -> impl Iterator<Item = &OrderItem> {
        self.order_items
            .iter()
            .filter(move |item| item.order_id == order_id)
    }
}
