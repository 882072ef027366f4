//! Core contracts for Storeforge.
//!
//! This crate defines the entity types produced by generation, the five-table
//! relational catalog they are persisted into, and the dataset validation
//! shared by the generator, the loader, and the tests.

pub mod constraints;
pub mod entities;
pub mod error;
pub mod graph;
pub mod money;
pub mod schema;
pub mod validation;

pub use constraints::{CheckConstraint, Constraint, ForeignKey, PrimaryKey, UniqueConstraint};
pub use entities::{
    Category, Customer, Dataset, Order, OrderItem, OrderStatus, Product, Review, Supplier,
};
pub use error::{Error, Result};
pub use graph::{DependencyReport, build_dependency_report, dependency_order};
pub use money::Money;
pub use schema::{Column, ColumnType, EntityKind, Table, catalog};
pub use validation::{Violation, is_email_shaped, validate_catalog, validate_dataset};

/// Lowest rating a review may carry.
pub const MIN_RATING: u8 = 1;
/// Highest rating a review may carry.
pub const MAX_RATING: u8 = 5;
