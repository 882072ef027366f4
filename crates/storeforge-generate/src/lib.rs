//! Seeded synthetic-data generation for Storeforge.
//!
//! One `ChaCha8Rng` stream drives every random choice, in a fixed order:
//! customers, products, the per-order item allocation, orders with their
//! line items, then reviews. A fixed seed therefore reproduces the same five
//! CSV files byte for byte.

pub mod allocator;
pub mod composer;
pub mod dates;
pub mod engine;
pub mod errors;
pub mod factory;
pub mod model;
pub mod output;
pub mod reviews;

pub use allocator::{AllocationError, allocate};
pub use composer::{ComposedOrder, CompositionPolicy, OrderComposer, StatusWeights};
pub use engine::{GenerationEngine, GenerationResult};
pub use errors::GenerationError;
pub use factory::EntityFactory;
pub use model::{GenerateOptions, GenerationReport, TableReport};
pub use reviews::ReviewSampler;
