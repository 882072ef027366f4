use thiserror::Error;

use storeforge_core::Violation;

use crate::allocator::AllocationError;

/// Errors emitted by the generation pipeline.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("cannot draw {wanted} from an empty {pool} pool")]
    EmptyPool { pool: &'static str, wanted: usize },
    #[error("generated dataset violates {} invariant(s)", .0.len())]
    Invariant(Vec<Violation>),
    #[error("core error: {0}")]
    Core(#[from] storeforge_core::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
