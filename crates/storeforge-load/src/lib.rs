//! Relational store and integrity-preserving load path for Storeforge.
//!
//! `SchemaLoader` declares the five-table catalog in SQLite with primary keys,
//! foreign keys, and check constraints. `IntegrityLoader` appends each entity
//! pool in dependency order, one transaction per table, and reports a
//! per-table outcome: loaded, skipped (missing or malformed input), failed
//! (integrity violation), or not attempted after an earlier failure.

pub mod ddl;
pub mod errors;
pub mod input;
pub mod loader;
pub mod records;
pub mod report;
pub mod store;

pub use ddl::SchemaLoader;
pub use errors::{IntegrityViolation, LoadError, ViolationKind};
pub use loader::IntegrityLoader;
pub use records::LoadRecord;
pub use report::{LoadReport, SkipReason, TableLoad, TableOutcome};
pub use store::{open_existing_store, open_in_memory, open_store};
