//! # dtl-data
//!
//! The boundary layer around [`dtl_core`]: dataset loading, configuration
//! validation, and canonical program construction. Nothing here is part
//! of the abstract interpreter itself — it exists to produce the
//! program, schema, rows, budget, and query row that
//! `dtl_core::evaluator::run_with_query` needs.

pub mod builder;
pub mod config;
pub mod error;
pub mod loader;

pub use builder::build_program;
pub use config::Config;
pub use error::DataError;
pub use loader::{load, Dataset};
