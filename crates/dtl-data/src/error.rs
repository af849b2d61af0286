//! Boundary error hierarchy for everything outside the core evaluator:
//! dataset loading, configuration validation, and program construction.
//! `dtl-core` never sees these — by the time a program reaches
//! `dtl_core::evaluator::run`, the dataset and schema are already known
//! good.

/// Errors raised while loading a dataset, validating a [`crate::config::Config`],
/// or building a program.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to read dataset file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
