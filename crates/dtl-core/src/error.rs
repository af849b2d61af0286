//! The core's typed error hierarchy.
//!
//! Every domain error named by the evaluator is represented here. Boundary
//! errors (dataset loading, configuration, program construction) live in
//! their own crates and are never imported by `dtl-core`.

/// Errors the abstract interpreter can raise while evaluating a program.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DtlError {
    /// Interval division where the divisor interval contains zero.
    #[error("numeric error: division by an interval containing zero")]
    NumericError,

    /// `summary` was invoked on a training-set abstraction whose total
    /// count upper bound is zero.
    #[error("empty abstraction: summary has no surviving rows")]
    EmptyAbstraction,

    /// The evaluator reached the end of a `Sequence` without a `Return`,
    /// or encountered `Return` in a non-tail position.
    #[error("malformed program: {0}")]
    MalformedProgram(String),

    /// A feature vector disagreed with the schema at predicate-evaluation
    /// time (wrong length, or a boolean feature given a numeric value).
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
}
