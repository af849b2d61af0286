//! # dtl-core
//!
//! An abstract interpreter for a small decision-tree-learning DSL,
//! evaluated under an adversary that may perturb the training set before
//! the learner sees it: drop rows, add rows, flip labels, or nudge a
//! numeric feature, each within its own budget. Every domain here is a
//! sound over-approximation: `bestSplit`, `filter`, and `summary` compute
//! bounds that hold for every perturbation choice within budget, not just
//! the one a concrete run happens to make.
//!
//! ## Determinism guarantees
//!
//! - Identical programs and datasets always produce identical posterior
//!   bounds (byte-stable canonical JSON, SHA-256 fingerprinting)
//! - Float normalization to 1e-9 precision before any fingerprint is taken
//! - Lexicographic tie-breaking by feature index, then threshold, in
//!   `bestSplit`
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use dtl_core::ast::Node;
//! use dtl_core::dropout::PerturbationBudget;
//! use dtl_core::evaluator::run;
//! use dtl_core::schema::{FeatureKind, FeatureSchema, FeatureVector};
//!
//! let schema = FeatureSchema::new(
//!     vec![FeatureKind::Numeric { cut_points: vec![2.0] }],
//!     2,
//! );
//! let rows: Arc<[FeatureVector]> = Arc::from(vec![
//!     FeatureVector::new(vec![1.0], 0),
//!     FeatureVector::new(vec![3.0], 1),
//! ]);
//! let program = Node::sequence(vec![Node::Summary, Node::Return]);
//! let posterior = run(&program, rows, schema, PerturbationBudget::none()).unwrap();
//! assert_eq!(posterior.get(0).lo(), 0.5);
//! ```

pub mod ast;
pub mod box_domain;
pub mod determinism;
pub mod distribution;
pub mod dropout;
pub mod error;
pub mod evaluator;
pub mod interval;
pub mod invariants;
pub mod posterior;
pub mod predicate;
pub mod predicate_abstraction;
pub mod references;
pub mod schema;

pub use ast::Node;
pub use box_domain::BoxState;
pub use determinism::{canonical_json, compute_fingerprint, float_normalize, stable_hash, Fingerprint, FLOAT_PRECISION};
pub use distribution::{Distribution, Join};
pub use dropout::{ClassSensitivity, DropoutCounts, PerturbationBudget, TrainingSetAbstraction};
pub use error::DtlError;
pub use evaluator::{evaluate, run, run_with_query, AbstractState, EvalContext};
pub use interval::Interval;
pub use posterior::PosteriorAbstraction;
pub use predicate::SymbolicPredicate;
pub use predicate_abstraction::PredicateAbstraction;
pub use references::DataReferences;
pub use schema::{FeatureKind, FeatureSchema, FeatureVector};
