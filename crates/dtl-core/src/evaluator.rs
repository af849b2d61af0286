//! The evaluator itself — a straightforward recursive
//! visitor over [`Node`] that threads an [`AbstractState`] through each
//! statement, forking at the two branch forms and joining the results
//! back together before continuing.
//!
//! Both arms of a conditional are always walked, left then right, even
//! when one entered as bottom: walking validates the program's structure
//! (a `Return` in a non-tail position is malformed whether or not the
//! path is reachable), and a bottom arm's result is replaced by the
//! neutral element before the join so it contributes nothing.

use std::sync::Arc;

use crate::ast::Node;
use crate::box_domain::BoxState;
use crate::distribution::Distribution;
use crate::dropout::PerturbationBudget;
use crate::error::DtlError;
use crate::posterior::PosteriorAbstraction;
use crate::schema::{FeatureSchema, FeatureVector};

/// Everything the evaluator threads through a program: the box state
/// (`T#` x `Phi#`) and the posterior most recently assigned by a
/// `Summary` on this path.
#[derive(Debug, Clone, PartialEq)]
pub struct AbstractState {
    pub box_state: BoxState,
    pub posterior: PosteriorAbstraction,
}

impl AbstractState {
    pub fn initial(num_rows: usize, num_classes: usize, budget: PerturbationBudget) -> Self {
        Self { box_state: BoxState::initial(num_rows, budget), posterior: Distribution::bottom(num_classes) }
    }

    fn join(&self, other: &Self) -> Self {
        Self { box_state: self.box_state.join(&other.box_state), posterior: self.posterior.join(&other.posterior) }
    }

    /// The neutral element for a branch join: bottom box state, bottom
    /// posterior. Joining it into the other branch's result changes
    /// nothing.
    fn neutral(&self, num_classes: usize) -> Self {
        Self { box_state: self.box_state.bottom_like(), posterior: Distribution::bottom(num_classes) }
    }
}

/// Shared, read-only context every statement needs: the dataset rows,
/// the schema describing them, and the query row `x` that `IfXModelsPhi`
/// branches on (fixed for the whole program, absent for programs that
/// never branch on it).
pub struct EvalContext {
    pub rows: Arc<[FeatureVector]>,
    pub schema: FeatureSchema,
    pub query: Option<FeatureVector>,
}

/// Evaluates `node` starting from `state`, returning the resulting state
/// and whether this path ended in a `Return`.
pub fn evaluate(node: &Node, state: &AbstractState, ctx: &EvalContext) -> Result<(AbstractState, bool), DtlError> {
    match node {
        Node::Sequence(statements) => evaluate_sequence(statements, state, ctx),
        Node::Return => Ok((state.clone(), true)),
        Node::Summary => {
            // A bottom box state is unreachable; a summary over it would
            // divide by an entirely-empty total, so the path skips the
            // assignment and keeps contributing nothing.
            if state.box_state.is_bottom() {
                return Ok((state.clone(), false));
            }
            let summary = state.box_state.summary(&ctx.rows, &ctx.schema)?;
            let mut next = state.clone();
            next.posterior = summary;
            Ok((next, false))
        }
        Node::BestSplit => {
            if state.box_state.is_bottom() {
                return Ok((state.clone(), false));
            }
            let mut next = state.clone();
            next.box_state.predicate = state.box_state.best_split(&ctx.rows, &ctx.schema);
            Ok((next, false))
        }
        Node::Filter { negated } => {
            if state.box_state.is_bottom() {
                return Ok((state.clone(), false));
            }
            let mut next = state.clone();
            next.box_state = if *negated {
                state.box_state.filter_negated(&ctx.rows, &ctx.schema)
            } else {
                state.box_state.filter(&ctx.rows, &ctx.schema)
            };
            Ok((next, false))
        }
        Node::IfImpurityZero { then_branch, else_branch } => {
            let mut then_state = state.clone();
            then_state.box_state = state.box_state.meet_impurity_equals_zero(&ctx.rows, &ctx.schema);
            let mut else_state = state.clone();
            else_state.box_state = state.box_state.meet_impurity_not_equals_zero(&ctx.rows, &ctx.schema);
            join_branches(then_branch, &then_state, else_branch, &else_state, ctx)
        }
        Node::IfXModelsPhi { then_branch, else_branch } => {
            let query = ctx.query.as_ref().ok_or_else(|| {
                DtlError::MalformedProgram("program branches on the query row but none was provided".to_string())
            })?;
            let mut then_state = state.clone();
            then_state.box_state.predicate = state.box_state.predicate.meet_x_models(query, &ctx.schema);
            let mut else_state = state.clone();
            else_state.box_state.predicate = state.box_state.predicate.meet_x_not_models(query, &ctx.schema);
            join_branches(then_branch, &then_state, else_branch, &else_state, ctx)
        }
    }
}

fn join_branches(
    then_branch: &Node,
    then_entry: &AbstractState,
    else_branch: &Node,
    else_entry: &AbstractState,
    ctx: &EvalContext,
) -> Result<(AbstractState, bool), DtlError> {
    let (then_result, then_terminated) = evaluate(then_branch, then_entry, ctx)?;
    let (else_result, else_terminated) = evaluate(else_branch, else_entry, ctx)?;
    if then_terminated != else_terminated {
        return Err(DtlError::MalformedProgram(
            "both branches of a conditional must terminate the same way".to_string(),
        ));
    }
    let num_classes = ctx.schema.num_classes();
    let then_contribution =
        if then_entry.box_state.is_bottom() { then_result.neutral(num_classes) } else { then_result };
    let else_contribution =
        if else_entry.box_state.is_bottom() { else_result.neutral(num_classes) } else { else_result };
    Ok((then_contribution.join(&else_contribution), then_terminated))
}

fn evaluate_sequence(
    statements: &[Node],
    state: &AbstractState,
    ctx: &EvalContext,
) -> Result<(AbstractState, bool), DtlError> {
    let mut current = state.clone();
    let mut terminated = false;
    for (i, statement) in statements.iter().enumerate() {
        if terminated {
            return Err(DtlError::MalformedProgram(format!(
                "statement {i} follows a Return in non-tail position"
            )));
        }
        let (next, stopped) = evaluate(statement, &current, ctx)?;
        current = next;
        terminated = stopped;
    }
    Ok((current, terminated))
}

/// Runs a program that never branches on the query row. See
/// [`run_with_query`] for the general form.
pub fn run(
    program: &Node,
    rows: Arc<[FeatureVector]>,
    schema: FeatureSchema,
    budget: PerturbationBudget,
) -> Result<PosteriorAbstraction, DtlError> {
    run_inner(program, rows, schema, budget, None)
}

/// Runs a full program from the initial state, with `query` as the fixed
/// row `IfXModelsPhi` statements branch on. Returns the joined posterior
/// abstraction accumulated across every path.
pub fn run_with_query(
    program: &Node,
    rows: Arc<[FeatureVector]>,
    schema: FeatureSchema,
    budget: PerturbationBudget,
    query: FeatureVector,
) -> Result<PosteriorAbstraction, DtlError> {
    schema.validate_row(&query)?;
    run_inner(program, rows, schema, budget, Some(query))
}

fn run_inner(
    program: &Node,
    rows: Arc<[FeatureVector]>,
    schema: FeatureSchema,
    budget: PerturbationBudget,
    query: Option<FeatureVector>,
) -> Result<PosteriorAbstraction, DtlError> {
    let num_rows = rows.len();
    let num_classes = schema.num_classes();
    let ctx = EvalContext { rows, schema, query };
    let initial = AbstractState::initial(num_rows, num_classes, budget);
    let (final_state, terminated) = evaluate(program, &initial, &ctx)?;
    if !terminated {
        return Err(DtlError::MalformedProgram("program does not end in Return".to_string()));
    }
    Ok(final_state.posterior)
}
