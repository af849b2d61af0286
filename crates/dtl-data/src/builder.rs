//! Builds the canonical learner program: a left-deep spine of
//! `IfImpurityZero { then: Summary; Return, else: BestSplit; branch on
//! the query row; Filter; recurse }` down to a fixed depth. Each level
//! halts early wherever the training set is already pure, otherwise
//! splits on the best remaining predicate and follows the query row down
//! the side it belongs to — the positive filter on the "models" side,
//! the negated filter on the other.

use dtl_core::Node;

/// Builds a program that recurses `max_depth` times. At depth zero the
/// program degenerates to a single summary.
pub fn build_program(max_depth: usize) -> Node {
    if max_depth == 0 {
        return Node::sequence(vec![Node::Summary, Node::Return]);
    }
    Node::IfImpurityZero {
        then_branch: Box::new(Node::sequence(vec![Node::Summary, Node::Return])),
        else_branch: Box::new(Node::sequence(vec![
            Node::BestSplit,
            Node::IfXModelsPhi {
                then_branch: Box::new(Node::sequence(vec![
                    Node::Filter { negated: false },
                    build_program(max_depth - 1),
                ])),
                else_branch: Box::new(Node::sequence(vec![
                    Node::Filter { negated: true },
                    build_program(max_depth - 1),
                ])),
            },
        ])),
    }
}
