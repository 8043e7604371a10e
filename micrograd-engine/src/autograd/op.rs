//! Node identities and the closed set of operators a node can record.

use std::fmt;

/// Stable index of a node inside its [`Graph`](super::Graph) arena.
///
/// Ids are handed out in construction order, so an operand's id is always
/// smaller than the id of any node built from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in the arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a node was produced, with the ids of its operands.
///
/// The backward engine dispatches on this tag to apply the local derivative;
/// binary variants keep operand order, so `Add(a, a)` still contributes twice to `a`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Op {
    /// Input or constant; no operands.
    Leaf,
    /// `lhs + rhs`
    Add(NodeId, NodeId),
    /// `lhs * rhs`
    Mul(NodeId, NodeId),
    /// `base ** exponent` with a plain numeric exponent.
    Pow(NodeId, f64),
    /// `e ** x`
    Exp(NodeId),
    /// Hyperbolic tangent.
    Tanh(NodeId),
    /// `max(0, x)`
    Relu(NodeId),
}

impl Op {
    /// Human-readable operator label (`"+"`, `"*"`, `"**k"`, `"tanh"`, ...; empty for leaves).
    #[must_use]
    pub fn tag(&self) -> String {
        match self {
            Op::Leaf => String::new(),
            Op::Add(..) => "+".to_string(),
            Op::Mul(..) => "*".to_string(),
            Op::Pow(_, k) => format!("**{k}"),
            Op::Exp(_) => "exp".to_string(),
            Op::Tanh(_) => "tanh".to_string(),
            Op::Relu(_) => "relu".to_string(),
        }
    }

    /// Distinct operand ids, in operand order. A node used twice appears once.
    pub fn operands(&self) -> impl DoubleEndedIterator<Item = NodeId> {
        let (first, second) = match *self {
            Op::Leaf => (None, None),
            Op::Add(a, b) | Op::Mul(a, b) => (Some(a), (a != b).then_some(b)),
            Op::Pow(a, _) | Op::Exp(a) | Op::Tanh(a) | Op::Relu(a) => (Some(a), None),
        };
        first.into_iter().chain(second)
    }

    /// True for nodes with no operands.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Op::Leaf)
    }
}
