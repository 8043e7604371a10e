//! Arena storage for one expression graph.
//!
//! Nodes live in a `Vec` addressed by [`NodeId`]; gradients live in a parallel
//! `Vec<f64>`. [`Graph`] is a shared handle to that arena, cloned into every
//! [`ValueRef`] built on it.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use super::scalar::{Operand, ValueRef};
use crate::autograd::{NodeId, Op};
use crate::error::{Error, Result};

/// One recorded node: forward value, provenance, optional label.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) data: f64,
    pub(crate) op: Op,
    pub(crate) label: Option<String>,
}

/// Node arena plus the gradient array parallel to it.
#[derive(Default)]
pub(crate) struct Tape {
    nodes: Vec<Node>,
    grads: Vec<f64>,
}

impl Tape {
    /// Appends a node with zero gradient and returns its id.
    pub(crate) fn push(&mut self, data: f64, op: Op) -> NodeId {
        let id = NodeId(self.nodes.len());
        debug_assert!(op.operands().all(|o| o < id), "operand must precede consumer");
        self.nodes.push(Node {
            data,
            op,
            label: None,
        });
        self.grads.push(0.0);
        id
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub(crate) fn data(&self, id: NodeId) -> f64 {
        self.nodes[id.0].data
    }

    pub(crate) fn op(&self, id: NodeId) -> Op {
        self.nodes[id.0].op
    }

    pub(crate) fn grad(&self, id: NodeId) -> f64 {
        self.grads[id.0]
    }

    pub(crate) fn set_grad(&mut self, id: NodeId, g: f64) {
        self.grads[id.0] = g;
    }

    /// Adds `g` into the accumulator of `id`.
    pub(crate) fn add_grad(&mut self, id: NodeId, g: f64) {
        self.grads[id.0] += g;
    }

    pub(crate) fn zero_grad(&mut self) {
        self.grads.fill(0.0);
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// Shared handle to an expression graph.
///
/// Cloning is cheap and yields a handle to the same arena. The handle is `Rc`-based,
/// so a graph stays on the thread that built it; independent computations on other
/// threads build their own graphs.
///
/// # Example
///
/// ```
/// use micrograd_engine::autograd::{Graph, ScalarNode};
///
/// let g = Graph::new();
/// let a = g.leaf(2.0);
/// let b = g.leaf(3.0);
/// let c = &a * &b;
/// c.backward();
/// assert_eq!(a.grad(), 3.0);
/// assert_eq!(b.grad(), 2.0);
/// ```
#[derive(Clone, Default)]
pub struct Graph(Rc<RefCell<Tape>>);

impl Graph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a leaf node (no operands) with zero gradient.
    #[must_use]
    pub fn leaf(&self, data: f64) -> ValueRef {
        self.record(data, Op::Leaf)
    }

    /// Creates a leaf node carrying a diagnostic label.
    #[must_use]
    pub fn leaf_labeled(&self, data: f64, label: impl Into<String>) -> ValueRef {
        let v = self.leaf(data);
        v.set_label(label);
        v
    }

    /// Promotes an operand to a node of this graph.
    ///
    /// Numbers become new leaves; nodes are returned as-is when they belong to this graph.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedOperand`] if the node was built on a different graph.
    pub fn to_node(&self, operand: impl Into<Operand>) -> Result<ValueRef> {
        let operand = operand.into();
        self.check_owned(&operand)?;
        Ok(match operand {
            Operand::Scalar(x) => self.leaf(x),
            Operand::Node(v) => v,
        })
    }

    /// Fails if `operand` is a node of another graph. Records nothing.
    pub(crate) fn check_owned(&self, operand: &Operand) -> Result<()> {
        match operand {
            Operand::Node(v) if !v.graph().same_graph(self) => Err(Error::UnsupportedOperand(
                format!("node {} belongs to a different graph", v.id()),
            )),
            _ => Ok(()),
        }
    }

    /// Number of nodes recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tape().len()
    }

    /// True if no node has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resets every gradient in the graph to 0.0.
    pub fn zero_grad(&self) {
        self.tape_mut().zero_grad();
    }

    /// True if both handles point at the same arena.
    #[must_use]
    pub fn same_graph(&self, other: &Graph) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Appends a node and returns a handle to it.
    pub(crate) fn record(&self, data: f64, op: Op) -> ValueRef {
        let id = self.tape_mut().push(data, op);
        ValueRef::from_parts(self.clone(), id)
    }

    pub(crate) fn tape(&self) -> Ref<'_, Tape> {
        self.0.borrow()
    }

    pub(crate) fn tape_mut(&self) -> RefMut<'_, Tape> {
        self.0.borrow_mut()
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph").field("nodes", &self.len()).finish()
    }
}
