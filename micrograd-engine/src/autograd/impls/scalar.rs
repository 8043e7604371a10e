//! Scalar autograd: handles to single float nodes, with the expression builder.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use super::graph::Graph;
use crate::autograd::{Exp, NodeId, Op, Pow, ScalarNode, Tanh, backward};
use crate::error::{Error, Result};

/// Handle to a scalar node in an expression graph.
///
/// Holds the owning [`Graph`] and the node's [`NodeId`]; the value, gradient and
/// provenance live in the graph's arena. Two handles are equal when they refer to
/// the same node of the same graph.
#[derive(Clone)]
pub struct ValueRef {
    graph: Graph,
    id: NodeId,
}

/// Either a plain number or a node; the input type of every builder entry point.
///
/// Numbers are promoted to fresh leaves by [`Graph::to_node`].
#[derive(Clone, Debug)]
pub enum Operand {
    /// Numeric literal, promoted to a leaf.
    Scalar(f64),
    /// Existing node, used by identity.
    Node(ValueRef),
}

impl From<f64> for Operand {
    fn from(x: f64) -> Self {
        Operand::Scalar(x)
    }
}

impl From<ValueRef> for Operand {
    fn from(v: ValueRef) -> Self {
        Operand::Node(v)
    }
}

impl From<&ValueRef> for Operand {
    fn from(v: &ValueRef) -> Self {
        Operand::Node(v.clone())
    }
}

impl ValueRef {
    pub(crate) fn from_parts(graph: Graph, id: NodeId) -> Self {
        ValueRef { graph, id }
    }

    /// Arena id of this node.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Graph this node was recorded on.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Operator that produced this node.
    #[must_use]
    pub fn op(&self) -> Op {
        self.graph.tape().op(self.id)
    }

    /// Operator label for diagnostics (`"+"`, `"**2"`, `"tanh"`, empty for leaves).
    #[must_use]
    pub fn op_tag(&self) -> String {
        self.op().tag()
    }

    /// Distinct operand nodes, in operand order.
    #[must_use]
    pub fn operands(&self) -> Vec<ValueRef> {
        self.op()
            .operands()
            .map(|id| ValueRef::from_parts(self.graph.clone(), id))
            .collect()
    }

    /// Diagnostic label, if one was set.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        self.graph.tape().node(self.id).label.clone()
    }

    /// Attaches a diagnostic label. Has no effect on computation.
    pub fn set_label(&self, label: impl Into<String>) {
        self.graph.tape_mut().node_mut(self.id).label = Some(label.into());
    }

    /// Overwrites the forward value, e.g. when an optimizer updates a parameter.
    ///
    /// Nodes already built from this one keep their old value.
    pub fn set_data(&self, data: f64) {
        self.graph.tape_mut().node_mut(self.id).data = data;
    }

    /// Every node reachable from this one, operands before consumers, this node last.
    #[must_use]
    pub fn topological_order(&self) -> Vec<ValueRef> {
        let order = backward::topological_order(&self.graph.tape(), self.id);
        order
            .into_iter()
            .map(|id| ValueRef::from_parts(self.graph.clone(), id))
            .collect()
    }

    /// `self + rhs`.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedOperand`] if `rhs` is a node of another graph.
    pub fn try_add(&self, rhs: impl Into<Operand>) -> Result<ValueRef> {
        let rhs = self.graph.to_node(rhs)?;
        Ok(self.add_node(&rhs))
    }

    /// `self - rhs`, recorded as `self + (-rhs)`. A numeric `rhs` is negated before
    /// promotion, so `x - 2` records `x + leaf(-2)`.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedOperand`] if `rhs` is a node of another graph.
    pub fn try_sub(&self, rhs: impl Into<Operand>) -> Result<ValueRef> {
        let neg = match rhs.into() {
            Operand::Scalar(k) => self.graph.leaf(-k),
            node => self.graph.to_node(node)?.neg_node(),
        };
        Ok(self.add_node(&neg))
    }

    /// `self * rhs`.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedOperand`] if `rhs` is a node of another graph.
    pub fn try_mul(&self, rhs: impl Into<Operand>) -> Result<ValueRef> {
        let rhs = self.graph.to_node(rhs)?;
        Ok(self.mul_node(&rhs))
    }

    /// `self / rhs`, recorded as `self * rhs**(-1)`. A numeric `rhs` is inverted
    /// before promotion, so `x / 2` records `x * leaf(0.5)`.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedOperand`] if `rhs` is a node of another graph.
    pub fn try_div(&self, rhs: impl Into<Operand>) -> Result<ValueRef> {
        let inv = match rhs.into() {
            Operand::Scalar(k) => self.graph.leaf(k.powf(-1.0)),
            node => self.graph.to_node(node)?.pow_node(-1.0),
        };
        Ok(self.mul_node(&inv))
    }

    /// `self ** exponent` for a numeric exponent.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedOperand`] if `exponent` is a node: only int/float powers are
    /// differentiated.
    pub fn try_pow(&self, exponent: impl Into<Operand>) -> Result<ValueRef> {
        match exponent.into() {
            Operand::Scalar(k) => Ok(self.pow_node(k)),
            Operand::Node(v) => Err(Error::UnsupportedOperand(format!(
                "power exponent must be a number, got node {}",
                v.id()
            ))),
        }
    }

    /// ReLU: `max(0, self)`. Local grad is 1 if the output is positive, else 0.
    #[must_use]
    pub fn relu(&self) -> ValueRef {
        self.unary(self.data().max(0.0), Op::Relu(self.id))
    }

    fn add_node(&self, rhs: &ValueRef) -> ValueRef {
        self.graph
            .record(self.data() + rhs.data(), Op::Add(self.id, rhs.id))
    }

    fn mul_node(&self, rhs: &ValueRef) -> ValueRef {
        self.graph
            .record(self.data() * rhs.data(), Op::Mul(self.id, rhs.id))
    }

    fn pow_node(&self, k: f64) -> ValueRef {
        self.unary(self.data().powf(k), Op::Pow(self.id, k))
    }

    fn neg_node(&self) -> ValueRef {
        self.mul_node(&self.graph.leaf(-1.0))
    }

    fn unary(&self, data: f64, op: Op) -> ValueRef {
        self.graph.record(data, op)
    }
}

/// Unwraps the result of a builder call made through an operator.
///
/// # Panics
///
/// Operators cannot return `Result`; a node from another graph panics with the error.
fn same_graph_or_panic(result: Result<ValueRef>) -> ValueRef {
    match result {
        Ok(v) => v,
        Err(e) => panic!("{e}"),
    }
}

impl PartialEq for ValueRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.graph.same_graph(&other.graph)
    }
}

impl fmt::Debug for ValueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueRef")
            .field("id", &self.id)
            .field("data", &self.data())
            .field("grad", &self.grad())
            .field("op", &self.op_tag())
            .finish()
    }
}

impl fmt::Display for ValueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value(data={}, grad={})", self.data(), self.grad())
    }
}

// -----------------------------------------------------------------------------
// std::ops: algebra x + y, x - y, x * y, x / y, -x, with f64 on either side
// -----------------------------------------------------------------------------

impl Add for &ValueRef {
    type Output = ValueRef;

    fn add(self, rhs: Self) -> ValueRef {
        same_graph_or_panic(self.try_add(rhs))
    }
}

impl Add<f64> for &ValueRef {
    type Output = ValueRef;

    fn add(self, rhs: f64) -> ValueRef {
        self.add_node(&self.graph.leaf(rhs))
    }
}

impl Add<&ValueRef> for f64 {
    type Output = ValueRef;

    fn add(self, rhs: &ValueRef) -> ValueRef {
        rhs + self
    }
}

impl Sub for &ValueRef {
    type Output = ValueRef;

    fn sub(self, rhs: Self) -> ValueRef {
        same_graph_or_panic(self.try_sub(rhs))
    }
}

impl Sub<f64> for &ValueRef {
    type Output = ValueRef;

    fn sub(self, rhs: f64) -> ValueRef {
        self.add_node(&self.graph.leaf(-rhs))
    }
}

impl Sub<&ValueRef> for f64 {
    type Output = ValueRef;

    /// `k - x` is recorded as `(-x) + k`.
    fn sub(self, rhs: &ValueRef) -> ValueRef {
        &(-rhs) + self
    }
}

impl Mul for &ValueRef {
    type Output = ValueRef;

    fn mul(self, rhs: Self) -> ValueRef {
        same_graph_or_panic(self.try_mul(rhs))
    }
}

impl Mul<f64> for &ValueRef {
    type Output = ValueRef;

    fn mul(self, rhs: f64) -> ValueRef {
        self.mul_node(&self.graph.leaf(rhs))
    }
}

impl Mul<&ValueRef> for f64 {
    type Output = ValueRef;

    fn mul(self, rhs: &ValueRef) -> ValueRef {
        rhs * self
    }
}

impl Div for &ValueRef {
    type Output = ValueRef;

    fn div(self, rhs: Self) -> ValueRef {
        same_graph_or_panic(self.try_div(rhs))
    }
}

impl Div<f64> for &ValueRef {
    type Output = ValueRef;

    fn div(self, rhs: f64) -> ValueRef {
        self.mul_node(&self.graph.leaf(rhs.powf(-1.0)))
    }
}

impl Div<&ValueRef> for f64 {
    type Output = ValueRef;

    /// `k / x` is recorded as `x**(-1) * k`.
    fn div(self, rhs: &ValueRef) -> ValueRef {
        &rhs.pow_node(-1.0) * self
    }
}

impl Neg for &ValueRef {
    type Output = ValueRef;

    fn neg(self) -> ValueRef {
        self.neg_node()
    }
}

// -----------------------------------------------------------------------------
// Pow, Exp, Tanh: (&a).pow(k), (&a).exp(), (&a).tanh()
// -----------------------------------------------------------------------------

impl Pow<f64> for &ValueRef {
    type Output = ValueRef;

    fn pow(self, exp: f64) -> ValueRef {
        self.pow_node(exp)
    }
}

impl Exp for &ValueRef {
    type Output = ValueRef;

    fn exp(self) -> ValueRef {
        self.unary(self.data().exp(), Op::Exp(self.id))
    }
}

impl Tanh for &ValueRef {
    type Output = ValueRef;

    fn tanh(self) -> ValueRef {
        self.unary(self.data().tanh(), Op::Tanh(self.id))
    }
}

impl ScalarNode for ValueRef {
    fn data(&self) -> f64 {
        self.graph.tape().data(self.id)
    }

    fn grad(&self) -> f64 {
        self.graph.tape().grad(self.id)
    }

    fn backward(&self) {
        backward::run(&mut self.graph.tape_mut(), self.id);
    }

    fn zero_grad(&self) {
        self.graph.tape_mut().set_grad(self.id, 0.0);
    }
}
