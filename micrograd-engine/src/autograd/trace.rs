//! Read-only walk over the graph behind a node, for diagnostics and drawing.

use std::collections::HashSet;

use super::{NodeId, ValueRef};

/// Collects every node reachable from `root` and every `(operand, consumer)` edge.
///
/// Each node appears once in the node list, in discovery order starting at `root`.
/// An operand used twice by one node yields a single edge. Never touches values or
/// gradients.
#[must_use]
pub fn trace(root: &ValueRef) -> (Vec<ValueRef>, Vec<(ValueRef, ValueRef)>) {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut stack = vec![root.clone()];

    while let Some(v) = stack.pop() {
        if !seen.insert(v.id()) {
            continue;
        }
        for operand in v.operands() {
            edges.push((operand.clone(), v.clone()));
            if !seen.contains(&operand.id()) {
                stack.push(operand);
            }
        }
        nodes.push(v);
    }
    (nodes, edges)
}
