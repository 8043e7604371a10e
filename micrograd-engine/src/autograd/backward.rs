//! Reverse-mode pass: topological ordering and per-operator local derivatives.

use std::collections::HashSet;

use super::impls::graph::Tape;
use super::{NodeId, Op};

/// Post-order DFS from `root` over operand edges.
///
/// Each node appears once, after all of its operands. Uses an explicit stack, so deep
/// graphs (long sums, unrolled loops) cannot overflow the call stack.
pub(crate) fn topological_order(tape: &Tape, root: NodeId) -> Vec<NodeId> {
    let mut topo = Vec::new();
    let mut visited = HashSet::new();
    // (node, operands already pushed)
    let mut stack = vec![(root, false)];

    while let Some((id, expanded)) = stack.pop() {
        if expanded {
            topo.push(id);
            continue;
        }
        if !visited.insert(id) {
            continue;
        }
        stack.push((id, true));
        // Reversed so operands are visited in operand order.
        for operand in tape.op(id).operands().rev() {
            if !visited.contains(&operand) {
                stack.push((operand, false));
            }
        }
    }
    topo
}

/// Seeds `root` with 1.0 and applies every local backward rule in reverse topological order.
pub(crate) fn run(tape: &mut Tape, root: NodeId) {
    let topo = topological_order(tape, root);
    tape.set_grad(root, 1.0);
    for &id in topo.iter().rev() {
        propagate(tape, id);
    }
}

/// Pushes the gradient of `id` into its operands.
fn propagate(tape: &mut Tape, id: NodeId) {
    let g = tape.grad(id);
    let out = tape.data(id);
    match tape.op(id) {
        Op::Leaf => {}
        Op::Add(a, b) => {
            tape.add_grad(a, g);
            tape.add_grad(b, g);
        }
        Op::Mul(a, b) => {
            let (da, db) = (tape.data(b) * g, tape.data(a) * g);
            tape.add_grad(a, da);
            tape.add_grad(b, db);
        }
        Op::Pow(a, k) => {
            let local = k * tape.data(a).powf(k - 1.0);
            tape.add_grad(a, local * g);
        }
        Op::Exp(a) => tape.add_grad(a, out * g),
        Op::Tanh(a) => tape.add_grad(a, (1.0 - out * out) * g),
        Op::Relu(a) => {
            if out > 0.0 {
                tape.add_grad(a, g);
            }
        }
    }
}
