//! Tests for scalar autograd.
//!
//! Ensures backward pass correctness (add, mul, pow, exp, tanh, relu and the derived
//! ops), topological order and gradient accumulation, reflected operands, error paths,
//! and a randomized finite-difference check.

use approx::{assert_abs_diff_eq, relative_eq};
use proptest::prelude::*;

use crate::Error;
use crate::autograd::{Exp, Graph, Op, Operand, Pow, ScalarNode, Tanh, ValueRef, trace};

#[test]
fn scalar_add_backward() {
    let g = Graph::new();
    let a = g.leaf(2.0);
    let b = g.leaf(3.0);
    let c = &a + &b;
    assert_eq!(c.data(), 5.0);
    c.backward();
    assert_eq!(a.grad(), 1.0);
    assert_eq!(b.grad(), 1.0);
}

#[test]
fn scalar_mul_backward() {
    let g = Graph::new();
    let a = g.leaf(2.0);
    let b = g.leaf(3.0);
    let z = &a * &b;
    assert_eq!(z.data(), 6.0);
    z.backward();
    assert_eq!(a.grad(), 3.0);
    assert_eq!(b.grad(), 2.0);
}

#[test]
fn scalar_pow_backward() {
    let g = Graph::new();
    let x = g.leaf(2.0);
    let p = (&x).pow(3.0);
    assert_abs_diff_eq!(p.data(), 8.0, epsilon = 1e-10);
    p.backward();
    // d/dx x^3 = 3x^2 = 12 at x=2
    assert_abs_diff_eq!(x.grad(), 12.0, epsilon = 1e-10);
    assert_eq!(p.op_tag(), "**3");
}

#[test]
fn scalar_exp_backward() {
    let g = Graph::new();
    let a = g.leaf(1.0);
    let b = (&a).exp();
    assert_abs_diff_eq!(b.data(), std::f64::consts::E, epsilon = 1e-10);
    b.backward();
    assert_abs_diff_eq!(a.grad(), std::f64::consts::E, epsilon = 1e-10);
}

#[test]
fn scalar_tanh_at_zero() {
    let g = Graph::new();
    let x = g.leaf(0.0);
    let t = (&x).tanh();
    assert_eq!(t.data(), 0.0);
    t.backward();
    assert_eq!(x.grad(), 1.0);
}

#[test]
fn scalar_tanh_backward_uses_output() {
    let g = Graph::new();
    let x = g.leaf(0.7);
    let t = (&x).tanh();
    t.backward();
    let out = 0.7_f64.tanh();
    assert_abs_diff_eq!(x.grad(), 1.0 - out * out, epsilon = 1e-12);
}

#[test]
fn scalar_relu_backward_positive() {
    let g = Graph::new();
    let a = g.leaf(1.5);
    let b = a.relu();
    assert_eq!(b.data(), 1.5);
    b.backward();
    assert_eq!(a.grad(), 1.0);
}

#[test]
fn scalar_relu_backward_negative() {
    let g = Graph::new();
    let a = g.leaf(-0.5);
    let b = a.relu();
    assert_eq!(b.data(), 0.0);
    b.backward();
    assert_eq!(a.grad(), 0.0);
}

#[test]
fn scalar_relu_at_zero_passes_no_gradient() {
    let g = Graph::new();
    let a = g.leaf(0.0);
    let b = a.relu();
    b.backward();
    assert_eq!(a.grad(), 0.0);
}

#[test]
fn scalar_topo_and_gradient_accumulation() {
    // Use a value twice: y = x + x. dy/dx = 2.
    let g = Graph::new();
    let x = g.leaf(3.0);
    let y = &x + &x;
    assert_eq!(y.data(), 6.0);
    assert_eq!(y.operands().len(), 1);
    y.backward();
    assert_eq!(x.grad(), 2.0);
}

#[test]
fn scalar_square_via_self_mul() {
    let g = Graph::new();
    let x = g.leaf(-3.0);
    let y = &x * &x;
    y.backward();
    assert_eq!(x.grad(), -6.0);
}

#[test]
fn scalar_diamond_accumulates_both_paths() {
    // a feeds b and c, both feed d: dd/da = 2a + 1 via two paths.
    let g = Graph::new();
    let a = g.leaf(-2.0);
    let b = &a * &a;
    let c = &a + 0.0;
    let d = &b + &c;
    d.backward();
    assert_eq!(a.grad(), 2.0 * -2.0 + 1.0);
    assert_eq!(b.grad(), 1.0);
    assert_eq!(c.grad(), 1.0);
}

#[test]
fn scalar_zero_grad_after_step() {
    let g = Graph::new();
    let a = g.leaf(2.0);
    let b = &a * 3.0;
    b.backward();
    assert_eq!(a.grad(), 3.0);
    a.zero_grad();
    assert_eq!(a.grad(), 0.0);
}

#[test]
fn scalar_backward_twice_accumulates_stale_gradient() {
    let g = Graph::new();
    let a = g.leaf(2.0);
    let b = &a * 3.0;
    b.backward();
    b.backward();
    assert_eq!(a.grad(), 6.0);
    g.zero_grad();
    assert_eq!(a.grad(), 0.0);
    assert_eq!(b.grad(), 0.0);
    b.backward();
    assert_eq!(a.grad(), 3.0);
}

#[test]
fn scalar_backward_on_leaf_seeds_only_itself() {
    let g = Graph::new();
    let a = g.leaf(4.0);
    let other = g.leaf(1.0);
    a.backward();
    assert_eq!(a.grad(), 1.0);
    assert_eq!(other.grad(), 0.0);
}

#[test]
fn scalar_neg_backward() {
    let g = Graph::new();
    let a = g.leaf(3.0);
    let b = -&a;
    assert_eq!(b.data(), -3.0);
    assert_eq!(b.op_tag(), "*");
    b.backward();
    assert_eq!(a.grad(), -1.0);
}

#[test]
fn scalar_sub_backward() {
    let g = Graph::new();
    let a = g.leaf(5.0);
    let b = g.leaf(2.0);
    let c = &a - &b;
    assert_eq!(c.data(), 3.0);
    c.backward();
    assert_eq!(a.grad(), 1.0);
    assert_eq!(b.grad(), -1.0);
}

#[test]
fn scalar_div_backward() {
    let g = Graph::new();
    let a = g.leaf(6.0);
    let b = g.leaf(2.0);
    let c = &a / &b;
    assert_eq!(c.data(), 3.0);
    c.backward();
    assert_eq!(a.grad(), 0.5);
    assert_eq!(b.grad(), -1.5); // d/db (a/b) = -a/b^2 = -6/4 = -1.5
}

#[test]
fn scalar_chain_compound() {
    // loss = (a * b + c).relu(); a=1, b=2, c=-1 => loss = 1
    let g = Graph::new();
    let a = g.leaf(1.0);
    let b = g.leaf(2.0);
    let c = g.leaf(-1.0);
    let loss = (&(&a * &b) + &c).relu();
    assert_eq!(loss.data(), 1.0);
    loss.backward();
    assert_abs_diff_eq!(a.grad(), 2.0, epsilon = 1e-10);
    assert_abs_diff_eq!(b.grad(), 1.0, epsilon = 1e-10);
    assert_abs_diff_eq!(c.grad(), 1.0, epsilon = 1e-10);
}

#[test]
fn scalar_tanh_neuron_by_hand() {
    // o = tanh(x1*w1 + x2*w2 + b), the textbook single-neuron example.
    let g = Graph::new();
    let x1 = g.leaf_labeled(2.0, "x1");
    let x2 = g.leaf_labeled(0.0, "x2");
    let w1 = g.leaf_labeled(-3.0, "w1");
    let w2 = g.leaf_labeled(1.0, "w2");
    let b = g.leaf_labeled(6.881_373_587_019_543, "b");
    let n = &(&(&x1 * &w1) + &(&x2 * &w2)) + &b;
    let o = (&n).tanh();
    assert_abs_diff_eq!(o.data(), 0.707_106_781, epsilon = 1e-6);
    o.backward();
    assert_abs_diff_eq!(x1.grad(), -1.5, epsilon = 1e-6);
    assert_abs_diff_eq!(w1.grad(), 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(x2.grad(), 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(w2.grad(), 0.0, epsilon = 1e-6);
    assert_eq!(x1.label().as_deref(), Some("x1"));
}

#[test]
fn tanh_expanded_through_exp_matches_tanh() {
    // tanh(n) = (e^{2n} - 1) / (e^{2n} + 1), built from primitive ops.
    let g = Graph::new();
    let n = g.leaf(0.8813735870195432);
    let e = (&(&n * 2.0)).exp();
    let o = &(&e - 1.0) / &(&e + 1.0);
    assert_abs_diff_eq!(o.data(), 0.8813735870195432_f64.tanh(), epsilon = 1e-12);
    o.backward();
    let t = o.data();
    assert_abs_diff_eq!(n.grad(), 1.0 - t * t, epsilon = 1e-10);
}

#[test]
fn scalar_std_ops_with_numbers() {
    let g = Graph::new();
    let a = g.leaf(3.0);
    assert_eq!((&a + 2.0).data(), 5.0);
    assert_eq!((2.0 + &a).data(), 5.0);
    assert_eq!((&a - 2.0).data(), 1.0);
    assert_eq!((2.0 - &a).data(), -1.0);
    assert_eq!((&a * 2.0).data(), 6.0);
    assert_eq!((2.0 * &a).data(), 6.0);
    assert_abs_diff_eq!((&a / 2.0).data(), 1.5, epsilon = 1e-12);
    assert_abs_diff_eq!((6.0 / &a).data(), 2.0, epsilon = 1e-12);
}

#[test]
fn reflected_forms_build_same_graph_as_node_on_left() {
    fn shape(v: &ValueRef) -> Vec<(String, f64)> {
        v.topological_order()
            .iter()
            .map(|n| (n.op_tag(), n.data()))
            .collect()
    }

    let g = Graph::new();
    let x = g.leaf(4.0);
    assert_eq!(shape(&(3.0 + &x)), shape(&(&x + 3.0)));
    assert_eq!(shape(&(3.0 * &x)), shape(&(&x * 3.0)));
    assert_eq!(shape(&(3.0 - &x)), shape(&(&(-&x) + 3.0)));
    assert_eq!(shape(&(3.0 / &x)), shape(&(&(&x).pow(-1.0) * 3.0)));

    let r = 3.0 * &x;
    match r.op() {
        Op::Mul(lhs, _) => assert_eq!(lhs, x.id()),
        other => panic!("expected Mul, got {other:?}"),
    }
}

#[test]
fn reflected_sub_and_div_gradients() {
    let g = Graph::new();
    let x = g.leaf(2.0);
    let y = 1.0 - &x;
    y.backward();
    assert_eq!(x.grad(), -1.0);

    g.zero_grad();
    let z = 8.0 / &x;
    z.backward();
    assert_abs_diff_eq!(x.grad(), -8.0 / 4.0, epsilon = 1e-12);
}

#[test]
fn numeric_sub_and_div_fold_the_literal() {
    let g = Graph::new();
    let a = g.leaf(5.0);
    let before = g.len();
    let c = &a - 2.0;
    assert_eq!(g.len(), before + 2);
    assert_eq!(c.data(), 3.0);
    match c.op() {
        Op::Add(lhs, rhs) => {
            assert_eq!(lhs, a.id());
            assert_eq!(g.tape().data(rhs), -2.0);
        }
        other => panic!("expected Add, got {other:?}"),
    }

    let before = g.len();
    let d = a.try_div(2.0).unwrap();
    assert_eq!(g.len(), before + 2);
    let tags: Vec<String> = d.topological_order().iter().map(ValueRef::op_tag).collect();
    assert_eq!(tags, ["", "", "*"]);
    assert_eq!(d.data(), 2.5);

    d.backward();
    assert_eq!(a.grad(), 0.5);
    g.zero_grad();
    a.try_sub(2.0).unwrap().backward();
    assert_eq!(a.grad(), 1.0);
}

#[test]
fn try_pow_rejects_node_exponent() {
    let g = Graph::new();
    let x = g.leaf(2.0);
    let k = g.leaf(3.0);
    let before = g.len();
    let err = x.try_pow(&k).unwrap_err();
    assert!(matches!(err, Error::UnsupportedOperand(_)));
    assert_eq!(g.len(), before);

    let p = x.try_pow(2.0).unwrap();
    assert_eq!(p.data(), 4.0);
}

#[test]
fn operands_from_another_graph_are_rejected() {
    let g1 = Graph::new();
    let g2 = Graph::new();
    let a = g1.leaf(1.0);
    let b = g2.leaf(2.0);
    assert!(matches!(a.try_add(&b), Err(Error::UnsupportedOperand(_))));
    assert!(matches!(a.try_mul(&b), Err(Error::UnsupportedOperand(_))));
    assert!(matches!(a.try_sub(&b), Err(Error::UnsupportedOperand(_))));
    assert!(matches!(a.try_div(&b), Err(Error::UnsupportedOperand(_))));
    assert!(matches!(
        g1.to_node(Operand::from(&b)),
        Err(Error::UnsupportedOperand(_))
    ));
}

#[test]
#[should_panic(expected = "different graph")]
fn operator_on_mixed_graphs_panics() {
    let g1 = Graph::new();
    let g2 = Graph::new();
    let _ = &g1.leaf(1.0) + &g2.leaf(2.0);
}

#[test]
fn to_node_promotes_numbers_and_keeps_nodes() {
    let g = Graph::new();
    let a = g.leaf(1.0);
    let promoted = g.to_node(2.5).unwrap();
    assert!(promoted.op().is_leaf());
    assert_eq!(promoted.data(), 2.5);
    assert_eq!(g.to_node(&a).unwrap(), a);
}

#[test]
fn construction_leaves_operands_untouched() {
    let g = Graph::new();
    let a = g.leaf(2.0);
    let b = g.leaf(5.0);
    let _c = &(&a * &b) + &a;
    assert_eq!(a.data(), 2.0);
    assert_eq!(a.grad(), 0.0);
    assert_eq!(b.grad(), 0.0);
}

#[test]
fn set_data_updates_only_the_leaf() {
    let g = Graph::new();
    let a = g.leaf(2.0);
    let b = &a * 2.0;
    a.set_data(5.0);
    assert_eq!(a.data(), 5.0);
    assert_eq!(b.data(), 4.0);
}

#[test]
fn trace_lists_each_node_and_edge_once() {
    let g = Graph::new();
    let a = g.leaf(2.0);
    let b = g.leaf(-1.0);
    let c = &a * &b;
    let d = &c + &a;
    let (nodes, edges) = trace(&d);
    assert_eq!(nodes.len(), 4);
    assert_eq!(nodes[0], d);
    assert_eq!(edges.len(), 4);
    assert!(edges.contains(&(a.clone(), d.clone())));
    assert!(edges.contains(&(c.clone(), d.clone())));
    assert!(edges.contains(&(a.clone(), c.clone())));
    assert!(edges.contains(&(b.clone(), c.clone())));
    assert_eq!(a.grad(), 0.0);
}

#[test]
fn display_matches_value_repr() {
    let g = Graph::new();
    let a = g.leaf(2.0);
    assert_eq!(a.to_string(), "Value(data=2, grad=0)");
}

// --- Randomized gradient check ---

/// One instruction of a random expression; operand indices wrap around the nodes built so far.
#[derive(Clone, Debug)]
enum Step {
    Add(usize, usize),
    Sub(usize, usize),
    Mul(usize, usize),
    Div(usize, usize),
    Neg(usize),
    Pow(usize, f64),
    RSub(f64, usize),
    RDiv(f64, usize),
    RMul(f64, usize),
    Exp(usize),
    Tanh(usize),
    Relu(usize),
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Step::Add(a, b)),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Step::Sub(a, b)),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Step::Mul(a, b)),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Step::Div(a, b)),
        any::<usize>().prop_map(Step::Neg),
        (any::<usize>(), prop::sample::select(vec![-2.0, -1.0, 0.5, 1.0, 2.0, 3.0]))
            .prop_map(|(a, k)| Step::Pow(a, k)),
        (-2.0f64..2.0, any::<usize>()).prop_map(|(k, a)| Step::RSub(k, a)),
        (-2.0f64..2.0, any::<usize>()).prop_map(|(k, a)| Step::RDiv(k, a)),
        (-2.0f64..2.0, any::<usize>()).prop_map(|(k, a)| Step::RMul(k, a)),
        any::<usize>().prop_map(Step::Exp),
        any::<usize>().prop_map(Step::Tanh),
        any::<usize>().prop_map(Step::Relu),
    ]
}

/// Result of replaying a program: leaves, output, and sanity facts for finite differences.
struct Built {
    leaves: Vec<ValueRef>,
    out: ValueRef,
    max_abs: f64,
    min_relu_input: f64,
    /// Smallest |x| divided by or raised to a negative power.
    min_divisor: f64,
    /// Smallest base of a fractional power; must stay positive.
    min_root_base: f64,
}

fn build(values: &[f64], steps: &[Step]) -> Built {
    let g = Graph::new();
    let leaves: Vec<ValueRef> = values.iter().map(|&x| g.leaf(x)).collect();
    let mut nodes = leaves.clone();
    let mut min_relu_input = f64::INFINITY;
    let mut min_divisor = f64::INFINITY;
    let mut min_root_base = f64::INFINITY;
    for step in steps {
        let pick = |i: usize| nodes[i % nodes.len()].clone();
        let next = match *step {
            Step::Add(a, b) => &pick(a) + &pick(b),
            Step::Sub(a, b) => &pick(a) - &pick(b),
            Step::Mul(a, b) => &pick(a) * &pick(b),
            Step::Div(a, b) => {
                let y = pick(b);
                min_divisor = min_divisor.min(y.data().abs());
                &pick(a) / &y
            }
            Step::Neg(a) => -&pick(a),
            Step::Pow(a, k) => {
                let x = pick(a);
                if k < 0.0 {
                    min_divisor = min_divisor.min(x.data().abs());
                }
                if k.fract() != 0.0 {
                    min_root_base = min_root_base.min(x.data());
                }
                (&x).pow(k)
            }
            Step::RSub(k, a) => k - &pick(a),
            Step::RDiv(k, a) => {
                let x = pick(a);
                min_divisor = min_divisor.min(x.data().abs());
                k / &x
            }
            Step::RMul(k, a) => k * &pick(a),
            Step::Exp(a) => (&pick(a)).exp(),
            Step::Tanh(a) => (&pick(a)).tanh(),
            Step::Relu(a) => {
                let x = pick(a);
                min_relu_input = min_relu_input.min(x.data().abs());
                x.relu()
            }
        };
        nodes.push(next);
    }
    let max_abs = nodes.iter().map(|n| n.data().abs()).fold(0.0, f64::max);
    let out = nodes.last().cloned().unwrap_or_else(|| g.leaf(0.0));
    Built {
        leaves,
        out,
        max_abs,
        min_relu_input,
        min_divisor,
        min_root_base,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn analytic_gradient_matches_finite_difference(
        values in prop::collection::vec(-1.0f64..1.0, 1..4),
        steps in prop::collection::vec(arb_step(), 1..7),
    ) {
        const EPS: f64 = 1e-5;
        let built = build(&values, &steps);
        prop_assume!(built.max_abs.is_finite() && built.max_abs < 20.0);
        prop_assume!(built.min_relu_input > 1e-2);
        prop_assume!(built.min_divisor > 0.1);
        prop_assume!(built.min_root_base > 0.1);

        built.out.backward();
        for (i, leaf) in built.leaves.iter().enumerate() {
            let mut plus = values.clone();
            let mut minus = values.clone();
            plus[i] += EPS;
            minus[i] -= EPS;
            let f_plus = build(&plus, &steps).out.data();
            let f_minus = build(&minus, &steps).out.data();
            let numeric = (f_plus - f_minus) / (2.0 * EPS);
            prop_assert!(
                relative_eq!(leaf.grad(), numeric, epsilon = 1e-4, max_relative = 1e-4),
                "leaf {} analytic {} numeric {}", i, leaf.grad(), numeric
            );
        }
    }
}
