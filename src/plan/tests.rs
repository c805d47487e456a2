use std::collections::HashMap;

use super::*;
use crate::bits::clog2;

fn names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("in{}", i)).collect()
}

fn op(left: &str, right: &str, output: &str) -> NamedOp {
    NamedOp {
        left: left.to_string(),
        right: right.to_string(),
        output: output.to_string(),
    }
}

#[test]
fn test_single_input_has_no_layers() {
    let plan = plan_signals(&["a"], &PrefixNaming::default()).unwrap();
    assert_eq!(plan.depth(), 0);
    assert_eq!(plan.result, "a");
}

#[test]
fn test_two_inputs() {
    let plan = plan_signals(&["a", "b"], &PrefixNaming::default()).unwrap();
    assert_eq!(plan.depth(), 1);
    assert_eq!(plan.layers[0].ops, vec![op("a", "b", "s1_0")]);
    assert_eq!(plan.result, "s1_0");
}

#[test]
fn test_three_inputs_pads_with_zero() {
    let plan = plan_signals(&["a", "b", "c"], &PrefixNaming::default()).unwrap();
    assert_eq!(plan.depth(), 2);
    assert_eq!(
        plan.layers[0].ops,
        vec![op("a", "b", "s1_0"), op("c", "0", "s1_0const")]
    );
    assert_eq!(plan.layers[1].ops, vec![op("s1_0", "s1_0const", "s2_0")]);
    assert_eq!(plan.result, "s2_0");
}

#[test]
fn test_four_inputs() {
    let plan = plan_signals(&["a", "b", "c", "d"], &PrefixNaming::default()).unwrap();
    assert_eq!(plan.depth(), 2);
    assert_eq!(
        plan.layers[0].ops,
        vec![op("a", "b", "s1_0"), op("c", "d", "s1_1")]
    );
    assert_eq!(plan.layers[1].ops, vec![op("s1_0", "s1_1", "s2_0")]);
    assert_eq!(plan.result, "s2_0");
}

#[test]
fn test_six_inputs_repeats_power_of_two_pass() {
    // 6 = 4 + 2: both passes share one output index sequence.
    let plan = TreePlan::new(6).unwrap();
    let layer = &plan.layers()[0];
    assert_eq!(layer.ops.len(), 3);
    assert_eq!(layer.ops[2].left, Operand::Input(4));
    assert_eq!(layer.ops[2].right, Operand::Input(5));
    assert_eq!(
        layer.ops[2].output,
        NodeId {
            layer: 1,
            slot: Slot::Pair(2)
        }
    );
}

#[test]
fn test_seven_inputs_leftover_is_last_operand() {
    let plan = TreePlan::new(7).unwrap();
    let first = &plan.layers()[0];
    assert_eq!(first.ops.len(), 4);
    let last = first.ops[3];
    assert_eq!(last.left, Operand::Input(6));
    assert_eq!(last.right, Operand::Zero);
    assert_eq!(last.output.slot, Slot::ZeroPad);
}

#[test]
fn test_empty_is_rejected() {
    assert_eq!(TreePlan::new(0), Err(PlanError::Empty));
    let empty: [&str; 0] = [];
    assert_eq!(
        plan_signals(&empty, &PrefixNaming::default()),
        Err(PlanError::Empty)
    );
}

#[test]
fn test_name_count_mismatch_is_rejected() {
    let plan = TreePlan::new(4).unwrap();
    let err = plan
        .name_with(&["a", "b", "c"], &PrefixNaming::default())
        .unwrap_err();
    assert_eq!(
        err,
        PlanError::InputCountMismatch {
            expected: 4,
            got: 3
        }
    );
}

#[test]
fn test_depth_is_ceil_log2() {
    for n in 1..=200 {
        let plan = TreePlan::new(n).unwrap();
        assert_eq!(plan.depth(), clog2(n), "depth for n={}", n);
    }
}

#[test]
fn test_each_layer_halves_rounding_up() {
    for n in 2..=200 {
        let plan = TreePlan::new(n).unwrap();
        let mut operands = n;
        for layer in plan.layers() {
            assert_eq!(layer.ops.len(), operands.div_ceil(2), "n={}", n);
            operands = layer.ops.len();
        }
        assert_eq!(operands, 1);
    }
}

#[test]
fn test_every_signal_consumed_exactly_once() {
    for n in 1..=200 {
        let plan = TreePlan::new(n).unwrap();
        let mut uses: HashMap<Operand, usize> = HashMap::new();
        for op in plan.ops() {
            for operand in [op.left, op.right] {
                if operand != Operand::Zero {
                    *uses.entry(operand).or_default() += 1;
                }
            }
        }

        for i in 0..n {
            let input = Operand::Input(i);
            let expected = if input == plan.result() { None } else { Some(&1) };
            assert_eq!(uses.get(&input), expected, "input {} of {}", i, n);
        }
        for op in plan.ops() {
            let node = Operand::Node(op.output);
            if node == plan.result() {
                assert_eq!(uses.get(&node), None, "result of {} is consumed", n);
            } else {
                assert_eq!(uses.get(&node), Some(&1), "{:?} of {}", op.output, n);
            }
        }
    }
}

#[test]
fn test_zero_pad_only_on_right() {
    for n in 1..=64 {
        let plan = TreePlan::new(n).unwrap();
        for op in plan.ops() {
            assert_ne!(op.left, Operand::Zero);
            assert_eq!(op.right == Operand::Zero, op.output.slot == Slot::ZeroPad);
        }
    }
}

#[test]
fn test_planning_is_idempotent() {
    let inputs = names(37);
    let naming = PrefixNaming::default();
    let first = plan_signals(&inputs, &naming).unwrap();
    let second = plan_signals(&inputs, &naming).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_custom_prefix_and_zero() {
    let naming = PrefixNaming::new("sumreg_").with_zero("1'b0");
    let plan = plan_signals(&["x", "y", "z"], &naming).unwrap();
    assert_eq!(plan.layers[0].ops[1], op("z", "1'b0", "sumreg_1_0const"));
    assert_eq!(plan.result, "sumreg_2_0");
}

#[test]
fn test_display_lists_layers() {
    let plan = plan_signals(&["a", "b", "c"], &PrefixNaming::default()).unwrap();
    let text = plan.to_string();
    assert!(text.starts_with("layer 1:\n  a + b -> s1_0\n  c + 0 -> s1_0const\n"));
    assert!(text.ends_with("result: s2_0"));
}

#[test]
fn test_named_plan_serializes_to_toml() {
    let plan = plan_signals(&["a", "b"], &PrefixNaming::default()).unwrap();
    let text = toml::to_string(&plan).unwrap();
    assert!(text.contains("result = \"s1_0\""));
    assert!(text.contains("[[layers]]"));
    assert!(text.contains("output = \"s1_0\""));
}
