//! Adder-tree layout planner.
//!
//! Reduces `n` single-bit streams to one by pairwise adders, layer by layer.
//! Each layer pairs consecutive operands in blocks of the largest power of
//! two that still fits; a single leftover operand is paired with constant
//! zero so that every adder halves its inputs and the overall scaling stays
//! `1 / 2^depth`.
//!
//! The plan is structural ([`TreePlan`]); names are applied afterwards by a
//! [`SignalNaming`] so the same plan drives both the Verilog emitter and the
//! software reference model.

#[cfg(test)]
mod tests;

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::bits::flog2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("an adder tree needs at least one input")]
    Empty,
    #[error("adder tree planned for {expected} inputs but {got} input names were given")]
    InputCountMismatch { expected: usize, got: usize },
}

/// Position of an adder output within its layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Output of the `i`-th real pair of the layer.
    Pair(usize),
    /// Output of the leftover operand paired with constant zero.
    ZeroPad,
}

/// Identifies one adder output: layer (1-based) and slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub layer: usize,
    pub slot: Slot,
}

/// An adder operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    /// The `i`-th original input.
    Input(usize),
    /// Registered output of an earlier layer.
    Node(NodeId),
    /// Constant zero padding.
    Zero,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdderOp {
    pub left: Operand,
    pub right: Operand,
    pub output: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    /// 1-based depth.
    pub index: usize,
    pub ops: Vec<AdderOp>,
}

impl Layer {
    pub fn outputs(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ops.iter().map(|op| op.output)
    }
}

/// Complete layering of an `n`-input adder tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreePlan {
    inputs: usize,
    layers: Vec<Layer>,
    result: Operand,
}

impl TreePlan {
    /// Plan the tree for `n` inputs.
    pub fn new(n: usize) -> Result<Self, PlanError> {
        if n == 0 {
            return Err(PlanError::Empty);
        }

        let mut operands: Vec<Operand> = (0..n).map(Operand::Input).collect();
        let mut layers = Vec::new();
        let mut layer_num = 1;

        while operands.len() >= 2 {
            let layer = plan_layer(layer_num, &operands);
            operands = layer.outputs().map(Operand::Node).collect();
            layers.push(layer);
            layer_num += 1;
        }

        let plan = TreePlan {
            inputs: n,
            layers,
            result: operands[0],
        };
        debug!(
            inputs = n,
            depth = plan.depth(),
            adders = plan.adder_count(),
            "planned adder tree"
        );
        Ok(plan)
    }

    pub fn inputs(&self) -> usize {
        self.inputs
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn result(&self) -> Operand {
        self.result
    }

    /// Number of layers, which is also the register latency of the tree.
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    pub fn adder_count(&self) -> usize {
        self.layers.iter().map(|l| l.ops.len()).sum()
    }

    /// All adder operations in layer order.
    pub fn ops(&self) -> impl Iterator<Item = &AdderOp> + '_ {
        self.layers.iter().flat_map(|l| l.ops.iter())
    }

    /// Apply input names and a naming scheme to the plan.
    pub fn name_with<S: AsRef<str>>(
        &self,
        inputs: &[S],
        naming: &dyn SignalNaming,
    ) -> Result<NamedPlan, PlanError> {
        if inputs.len() != self.inputs {
            return Err(PlanError::InputCountMismatch {
                expected: self.inputs,
                got: inputs.len(),
            });
        }

        let render = |operand: Operand| -> String {
            match operand {
                Operand::Input(i) => inputs[i].as_ref().to_string(),
                Operand::Node(id) => naming.node(id),
                Operand::Zero => naming.zero(),
            }
        };

        let layers = self
            .layers
            .iter()
            .map(|layer| NamedLayer {
                index: layer.index,
                ops: layer
                    .ops
                    .iter()
                    .map(|op| NamedOp {
                        left: render(op.left),
                        right: render(op.right),
                        output: naming.node(op.output),
                    })
                    .collect(),
            })
            .collect();

        Ok(NamedPlan {
            layers,
            result: render(self.result),
        })
    }
}

/// Plan and name a tree whose input count is the length of `inputs`.
pub fn plan_signals<S: AsRef<str>>(
    inputs: &[S],
    naming: &dyn SignalNaming,
) -> Result<NamedPlan, PlanError> {
    TreePlan::new(inputs.len())?.name_with(inputs, naming)
}

fn plan_layer(layer_num: usize, operands: &[Operand]) -> Layer {
    let mut ops = Vec::with_capacity(operands.len().div_ceil(2));
    let mut remaining = operands.len();
    let mut next = 0;

    while remaining > 1 {
        let block = 1usize << flog2(remaining);
        for _ in 0..block / 2 {
            ops.push(AdderOp {
                left: operands[next],
                right: operands[next + 1],
                output: NodeId {
                    layer: layer_num,
                    slot: Slot::Pair(ops.len()),
                },
            });
            next += 2;
        }
        remaining -= block;
    }

    if remaining == 1 {
        ops.push(AdderOp {
            left: operands[next],
            right: Operand::Zero,
            output: NodeId {
                layer: layer_num,
                slot: Slot::ZeroPad,
            },
        });
    }

    Layer {
        index: layer_num,
        ops,
    }
}

/// Maps structural plan nodes to signal names.
pub trait SignalNaming {
    fn node(&self, id: NodeId) -> String;

    fn zero(&self) -> String {
        "0".to_string()
    }
}

/// `{prefix}{layer}_{index}` / `{prefix}{layer}_0const` names.
#[derive(Debug, Clone)]
pub struct PrefixNaming {
    prefix: String,
    zero: String,
}

impl PrefixNaming {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            zero: "0".to_string(),
        }
    }

    pub fn with_zero(mut self, zero: impl Into<String>) -> Self {
        self.zero = zero.into();
        self
    }
}

impl Default for PrefixNaming {
    fn default() -> Self {
        Self::new("s")
    }
}

impl SignalNaming for PrefixNaming {
    fn node(&self, id: NodeId) -> String {
        match id.slot {
            Slot::Pair(i) => format!("{}{}_{}", self.prefix, id.layer, i),
            Slot::ZeroPad => format!("{}{}_0const", self.prefix, id.layer),
        }
    }

    fn zero(&self) -> String {
        self.zero.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedOp {
    pub left: String,
    pub right: String,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedLayer {
    pub index: usize,
    pub ops: Vec<NamedOp>,
}

/// A plan rendered to signal names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedPlan {
    pub result: String,
    pub layers: Vec<NamedLayer>,
}

impl NamedPlan {
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    pub fn adder_count(&self) -> usize {
        self.layers.iter().map(|l| l.ops.len()).sum()
    }
}

impl fmt::Display for NamedPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for layer in &self.layers {
            writeln!(f, "layer {}:", layer.index)?;
            for op in &layer.ops {
                writeln!(f, "  {} + {} -> {}", op.left, op.right, op.output)?;
            }
        }
        write!(f, "result: {}", self.result)
    }
}
