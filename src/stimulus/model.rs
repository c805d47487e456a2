//! Cycle-level reference models of the emitted arithmetic.
//!
//! Models work stream-wise: one call per clock, with the operands of that
//! sample. Pipeline registers only delay samples, and the zeros they hold
//! while filling never toggle an adder, so the delayed device output equals
//! the model output sample for sample.

use std::collections::HashMap;

use crate::config::{AdderMode, Representation};
use crate::plan::{NodeId, Operand, PlanError, TreePlan};

/// AND for unipolar, XNOR for bipolar.
pub fn multiply(rep: Representation, x: bool, y: bool) -> bool {
    match rep {
        Representation::Uni => x & y,
        Representation::Bi => !(x ^ y),
    }
}

/// Multiplexer adder.
pub fn select_add(inputs: &[bool], sel: usize) -> bool {
    inputs[sel]
}

/// Two-input toggle flip-flop adder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToggleAdder {
    toggle: bool,
}

impl ToggleAdder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&mut self, x: bool, y: bool) -> bool {
        if x == y {
            x
        } else {
            let out = self.toggle;
            self.toggle = !self.toggle;
            out
        }
    }
}

/// Adder tree with the same layout as the emitted `alaghi_nadder`.
#[derive(Debug, Clone)]
pub struct AlaghiTreeModel {
    plan: TreePlan,
    adders: Vec<ToggleAdder>,
}

impl AlaghiTreeModel {
    pub fn new(inputs: usize) -> Result<Self, PlanError> {
        let plan = TreePlan::new(inputs)?;
        let adders = vec![ToggleAdder::new(); plan.adder_count()];
        Ok(Self { plan, adders })
    }

    pub fn inputs(&self) -> usize {
        self.plan.inputs()
    }

    /// Sum of one sample across all inputs, scaled by `1 / 2^depth`.
    pub fn step(&mut self, inputs: &[bool]) -> bool {
        let mut outputs: HashMap<NodeId, bool> = HashMap::with_capacity(self.adders.len());
        let read = |op: Operand, outputs: &HashMap<NodeId, bool>| match op {
            Operand::Input(i) => inputs[i],
            Operand::Node(id) => outputs.get(&id).copied().unwrap_or(false),
            Operand::Zero => false,
        };
        for (adder, op) in self.adders.iter_mut().zip(self.plan.ops()) {
            let x = read(op.left, &outputs);
            let y = read(op.right, &outputs);
            outputs.insert(op.output, adder.step(x, y));
        }
        read(self.plan.result(), &outputs)
    }

    /// Run over whole per-cycle input words.
    pub fn run(&mut self, words: &[Vec<bool>]) -> Vec<bool> {
        words.iter().map(|w| self.step(w)).collect()
    }
}

#[derive(Debug, Clone)]
enum Adder {
    Select,
    Tree(AlaghiTreeModel),
}

/// Element-wise multiply followed by the configured adder.
#[derive(Debug, Clone)]
pub struct DotProductModel {
    rep: Representation,
    adder: Adder,
}

impl DotProductModel {
    pub fn new(dimension: usize, rep: Representation, mode: AdderMode) -> Result<Self, PlanError> {
        let adder = match mode {
            AdderMode::Selector => {
                if dimension == 0 {
                    return Err(PlanError::Empty);
                }
                Adder::Select
            }
            AdderMode::Alaghi => Adder::Tree(AlaghiTreeModel::new(dimension)?),
        };
        Ok(Self { rep, adder })
    }

    /// One sample. `sel` is ignored by the alaghi adder.
    pub fn step(&mut self, data: &[bool], weights: &[bool], sel: usize) -> bool {
        let products: Vec<bool> = data
            .iter()
            .zip(weights)
            .map(|(&x, &y)| multiply(self.rep, x, y))
            .collect();
        match &mut self.adder {
            Adder::Select => select_add(&products, sel),
            Adder::Tree(tree) => tree.step(&products),
        }
    }
}

/// `M x O` grid of independent dot products.
#[derive(Debug, Clone)]
pub struct MatrixMultModel {
    input: usize,
    output: usize,
    cells: Vec<DotProductModel>,
}

impl MatrixMultModel {
    pub fn new(
        batch: usize,
        input: usize,
        output: usize,
        rep: Representation,
        mode: AdderMode,
    ) -> Result<Self, PlanError> {
        let cells = (0..batch * output)
            .map(|_| DotProductModel::new(input, rep, mode))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            input,
            output,
            cells,
        })
    }

    /// One sample. `inputs` is the flattened `M x N` word, `weights` the
    /// flattened transposed `O x N` word; the result is `M x O` with
    /// element `i * O + j`.
    pub fn step(&mut self, inputs: &[bool], weights: &[bool], sel: usize) -> Vec<bool> {
        let (n, o) = (self.input, self.output);
        self.cells
            .iter_mut()
            .enumerate()
            .map(|(k, cell)| {
                let (i, j) = (k / o, k % o);
                cell.step(&inputs[i * n..(i + 1) * n], &weights[j * n..(j + 1) * n], sel)
            })
            .collect()
    }
}
