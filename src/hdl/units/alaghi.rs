//! Toggle flip-flop adders and the planned adder tree built from them.

use super::{ALAGHI_ADDER, ALAGHI_TREE};
use crate::bits::clog2;
use crate::hdl::{EmitContext, HdlUnit, ModuleNames, VerilogWriter};
use crate::plan::{NodeId, Operand, PrefixNaming, SignalNaming, TreePlan};

/// Two-input adder with a toggle register.
///
/// When the inputs agree the output follows them; when they disagree the
/// output is the toggle state, which then flips. The result is exactly
/// `(x + y) / 2` over any window with an even number of disagreements.
pub struct AlaghiAdder;

impl HdlUnit for AlaghiAdder {
    fn name(&self, names: &ModuleNames) -> String {
        names.get(ALAGHI_ADDER)
    }

    fn description(&self) -> Vec<&'static str> {
        vec![
            "The circuit represents a two-input stochastic adder built",
            "from a toggle flip-flop (Alaghi adder). Unlike a multiplexer",
            "adder it needs no select stream.",
        ]
    }

    fn emit(&self, ctx: &EmitContext, w: &mut VerilogWriter) {
        let name = self.name(&ctx.names);
        w.module_header(&name, &["clk", "rst", "x", "y", "out"]);
        w.blank();
        w.line(1, "input  clk;");
        w.line(1, "input  rst;");
        w.line(1, "input  x;");
        w.line(1, "input  y;");
        w.line(1, "output out;");
        w.blank();
        w.line(1, "// toggles whenever the inputs disagree");
        w.line(1, "reg t;");
        w.line(1, "always @(posedge clk) begin");
        w.line(2, "if( rst == 1'b1 ) begin");
        w.line(3, "t <= 1'b0;");
        w.line(2, "end else if( x != y ) begin");
        w.line(3, "t <= ~t;");
        w.line(2, "end");
        w.line(1, "end");
        w.blank();
        w.line(1, "assign out = (x == y) ? x : t;");
        w.blank();
        w.module_end(&name);
    }
}

/// N-input adder tree of [`AlaghiAdder`]s laid out by the planner.
///
/// Every adder output `sum_L_i` is registered into `sumreg_L_i`, and the
/// next layer reads the registers, so the tree latency equals its depth.
pub struct AlaghiTree {
    inputs: usize,
}

impl AlaghiTree {
    pub fn new(inputs: usize) -> Self {
        Self { inputs }
    }

    /// Clock cycles between an input and its sum at `out`: one register per
    /// tree layer. `inputs` is at least 1 here, since `generate` plans the
    /// tree and rejects an empty dimension before any unit is emitted.
    pub fn latency(inputs: usize) -> usize {
        clog2(inputs)
    }
}

impl HdlUnit for AlaghiTree {
    fn name(&self, names: &ModuleNames) -> String {
        names.get(ALAGHI_TREE)
    }

    fn description(&self) -> Vec<&'static str> {
        vec![
            "The circuit represents a tree of alaghi adders.",
            "Odd signals in a layer are paired with a constant zero, so the",
            "output is the sum of the inputs scaled by 1/2^(tree depth).",
        ]
    }

    fn emit(&self, ctx: &EmitContext, w: &mut VerilogWriter) {
        let name = self.name(&ctx.names);
        let adder = ctx.names.get(ALAGHI_ADDER);

        w.module_header(&name, &["clk", "rst", "inpts", "out"]);
        w.blank();
        w.line(1, "input clk;");
        w.line(1, "input rst;");
        w.line(1, format!("input [{}:0] inpts;", self.inputs.saturating_sub(1)));
        w.line(1, "output out;");
        w.blank();

        let plan = match TreePlan::new(self.inputs) {
            Ok(plan) if plan.depth() > 0 => plan,
            _ => {
                w.line(1, "// a single input needs no adders");
                w.line(1, "assign out = inpts[0];");
                w.blank();
                w.module_end(&name);
                return;
            }
        };

        let wires = PrefixNaming::new("sum_");
        let regs = PrefixNaming::new("sumreg_");
        let operand = |op: Operand| -> String {
            match op {
                Operand::Input(i) => format!("inpts[{}]", i),
                Operand::Node(id) => regs.node(id),
                Operand::Zero => "1'b0".to_string(),
            }
        };
        let outputs: Vec<NodeId> = plan.ops().map(|op| op.output).collect();

        w.line(1, "// Wires for this tree. The first number is the level of the tree,");
        w.line(1, "// the second the index of the wire within its level.");
        for id in &outputs {
            w.line(1, format!("wire {};", wires.node(*id)));
        }
        w.blank();
        w.line(1, "// Registers for each level of output.");
        for id in &outputs {
            w.line(1, format!("reg {};", regs.node(*id)));
        }
        w.blank();

        w.line(1, "always @(posedge clk) begin");
        w.line(2, "if( rst == 1'b1 ) begin");
        for id in &outputs {
            w.line(3, format!("{} <= 1'b0;", regs.node(*id)));
        }
        w.line(2, "end else begin");
        for id in &outputs {
            w.line(3, format!("{} <= {};", regs.node(*id), wires.node(*id)));
        }
        w.line(2, "end");
        w.line(1, "end");
        w.blank();

        for (i, op) in plan.ops().enumerate() {
            w.line(
                1,
                format!(
                    "{} ADDER{}(.clk(clk), .rst(rst), .x({}), .y({}), .out({}));",
                    adder,
                    i,
                    operand(op.left),
                    operand(op.right),
                    wires.node(op.output)
                ),
            );
        }
        w.blank();
        w.line(1, format!("assign out = {};", operand(plan.result())));
        w.blank();
        w.module_end(&name);
    }
}
