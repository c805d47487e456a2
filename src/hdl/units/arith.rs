use super::{MULTIPLIER, MULTIPLIER_BI, SELECT_ADDER};
use crate::bits::select_width;
use crate::config::Representation;
use crate::hdl::{EmitContext, HdlUnit, ModuleNames, VerilogWriter};

/// Single-gate stochastic multiplier: AND for unipolar, XNOR for bipolar.
pub struct Multiplier {
    rep: Representation,
}

impl Multiplier {
    pub fn new(rep: Representation) -> Self {
        Self { rep }
    }

    pub fn base_name(rep: Representation) -> &'static str {
        match rep {
            Representation::Uni => MULTIPLIER,
            Representation::Bi => MULTIPLIER_BI,
        }
    }
}

impl HdlUnit for Multiplier {
    fn name(&self, names: &ModuleNames) -> String {
        names.get(Self::base_name(self.rep))
    }

    fn description(&self) -> Vec<&'static str> {
        match self.rep {
            Representation::Uni => vec![
                "The circuit represents a multiplier in the stochastic domain.",
                "Unipolar representation: multiplication is a single AND gate.",
            ],
            Representation::Bi => vec![
                "The circuit represents a multiplier in the stochastic domain.",
                "Bipolar representation: multiplication is a single XNOR gate.",
            ],
        }
    }

    fn emit(&self, ctx: &EmitContext, w: &mut VerilogWriter) {
        let name = self.name(&ctx.names);
        w.module_header(&name, &["x", "y", "res"]);
        w.blank();
        w.line(1, "input  x;");
        w.line(1, "input  y;");
        w.line(1, "output res;");
        w.blank();
        match self.rep {
            Representation::Uni => w.line(1, "assign res = x & y;"),
            Representation::Bi => w.line(1, "assign res = ~(x ^ y);"),
        }
        w.blank();
        w.module_end(&name);
    }
}

/// Multiplexer adder: `out = x[sel]`, i.e. a scaled sum when `sel` is a
/// uniformly distributed select stream.
pub struct SelectAdder {
    inputs: usize,
}

impl SelectAdder {
    pub fn new(inputs: usize) -> Self {
        Self { inputs }
    }
}

impl HdlUnit for SelectAdder {
    fn name(&self, names: &ModuleNames) -> String {
        names.get(SELECT_ADDER)
    }

    fn description(&self) -> Vec<&'static str> {
        vec![
            "The circuit represents a multi-input adder in the stochastic",
            "domain. The input 'sel' must be uniformly distributed over",
            "[0, INPUT_STREAMS) and uncorrelated with the inputs.",
        ]
    }

    fn emit(&self, ctx: &EmitContext, w: &mut VerilogWriter) {
        let name = self.name(&ctx.names);
        w.module_header(&name, &["x", "sel", "out"]);
        w.blank();
        w.line(1, format!("parameter INPUT_STREAMS = {};", self.inputs));
        w.line(1, format!("parameter SELECT_WIDTH = {};", select_width(self.inputs)));
        w.blank();
        w.line(1, "input [INPUT_STREAMS-1:0] x;");
        w.line(1, "input [SELECT_WIDTH-1:0]  sel;");
        w.line(1, "output                    out;");
        w.blank();
        w.line(1, "assign out = x[sel];");
        w.blank();
        w.module_end(&name);
    }
}
