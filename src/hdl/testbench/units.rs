use super::{checker, clock, data_path, read_memories, run_and_report, summary, test_index, timescale};
use crate::bits::select_width;
use crate::hdl::units::{AlaghiTree, ALAGHI_TREE, SELECT_ADDER};
use crate::hdl::{EmitContext, HdlUnit, ModuleNames, VerilogWriter};
use crate::stimulus::{ADDER_INPUTS, ADDER_RESULTS};

/// Widest adder that is still tested exhaustively.
pub const EXHAUSTIVE_LIMIT: usize = 16;
/// Random vectors applied to adders wider than [`EXHAUSTIVE_LIMIT`].
pub const RANDOM_VECTORS: usize = 4096;

/// Combinational check of `sc_nadder`: every select value against every
/// input word.
pub struct NadderTb {
    inputs: usize,
}

impl NadderTb {
    pub fn new(inputs: usize) -> Self {
        Self { inputs }
    }

    pub fn is_exhaustive(&self) -> bool {
        self.inputs <= EXHAUSTIVE_LIMIT
    }
}

impl HdlUnit for NadderTb {
    fn name(&self, names: &ModuleNames) -> String {
        names.testbench(SELECT_ADDER)
    }

    fn description(&self) -> Vec<&'static str> {
        vec![
            "This module serves as a testbench for the sc_nadder module.",
            "For more information on stochastic computing: https://en.wikipedia.org/wiki/Stochastic_computing",
        ]
    }

    fn emit(&self, ctx: &EmitContext, w: &mut VerilogWriter) {
        let name = self.name(&ctx.names);
        let n = self.inputs;

        timescale(w);
        w.line(0, format!("module {}();", name));
        w.line(1, format!("parameter INPUT_STREAMS = {};", n));
        w.line(1, format!("parameter SELECT_WIDTH = {};", select_width(n)));
        w.blank();
        w.line(1, "reg [INPUT_STREAMS-1:0] x;");
        w.line(1, "reg [SELECT_WIDTH-1:0]  sel;");
        w.line(1, "wire                    out;");
        w.blank();
        w.line(
            1,
            format!("{} dut(.x(x), .sel(sel), .out(out));", ctx.names.get(SELECT_ADDER)),
        );
        w.blank();
        w.line(1, "integer errors;");
        w.line(1, "initial errors = 0;");
        w.blank();
        w.line(1, "integer i;");
        w.line(1, "integer s;");
        w.line(1, "initial begin");
        w.line(2, "// initialize inputs");
        w.line(2, "x = 0;");
        w.line(2, "sel = 0;");
        w.line(2, "#25;");
        w.blank();
        if self.is_exhaustive() {
            w.line(2, "// for every input word, test each select value");
            w.line(2, format!("for(i = 0; i < {}; i = i + 1) begin", 1u64 << n));
            w.line(3, "x = i;");
        } else {
            let words = n.div_ceil(32);
            let random = vec!["$random"; words].join(", ");
            w.line(2, "// too wide to enumerate: random input words, each select value");
            w.line(2, format!("for(i = 0; i < {}; i = i + 1) begin", RANDOM_VECTORS));
            w.line(3, format!("x = {{{}}};", random));
        }
        w.line(3, "for(s = 0; s < INPUT_STREAMS; s = s + 1) begin");
        w.line(4, "sel = s;");
        w.line(4, "#5;");
        w.line(4, "if( x[s] != out ) begin");
        w.line(
            5,
            "$display( \"Error incorrect output. Input streams: %B, Select streams: %B, out: %d\", x, sel, out );",
        );
        w.line(5, "errors = errors + 1;");
        w.line(4, "end");
        w.line(4, "#5;");
        w.line(3, "end");
        w.line(2, "end");
        w.blank();
        summary(w, 2);
        w.line(1, "end");
        w.module_end(&name);
    }
}

/// Replays `adder_inputs.mif` through `alaghi_nadder` and checks against
/// `adder_results.mif` after the tree latency.
pub struct AlaghiTreeTb {
    inputs: usize,
    length: usize,
}

impl AlaghiTreeTb {
    pub fn new(inputs: usize, length: usize) -> Self {
        Self { inputs, length }
    }
}

impl HdlUnit for AlaghiTreeTb {
    fn name(&self, names: &ModuleNames) -> String {
        names.testbench(ALAGHI_TREE)
    }

    fn description(&self) -> Vec<&'static str> {
        vec!["This module serves as a testbench for the alaghi_nadder module."]
    }

    fn emit(&self, ctx: &EmitContext, w: &mut VerilogWriter) {
        let name = self.name(&ctx.names);

        timescale(w);
        w.line(0, format!("module {}();", name));
        w.line(1, format!("parameter INPUT_STREAMS = {};", self.inputs));
        w.line(1, format!("parameter DELAY =         {};", AlaghiTree::latency(self.inputs)));
        w.line(1, format!("parameter INPUTS =        \"{}\";", data_path(ADDER_INPUTS)));
        w.line(1, format!("parameter ADDER_RESULT =  \"{}\";", data_path(ADDER_RESULTS)));
        w.line(1, format!("parameter LENGTH =        {};", self.length));
        w.blank();
        w.line(1, "// module inputs and outputs");
        w.line(1, "reg                      clk;");
        w.line(1, "reg                      rst;");
        w.line(1, "wire [INPUT_STREAMS-1:0] inpts;");
        w.line(1, "wire                     out;");
        w.blank();
        w.line(1, "// read input data and expected results data");
        w.line(1, "reg [INPUT_STREAMS-1:0] test_inputs [LENGTH-1:0];");
        w.line(1, "reg expected_results [LENGTH-1:0];");
        read_memories(w, &[("INPUTS", "test_inputs"), ("ADDER_RESULT", "expected_results")]);
        test_index(w, self.length, &[("inpts", "test_inputs")]);

        w.line(1, "// the tree output is valid DELAY cycles after reset");
        w.line(1, "integer valid_delay;");
        w.line(1, "initial valid_delay = 0;");
        w.line(1, "always @(posedge clk) begin");
        w.line(2, "if( rst ) begin");
        w.line(3, "valid_delay <= 0;");
        w.line(2, "end else if( valid_delay < DELAY ) begin");
        w.line(3, "valid_delay <= valid_delay + 1;");
        w.line(2, "end");
        w.line(1, "end");
        w.line(1, "wire valid;");
        w.line(1, "assign valid = (valid_delay == DELAY);");
        w.blank();
        checker(w, "valid", "out", "expected_results", "%d");
        clock(w);
        w.line(1, "// instantiate module");
        w.line(
            1,
            format!(
                "{} dut(.clk(clk), .rst(rst), .inpts(inpts), .out(out));",
                ctx.names.get(ALAGHI_TREE)
            ),
        );
        w.blank();
        run_and_report(w);
        w.module_end(&name);
    }
}
