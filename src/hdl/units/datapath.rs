use super::{shift_register_name, AlaghiTree, Multiplier, ALAGHI_TREE, DOT_PRODUCT, MATRIX_MULT, SELECT_ADDER};
use crate::bits::select_width;
use crate::config::{AdderMode, Representation};
use crate::hdl::{EmitContext, HdlUnit, ModuleNames, VerilogWriter};

/// 1-bit shift register of `depth` stages, used to raise `valid` once a
/// pipeline has filled.
pub struct ShiftRegister {
    depth: usize,
}

impl ShiftRegister {
    pub fn new(depth: usize) -> Self {
        Self {
            depth: depth.max(1),
        }
    }
}

impl HdlUnit for ShiftRegister {
    fn name(&self, names: &ModuleNames) -> String {
        names.get(&shift_register_name(self.depth))
    }

    fn description(&self) -> Vec<&'static str> {
        vec![
            "The circuit represents a 1-bit wide shift register.",
            "The shift depth is part of the module name.",
        ]
    }

    fn emit(&self, ctx: &EmitContext, w: &mut VerilogWriter) {
        let name = self.name(&ctx.names);
        w.module_header(&name, &["clk", "rst", "data_in", "data_out"]);
        w.blank();
        w.line(1, format!("parameter DEPTH = {};", self.depth));
        w.blank();
        w.line(1, "input  clk;");
        w.line(1, "input  rst;");
        w.line(1, "input  data_in;");
        w.line(1, "output data_out;");
        w.blank();
        w.line(1, "reg internal_registers [DEPTH-1:0];");
        w.blank();
        w.line(1, "// first stage");
        w.line(1, "always @(posedge clk) begin");
        w.line(2, "if( rst == 1'b1 )");
        w.line(3, "internal_registers[0] <= 1'b0;");
        w.line(2, "else");
        w.line(3, "internal_registers[0] <= data_in;");
        w.line(1, "end");
        w.blank();
        w.line(1, "genvar i;");
        w.line(1, "generate");
        w.line(2, "for( i = 1; i < DEPTH; i = i + 1) begin : sr_loop");
        w.line(3, "always @(posedge clk) begin");
        w.line(4, "if( rst == 1'b1 )");
        w.line(5, "internal_registers[i] <= 1'b0;");
        w.line(4, "else");
        w.line(5, "internal_registers[i] <= internal_registers[i-1];");
        w.line(3, "end");
        w.line(2, "end");
        w.line(1, "endgenerate");
        w.blank();
        w.line(1, "assign data_out = internal_registers[DEPTH-1];");
        w.blank();
        w.module_end(&name);
    }
}

/// Stochastic dot product of two `dimension`-element stream vectors.
///
/// Pipeline: multiply, register the products (and the select streams),
/// add, register the sum. `valid` rises after [`DotProduct::latency`]
/// cycles.
pub struct DotProduct {
    dimension: usize,
    rep: Representation,
    adder: AdderMode,
}

impl DotProduct {
    pub fn new(dimension: usize, rep: Representation, adder: AdderMode) -> Self {
        Self {
            dimension,
            rep,
            adder,
        }
    }

    /// Cycles from inputs to `result`: product register, adder latency,
    /// result register.
    pub fn latency(dimension: usize, adder: AdderMode) -> usize {
        match adder {
            AdderMode::Selector => 2,
            AdderMode::Alaghi => AlaghiTree::latency(dimension) + 2,
        }
    }

    /// The shift register that generates `valid` for this datapath.
    pub fn valid_register(&self) -> ShiftRegister {
        ShiftRegister::new(Self::latency(self.dimension, self.adder))
    }
}

impl HdlUnit for DotProduct {
    fn name(&self, names: &ModuleNames) -> String {
        names.get(DOT_PRODUCT)
    }

    fn description(&self) -> Vec<&'static str> {
        vec![
            "The circuit represents a dot product of two vectors in the",
            "stochastic domain.",
        ]
    }

    fn emit(&self, ctx: &EmitContext, w: &mut VerilogWriter) {
        let names = &ctx.names;
        let name = self.name(names);
        let selector = self.adder == AdderMode::Selector;
        let delay = Self::latency(self.dimension, self.adder);

        let mut ports = vec!["clk", "rst", "data", "weights"];
        if selector {
            ports.push("sel");
        }
        ports.extend(["result", "valid"]);
        w.module_header(&name, &ports);
        w.blank();
        w.line(1, format!("parameter LENGTH = {};", self.dimension));
        if selector {
            w.line(1, format!("parameter SELECT_WIDTH = {};", select_width(self.dimension)));
        }
        w.blank();
        w.line(1, "// inputs and outputs");
        w.line(1, "input                    clk;");
        w.line(1, "input                    rst;");
        w.line(1, "input [LENGTH-1:0]       data;");
        w.line(1, "input [LENGTH-1:0]       weights;");
        if selector {
            w.line(1, "input [SELECT_WIDTH-1:0] sel;");
        }
        w.line(1, "output                   result;");
        w.line(1, "output                   valid;");
        w.blank();
        w.line(1, "// element-wise multiplication of data and weights");
        w.line(1, "genvar i;");
        w.line(1, "wire [LENGTH-1:0] mult_out;");
        w.line(1, "generate");
        w.line(2, "for( i = 0; i < LENGTH; i = i + 1) begin : mult");
        w.line(
            3,
            format!(
                "{} MULT(.x(data[i]), .y(weights[i]), .res(mult_out[i]));",
                names.get(Multiplier::base_name(self.rep))
            ),
        );
        w.line(2, "end");
        w.line(1, "endgenerate");
        w.blank();
        w.line(1, "// register the products");
        w.line(1, "reg [LENGTH-1:0] product_streams;");
        w.reset_block(1, &["product_streams"], &[("product_streams", "mult_out")]);
        w.blank();
        if selector {
            w.line(1, "// delay the select streams by one cycle to line up with the products");
            w.line(1, "reg [SELECT_WIDTH-1:0] select;");
            w.reset_block(1, &["select"], &[("select", "sel")]);
            w.blank();
        }
        w.line(1, "// add all element-wise products");
        w.line(1, "wire adder_res;");
        if selector {
            w.line(
                1,
                format!(
                    "{} NADDER(.x(product_streams), .sel(select), .out(adder_res));",
                    names.get(SELECT_ADDER)
                ),
            );
        } else {
            w.line(
                1,
                format!(
                    "{} NADDER(.clk(clk), .rst(rst), .inpts(product_streams), .out(adder_res));",
                    names.get(ALAGHI_TREE)
                ),
            );
        }
        w.blank();
        w.line(1, "// register the sum");
        w.line(1, "reg i_result;");
        w.reset_block(1, &["i_result"], &[("i_result", "adder_res")]);
        w.blank();
        w.line(1, "assign result = i_result;");
        w.blank();
        w.line(1, "// valid rises once the pipeline has filled");
        w.line(
            1,
            format!(
                "{} SHIFT{}(.clk(clk), .rst(rst), .data_in(1'b1), .data_out(valid));",
                names.get(&shift_register_name(delay)),
                delay
            ),
        );
        w.blank();
        w.module_end(&name);
    }
}

/// M x O array of dot products computing `(M x N) * (N x O)`.
///
/// Both matrices arrive flattened row-major; the weight matrix is passed
/// transposed so each dot product reads one contiguous slice of each.
pub struct MatrixMult {
    batch: usize,
    input: usize,
    output: usize,
    adder: AdderMode,
}

impl MatrixMult {
    pub fn new(batch: usize, input: usize, output: usize, adder: AdderMode) -> Self {
        Self {
            batch,
            input,
            output,
            adder,
        }
    }
}

impl HdlUnit for MatrixMult {
    fn name(&self, names: &ModuleNames) -> String {
        names.get(MATRIX_MULT)
    }

    fn description(&self) -> Vec<&'static str> {
        vec![
            "This module represents matrix multiply in the stochastic domain.",
            "The inputs are two flattened matrices A and B, where A is MxN",
            "and B is NxO. B is passed as its transpose (still flattened).",
            "The result C is MxO; element (i, j) is outputStreams[i*O + j].",
        ]
    }

    fn emit(&self, ctx: &EmitContext, w: &mut VerilogWriter) {
        let name = self.name(&ctx.names);
        let selector = self.adder == AdderMode::Selector;

        let mut ports = vec!["clk", "rst", "inputStreams", "weightStreams"];
        if selector {
            ports.push("sel");
        }
        ports.extend(["outputStreams", "outputWriteEn"]);
        w.module_header(&name, &ports);
        w.blank();
        w.line(1, format!("parameter BATCH_SIZE = {}; // M", self.batch));
        w.line(1, format!("parameter INPUT_FEATURES = {}; // N", self.input));
        w.line(1, format!("parameter OUTPUT_FEATURES = {}; // O", self.output));
        if selector {
            w.line(1, format!("parameter SELECT_WIDTH = {};", select_width(self.input)));
        }
        w.blank();
        w.line(1, "// inputs and outputs");
        w.line(1, "input                                      clk;");
        w.line(1, "input                                      rst;");
        w.line(1, "input [BATCH_SIZE*INPUT_FEATURES-1:0]      inputStreams;");
        w.line(1, "input [OUTPUT_FEATURES*INPUT_FEATURES-1:0] weightStreams;");
        if selector {
            w.line(1, "input [SELECT_WIDTH-1:0]                   sel;");
        }
        w.line(1, "output [BATCH_SIZE*OUTPUT_FEATURES-1:0]    outputStreams;");
        w.line(1, "output                                     outputWriteEn;");
        w.blank();
        w.line(1, "genvar i;");
        w.line(1, "genvar j;");
        w.line(1, "wire [BATCH_SIZE*OUTPUT_FEATURES-1:0] valids;");
        w.line(1, "generate");
        w.line(2, "for( i = 0; i < BATCH_SIZE; i = i + 1) begin : row_loop");
        w.line(3, "for( j = 0; j < OUTPUT_FEATURES; j = j + 1) begin : col_loop");
        w.line(4, format!("{} DOT_PRODUCT(", ctx.names.get(DOT_PRODUCT)));
        w.line(5, ".clk(clk),");
        w.line(5, ".rst(rst),");
        w.line(5, ".data(inputStreams[i*INPUT_FEATURES +: INPUT_FEATURES]),");
        w.line(5, ".weights(weightStreams[j*INPUT_FEATURES +: INPUT_FEATURES]),");
        if selector {
            w.line(5, ".sel(sel),");
        }
        w.line(5, ".result(outputStreams[(i*OUTPUT_FEATURES)+j]),");
        w.line(5, ".valid(valids[(i*OUTPUT_FEATURES)+j])");
        w.line(4, ");");
        w.line(3, "end");
        w.line(2, "end");
        w.line(1, "endgenerate");
        w.blank();
        w.line(1, "// every dot product shares one latency");
        w.line(1, "assign outputWriteEn = (valids[0] == 1'b1);");
        w.blank();
        w.module_end(&name);
    }
}
