use super::{checker, clock, data_path, read_memories, run_and_report, test_index, timescale};
use crate::bits::select_width;
use crate::config::AdderMode;
use crate::hdl::units::{DotProduct, DOT_PRODUCT, MATRIX_MULT};
use crate::hdl::{EmitContext, HdlUnit, ModuleNames, VerilogWriter};
use crate::stimulus::{
    DATA_VECTORS, DP_RESULTS, INPUT_MATRICES, MM_RESULT, MM_SELECT_STREAMS, SELECT_STREAMS,
    WEIGHT_MATRICES, WEIGHT_VECTORS,
};

/// Testbench for `sc_dot_product`.
pub struct DotProductTb {
    dimension: usize,
    adder: AdderMode,
    length: usize,
}

impl DotProductTb {
    pub fn new(dimension: usize, adder: AdderMode, length: usize) -> Self {
        Self {
            dimension,
            adder,
            length,
        }
    }
}

impl HdlUnit for DotProductTb {
    fn name(&self, names: &ModuleNames) -> String {
        names.testbench(DOT_PRODUCT)
    }

    fn description(&self) -> Vec<&'static str> {
        vec!["The module serves as a testbench for the stochastic dot product module."]
    }

    fn emit(&self, ctx: &EmitContext, w: &mut VerilogWriter) {
        let name = self.name(&ctx.names);
        let selector = self.adder == AdderMode::Selector;

        timescale(w);
        w.line(0, format!("module {}();", name));
        w.line(1, format!("parameter DIMENSION =     {};", self.dimension));
        if selector {
            w.line(1, format!("parameter SELECT_WIDTH =  {};", select_width(self.dimension)));
        }
        w.line(1, format!("parameter DELAY =         {};", DotProduct::latency(self.dimension, self.adder)));
        w.line(1, format!("parameter DATA_VECTOR =   \"{}\";", data_path(DATA_VECTORS)));
        w.line(1, format!("parameter WEIGHT_VECTOR = \"{}\";", data_path(WEIGHT_VECTORS)));
        if selector {
            w.line(1, format!("parameter SELECT_STREAM = \"{}\";", data_path(SELECT_STREAMS)));
        }
        w.line(1, format!("parameter DP_RESULT =     \"{}\";", data_path(DP_RESULTS)));
        w.line(1, format!("parameter LENGTH =        {};", self.length));
        w.blank();
        w.line(1, "// module inputs and outputs");
        w.line(1, "reg                     clk;");
        w.line(1, "reg                     rst;");
        w.line(1, "wire [DIMENSION-1:0]    data;");
        w.line(1, "wire [DIMENSION-1:0]    weights;");
        if selector {
            w.line(1, "wire [SELECT_WIDTH-1:0] sel;");
        }
        w.line(1, "wire                    result;");
        w.line(1, "wire                    valid;");
        w.blank();
        w.line(1, "// read input data and expected output data");
        w.line(1, "reg [DIMENSION-1:0] test_data [LENGTH-1:0];");
        w.line(1, "reg [DIMENSION-1:0] test_weights [LENGTH-1:0];");
        if selector {
            w.line(1, "reg [SELECT_WIDTH-1:0] test_sel [LENGTH-1:0];");
        }
        w.line(1, "reg expected_result [LENGTH-1:0];");

        let mut memories = vec![("DATA_VECTOR", "test_data"), ("WEIGHT_VECTOR", "test_weights")];
        let mut assigns = vec![("data", "test_data"), ("weights", "test_weights")];
        if selector {
            memories.push(("SELECT_STREAM", "test_sel"));
            assigns.push(("sel", "test_sel"));
        }
        memories.push(("DP_RESULT", "expected_result"));
        read_memories(w, &memories);
        test_index(w, self.length, &assigns);
        checker(w, "valid", "result", "expected_result", "%d");
        clock(w);

        w.line(1, "// instantiate module");
        w.line(1, format!("{} dut(", ctx.names.get(DOT_PRODUCT)));
        w.line(2, ".clk(clk),");
        w.line(2, ".rst(rst),");
        w.line(2, ".data(data),");
        w.line(2, ".weights(weights),");
        if selector {
            w.line(2, ".sel(sel),");
        }
        w.line(2, ".result(result),");
        w.line(2, ".valid(valid)");
        w.line(1, ");");
        w.blank();
        run_and_report(w);
        w.module_end(&name);
    }
}

/// Testbench for `sc_matrix_mult`.
pub struct MatrixMultTb {
    batch: usize,
    input: usize,
    output: usize,
    adder: AdderMode,
    length: usize,
}

impl MatrixMultTb {
    pub fn new(batch: usize, input: usize, output: usize, adder: AdderMode, length: usize) -> Self {
        Self {
            batch,
            input,
            output,
            adder,
            length,
        }
    }
}

impl HdlUnit for MatrixMultTb {
    fn name(&self, names: &ModuleNames) -> String {
        names.testbench(MATRIX_MULT)
    }

    fn description(&self) -> Vec<&'static str> {
        vec!["The module serves as a testbench for the stochastic matrix multiply", "module."]
    }

    fn emit(&self, ctx: &EmitContext, w: &mut VerilogWriter) {
        let name = self.name(&ctx.names);
        let selector = self.adder == AdderMode::Selector;

        timescale(w);
        w.line(0, format!("module {}();", name));
        w.line(1, format!("parameter BATCH_SIZE =      {}; // M", self.batch));
        w.line(1, format!("parameter INPUT_FEATURES =  {}; // N", self.input));
        w.line(1, format!("parameter OUTPUT_FEATURES = {}; // O", self.output));
        if selector {
            w.line(1, format!("parameter SELECT_WIDTH =    {};", select_width(self.input)));
        }
        w.line(1, format!("parameter DELAY =           {};", DotProduct::latency(self.input, self.adder)));
        w.line(1, format!("parameter INPUT_MATRICES =  \"{}\";", data_path(INPUT_MATRICES)));
        w.line(1, format!("parameter WEIGHT_MATRICES = \"{}\";", data_path(WEIGHT_MATRICES)));
        if selector {
            w.line(1, format!("parameter SELECT_STREAM =   \"{}\";", data_path(MM_SELECT_STREAMS)));
        }
        w.line(1, format!("parameter MM_RESULT =       \"{}\";", data_path(MM_RESULT)));
        w.line(1, format!("parameter LENGTH =          {};", self.length));
        w.blank();
        w.line(1, "// module inputs and outputs");
        w.line(1, "reg                                        clk;");
        w.line(1, "reg                                        rst;");
        w.line(1, "wire [BATCH_SIZE*INPUT_FEATURES-1:0]       inputStreams;");
        w.line(1, "wire [OUTPUT_FEATURES*INPUT_FEATURES-1:0]  weightStreams;");
        if selector {
            w.line(1, "wire [SELECT_WIDTH-1:0]                    sel;");
        }
        w.line(1, "wire [BATCH_SIZE*OUTPUT_FEATURES-1:0]      outputStreams;");
        w.line(1, "wire                                       outputWriteEn;");
        w.blank();
        w.line(1, "// read input data and expected output data");
        w.line(1, "reg [BATCH_SIZE*INPUT_FEATURES-1:0] test_input [LENGTH-1:0];");
        w.line(1, "reg [OUTPUT_FEATURES*INPUT_FEATURES-1:0] test_weight [LENGTH-1:0];");
        if selector {
            w.line(1, "reg [SELECT_WIDTH-1:0] test_sel [LENGTH-1:0];");
        }
        w.line(1, "reg [BATCH_SIZE*OUTPUT_FEATURES-1:0] expected_results [LENGTH-1:0];");

        let mut memories = vec![("INPUT_MATRICES", "test_input"), ("WEIGHT_MATRICES", "test_weight")];
        let mut assigns = vec![("inputStreams", "test_input"), ("weightStreams", "test_weight")];
        if selector {
            memories.push(("SELECT_STREAM", "test_sel"));
            assigns.push(("sel", "test_sel"));
        }
        memories.push(("MM_RESULT", "expected_results"));
        read_memories(w, &memories);
        test_index(w, self.length, &assigns);
        checker(w, "outputWriteEn", "outputStreams", "expected_results", "%B");
        clock(w);

        w.line(1, "// instantiate module");
        w.line(1, format!("{} dut(", ctx.names.get(MATRIX_MULT)));
        w.line(2, ".clk(clk),");
        w.line(2, ".rst(rst),");
        w.line(2, ".inputStreams(inputStreams),");
        w.line(2, ".weightStreams(weightStreams),");
        if selector {
            w.line(2, ".sel(sel),");
        }
        w.line(2, ".outputStreams(outputStreams),");
        w.line(2, ".outputWriteEn(outputWriteEn)");
        w.line(1, ");");
        w.blank();
        run_and_report(w);
        w.module_end(&name);
    }
}
