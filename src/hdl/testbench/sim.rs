use rand::Rng;

use super::{clock, timescale, RESET_PERIODS};
use crate::bits::{clog2, select_width, to_binary};
use crate::config::AdderMode;
use crate::hdl::units::{AlaghiTree, COUNTER, DOT_PRODUCT, LFSR, SD_CONVERTER, SNG};
use crate::hdl::{EmitContext, HdlUnit, ModuleNames, VerilogWriter};

pub const SIMULATION_TOP: &str = "sc_dot_product_sim";

/// End-to-end simulation of one dot product from binary operands.
///
/// Two LFSRs drive the SNGs for data and weights, the stochastic result is
/// counted over `2^precision` cycles and rescaled, and the simulator prints
/// it next to the exact binary dot product.
#[derive(Debug, Clone)]
pub struct DotProductSim {
    dimension: usize,
    precision: u32,
    adder: AdderMode,
    data: Vec<u64>,
    weights: Vec<u64>,
    seeds: [u64; 2],
}

impl DotProductSim {
    /// Draw operands in `[0, 2^precision)` and two distinct LFSR seeds.
    pub fn random<R: Rng>(dimension: usize, precision: u32, adder: AdderMode, rng: &mut R) -> Self {
        let bound = 1u64 << precision;
        let data = (0..dimension).map(|_| rng.gen_range(0..bound)).collect();
        let weights = (0..dimension).map(|_| rng.gen_range(0..bound)).collect();
        let first = rng.gen_range(0..bound);
        let mut second = rng.gen_range(0..bound);
        while second == first {
            second = rng.gen_range(0..bound);
        }
        Self {
            dimension,
            precision,
            adder,
            data,
            weights,
            seeds: [first, second],
        }
    }

    pub fn data(&self) -> &[u64] {
        &self.data
    }

    pub fn weights(&self) -> &[u64] {
        &self.weights
    }

    pub fn seeds(&self) -> [u64; 2] {
        self.seeds
    }

    /// Exact binary dot product.
    pub fn expected(&self) -> u128 {
        self.data
            .iter()
            .zip(&self.weights)
            .map(|(&a, &b)| a as u128 * b as u128)
            .sum()
    }

    /// Factor by which the adder scales its sum.
    pub fn scale(&self) -> u64 {
        match self.adder {
            AdderMode::Selector => self.dimension as u64,
            AdderMode::Alaghi => 1u64 << AlaghiTree::latency(self.dimension),
        }
    }

    /// Width of the rescaled result.
    pub fn result_width(&self) -> usize {
        2 * self.precision as usize + clog2(self.scale() as usize) + 1
    }

    fn vector_literal(&self, values: &[u64]) -> String {
        let bits: String = values
            .iter()
            .rev()
            .map(|&v| to_binary(v, self.precision as usize))
            .collect();
        format!("{}'b{}", values.len() * self.precision as usize, bits)
    }
}

impl HdlUnit for DotProductSim {
    fn name(&self, names: &ModuleNames) -> String {
        names.get(SIMULATION_TOP)
    }

    fn description(&self) -> Vec<&'static str> {
        vec![
            "This module serves as a simulation test bench for the stochastic dot product",
            "module. At the end of simulation the expected binary result and actual",
            "stochastic result are displayed in console.",
        ]
    }

    fn emit(&self, ctx: &EmitContext, w: &mut VerilogWriter) {
        let names = &ctx.names;
        let name = self.name(names);
        let selector = self.adder == AdderMode::Selector;
        let p = self.precision;

        timescale(w);
        w.line(0, format!("module {}();", name));
        w.line(1, format!("parameter DIMENSION = {};", self.dimension));
        w.line(1, format!("parameter PRECISION = {};", p));
        w.line(1, format!("parameter SCALE     = {};", self.scale()));
        w.line(1, format!("parameter RES_WIDTH = {};", self.result_width()));
        w.blank();
        w.line(1, "reg                           clk;");
        w.line(1, "reg                           rst;");
        w.line(1, "reg [PRECISION*DIMENSION-1:0] datas;");
        w.line(1, "reg [PRECISION*DIMENSION-1:0] weights;");
        w.blank();
        clock(w);

        w.line(1, "// binary operands and their exact dot product");
        w.line(1, format!("initial datas = {};", self.vector_literal(&self.data)));
        w.line(1, format!("initial weights = {};", self.vector_literal(&self.weights)));
        w.line(1, "reg [RES_WIDTH-1:0] expected_result;");
        w.line(
            1,
            format!("initial expected_result = {}'d{};", self.result_width(), self.expected()),
        );
        w.blank();

        let lfsr = names.get(LFSR);
        w.line(1, "// Noise sources. Only the multipliers need uncorrelated streams,");
        w.line(1, "// so two are enough.");
        w.line(1, "reg [PRECISION-1:0] seed0;");
        w.line(1, "reg [PRECISION-1:0] seed1;");
        w.line(1, format!("initial seed0 = {};", self.seeds[0]));
        w.line(1, format!("initial seed1 = {};", self.seeds[1]));
        w.line(1, "wire [PRECISION-1:0] rng0;");
        w.line(1, "wire [PRECISION-1:0] rng1;");
        w.line(
            1,
            format!("{} LFSR0(.clk(clk), .rst(rst), .seed(seed0), .enable(1'b1), .restart(1'b0), .out(rng0));", lfsr),
        );
        w.line(
            1,
            format!("{} LFSR1(.clk(clk), .rst(rst), .seed(seed1), .enable(1'b1), .restart(1'b0), .out(rng1));", lfsr),
        );
        w.blank();

        let sng = names.get(SNG);
        w.line(1, "// stochastic bitstreams for all data and weights");
        w.line(1, "wire [DIMENSION-1:0] s_datas;");
        w.line(1, "wire [DIMENSION-1:0] s_weights;");
        w.line(1, "genvar d;");
        w.line(1, "generate");
        w.line(2, "for(d = 0; d < DIMENSION; d = d + 1) begin : sng_loop");
        for (label, source, rng, out) in [
            ("DATA_SNG", "datas", "rng0", "s_datas"),
            ("WEIGHT_SNG", "weights", "rng1", "s_weights"),
        ] {
            w.line(3, format!("{} {}(", sng, label));
            w.line(4, ".clk(clk),");
            w.line(4, ".rst(rst),");
            w.line(4, format!(".in({}[d*PRECISION +: PRECISION]),", source));
            w.line(4, format!(".rng({}),", rng));
            w.line(4, format!(".out({}[d])", out));
            w.line(3, ");");
        }
        w.line(2, "end");
        w.line(1, "endgenerate");
        w.blank();

        if selector {
            let width = select_width(self.dimension);
            w.line(1, "// select stream for the adder");
            w.line(1, format!("wire [{}:0] sel;", width - 1));
            w.line(
                1,
                format!(
                    "{} COUNTER(.clk(clk), .rst(rst), .enable(1'b1), .restart(1'b0), .out(sel));",
                    names.get(COUNTER)
                ),
            );
            w.blank();
        }

        w.line(1, "wire result;");
        w.line(1, "wire valid;");
        w.line(1, format!("{} DOT_PRODUCT(", names.get(DOT_PRODUCT)));
        w.line(2, ".clk(clk),");
        w.line(2, ".rst(rst),");
        w.line(2, ".data(s_datas),");
        w.line(2, ".weights(s_weights),");
        if selector {
            w.line(2, ".sel(sel),");
        }
        w.line(2, ".result(result),");
        w.line(2, ".valid(valid)");
        w.line(1, ");");
        w.blank();

        // `valid` covers the dot product pipeline only. The SNG output register
        // sits in front of it, so the first valid result still comes from the
        // reset state of the streams; counting starts one cycle later.
        w.line(1, "// skip the result computed from the SNG reset state");
        w.line(1, "reg stream_valid;");
        w.line(1, "always @(posedge clk) begin");
        w.line(2, "if( rst == 1'b1 ) begin");
        w.line(3, "stream_valid <= 1'b0;");
        w.line(2, "end else begin");
        w.line(3, "stream_valid <= valid;");
        w.line(2, "end");
        w.line(1, "end");
        w.line(1, "wire sample;");
        w.line(1, "assign sample = result & stream_valid;");
        w.blank();
        w.line(1, "// count 2^PRECISION samples; last is high on the cycle after the final one");
        w.line(1, "reg [PRECISION-1:0] last_counter;");
        w.line(1, "reg last;");
        w.line(1, "always @(posedge clk) begin");
        w.line(2, "if( rst == 1'b1 ) begin");
        w.line(3, "last_counter <= 0;");
        w.line(3, "last <= 0;");
        w.line(2, "end else if( stream_valid == 1'b1 ) begin");
        w.line(
            3,
            format!("if( last_counter == {}'d{} ) begin", p, (1u64 << p) - 1),
        );
        w.line(4, "last <= 1;");
        w.line(4, "last_counter <= 0;");
        w.line(3, "end else begin");
        w.line(4, "last <= 0;");
        w.line(4, "last_counter <= last_counter + 1;");
        w.line(3, "end");
        w.line(2, "end else begin");
        w.line(3, "last_counter <= 0;");
        w.line(3, "last <= 0;");
        w.line(2, "end");
        w.line(1, "end");
        w.blank();
        w.line(1, "wire [PRECISION:0] count;");
        w.line(
            1,
            format!(
                "{} SD_CONVERTER(.clk(clk), .rst(rst), .in(sample), .last(last), .out(count));",
                names.get(SD_CONVERTER)
            ),
        );
        w.blank();
        w.line(1, "// undo the adder scaling and the stream normalization");
        w.line(1, "wire [RES_WIDTH-1:0] dot_product;");
        w.line(1, "assign dot_product = (count * SCALE) << PRECISION;");
        w.blank();
        w.line(1, "always @(posedge clk) begin");
        w.line(2, "if( last == 1'b1 ) begin");
        w.line(
            3,
            "$display(\"expected result = %d\\n actual result = %d\\n\", expected_result, dot_product);",
        );
        w.line(3, "$stop;");
        w.line(2, "end");
        w.line(1, "end");
        w.blank();
        w.line(1, "initial begin");
        w.line(2, "rst = 1;");
        w.line(2, format!("#({}*CLOCK_PERIOD + 1);", RESET_PERIODS));
        w.line(2, "rst = 0;");
        w.line(1, "end");
        w.blank();
        w.module_end(&name);
    }
}
