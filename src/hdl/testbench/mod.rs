//! Self-checking testbenches and the simulation top.
//!
//! Testbenches replay the `.mif` files produced by [`crate::stimulus`] one
//! word per clock, and compare the device output against the expected
//! stream once the pipeline has filled. They are written to `tb/` and read
//! their data from `tb/data/`.

mod datapath;
mod sim;
#[cfg(test)]
mod tests;
mod units;

pub use datapath::{DotProductTb, MatrixMultTb};
pub use sim::{DotProductSim, SIMULATION_TOP};
pub use units::{AlaghiTreeTb, NadderTb};

use crate::bits::clog2;
use crate::hdl::VerilogWriter;

pub const CLOCK_PERIOD: u32 = 10;
/// Reset is held for this many clock periods.
pub const RESET_PERIODS: u32 = 8;
/// Directory the testbenches read their data from, relative to `tb/`.
pub const DATA_DIR: &str = "data";

/// `data/<file>`
pub fn data_path(file: &str) -> String {
    format!("{}/{}", DATA_DIR, file)
}

fn timescale(w: &mut VerilogWriter) {
    w.line(0, "`timescale 1ns / 10ps");
    w.blank();
}

fn clock(w: &mut VerilogWriter) {
    w.line(1, "// Clock Generation");
    w.line(1, format!("parameter CLOCK_PERIOD={};", CLOCK_PERIOD));
    w.line(1, "initial clk=1;");
    w.line(1, "always begin");
    w.line(2, "#(CLOCK_PERIOD/2);");
    w.line(2, "clk = ~clk;");
    w.line(1, "end");
    w.blank();
}

/// `$readmemb` of each `(file parameter, memory)` pair over `LENGTH` words.
fn read_memories(w: &mut VerilogWriter, memories: &[(&str, &str)]) {
    w.line(1, "initial begin");
    for (param, memory) in memories {
        w.line(2, format!("$readmemb({}, {}, 0, LENGTH-1);", param, memory));
    }
    w.line(1, "end");
    w.blank();
}

/// Counter that walks the test memories, plus the input assignments.
fn test_index(w: &mut VerilogWriter, length: usize, assigns: &[(&str, &str)]) {
    let width = clog2(length).max(1);
    w.line(1, "// Test input assignment logic");
    w.line(1, format!("reg [{}:0] test_index;", width - 1));
    w.line(1, "initial test_index = 0;");
    w.line(1, "always @(posedge clk) begin");
    w.line(2, "if( rst == 1'b1 ) begin");
    w.line(3, "test_index <= 0;");
    w.line(2, "end else begin");
    w.line(3, "test_index <= test_index + 1;");
    w.line(2, "end");
    w.line(1, "end");
    for (target, memory) in assigns {
        w.line(1, format!("assign {} = {}[test_index];", target, memory));
    }
    w.blank();
}

/// Compares `actual` with `expected[result_index]` on every clock where
/// `valid` is high, for the first `LENGTH` results.
fn checker(w: &mut VerilogWriter, valid: &str, actual: &str, expected: &str, format: &str) {
    w.line(1, "// Output checking and error handling");
    w.line(1, "integer result_index;");
    w.line(1, "integer errors;");
    w.line(1, "initial result_index = 0;");
    w.line(1, "initial errors = 0;");
    w.line(1, "always @(posedge clk) begin");
    w.line(2, "if( rst ) begin");
    w.line(3, "result_index <= 0;");
    w.line(
        2,
        format!("end else if( {} == 1'b1 && result_index < LENGTH ) begin", valid),
    );
    w.line(3, format!("if( {} != {}[result_index] ) begin", actual, expected));
    w.line(
        4,
        format!(
            "$display(\"Error. Expected result {f} does not match actual {f}. On result index: %d\",",
            f = format
        ),
    );
    w.line(5, format!("{}[result_index], {}, result_index);", expected, actual));
    w.line(4, "errors = errors + 1;");
    w.line(3, "end");
    w.blank();
    w.line(3, "result_index <= result_index + 1;");
    w.line(2, "end");
    w.line(1, "end");
    w.blank();
}

/// Holds reset, runs `LENGTH + DELAY + 2` periods and prints the summary.
fn run_and_report(w: &mut VerilogWriter) {
    w.line(1, "initial begin");
    w.line(2, "// initialize inputs");
    w.line(2, "rst = 1;");
    w.line(2, format!("#({}*CLOCK_PERIOD + 1);", RESET_PERIODS));
    w.blank();
    w.line(2, "// start sim");
    w.line(2, "rst = 0;");
    w.line(2, "#((LENGTH+DELAY+2)*CLOCK_PERIOD);");
    w.blank();
    summary(w, 2);
    w.line(1, "end");
}

fn summary(w: &mut VerilogWriter, indent: usize) {
    w.line(indent, "// error summary");
    w.line(indent, "$display(\"Simulation complete.\");");
    w.line(indent, "if( errors > 0 ) begin");
    w.line(
        indent + 1,
        "$display(\"Validation failure: %d error(s).\", errors);",
    );
    w.line(indent, "end else begin");
    w.line(indent + 1, "$display(\"Validation successful.\");");
    w.line(indent, "end");
    w.blank();
    w.line(indent, "$stop;");
}
