//! Noise sources and domain converters used by the simulation top.

use tracing::warn;

use super::{COUNTER, DS_CONVERTER, LFSR, SD_CONVERTER, SNG};
use crate::bits::clog2;
use crate::hdl::{EmitContext, HdlUnit, ModuleNames, VerilogWriter};
use crate::lfsr::taps_for;

/// Modular counter over `0..=bound`.
pub struct Counter {
    bound: usize,
}

impl Counter {
    pub fn new(bound: usize) -> Self {
        Self { bound }
    }

    pub fn width(bound: usize) -> usize {
        clog2(bound + 1).max(1)
    }
}

impl HdlUnit for Counter {
    fn name(&self, names: &ModuleNames) -> String {
        names.get(COUNTER)
    }

    fn description(&self) -> Vec<&'static str> {
        vec!["The circuit represents a counter which counts up to BOUND and wraps back to 0."]
    }

    fn emit(&self, ctx: &EmitContext, w: &mut VerilogWriter) {
        let name = self.name(&ctx.names);
        w.module_header(&name, &["clk", "rst", "enable", "restart", "out"]);
        w.blank();
        w.line(1, format!("parameter BOUND = {};", self.bound));
        w.line(1, format!("parameter WIDTH = {};", Self::width(self.bound)));
        w.blank();
        w.line(1, "input              clk;");
        w.line(1, "input              rst;");
        w.line(1, "input              enable;");
        w.line(1, "input              restart;");
        w.line(1, "output [WIDTH-1:0] out;");
        w.blank();
        w.line(1, "reg [WIDTH-1:0] count;");
        w.line(1, "always @(posedge clk or posedge rst) begin");
        w.line(2, "if( rst ) count <= 0;");
        w.line(2, "else if( restart ) count <= 0;");
        w.line(2, "else if( enable ) begin");
        w.line(3, "if( count == BOUND ) count <= 0;");
        w.line(3, "else count <= count + 1;");
        w.line(2, "end");
        w.line(1, "end");
        w.blank();
        w.line(1, "assign out = count;");
        w.blank();
        w.module_end(&name);
    }
}

/// Fibonacci LFSR with zero insertion, period `2^width`.
pub struct LfsrModule {
    width: u32,
}

impl LfsrModule {
    pub fn new(width: u32) -> Self {
        Self { width }
    }
}

impl HdlUnit for LfsrModule {
    fn name(&self, names: &ModuleNames) -> String {
        names.get(LFSR)
    }

    fn description(&self) -> Vec<&'static str> {
        vec![
            "The circuit represents a linear feedback shift register.",
            "A zero detector splices the all-zero state into the sequence,",
            "so every N-bit value appears once per period of 2^N.",
            "XOR tap locations have been taken from https://github.com/arminalaghi",
            "/scsynth/blob/master/src/VerilogLFSRGenerator.m",
        ]
    }

    fn emit(&self, ctx: &EmitContext, w: &mut VerilogWriter) {
        let name = self.name(&ctx.names);
        let (taps, fallback) = taps_for(self.width);
        if fallback {
            warn!(
                width = self.width,
                ?taps,
                "no LFSR taps for this width, the sequence will not be maximal"
            );
        }

        w.module_header(&name, &["clk", "rst", "seed", "enable", "restart", "out"]);
        w.blank();
        w.line(1, format!("parameter N = {};", self.width));
        w.blank();
        w.line(1, "input          clk;");
        w.line(1, "input          rst;");
        w.line(1, "input  [N-1:0] seed;");
        w.line(1, "input          enable;");
        w.line(1, "input          restart;");
        w.line(1, "output [N-1:0] out;");
        w.blank();
        w.line(1, "reg [N-1:0] shift_reg;");
        w.line(1, "wire shift_in;");
        w.blank();
        w.line(1, "always @(posedge clk or posedge rst) begin");
        w.line(2, "if( rst ) shift_reg <= seed;");
        w.line(2, "else if( restart ) shift_reg <= seed;");
        w.line(2, "else if( enable ) shift_reg <= {shift_reg[N-2:0], shift_in};");
        w.line(1, "end");
        w.blank();
        let xor = taps
            .iter()
            .filter(|&&t| t <= self.width)
            .map(|t| format!("shift_reg[{}]", t - 1))
            .collect::<Vec<_>>()
            .join(" ^ ");
        w.line(1, "wire xor_out;");
        w.line(1, format!("assign xor_out = {};", xor));
        w.blank();
        w.line(1, "wire zero_detector;");
        w.line(1, "assign zero_detector = ~(|(shift_reg[N-2:0]));");
        w.line(1, "assign shift_in = xor_out ^ zero_detector;");
        w.blank();
        w.line(1, "assign out = shift_reg;");
        w.blank();
        w.module_end(&name);
    }
}

/// Digital to stochastic converter: `out = (rng < in)`.
pub struct DsConverter {
    precision: u32,
}

impl DsConverter {
    pub fn new(precision: u32) -> Self {
        Self { precision }
    }
}

impl HdlUnit for DsConverter {
    fn name(&self, names: &ModuleNames) -> String {
        names.get(DS_CONVERTER)
    }

    fn description(&self) -> Vec<&'static str> {
        vec![
            "The module represents a digital to stochastic converter.",
            "",
            "Note: conversion is to unipolar representation, each stream",
            "produced lies in [0,1].",
        ]
    }

    fn emit(&self, ctx: &EmitContext, w: &mut VerilogWriter) {
        let name = self.name(&ctx.names);
        w.module_header(&name, &["in", "rng", "out"]);
        w.blank();
        w.line(1, format!("parameter PRECISION = {};", self.precision));
        w.blank();
        w.line(1, "input [PRECISION-1:0] in;");
        w.line(1, "input [PRECISION-1:0] rng;");
        w.line(1, "output                out;");
        w.blank();
        w.line(1, "assign out = (rng < in) ? 1'b1 : 1'b0;");
        w.blank();
        w.module_end(&name);
    }
}

/// Stochastic to digital converter: counts ones until `last`.
pub struct SdConverter {
    precision: u32,
}

impl SdConverter {
    pub fn new(precision: u32) -> Self {
        Self { precision }
    }
}

impl HdlUnit for SdConverter {
    fn name(&self, names: &ModuleNames) -> String {
        names.get(SD_CONVERTER)
    }

    fn description(&self) -> Vec<&'static str> {
        vec![
            "The module represents a stochastic to digital converter.",
            "The input 'last' ends the current window and clears the count.",
            "The count is one bit wider than PRECISION so a full window of ones fits.",
        ]
    }

    fn emit(&self, ctx: &EmitContext, w: &mut VerilogWriter) {
        let name = self.name(&ctx.names);
        w.module_header(&name, &["clk", "rst", "in", "last", "out"]);
        w.blank();
        w.line(1, format!("parameter PRECISION = {};", self.precision));
        w.blank();
        w.line(1, "input                clk;");
        w.line(1, "input                rst;");
        w.line(1, "input                in;");
        w.line(1, "input                last;");
        w.line(1, "output [PRECISION:0] out;");
        w.blank();
        w.line(1, "reg [PRECISION:0] count;");
        w.blank();
        w.line(1, "always @(posedge clk) begin");
        w.line(2, "if( rst == 1'b1 || last == 1'b1 ) begin");
        w.line(3, "count <= 0;");
        w.line(2, "end else begin");
        w.line(3, "count <= count + in;");
        w.line(2, "end");
        w.line(1, "end");
        w.blank();
        w.line(1, "assign out = count;");
        w.blank();
        w.module_end(&name);
    }
}

/// Stochastic number generator: a registered [`DsConverter`].
pub struct Sng {
    precision: u32,
}

impl Sng {
    pub fn new(precision: u32) -> Self {
        Self { precision }
    }
}

impl HdlUnit for Sng {
    fn name(&self, names: &ModuleNames) -> String {
        names.get(SNG)
    }

    fn description(&self) -> Vec<&'static str> {
        vec![
            "The module represents a stochastic number generator.",
            "Requires an input noise source (lfsr, counter, ...).",
        ]
    }

    fn emit(&self, ctx: &EmitContext, w: &mut VerilogWriter) {
        let name = self.name(&ctx.names);
        w.module_header(&name, &["clk", "rst", "in", "rng", "out"]);
        w.blank();
        w.line(1, format!("parameter PRECISION = {};", self.precision));
        w.blank();
        w.line(1, "input                 clk;");
        w.line(1, "input                 rst;");
        w.line(1, "input [PRECISION-1:0] in;");
        w.line(1, "input [PRECISION-1:0] rng;");
        w.line(1, "output                out;");
        w.blank();
        w.line(1, "// compare against the noise and register the result");
        w.line(1, "wire ds_out;");
        w.line(
            1,
            format!(
                "{} DS_CONVERT(.in(in), .rng(rng), .out(ds_out));",
                ctx.names.get(DS_CONVERTER)
            ),
        );
        w.blank();
        w.line(1, "reg out_reg;");
        w.reset_block(1, &["out_reg"], &[("out_reg", "ds_out")]);
        w.blank();
        w.line(1, "assign out = out_reg;");
        w.blank();
        w.module_end(&name);
    }
}
