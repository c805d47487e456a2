//! Verilog emission.
//!
//! Each emitted file is an [`HdlUnit`]: a module (or testbench top) that
//! knows its name, its banner description and how to write its body into
//! a [`VerilogWriter`]. Names pass through [`ModuleNames`] so the optional
//! user suffix reaches every declaration and every instantiation.

pub mod testbench;
pub mod units;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::AdderMode;

const INDENT: &str = "   ";
const RULE: &str =
    "//////////////////////////////////////////////////////////////////////////////////";

/// Line-oriented Verilog text builder.
#[derive(Debug, Default)]
pub struct VerilogWriter {
    out: String,
}

impl VerilogWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `text` at `indent` levels of three spaces.
    pub fn line(&mut self, indent: usize, text: impl AsRef<str>) {
        for _ in 0..indent {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    /// File banner with creation timestamp and description lines.
    pub fn banner(&mut self, created: &DateTime<Utc>, description: &[&str]) {
        self.line(0, RULE);
        self.line(0, format!("// Create Date: {}", format_timestamp(created)));
        self.line(0, "//");
        let mut lines = description.iter();
        if let Some(first) = lines.next() {
            self.line(0, format!("// Description: {}", first));
        }
        for line in lines {
            if line.is_empty() {
                self.line(0, "//");
            } else {
                self.line(0, format!("// {}", line));
            }
        }
        self.line(0, RULE);
        self.blank();
    }

    /// `module name(` followed by one port per line and `);`.
    pub fn module_header(&mut self, name: &str, ports: &[&str]) {
        self.line(0, format!("module {}(", name));
        for (i, port) in ports.iter().enumerate() {
            let sep = if i + 1 < ports.len() { "," } else { "" };
            self.line(1, format!("{}{}", port, sep));
        }
        self.line(0, ");");
    }

    pub fn module_end(&mut self, name: &str) {
        self.line(0, format!("endmodule // {}", name));
    }

    /// A clocked block that clears `regs` on reset and otherwise applies
    /// the `(target, value)` assignments.
    pub fn reset_block(&mut self, indent: usize, regs: &[&str], assigns: &[(&str, &str)]) {
        self.line(indent, "always @(posedge clk) begin");
        self.line(indent + 1, "if( rst == 1'b1 ) begin");
        for reg in regs {
            self.line(indent + 2, format!("{} <= 0;", reg));
        }
        self.line(indent + 1, "end else begin");
        for (target, value) in assigns {
            self.line(indent + 2, format!("{} <= {};", target, value));
        }
        self.line(indent + 1, "end");
        self.line(indent, "end");
    }

    pub fn finish(self) -> String {
        self.out
    }
}

pub fn format_timestamp(created: &DateTime<Utc>) -> String {
    format!("{} GMT", created.format("%Y-%m-%d %H:%M:%S"))
}

/// Applies the optional user suffix to module names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleNames {
    suffix: Option<String>,
}

impl ModuleNames {
    pub fn new(suffix: Option<&str>) -> Self {
        Self {
            suffix: suffix.filter(|s| !s.is_empty()).map(str::to_string),
        }
    }

    /// `base` or `base_suffix`.
    pub fn get(&self, base: &str) -> String {
        match &self.suffix {
            Some(suffix) => format!("{}_{}", base, suffix),
            None => base.to_string(),
        }
    }

    /// Testbench name for the unit named `base`.
    pub fn testbench(&self, base: &str) -> String {
        format!("{}_tb", self.get(base))
    }
}

/// Everything an emitter needs besides its own parameters.
#[derive(Clone, Debug)]
pub struct EmitContext {
    pub names: ModuleNames,
    pub created: DateTime<Utc>,
}

impl EmitContext {
    pub fn new(names: ModuleNames, created: DateTime<Utc>) -> Self {
        Self { names, created }
    }
}

/// One emitted Verilog file.
pub trait HdlUnit {
    /// Final module name, suffix applied.
    fn name(&self, names: &ModuleNames) -> String;

    /// Banner description; the first line follows `Description:`.
    fn description(&self) -> Vec<&'static str>;

    /// Write everything after the banner.
    fn emit(&self, ctx: &EmitContext, w: &mut VerilogWriter);
}

/// Render a unit to its complete file text.
pub fn render(unit: &dyn HdlUnit, ctx: &EmitContext) -> String {
    let mut w = VerilogWriter::new();
    w.banner(&ctx.created, &unit.description());
    unit.emit(ctx, &mut w);
    debug!(module = %unit.name(&ctx.names), "rendered unit");
    w.finish()
}

/// `<name>.v`
pub fn file_name(unit: &dyn HdlUnit, names: &ModuleNames) -> String {
    format!("{}.v", unit.name(names))
}

/// The adder units a dot product over `n` streams needs in `mode`.
pub fn create_adder_units(mode: AdderMode, n: usize) -> Vec<Box<dyn HdlUnit>> {
    match mode {
        AdderMode::Selector => vec![Box::new(units::SelectAdder::new(n))],
        AdderMode::Alaghi => vec![
            Box::new(units::AlaghiAdder),
            Box::new(units::AlaghiTree::new(n)),
        ],
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2017, 6, 1, 12, 30, 5).unwrap()
    }

    #[test]
    fn test_writer_indents_with_three_spaces() {
        let mut w = VerilogWriter::new();
        w.line(0, "a");
        w.line(2, "b");
        w.blank();
        assert_eq!(w.finish(), "a\n      b\n\n");
    }

    #[test]
    fn test_banner_layout() {
        let mut w = VerilogWriter::new();
        w.banner(&fixed_time(), &["First line.", "", "Second line."]);
        let text = w.finish();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], RULE);
        assert_eq!(lines[1], "// Create Date: 2017-06-01 12:30:05 GMT");
        assert_eq!(lines[2], "//");
        assert_eq!(lines[3], "// Description: First line.");
        assert_eq!(lines[4], "//");
        assert_eq!(lines[5], "// Second line.");
        assert_eq!(lines[6], RULE);
        assert_eq!(lines[7], "");
    }

    #[test]
    fn test_module_header_ports() {
        let mut w = VerilogWriter::new();
        w.module_header("m", &["clk", "out"]);
        assert_eq!(w.finish(), "module m(\n   clk,\n   out\n);\n");
    }

    #[test]
    fn test_module_names_suffix() {
        let plain = ModuleNames::new(None);
        let named = ModuleNames::new(Some("v2"));
        assert_eq!(plain.get("sc_nadder"), "sc_nadder");
        assert_eq!(named.get("sc_nadder"), "sc_nadder_v2");
        assert_eq!(named.testbench("sc_nadder"), "sc_nadder_v2_tb");
        assert_eq!(ModuleNames::new(Some("")), plain);
    }

    #[test]
    fn test_create_adder_units() {
        let names = ModuleNames::default();
        let selector: Vec<String> = create_adder_units(AdderMode::Selector, 4)
            .iter()
            .map(|u| u.name(&names))
            .collect();
        assert_eq!(selector, vec!["sc_nadder"]);

        let alaghi: Vec<String> = create_adder_units(AdderMode::Alaghi, 4)
            .iter()
            .map(|u| u.name(&names))
            .collect();
        assert_eq!(alaghi, vec!["alaghi_adder", "alaghi_nadder"]);
    }
}
