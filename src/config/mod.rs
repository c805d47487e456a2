//! Generator configuration.
//!
//! Options come from three layers: built-in defaults, an optional
//! `scgen.toml`, and command-line overrides. [`Options::resolve`] merges
//! them and validates the result, reporting every problem at once.

pub mod project;
#[cfg(test)]
mod tests;

use clap::ValueEnum;
use serde::Deserialize;

use crate::diagnostic::Diagnostic;
use crate::lfsr::{taps_for, TAPS};
use crate::span::{Span, Spanned};

pub use project::{ConfigFile, Project, CONFIG_FILE_NAME};

pub const DEFAULT_DIMENSION: usize = 4;
pub const DEFAULT_TEST_LENGTH: usize = 100;
pub const DEFAULT_PRECISION: u32 = 8;
pub const MIN_PRECISION: u32 = 3;
pub const MAX_PRECISION: u32 = 32;

/// Stochastic number representation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    /// Values in [0, 1]; multiplication is AND.
    #[default]
    Uni,
    /// Values in [-1, 1]; multiplication is XNOR.
    Bi,
}

/// How the element-wise products are summed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AdderMode {
    /// Multiplexer adder driven by select streams.
    #[default]
    Selector,
    /// Tree of toggle flip-flop adders.
    Alaghi,
}

/// Fully resolved generator options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// M in MxN * NxO.
    pub batch: usize,
    /// N.
    pub input: usize,
    /// O.
    pub output: usize,
    pub representation: Representation,
    pub adder: AdderMode,
    /// Appended to every module name as `<base>_<suffix>`.
    pub suffix: Option<String>,
    /// `None` disables testbenches and stimulus.
    pub testbench: Option<TestbenchOptions>,
    /// `None` disables the simulation top.
    pub simulation: Option<SimulationOptions>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestbenchOptions {
    /// Stream length of the generated stimulus.
    pub length: usize,
    /// Stimulus seed; drawn at random when unset.
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationOptions {
    /// Binary width of simulation data and noise sources.
    pub precision: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            batch: DEFAULT_DIMENSION,
            input: DEFAULT_DIMENSION,
            output: DEFAULT_DIMENSION,
            representation: Representation::Uni,
            adder: AdderMode::Selector,
            suffix: None,
            testbench: Some(TestbenchOptions {
                length: DEFAULT_TEST_LENGTH,
                seed: None,
            }),
            simulation: None,
        }
    }
}

/// Values set on the command line. `None` keeps the configured value.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub batch: Option<usize>,
    pub input: Option<usize>,
    pub output: Option<usize>,
    pub representation: Option<Representation>,
    pub adder: Option<AdderMode>,
    pub suffix: Option<String>,
    pub testbench: Option<bool>,
    pub length: Option<usize>,
    pub seed: Option<u64>,
    pub simulation: Option<bool>,
    pub precision: Option<u32>,
}

impl Options {
    /// Merge defaults, the config file and overrides, then validate.
    pub fn resolve(
        file: Option<&ConfigFile>,
        overrides: &Overrides,
    ) -> Result<Options, Vec<Diagnostic>> {
        let empty = ConfigFile::default();
        let file = file.unwrap_or(&empty);
        let mut diagnostics = Vec::new();

        let batch = dimension(
            "design.batch",
            overrides.batch,
            &file.design.batch,
            &mut diagnostics,
        );
        let input = dimension(
            "design.input",
            overrides.input,
            &file.design.input,
            &mut diagnostics,
        );
        let output = dimension(
            "design.output",
            overrides.output,
            &file.design.output,
            &mut diagnostics,
        );

        let representation = overrides
            .representation
            .or_else(|| file.design.representation.as_ref().map(|r| *r.get_ref()))
            .unwrap_or_default();
        let adder = overrides
            .adder
            .or_else(|| file.design.adder.as_ref().map(|a| *a.get_ref()))
            .unwrap_or_default();

        let suffix = match &overrides.suffix {
            Some(s) => Some(Spanned::dummy(s.clone())),
            None => file.design.suffix.clone().map(Spanned::from),
        };
        let suffix = suffix.and_then(|s| validate_suffix(s, &mut diagnostics));

        let testbench_enabled = overrides
            .testbench
            .or_else(|| file.testbench.enabled.as_ref().map(|e| *e.get_ref()))
            .unwrap_or(true);
        let length = count(
            "testbench.length",
            overrides.length,
            &file.testbench.length,
            DEFAULT_TEST_LENGTH,
            &mut diagnostics,
        );
        let seed = match overrides.seed {
            Some(seed) => Some(seed),
            None => file
                .testbench
                .seed
                .clone()
                .map(Spanned::from)
                .and_then(|s| non_negative("testbench.seed", s, &mut diagnostics)),
        };

        let simulation_enabled = overrides
            .simulation
            .or_else(|| file.simulation.enabled.as_ref().map(|e| *e.get_ref()))
            .unwrap_or(false);
        let precision = precision(overrides.precision, &file.simulation.precision, &mut diagnostics);

        if !diagnostics.is_empty() {
            return Err(diagnostics);
        }

        Ok(Options {
            batch,
            input,
            output,
            representation,
            adder,
            suffix,
            testbench: testbench_enabled.then_some(TestbenchOptions { length, seed }),
            simulation: simulation_enabled.then_some(SimulationOptions { precision }),
        })
    }
}

fn origin_note(span: Span) -> Option<String> {
    span.is_dummy()
        .then(|| "value was given on the command line".to_string())
}

fn invalid(key: &str, message: String, span: Span, help: String) -> Diagnostic {
    let diag = Diagnostic::error(format!("invalid '{}': {}", key, message), span).with_help(help);
    match origin_note(span) {
        Some(note) => diag.with_note(note),
        None => diag,
    }
}

/// Pick the override or the file value, as a spanned signed integer.
fn pick<T: TryInto<i64> + Copy>(
    cli: Option<T>,
    file: &Option<toml::Spanned<i64>>,
) -> Option<Spanned<i64>> {
    match cli {
        Some(v) => Some(Spanned::dummy(v.try_into().unwrap_or(i64::MAX))),
        None => file.clone().map(Spanned::from),
    }
}

fn dimension(
    key: &str,
    cli: Option<usize>,
    file: &Option<toml::Spanned<i64>>,
    diagnostics: &mut Vec<Diagnostic>,
) -> usize {
    count(key, cli, file, DEFAULT_DIMENSION, diagnostics)
}

fn count(
    key: &str,
    cli: Option<usize>,
    file: &Option<toml::Spanned<i64>>,
    default: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> usize {
    let Some(value) = pick(cli, file) else {
        return default;
    };
    match usize::try_from(value.node) {
        Ok(v) if v >= 1 => v,
        _ => {
            diagnostics.push(invalid(
                key,
                format!("expected a positive integer, found {}", value.node),
                value.span,
                "use a value of at least 1".to_string(),
            ));
            default
        }
    }
}

fn non_negative(key: &str, value: Spanned<i64>, diagnostics: &mut Vec<Diagnostic>) -> Option<u64> {
    match u64::try_from(value.node) {
        Ok(v) => Some(v),
        Err(_) => {
            diagnostics.push(invalid(
                key,
                format!("expected a non-negative integer, found {}", value.node),
                value.span,
                "remove the key to draw a random seed".to_string(),
            ));
            None
        }
    }
}

fn precision(
    cli: Option<u32>,
    file: &Option<toml::Spanned<i64>>,
    diagnostics: &mut Vec<Diagnostic>,
) -> u32 {
    let Some(value) = pick(cli, file) else {
        return DEFAULT_PRECISION;
    };
    let range = i64::from(MIN_PRECISION)..=i64::from(MAX_PRECISION);
    if !range.contains(&value.node) {
        diagnostics.push(invalid(
            "simulation.precision",
            format!("{} is out of range", value.node),
            value.span,
            format!(
                "precision must be between {} and {} bits",
                MIN_PRECISION, MAX_PRECISION
            ),
        ));
        return DEFAULT_PRECISION;
    }

    // the noise sources are LFSRs of this width and need maximal taps
    let width = value.node as u32;
    if taps_for(width).1 {
        let supported = TAPS
            .iter()
            .map(|(w, _)| w.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        diagnostics.push(invalid(
            "simulation.precision",
            format!("no maximal-length LFSR taps for {} bits", width),
            value.span,
            format!("use one of {}", supported),
        ));
        return DEFAULT_PRECISION;
    }
    width
}

fn validate_suffix(suffix: Spanned<String>, diagnostics: &mut Vec<Diagnostic>) -> Option<String> {
    let s = suffix.node.as_str();
    if s.is_empty() {
        return None;
    }
    if s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Some(suffix.node)
    } else {
        diagnostics.push(invalid(
            "design.suffix",
            format!("'{}' is not a valid identifier fragment", s),
            suffix.span,
            "use only letters, digits and '_'".to_string(),
        ));
        None
    }
}
