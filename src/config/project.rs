use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{AdderMode, Representation};
use crate::diagnostic::Diagnostic;
use crate::error::Error;
use crate::span::Span;

pub const CONFIG_FILE_NAME: &str = "scgen.toml";

/// Raw contents of `scgen.toml`. Every value keeps its byte span so
/// validation errors can point into the file.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub design: DesignSection,
    #[serde(default)]
    pub testbench: TestbenchSection,
    #[serde(default)]
    pub simulation: SimulationSection,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesignSection {
    pub batch: Option<toml::Spanned<i64>>,
    pub input: Option<toml::Spanned<i64>>,
    pub output: Option<toml::Spanned<i64>>,
    pub representation: Option<toml::Spanned<Representation>>,
    pub adder: Option<toml::Spanned<AdderMode>>,
    pub suffix: Option<toml::Spanned<String>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestbenchSection {
    pub enabled: Option<toml::Spanned<bool>>,
    pub length: Option<toml::Spanned<i64>>,
    pub seed: Option<toml::Spanned<i64>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationSection {
    pub enabled: Option<toml::Spanned<bool>>,
    pub precision: Option<toml::Spanned<i64>>,
}

/// A loaded configuration file together with its source text.
#[derive(Clone, Debug)]
pub struct Project {
    pub path: PathBuf,
    pub source: String,
    pub config: ConfigFile,
}

impl Project {
    /// Load a project from an `scgen.toml` file.
    pub fn load(toml_path: &Path) -> Result<Project, Error> {
        let source = std::fs::read_to_string(toml_path).map_err(|e| Error::Io {
            action: "read",
            path: toml_path.to_path_buf(),
            source: e,
        })?;
        Self::parse(toml_path, source)
    }

    /// Parse configuration text that was read from `path`.
    pub fn parse(path: &Path, source: String) -> Result<Project, Error> {
        match toml::from_str::<ConfigFile>(&source) {
            Ok(config) => Ok(Project {
                path: path.to_path_buf(),
                source,
                config,
            }),
            Err(e) => {
                let span = e.span().map(Span::from).unwrap_or_else(Span::dummy);
                let diagnostic = Diagnostic::error(e.message().to_string(), span);
                Err(Error::Config {
                    path: Some(path.to_path_buf()),
                    source_text: source,
                    diagnostics: vec![diagnostic],
                })
            }
        }
    }

    /// Look for `scgen.toml` directly inside `dir`.
    pub fn find(dir: &Path) -> Option<PathBuf> {
        let candidate = dir.join(CONFIG_FILE_NAME);
        candidate.is_file().then_some(candidate)
    }
}

/// Commented template written by `scgen init`.
pub fn template() -> &'static str {
    r#"# scgen configuration. Command-line flags override these values.

[design]
# Matrix multiply dimensions: (batch x input) * (input x output).
batch = 4
input = 4
output = 4
# "uni" or "bi"
representation = "uni"
# "selector" (multiplexer adder) or "alaghi" (toggle flip-flop adder tree)
adder = "selector"
# Appended to every module name, e.g. sc_dot_product_<suffix>
# suffix = "v1"

[testbench]
enabled = true
# Stream length of the generated stimulus.
length = 100
# Fix the stimulus seed for reproducible data files.
# seed = 1

[simulation]
# Emit sc_dot_product_sim and its noise sources (unipolar only).
enabled = false
# Bit width of simulation data and LFSRs.
precision = 8
"#
}
