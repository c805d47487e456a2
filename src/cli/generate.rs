use std::path::PathBuf;
use std::process;

use chrono::Utc;
use clap::Args;

use scgen::config::{AdderMode, Options, Overrides, Representation};
use scgen::error::Error;

use super::resolve_project;

#[derive(Args)]
pub struct GenerateArgs {
    /// Destination directory (created if missing)
    #[arg(short, long, default_value = ".")]
    pub dest: PathBuf,
    /// Configuration file (default: ./scgen.toml when present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Suffix appended to every module name
    #[arg(long, value_name = "SUFFIX")]
    pub name: Option<String>,
    /// Rows of the input matrix (M)
    #[arg(short, long)]
    pub batch: Option<usize>,
    /// Shared dimension (N), the dot product length
    #[arg(short, long)]
    pub input: Option<usize>,
    /// Columns of the weight matrix (O)
    #[arg(short, long)]
    pub output: Option<usize>,
    /// Stochastic number representation
    #[arg(short = 'p', long = "rep", value_enum)]
    pub representation: Option<Representation>,
    /// Adder used to sum the products
    #[arg(long, value_enum, conflicts_with = "alaghi")]
    pub adder: Option<AdderMode>,
    /// Shorthand for --adder alaghi
    #[arg(long)]
    pub alaghi: bool,
    /// Bit width of the simulation top
    #[arg(long)]
    pub precision: Option<u32>,
    /// Stream length of the testbench stimulus
    #[arg(long)]
    pub length: Option<usize>,
    /// Stimulus seed for reproducible data files
    #[arg(long)]
    pub seed: Option<u64>,
    /// Skip testbenches and stimulus
    #[arg(long)]
    pub no_testbench: bool,
    /// Also emit the simulation top and its noise sources
    #[arg(long)]
    pub simulation: bool,
}

pub fn cmd_generate(args: GenerateArgs) {
    let GenerateArgs {
        dest,
        config,
        name,
        batch,
        input,
        output,
        representation,
        adder,
        alaghi,
        precision,
        length,
        seed,
        no_testbench,
        simulation,
    } = args;

    let project = resolve_project(config);
    let overrides = Overrides {
        batch,
        input,
        output,
        representation,
        adder: if alaghi { Some(AdderMode::Alaghi) } else { adder },
        suffix: name,
        testbench: no_testbench.then_some(false),
        length,
        seed,
        simulation: simulation.then_some(true),
        precision,
    };

    let options = match Options::resolve(project.as_ref().map(|p| &p.config), &overrides) {
        Ok(options) => options,
        Err(diagnostics) => {
            Error::options(diagnostics, project.as_ref()).report();
            process::exit(1);
        }
    };

    let bundle = match scgen::generate(&options, Utc::now()) {
        Ok(bundle) => bundle,
        Err(e) => {
            e.report();
            process::exit(1);
        }
    };

    let written = match bundle.write_to(&dest) {
        Ok(paths) => paths,
        Err(e) => {
            e.report();
            process::exit(1);
        }
    };

    eprintln!(
        "Generated {}x{} * {}x{} ({} files) in {}",
        options.batch,
        options.input,
        options.input,
        options.output,
        written.len(),
        dest.display()
    );
    if let Some(seed) = bundle.seed() {
        eprintln!("  stimulus seed: {}", seed);
    }
}
