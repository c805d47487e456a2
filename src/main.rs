mod cli;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cli::generate::{cmd_generate, GenerateArgs};
use cli::init::{cmd_init, InitArgs};
use cli::plan::{cmd_plan, PlanArgs};

#[derive(Parser)]
#[command(
    name = "scgen",
    version,
    about = "Stochastic-computing matrix multiply generator for Verilog"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Generate Verilog modules, testbenches and stimulus
    Generate(GenerateArgs),
    /// Print the adder tree layout for N inputs
    Plan(PlanArgs),
    /// Write a commented scgen.toml
    Init(InitArgs),
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Generate(args) => cmd_generate(args),
        Command::Plan(args) => cmd_plan(args),
        Command::Init(args) => cmd_init(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
