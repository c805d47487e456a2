use std::process;

use clap::Args;

use scgen::plan::{plan_signals, PrefixNaming};

#[derive(Args)]
pub struct PlanArgs {
    /// Number of tree inputs
    pub inputs: usize,
    /// Prefix of intermediate signal names
    #[arg(long, default_value = "s")]
    pub prefix: String,
    /// Print the layout as TOML
    #[arg(long = "toml")]
    pub as_toml: bool,
}

pub fn cmd_plan(args: PlanArgs) {
    let PlanArgs {
        inputs,
        prefix,
        as_toml,
    } = args;

    let names: Vec<String> = (0..inputs).map(|i| format!("x{}", i)).collect();
    let plan = match plan_signals(&names, &PrefixNaming::new(prefix)) {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    if as_toml {
        match toml::to_string(&plan) {
            Ok(text) => print!("{}", text),
            Err(e) => {
                eprintln!("error: cannot serialize plan: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("{}", plan);
        eprintln!("depth {}, {} adder(s)", plan.depth(), plan.adder_count());
    }
}
