use std::path::PathBuf;
use std::process;

use clap::Args;

use scgen::config::project;

use super::config_path;

#[derive(Args)]
pub struct InitArgs {
    /// Directory to write scgen.toml into (defaults to current directory)
    pub dir: Option<PathBuf>,
}

pub fn cmd_init(args: InitArgs) {
    let InitArgs { dir } = args;
    let dir = dir.unwrap_or_else(|| PathBuf::from("."));

    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("error: cannot create '{}': {}", dir.display(), e);
        process::exit(1);
    }

    let toml_path = config_path(&dir);
    if toml_path.exists() {
        eprintln!("error: '{}' already exists", toml_path.display());
        process::exit(1);
    }

    if let Err(e) = std::fs::write(&toml_path, project::template()) {
        eprintln!("error: cannot write '{}': {}", toml_path.display(), e);
        process::exit(1);
    }

    eprintln!("Created {}", toml_path.display());
}
