pub mod generate;
pub mod init;
pub mod plan;

use std::path::{Path, PathBuf};
use std::process;

use scgen::config::{Project, CONFIG_FILE_NAME};

fn load_project(toml_path: &Path) -> Project {
    match Project::load(toml_path) {
        Ok(p) => p,
        Err(e) => {
            e.report();
            process::exit(1);
        }
    }
}

/// Use the explicit config path when given, otherwise `scgen.toml` in the
/// working directory if there is one.
pub fn resolve_project(config: Option<PathBuf>) -> Option<Project> {
    match config {
        Some(path) => {
            if !path.is_file() {
                eprintln!("error: config file '{}' not found", path.display());
                process::exit(1);
            }
            Some(load_project(&path))
        }
        None => Project::find(Path::new(".")).map(|p| load_project(&p)),
    }
}

/// Default location for a new config file.
pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}
