use std::path::PathBuf;

use thiserror::Error;

use crate::diagnostic::{render_diagnostics, Diagnostic};
use crate::plan::PlanError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// One or more configuration problems, with the text they point into.
    #[error("invalid configuration ({} problem(s))", .diagnostics.len())]
    Config {
        path: Option<PathBuf>,
        source_text: String,
        diagnostics: Vec<Diagnostic>,
    },

    #[error("cannot {action} '{}': {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{}' exists and is not a directory", .0.display())]
    NotADirectory(PathBuf),
}

impl Error {
    pub fn options(diagnostics: Vec<Diagnostic>, project: Option<&crate::config::Project>) -> Self {
        match project {
            Some(p) => Error::Config {
                path: Some(p.path.clone()),
                source_text: p.source.clone(),
                diagnostics,
            },
            None => Error::Config {
                path: None,
                source_text: String::new(),
                diagnostics,
            },
        }
    }

    /// Print the error to stderr, with source snippets for configuration errors.
    pub fn report(&self) {
        match self {
            Error::Config {
                path,
                source_text,
                diagnostics,
            } => {
                let filename = path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<command line>".to_string());
                render_diagnostics(diagnostics, &filename, source_text);
            }
            other => eprintln!("error: {}", other),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
