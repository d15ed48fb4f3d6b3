use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures while locating the toolchain, opening a solution or building its compilations.
///
/// Every variant is fatal for the run. Malformed documentation is not an error
/// and never surfaces here.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("No MSBuild instance found: {0}")]
    ToolchainNotFound(String),

    #[error("Failed to load solution '{}': {reason}", path.display())]
    SolutionLoad { path: PathBuf, reason: String },

    #[error("Failed to load project '{}': {reason}", path.display())]
    ProjectLoad { path: PathBuf, reason: String },

    #[error("Failed to read source file '{}'", path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("C# parser unavailable: {0}")]
    Parser(String),
}

impl LoadError {
    pub fn solution(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::SolutionLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn project(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ProjectLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
