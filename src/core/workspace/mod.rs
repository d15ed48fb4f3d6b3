//! Solution loading and compilation retrieval.
//!
//! Opening a solution evaluates every project it lists. A project that fails
//! to evaluate does not fail the open; the failure is recorded and surfaces
//! when compilations are requested, the way a design-time workspace reports
//! load diagnostics separately from the solution it returns.

pub mod file_scanner;
pub mod project;
pub mod solution;

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use colored::Colorize;
use rayon::prelude::*;

pub use file_scanner::IgnoreSet;
pub use project::Project;
pub use solution::{ProjectReference, Solution, load_solution};

use crate::core::{
    LoadError,
    compilation::{Compilation, SyntaxTree, parse_syntax_tree},
    toolchain::ToolchainInstance,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOperation {
    Evaluate,
    Build,
}

impl LoadOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Evaluate => "Evaluate",
            Self::Build => "Build",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProjectLoadProgress {
    pub operation: LoadOperation,
    pub project_path: PathBuf,
    pub target_framework: Option<String>,
    pub elapsed: Duration,
}

/// Receives one notification per finished load step. Called from worker threads.
pub trait ProgressReporter: Sync {
    fn report(&self, progress: &ProjectLoadProgress);
}

#[derive(Debug)]
pub enum ProjectState {
    Loaded(Project),
    Failed {
        reference: ProjectReference,
        reason: String,
    },
}

/// A solution whose projects have been evaluated.
#[derive(Debug)]
pub struct LoadedSolution {
    pub solution: Solution,
    /// One state per project, in solution order.
    pub projects: Vec<ProjectState>,
}

impl LoadedSolution {
    pub fn failed_projects(&self) -> impl Iterator<Item = (&ProjectReference, &str)> {
        self.projects.iter().filter_map(|state| match state {
            ProjectState::Failed { reference, reason } => Some((reference, reason.as_str())),
            ProjectState::Loaded(_) => None,
        })
    }
}

pub struct Workspace<'a> {
    toolchain: ToolchainInstance,
    ignores: IgnoreSet,
    verbose: bool,
    progress: Option<&'a dyn ProgressReporter>,
}

impl<'a> Workspace<'a> {
    pub fn new(toolchain: ToolchainInstance, ignores: IgnoreSet, verbose: bool) -> Self {
        Self {
            toolchain,
            ignores,
            verbose,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressReporter) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Parse the solution descriptor and evaluate its projects in parallel.
    ///
    /// Fails only when the descriptor itself cannot be loaded.
    pub fn open_solution(&self, path: &Path) -> Result<LoadedSolution, LoadError> {
        let solution = load_solution(path)?;

        let projects = solution
            .projects
            .par_iter()
            .map(|reference| self.evaluate(reference))
            .collect();

        let loaded = LoadedSolution { solution, projects };
        if self.verbose {
            for (reference, reason) in loaded.failed_projects() {
                eprintln!(
                    "{} Failed to load project '{}': {}",
                    "warning:".bold().yellow(),
                    reference.path.display(),
                    reason
                );
            }
        }
        Ok(loaded)
    }

    fn evaluate(&self, reference: &ProjectReference) -> ProjectState {
        let start = Instant::now();
        match Project::load(reference, &self.toolchain.msbuild_path) {
            Ok(project) => {
                self.report(LoadOperation::Evaluate, &project.path, None, start);
                ProjectState::Loaded(project)
            }
            Err(e) => ProjectState::Failed {
                reference: reference.clone(),
                reason: e.to_string(),
            },
        }
    }

    /// Build one compilation per project and target framework, in solution order.
    ///
    /// Projects are processed concurrently. The first failed project or
    /// unreadable source file fails the whole retrieval.
    pub fn compilations(&self, loaded: &LoadedSolution) -> Result<Vec<Compilation>, LoadError> {
        let per_project: Vec<Vec<Compilation>> = loaded
            .projects
            .par_iter()
            .map(|state| match state {
                ProjectState::Loaded(project) => self.compile_project(project),
                ProjectState::Failed { reference, reason } => {
                    Err(LoadError::project(&reference.path, reason))
                }
            })
            .collect::<Result<_, _>>()?;

        Ok(per_project.into_iter().flatten().collect())
    }

    fn compile_project(&self, project: &Project) -> Result<Vec<Compilation>, LoadError> {
        // sources shared between target frameworks are parsed once
        let mut parsed: HashMap<PathBuf, SyntaxTree> = HashMap::new();
        let mut compilations = Vec::new();

        for target in project.targets() {
            let start = Instant::now();
            let files = project.source_files(target.as_deref(), &self.ignores, self.verbose);

            let mut trees = Vec::with_capacity(files.len());
            for file in files {
                if let Some(tree) = parsed.get(&file) {
                    trees.push(tree.clone());
                    continue;
                }
                let tree = self.parse_file(&file)?;
                parsed.insert(file, tree.clone());
                trees.push(tree);
            }

            self.report(LoadOperation::Build, &project.path, target.as_deref(), start);
            compilations.push(Compilation::new(&project.name, target, trees));
        }

        Ok(compilations)
    }

    fn parse_file(&self, path: &Path) -> Result<SyntaxTree, LoadError> {
        let source = fs::read_to_string(path).map_err(|source| LoadError::SourceRead {
            path: path.to_path_buf(),
            source,
        })?;
        let tree = parse_syntax_tree(path, &source)?;
        if tree.has_errors && self.verbose {
            eprintln!(
                "{} Syntax errors in '{}', declarations may be incomplete",
                "warning:".bold().yellow(),
                path.display()
            );
        }
        Ok(tree)
    }

    fn report(
        &self,
        operation: LoadOperation,
        project_path: &Path,
        target_framework: Option<&str>,
        start: Instant,
    ) {
        if let Some(progress) = self.progress {
            progress.report(&ProjectLoadProgress {
                operation,
                project_path: project_path.to_path_buf(),
                target_framework: target_framework.map(str::to_string),
                elapsed: start.elapsed(),
            });
        }
    }
}
