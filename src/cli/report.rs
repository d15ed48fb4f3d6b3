//! Report formatting and printing utilities.
//!
//! Every printer has a `_to` variant taking a writer, used by tests.
//! Separate from core logic to allow resxdup to be used as a library.

use std::{
    env,
    io::{self, Write},
    path::Path,
    time::Duration,
};

use colored::Colorize;

use crate::core::{
    DuplicateGroup,
    toolchain::ToolchainInstance,
    workspace::{ProgressReporter, ProjectLoadProgress},
};

/// Set to any non-empty value to leave elapsed times out of progress lines.
pub const DISABLE_TIMING_ENV: &str = "RESXDUP_DISABLE_TIMING";

const PROGRESS_COLUMN_WIDTH: usize = 15;

pub fn print_using_msbuild(msbuild_path: &Path) {
    let _ = writeln!(
        io::stdout().lock(),
        "Using MSBuild at '{}' to load projects.",
        msbuild_path.display()
    );
}

pub fn print_loading_solution(solution: &Path) {
    let _ = writeln!(io::stdout().lock(), "Loading solution '{}'", solution.display());
}

pub fn print_finished_loading(solution: &Path) {
    let _ = writeln!(
        io::stdout().lock(),
        "Finished loading solution '{}'",
        solution.display()
    );
}

pub fn print_compilations_unavailable() {
    let _ = writeln!(io::stdout().lock(), "Unable to get compilations");
}

/// Print one block per duplicate group to stdout.
pub fn report_duplicates(groups: &[DuplicateGroup]) {
    report_duplicates_to(groups, &mut io::stdout().lock());
}

/// Print duplicate groups to a custom writer.
pub fn report_duplicates_to<W: Write>(groups: &[DuplicateGroup], writer: &mut W) {
    for group in groups {
        let _ = writeln!(
            writer,
            "The following resx files have duplicate values '{}':",
            group.value
        );
        for name in &group.qualified_names {
            let _ = writeln!(writer, "  {}", name);
        }
    }
}

/// Print a one-line summary to stderr when verbose.
pub fn print_summary(groups: &[DuplicateGroup], entry_count: usize, verbose: bool) {
    print_summary_to(groups, entry_count, verbose, &mut io::stderr().lock());
}

pub fn print_summary_to<W: Write>(
    groups: &[DuplicateGroup],
    entry_count: usize,
    verbose: bool,
    writer: &mut W,
) {
    if !verbose {
        return;
    }
    let keys: usize = groups.iter().map(|g| g.qualified_names.len()).sum();
    let _ = writeln!(
        writer,
        "{} {} resource {} checked, {} duplicate {} across {} {}",
        "note:".bold().cyan(),
        entry_count,
        if entry_count == 1 { "entry" } else { "entries" },
        groups.len(),
        if groups.len() == 1 { "value" } else { "values" },
        keys,
        if keys == 1 { "key" } else { "keys" },
    );
}

/// List toolchain instances the way an interactive picker would show them.
pub fn print_toolchains(instances: &[ToolchainInstance]) {
    print_toolchains_to(instances, &mut io::stdout().lock());
}

pub fn print_toolchains_to<W: Write>(instances: &[ToolchainInstance], writer: &mut W) {
    if instances.is_empty() {
        let _ = writeln!(writer, "No MSBuild instances found");
        return;
    }
    for (i, instance) in instances.iter().enumerate() {
        let _ = writeln!(writer, "Instance {}", i + 1);
        let _ = writeln!(writer, "    Name: {}", instance.name);
        let _ = writeln!(writer, "    Version: {}", instance.version);
        let _ = writeln!(writer, "    MSBuild Path: {}", instance.msbuild_path.display());
    }
}

/// Writes project load progress to stderr.
pub struct ConsoleProgressReporter {
    show_timing: bool,
}

impl ConsoleProgressReporter {
    pub fn new(show_timing: bool) -> Self {
        Self { show_timing }
    }

    pub fn from_env() -> Self {
        let disabled = env::var_os(DISABLE_TIMING_ENV).is_some_and(|v| !v.is_empty());
        Self::new(!disabled)
    }
}

impl ProgressReporter for ConsoleProgressReporter {
    fn report(&self, progress: &ProjectLoadProgress) {
        let _ = writeln!(
            io::stderr().lock(),
            "{}",
            format_progress(progress, self.show_timing)
        );
    }
}

/// `<operation> <elapsed> <project file> (<tfm>)`, columns padded.
pub fn format_progress(progress: &ProjectLoadProgress, show_timing: bool) -> String {
    let file = progress
        .project_path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| progress.project_path.display().to_string());
    let project = match &progress.target_framework {
        Some(tfm) => format!("{} ({})", file, tfm),
        None => file,
    };
    let operation = progress.operation.as_str();

    if show_timing {
        format!(
            "{:<width$} {:<width$} {}",
            operation,
            format_elapsed(progress.elapsed),
            project,
            width = PROGRESS_COLUMN_WIDTH
        )
    } else {
        format!("{:<width$} {}", operation, project, width = PROGRESS_COLUMN_WIDTH)
    }
}

/// `m:ss.fffffff`
fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!(
        "{}:{:02}.{:07}",
        secs / 60,
        secs % 60,
        elapsed.subsec_nanos() / 100
    )
}
