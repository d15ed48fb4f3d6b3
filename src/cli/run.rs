use std::{
    env, fs,
    path::{self, Path, PathBuf},
};

use anyhow::{Context, Result};
use colored::Colorize;

use super::{
    args::Arguments,
    exit_status::ExitStatus,
    report::{
        self, ConsoleProgressReporter, print_compilations_unavailable, print_finished_loading,
        print_loading_solution, print_using_msbuild,
    },
};
use crate::{
    config::{ConfigLoadResult, load_config},
    core::{
        build_table,
        toolchain::ToolchainLocator,
        workspace::{IgnoreSet, Workspace},
    },
};

/// Load the solution, scan its compilations and report duplicate resource values.
///
/// # Returns
/// - `Success` when no value is shared, `Failure` when duplicates were reported
/// - `Error` when compilations could not be retrieved
/// - `Err` for fatal errors (config, toolchain, solution file)
pub fn run(args: Arguments) -> Result<ExitStatus> {
    let verbose = args.verbose;
    let start_dir = match args.solution.as_deref() {
        Some(solution) => parent_dir(solution),
        None => env::current_dir().context("Failed to read the current directory")?,
    };
    let start_dir = fs::canonicalize(&start_dir).unwrap_or(start_dir);
    let ConfigLoadResult {
        config,
        path: config_path,
    } = load_config(&start_dir)?;
    if let Some(path) = config_path.as_deref().filter(|_| verbose) {
        eprintln!("{} Using config file '{}'", "note:".bold().cyan(), path.display());
    }

    let explicit_path = args.msbuild_path.clone().or_else(|| {
        let configured = PathBuf::from(config.msbuild_path.as_deref()?);
        let config_dir = config_path.as_deref().map(parent_dir).unwrap_or_default();
        Some(config_dir.join(configured))
    });
    let locator = ToolchainLocator::from_env().with_explicit_path(explicit_path);

    if args.list_toolchains {
        let instances = locator.query_instances();
        report::print_toolchains(&instances);
        return Ok(if instances.is_empty() {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        });
    }

    let solution = args
        .solution
        .context("A solution file is required unless --list-toolchains is given")?;

    let toolchain = locator.locate(args.sdk_version.as_deref())?;
    print_using_msbuild(&toolchain.msbuild_path);

    // Printed as given, loaded as absolute so diagnostics name full paths.
    let solution_path = path::absolute(&solution).unwrap_or_else(|_| solution.clone());

    let ignores = IgnoreSet::new(&parent_dir(&solution_path), &config.ignores, verbose);
    let progress = ConsoleProgressReporter::from_env();
    let mut workspace = Workspace::new(toolchain, ignores, verbose);
    if verbose {
        workspace = workspace.with_progress(&progress);
    }

    print_loading_solution(&solution);
    let loaded = workspace.open_solution(&solution_path)?;
    print_finished_loading(&solution);

    let compilations = match workspace.compilations(&loaded) {
        Ok(compilations) if !compilations.is_empty() => compilations,
        Ok(_) => {
            print_compilations_unavailable();
            if verbose {
                eprintln!(
                    "{} '{}' contains no C# projects",
                    "note:".bold().cyan(),
                    solution.display()
                );
            }
            return Ok(ExitStatus::Error);
        }
        Err(err) => {
            print_compilations_unavailable();
            if verbose {
                eprintln!("{} {:#}", "warning:".bold().yellow(), anyhow::Error::from(err));
            }
            return Ok(ExitStatus::Error);
        }
    };

    let table = build_table(&compilations);
    let groups = table.duplicates();

    report::report_duplicates(&groups);
    report::print_summary(&groups, table.len(), verbose);

    Ok(ExitStatus::from_duplicates(groups.len()))
}

/// Directory containing `path`; `.` for a bare file name.
fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
