//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::Parser;

/// Report localized strings whose text is duplicated across the resource
/// files of a .NET solution.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    /// Solution file (.sln or .slnx) to analyze
    #[arg(required_unless_present = "list_toolchains")]
    pub solution: Option<PathBuf>,

    /// MSBuild directory or dotnet root to use (overrides config file)
    #[arg(long, value_name = "PATH")]
    pub msbuild_path: Option<PathBuf>,

    /// Use the SDK with exactly this version instead of the newest one
    #[arg(long, value_name = "VERSION")]
    pub sdk_version: Option<String>,

    /// List discovered MSBuild instances and exit
    #[arg(long)]
    pub list_toolchains: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
