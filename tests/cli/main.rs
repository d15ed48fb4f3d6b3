use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{Context, Ok, Result};
use insta_cmd::get_cargo_bin;
use tempfile::TempDir;

mod check;
mod toolchain;

const BIN_NAME: &str = "resxdup";

/// SDK version of the fake toolchain installed by [`CliTest::new`].
pub const SDK_VERSION: &str = "8.0.100";

/// Classic solution header, followed by project lines.
pub const SLN_HEADER: &str = "\nMicrosoft Visual Studio Solution File, Format Version 12.00\n# Visual Studio Version 17\n";

pub struct CliTest {
    _temp_dir: TempDir,
    project_dir: PathBuf,
}

/// Captured result of running the binary, with the temp dir replaced by `[ROOT]`.
pub struct Outcome {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CliTest {
    /// Empty workspace with a fake dotnet root at `dotnet/`.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().canonicalize()?;
        let test = Self {
            _temp_dir: temp_dir,
            project_dir,
        };
        test.write_file(&format!("dotnet/sdk/{}/MSBuild.dll", SDK_VERSION), "")?;
        Ok(test)
    }

    pub fn with_file(path: &str, content: &str) -> Result<Self> {
        let test = Self::new()?;
        test.write_file(path, content)?;
        Ok(test)
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.project_dir.join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory:{}", parent.display()))?;
        }

        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;

        Ok(())
    }

    /// Write `App.sln` listing the given `(name, relative path)` projects.
    pub fn write_solution(&self, projects: &[(&str, &str)]) -> Result<()> {
        let mut content = SLN_HEADER.to_string();
        for (i, (name, path)) in projects.iter().enumerate() {
            content.push_str(&format!(
                "Project(\"{{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}}\") = \"{}\", \"{}\", \"{{00000000-0000-0000-0000-00000000000{}}}\"\nEndProject\n",
                name, path, i
            ));
        }
        self.write_file("App.sln", &content)
    }

    pub fn root(&self) -> &Path {
        &self.project_dir
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(get_cargo_bin(BIN_NAME));
        cmd.current_dir(&self.project_dir);
        cmd.env_clear();
        cmd.env("NO_COLOR", "1"); // Disable colors for consistent test output
        cmd.env("RESXDUP_DISABLE_TIMING", "1"); // Disable timing for stable output
        cmd.env("DOTNET_ROOT", self.project_dir.join("dotnet"));
        cmd
    }

    /// `resxdup App.sln`
    pub fn check_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("App.sln");
        cmd
    }

    pub fn run(&self, cmd: &mut Command) -> Result<Outcome> {
        let output = cmd.output().context("Failed to run resxdup")?;
        let root = self.project_dir.to_string_lossy().into_owned();
        let normalize = |bytes: &[u8]| {
            String::from_utf8_lossy(bytes)
                .replace(&root, "[ROOT]")
                .replace('\\', "/")
        };
        Ok(Outcome {
            code: output.status.code(),
            stdout: normalize(&output.stdout),
            stderr: normalize(&output.stderr),
        })
    }
}
