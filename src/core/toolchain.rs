//! Discovery and selection of installed MSBuild toolchains.
//!
//! A toolchain instance is an SDK directory (`<dotnet root>/sdk/<version>/`)
//! that ships `MSBuild.dll`. Roots are searched in a fixed order so the
//! selected instance is stable for a given host:
//!
//! 1. an explicit path (`--msbuild-path` or `msbuildPath` in the config file),
//!    which disables every other source
//! 2. `$DOTNET_ROOT`
//! 3. each `dotnet` executable found on `$PATH`
//! 4. the well-known install locations for the platform
//!
//! Inside one root, SDK versions are ordered newest first.

use std::{
    cmp::Ordering,
    collections::HashSet,
    env, fs,
    path::{Path, PathBuf},
};

use semver::Version;

use crate::core::LoadError;

/// File that marks an SDK directory as a usable MSBuild instance.
pub const MSBUILD_ASSEMBLY: &str = "MSBuild.dll";

const SDK_INSTANCE_NAME: &str = ".NET Core SDK";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainInstance {
    pub name: String,
    pub version: String,
    /// Directory holding `MSBuild.dll`.
    pub msbuild_path: PathBuf,
}

impl ToolchainInstance {
    fn from_sdk_dir(dir: &Path) -> Self {
        let version = dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name: SDK_INSTANCE_NAME.to_string(),
            version,
            msbuild_path: dir.to_path_buf(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ToolchainLocator {
    explicit: Option<PathBuf>,
    roots: Vec<PathBuf>,
}

impl ToolchainLocator {
    /// Locator that searches exactly the given dotnet roots.
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            explicit: None,
            roots,
        }
    }

    /// Locator over `$DOTNET_ROOT`, `$PATH` and the platform install locations.
    pub fn from_env() -> Self {
        let mut roots = Vec::new();

        if let Some(root) = env::var_os("DOTNET_ROOT").filter(|r| !r.is_empty()) {
            roots.push(PathBuf::from(root));
        }

        if let Some(path) = env::var_os("PATH") {
            roots.extend(env::split_paths(&path).filter_map(|dir| dotnet_root_in(&dir)));
        }

        roots.extend(default_roots());
        Self::new(roots)
    }

    /// Restrict discovery to `path`: either an MSBuild directory, the
    /// `MSBuild.dll` file itself, or a dotnet root containing `sdk/`.
    pub fn with_explicit_path(mut self, path: Option<PathBuf>) -> Self {
        self.explicit = path;
        self
    }

    /// All usable instances in discovery order.
    pub fn query_instances(&self) -> Vec<ToolchainInstance> {
        if let Some(explicit) = &self.explicit {
            return explicit_instances(explicit);
        }

        let mut seen = HashSet::new();
        self.roots
            .iter()
            .filter(|root| seen.insert(fs::canonicalize(root).unwrap_or_else(|_| (*root).clone())))
            .flat_map(|root| sdk_instances(root))
            .collect()
    }

    /// Select the first instance, or the one whose version equals `version`.
    pub fn locate(&self, version: Option<&str>) -> Result<ToolchainInstance, LoadError> {
        select_instance(self.query_instances(), version).ok_or_else(|| {
            let reason = match (&self.explicit, version) {
                (Some(path), _) => format!("'{}' does not contain {}", path.display(), MSBUILD_ASSEMBLY),
                (None, Some(version)) => format!("SDK version '{}' is not installed", version),
                (None, None) => "install the .NET SDK, set DOTNET_ROOT or pass --msbuild-path".to_string(),
            };
            LoadError::ToolchainNotFound(reason)
        })
    }
}

/// Pick an instance without prompting: an exact version match when one is
/// requested, the first discovered instance otherwise.
pub fn select_instance(
    instances: Vec<ToolchainInstance>,
    version: Option<&str>,
) -> Option<ToolchainInstance> {
    match version {
        Some(version) => instances.into_iter().find(|i| i.version == version),
        None => instances.into_iter().next(),
    }
}

fn explicit_instances(path: &Path) -> Vec<ToolchainInstance> {
    let dir = if path.is_file() { path.parent() } else { Some(path) };
    match dir {
        Some(dir) if dir.join(MSBUILD_ASSEMBLY).is_file() => {
            vec![ToolchainInstance::from_sdk_dir(dir)]
        }
        Some(dir) => sdk_instances(dir),
        None => Vec::new(),
    }
}

fn sdk_instances(root: &Path) -> Vec<ToolchainInstance> {
    let Ok(entries) = fs::read_dir(root.join("sdk")) else {
        return Vec::new();
    };

    let mut instances: Vec<ToolchainInstance> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|dir| dir.join(MSBUILD_ASSEMBLY).is_file())
        .map(|dir| ToolchainInstance::from_sdk_dir(&dir))
        .collect();
    instances.sort_by(|a, b| compare_versions(&b.version, &a.version));
    instances
}

fn dotnet_root_in(dir: &Path) -> Option<PathBuf> {
    ["dotnet", "dotnet.exe"]
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
        .and_then(|exe| fs::canonicalize(exe).ok())
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

fn default_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();

    if let Some(home) = env::var_os("HOME").or_else(|| env::var_os("USERPROFILE")) {
        roots.push(PathBuf::from(home).join(".dotnet"));
    }

    if cfg!(windows) {
        for var in ["ProgramFiles", "ProgramFiles(x86)"] {
            if let Some(dir) = env::var_os(var) {
                roots.push(PathBuf::from(dir).join("dotnet"));
            }
        }
    } else {
        roots.extend(
            [
                "/usr/local/share/dotnet",
                "/usr/share/dotnet",
                "/usr/lib/dotnet",
                "/opt/dotnet",
            ]
            .map(PathBuf::from),
        );
    }

    roots
}

/// Compare SDK versions such as `8.0.100` and `9.0.100-preview.1`.
///
/// Versions are ordered by semver precedence, so `preview.10` is newer than
/// `preview.2`. Names that are not valid semver sort before every valid one
/// and compare as plain strings among themselves.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (Version::parse(a), Version::parse(b)) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        (Ok(_), Err(_)) => Ordering::Greater,
        (Err(_), Ok(_)) => Ordering::Less,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
