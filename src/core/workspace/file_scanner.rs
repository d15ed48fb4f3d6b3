use std::path::{Path, PathBuf};

use colored::Colorize;
use glob::Pattern;
use walkdir::WalkDir;

/// Directories that SDK-style projects never pick up as default compile items.
const DEFAULT_EXCLUDED_DIRS: &[&str] = &["bin", "obj"];

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// User-configured paths that never become part of a compilation.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    base_dir: PathBuf,
    literal_paths: Vec<PathBuf>,
    patterns: Vec<Pattern>,
}

impl IgnoreSet {
    /// Build from config patterns; literal entries are resolved against `base_dir`.
    pub fn new(base_dir: &Path, ignores: &[String], verbose: bool) -> Self {
        let mut set = Self {
            base_dir: base_dir.to_path_buf(),
            ..Self::default()
        };

        for p in ignores {
            if is_glob_pattern(p) {
                match Pattern::new(p) {
                    Ok(pattern) => set.patterns.push(pattern),
                    Err(e) => {
                        if verbose {
                            eprintln!(
                                "{} Invalid ignore pattern '{}': {}",
                                "warning:".bold().yellow(),
                                p,
                                e
                            );
                        }
                    }
                }
            } else {
                set.literal_paths.push(base_dir.join(p));
            }
        }

        set
    }

    /// Patterns are tried against the full path and the path relative to the base directory.
    pub fn is_ignored(&self, path: &Path) -> bool {
        if self.literal_paths.iter().any(|ignore| path.starts_with(ignore)) {
            return true;
        }
        let full = path.to_string_lossy().replace('\\', "/");
        let relative = path
            .strip_prefix(&self.base_dir)
            .ok()
            .map(|p| p.to_string_lossy().replace('\\', "/"));
        self.patterns.iter().any(|p| {
            p.matches(&full) || relative.as_deref().is_some_and(|r| p.matches(r))
        })
    }
}

/// Result of scanning a project directory.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub files: Vec<PathBuf>,
    pub skipped_count: usize,
}

/// Collect the default compile items of an SDK-style project: every `*.cs`
/// below `project_dir`, minus `bin/`, `obj/` and hidden directories at any depth.
///
/// Files come back sorted so compilations are reproducible.
pub fn scan_source_files(project_dir: &Path, verbose: bool) -> ScanResult {
    let mut files = Vec::new();
    let mut skipped_count = 0;

    let walker = WalkDir::new(project_dir)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_excluded_dir(entry, project_dir));

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                skipped_count += 1;
                if verbose {
                    eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                }
                continue;
            }
        };

        let path = entry.path();
        if entry.file_type().is_file() && is_source_file(path) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    ScanResult {
        files,
        skipped_count,
    }
}

/// Collect `*.cs` files below a generated-sources directory such as
/// `obj/Debug/net8.0/`. A missing directory yields no files.
pub fn scan_generated_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .flatten()
        .filter(|entry| entry.file_type().is_file() && is_source_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

fn is_excluded_dir(entry: &walkdir::DirEntry, project_dir: &Path) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return true;
    }
    entry.path().parent() == Some(project_dir) && DEFAULT_EXCLUDED_DIRS.contains(&name.as_ref())
}

pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("cs"))
}
