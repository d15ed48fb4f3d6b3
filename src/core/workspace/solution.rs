//! Solution descriptor parsing (`.sln` and `.slnx`).

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use quick_xml::{Reader, events::Event};
use regex::Regex;

use crate::core::LoadError;

const SOLUTION_HEADER: &str = "Microsoft Visual Studio Solution File";

// Project("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}") = "Name", "src\Name\Name.csproj", "{GUID}"
static PROJECT_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*Project\("\{[^}]*\}"\)\s*=\s*"([^"]*)"\s*,\s*"([^"]*)"\s*,\s*"\{[^}]*\}""#)
        .unwrap()
});

/// A project entry of a solution file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectReference {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Solution {
    pub path: PathBuf,
    /// C# projects in solution order.
    pub projects: Vec<ProjectReference>,
}

impl Solution {
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }
}

pub fn load_solution(path: &Path) -> Result<Solution, LoadError> {
    if !path.is_file() {
        return Err(LoadError::solution(path, "file does not exist"));
    }
    let content = fs::read_to_string(path).map_err(|e| LoadError::solution(path, e))?;
    let solution_dir = path.parent().unwrap_or(Path::new("."));

    let is_slnx = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("slnx"));
    let projects = if is_slnx {
        parse_slnx(&content, solution_dir).map_err(|e| LoadError::solution(path, e))?
    } else {
        if !content.contains(SOLUTION_HEADER) {
            return Err(LoadError::solution(path, "not a Visual Studio solution file"));
        }
        parse_sln(&content, solution_dir)
    };

    Ok(Solution {
        path: path.to_path_buf(),
        projects: dedupe(projects),
    })
}

/// Read the `Project(...)` lines of a classic solution file.
///
/// Solution folders and non-C# projects are skipped.
pub fn parse_sln(content: &str, solution_dir: &Path) -> Vec<ProjectReference> {
    content
        .lines()
        .filter_map(|line| PROJECT_LINE_REGEX.captures(line))
        .filter_map(|caps| {
            let relative = &caps[2];
            is_csharp_project(relative).then(|| ProjectReference {
                name: caps[1].to_string(),
                path: resolve_project_path(solution_dir, relative),
            })
        })
        .collect()
}

/// Read the `<Project Path="..."/>` elements of an XML solution file.
pub fn parse_slnx(content: &str, solution_dir: &Path) -> Result<Vec<ProjectReference>, quick_xml::Error> {
    let mut reader = Reader::from_str(content);
    let mut projects = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"Project" => {
                let Some(attr) = e.try_get_attribute("Path")? else {
                    continue;
                };
                let relative = attr.unescape_value()?.into_owned();
                if !is_csharp_project(&relative) {
                    continue;
                }
                let path = resolve_project_path(solution_dir, &relative);
                let name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                projects.push(ProjectReference { name, path });
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(projects)
}

fn is_csharp_project(relative: &str) -> bool {
    relative.to_ascii_lowercase().ends_with(".csproj")
}

fn resolve_project_path(solution_dir: &Path, relative: &str) -> PathBuf {
    solution_dir.join(relative.replace('\\', "/"))
}

fn dedupe(projects: Vec<ProjectReference>) -> Vec<ProjectReference> {
    let mut seen = HashSet::new();
    projects
        .into_iter()
        .filter(|p| seen.insert(p.path.clone()))
        .collect()
}
