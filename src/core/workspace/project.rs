//! Static evaluation of `.csproj` files.
//!
//! This covers what a design-time build needs to know to find a project's
//! sources: unconditional properties, `TargetFramework(s)`, SDK default compile
//! items and `Compile` items. Conditions are not evaluated; conditional
//! property groups, properties and items are ignored.

use std::{
    collections::BTreeSet,
    fs,
    path::{Component, Path, PathBuf},
    sync::LazyLock,
};

use colored::Colorize;
use glob::Pattern;
use indexmap::IndexMap;
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use regex::Regex;

use super::{
    file_scanner::{IgnoreSet, is_source_file, scan_generated_files, scan_source_files},
    solution::ProjectReference,
};
use crate::core::LoadError;

static PROPERTY_REF_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\(([A-Za-z_][A-Za-z0-9_.\-]*)\)").unwrap());

const DEFAULT_CONFIGURATION: &str = "Debug";

#[derive(Debug, Clone, PartialEq, Eq)]
enum CompileItem {
    Include(String),
    Remove(String),
}

/// An evaluated C# project.
#[derive(Debug, Clone)]
pub struct Project {
    pub name: String,
    pub path: PathBuf,
    /// Empty when the project does not declare a target framework.
    pub target_frameworks: Vec<String>,
    pub sdk_style: bool,
    /// Evaluated properties keyed by lowercase name (MSBuild names are case-insensitive).
    properties: IndexMap<String, String>,
    compile_items: Vec<CompileItem>,
}

impl Project {
    /// Read and evaluate the project file behind `reference`.
    ///
    /// `msbuild_path` backs `$(MSBuildBinPath)` and `$(MSBuildToolsPath)`.
    pub fn load(reference: &ProjectReference, msbuild_path: &Path) -> Result<Self, LoadError> {
        let path = &reference.path;
        let content = fs::read_to_string(path).map_err(|e| LoadError::project(path, e))?;
        Self::parse(&reference.name, path, &content, msbuild_path)
    }

    pub fn parse(
        name: &str,
        path: &Path,
        content: &str,
        msbuild_path: &Path,
    ) -> Result<Self, LoadError> {
        let dir = path.parent().unwrap_or(Path::new("."));
        let mut properties = IndexMap::new();
        let msbuild_dir = msbuild_path.to_string_lossy().into_owned();
        let project_dir = dir.to_string_lossy().into_owned();
        for (key, value) in [
            ("MSBuildProjectDirectory", project_dir.clone()),
            ("MSBuildThisFileDirectory", format!("{}/", project_dir)),
            ("MSBuildProjectName", file_stem(path)),
            ("MSBuildProjectFile", file_name(path)),
            ("MSBuildBinPath", msbuild_dir.clone()),
            ("MSBuildToolsPath", msbuild_dir),
            ("Configuration", DEFAULT_CONFIGURATION.to_string()),
        ] {
            properties.insert(key.to_ascii_lowercase(), value);
        }

        let parsed = parse_project_xml(content, &mut properties)
            .map_err(|reason| LoadError::project(path, reason))?;

        let target_frameworks = {
            let multi = split_list(properties.get("targetframeworks").map(String::as_str).unwrap_or(""));
            if multi.is_empty() {
                split_list(properties.get("targetframework").map(String::as_str).unwrap_or(""))
                    .into_iter()
                    .take(1)
                    .collect()
            } else {
                multi
            }
        };

        Ok(Self {
            name: name.to_string(),
            path: path.to_path_buf(),
            target_frameworks,
            sdk_style: parsed.sdk_style,
            properties,
            compile_items: parsed.compile_items,
        })
    }

    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// One entry per compilation: each target framework, or a single unnamed target.
    pub fn targets(&self) -> Vec<Option<String>> {
        if self.target_frameworks.is_empty() {
            vec![None]
        } else {
            self.target_frameworks.iter().cloned().map(Some).collect()
        }
    }

    fn default_compile_items_enabled(&self) -> bool {
        let disabled = |name: &str| {
            self.property(name)
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("false"))
        };
        self.sdk_style && !disabled("EnableDefaultItems") && !disabled("EnableDefaultCompileItems")
    }

    /// Source files of the compilation for `target_framework`, sorted.
    ///
    /// Default compile items come first, then `Compile` items in document
    /// order, then generated sources under the intermediate output path.
    /// Paths matched by `ignores` are dropped last.
    pub fn source_files(
        &self,
        target_framework: Option<&str>,
        ignores: &IgnoreSet,
        verbose: bool,
    ) -> Vec<PathBuf> {
        let dir = self.dir();
        let mut properties = self.properties.clone();
        if let Some(tfm) = target_framework {
            properties.insert("targetframework".to_string(), tfm.to_string());
        }

        let mut files = BTreeSet::new();
        if self.default_compile_items_enabled() {
            let scan = scan_source_files(dir, verbose);
            if scan.skipped_count > 0 {
                eprintln!(
                    "{} {} path(s) skipped in '{}' due to access errors{}",
                    "warning:".bold().yellow(),
                    scan.skipped_count,
                    dir.display(),
                    if verbose { "" } else { " (use -v for details)" }
                );
            }
            files.extend(scan.files);
        }

        for item in &self.compile_items {
            match item {
                CompileItem::Include(spec) => {
                    for part in split_list(&expand_properties(spec, &properties)) {
                        files.extend(resolve_include(dir, &part, verbose));
                    }
                }
                CompileItem::Remove(spec) => {
                    for part in split_list(&expand_properties(spec, &properties)) {
                        let target = normalize_path(&dir.join(part.replace('\\', "/")));
                        files.retain(|f| !matches_item(&target, f));
                    }
                }
            }
        }

        files.extend(scan_generated_files(&self.intermediate_output_dir(&properties)));

        files.into_iter().filter(|f| !ignores.is_ignored(f)).collect()
    }

    /// `IntermediateOutputPath`, defaulting to `obj/<Configuration>/`, with the
    /// target framework appended unless `AppendTargetFrameworkToOutputPath` is false.
    fn intermediate_output_dir(&self, properties: &IndexMap<String, String>) -> PathBuf {
        let base = match properties.get("intermediateoutputpath") {
            Some(path) => path.trim_end_matches(['/', '\\']).to_string(),
            None => {
                let base = properties
                    .get("baseintermediateoutputpath")
                    .map(String::as_str)
                    .unwrap_or("obj");
                let configuration = properties
                    .get("configuration")
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_CONFIGURATION);
                format!("{}/{}", base.trim_end_matches(['/', '\\']), configuration)
            }
        };
        let append_framework = !properties
            .get("appendtargetframeworktooutputpath")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("false"));
        let relative = match properties.get("targetframework").filter(|_| append_framework) {
            Some(tfm) => format!("{}/{}/", base, tfm),
            None => format!("{}/", base),
        };
        normalize_path(&self.dir().join(relative.replace('\\', "/")))
    }
}

struct ParsedProject {
    sdk_style: bool,
    compile_items: Vec<CompileItem>,
}

struct Frame {
    name: String,
    conditional: bool,
}

fn parse_project_xml(
    content: &str,
    properties: &mut IndexMap<String, String>,
) -> Result<ParsedProject, String> {
    let mut reader = Reader::from_str(content);
    let mut stack: Vec<Frame> = Vec::new();
    let mut parsed = ParsedProject {
        sdk_style: false,
        compile_items: Vec::new(),
    };
    let mut saw_root = false;
    // (name, text) of the property element currently open
    let mut property: Option<(String, String)> = None;

    loop {
        let event = reader.read_event().map_err(|e| e.to_string())?;
        match event {
            Event::Start(e) if !saw_root => {
                saw_root = true;
                stack.push(root_frame(&e, &mut parsed)?);
            }
            Event::Empty(e) if !saw_root => {
                saw_root = true;
                root_frame(&e, &mut parsed)?;
            }
            Event::Start(e) => {
                let frame = element_frame(&e, &stack)?;
                handle_element(&e, &frame, &stack, properties, &mut parsed, false)?;
                if parent_is(&stack, "PropertyGroup") {
                    property = Some((frame.name.clone(), String::new()));
                }
                stack.push(frame);
            }
            Event::Empty(e) => {
                let frame = element_frame(&e, &stack)?;
                handle_element(&e, &frame, &stack, properties, &mut parsed, true)?;
            }
            Event::Text(t) => {
                if let Some((_, text)) = property.as_mut() {
                    text.push_str(&t.unescape().map_err(|e| e.to_string())?);
                }
            }
            Event::CData(c) => {
                if let Some((_, text)) = property.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::End(_) => {
                let Some(frame) = stack.pop() else {
                    return Err("unbalanced end tag".to_string());
                };
                if parent_is(&stack, "PropertyGroup") {
                    if let Some((name, text)) = property.take() {
                        if !frame.conditional {
                            let value = expand_properties(text.trim(), properties);
                            properties.insert(name.to_ascii_lowercase(), value);
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err("missing <Project> root element".to_string());
    }
    if !stack.is_empty() {
        return Err("unexpected end of file".to_string());
    }
    Ok(parsed)
}

fn root_frame(e: &BytesStart<'_>, parsed: &mut ParsedProject) -> Result<Frame, String> {
    if local_name(e) != "Project" {
        return Err("root element is not <Project>".to_string());
    }
    parsed.sdk_style = attribute(e, "Sdk")?.is_some_and(|s| !s.trim().is_empty());
    Ok(Frame {
        name: "Project".to_string(),
        conditional: has_condition(e)?,
    })
}

fn element_frame(e: &BytesStart<'_>, stack: &[Frame]) -> Result<Frame, String> {
    let inherited = stack.last().is_some_and(|f| f.conditional);
    Ok(Frame {
        name: local_name(e),
        conditional: inherited || has_condition(e)?,
    })
}

fn handle_element(
    e: &BytesStart<'_>,
    frame: &Frame,
    stack: &[Frame],
    properties: &mut IndexMap<String, String>,
    parsed: &mut ParsedProject,
    is_empty: bool,
) -> Result<(), String> {
    match frame.name.as_str() {
        "Sdk" if parent_is(stack, "Project") => parsed.sdk_style = true,
        "Import" if attribute(e, "Sdk")?.is_some() => parsed.sdk_style = true,
        "Compile" if parent_is(stack, "ItemGroup") && !frame.conditional => {
            if let Some(include) = attribute(e, "Include")? {
                parsed.compile_items.push(CompileItem::Include(include));
            }
            if let Some(remove) = attribute(e, "Remove")? {
                parsed.compile_items.push(CompileItem::Remove(remove));
            }
        }
        name if is_empty && parent_is(stack, "PropertyGroup") && !frame.conditional => {
            properties.insert(name.to_ascii_lowercase(), String::new());
        }
        _ => {}
    }
    Ok(())
}

fn parent_is(stack: &[Frame], name: &str) -> bool {
    stack.last().is_some_and(|f| f.name == name)
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn has_condition(e: &BytesStart<'_>) -> Result<bool, String> {
    Ok(attribute(e, "Condition")?.is_some_and(|c| !c.trim().is_empty()))
}

fn attribute(e: &BytesStart<'_>, name: &str) -> Result<Option<String>, String> {
    let Some(attr) = e.try_get_attribute(name).map_err(|e| e.to_string())? else {
        return Ok(None);
    };
    let value = attr.unescape_value().map_err(|e| e.to_string())?;
    Ok(Some(value.into_owned()))
}

/// Replace `$(Name)` references; undefined properties expand to an empty string.
pub fn expand_properties(value: &str, properties: &IndexMap<String, String>) -> String {
    PROPERTY_REF_REGEX
        .replace_all(value, |caps: &regex::Captures<'_>| {
            properties
                .get(&caps[1].to_ascii_lowercase())
                .cloned()
                .unwrap_or_default()
        })
        .into_owned()
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn resolve_include(dir: &Path, spec: &str, verbose: bool) -> Vec<PathBuf> {
    let full = normalize_path(&dir.join(spec.replace('\\', "/")));
    let is_glob = spec.contains('*') || spec.contains('?');

    if is_glob {
        return match glob::glob(&full.to_string_lossy()) {
            Ok(paths) => paths
                .flatten()
                .filter(|p| p.is_file() && is_source_file(p))
                .map(|p| normalize_path(&p))
                .collect(),
            Err(e) => {
                if verbose {
                    eprintln!(
                        "{} Invalid Compile pattern '{}': {}",
                        "warning:".bold().yellow(),
                        spec,
                        e
                    );
                }
                Vec::new()
            }
        };
    }

    if full.is_file() {
        vec![full]
    } else {
        if verbose {
            eprintln!(
                "{} Compile item does not exist: {}",
                "warning:".bold().yellow(),
                full.display()
            );
        }
        Vec::new()
    }
}

fn matches_item(target: &Path, file: &Path) -> bool {
    let target_str = target.to_string_lossy();
    if target_str.contains('*') || target_str.contains('?') {
        Pattern::new(&target_str).is_ok_and(|p| p.matches_path(file))
    } else {
        target == file
    }
}

/// Lexically resolve `.` and `..` components.
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
