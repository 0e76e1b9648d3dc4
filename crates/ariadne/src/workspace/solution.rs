//! Solution and project manifest discovery.
//!
//! This module finds the projects of a C# workspace without MSBuild. It
//! supports three entry points:
//!
//! 1. A `.sln` file: every `Project(...) = "Name", "path.csproj", ...` line
//! 2. A `.csproj` file: that single project
//! 3. A directory: its only `.sln`, else every `.csproj` below it, else the
//!    directory itself as one project
//!
//! Manifests are scanned with regular expressions for the two items that
//! matter to navigation: `<Compile Include>` and `<ProjectReference Include>`.
//! A manifest that can't be read becomes a [`LoadDiagnostic`], never an error.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, LoadDiagnostic, Result};

static SOLUTION_PROJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*Project\("\{[^}]*\}"\)\s*=\s*"([^"]+)"\s*,\s*"([^"]+)""#)
        .expect("Invalid regex")
});

static COMPILE_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<Compile\s+Include\s*=\s*"([^"]+)""#)
        .expect("Invalid regex")
});

static PROJECT_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<ProjectReference\s+Include\s*=\s*"([^"]+)""#)
        .expect("Invalid regex")
});

/// A project as described by the files on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProjectManifest {
    pub name: String,
    /// The `.csproj`, when the project has one
    pub path: Option<PathBuf>,
    /// Source files, absolute, in load order
    pub sources: Vec<PathBuf>,
    /// Referenced `.csproj` files, absolute
    pub references: Vec<PathBuf>,
}

/// Everything discovered for one workspace path.
#[derive(Debug)]
pub(crate) struct Discovery {
    /// Directory relative paths are reported against
    pub root: PathBuf,
    pub projects: Vec<ProjectManifest>,
    pub diagnostics: Vec<LoadDiagnostic>,
}

/// Discover the projects behind a solution, project or directory path.
///
/// # Errors
///
/// Returns [`Error::Workspace`] when the path does not exist or the solution
/// file itself can't be read.
pub(crate) fn discover(path: &Path, config: &Config) -> Result<Discovery> {
    let path = path.canonicalize().map_err(|e| Error::Workspace {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut diagnostics = Vec::new();
    let (root, manifests) = if path.is_dir() {
        let solutions = files_with_extension(&path, "sln")?;
        if let [solution] = solutions.as_slice() {
            (path.clone(), solution_manifests(solution)?)
        } else {
            let mut projects = Vec::new();
            walk_dir(&path, "csproj", config, false, &mut projects);
            projects.sort();
            (path.clone(), projects)
        }
    } else {
        let root = path.parent().map_or_else(|| path.clone(), Path::to_path_buf);
        match extension_of(&path) {
            Some(ext) if ext.eq_ignore_ascii_case("sln") => (root, solution_manifests(&path)?),
            Some(ext) if ext.eq_ignore_ascii_case("csproj") => (root, vec![path.clone()]),
            _ => {
                return Err(Error::Workspace {
                    path,
                    message: "expected a .sln, a .csproj or a directory".to_string(),
                });
            }
        }
    };

    let mut projects = Vec::new();
    for manifest in manifests {
        match read_manifest(&manifest, config) {
            Ok(project) => projects.push(project),
            Err(diagnostic) => {
                warn!(
                    path = %diagnostic.path.display(),
                    error = %diagnostic.message,
                    "Skipping unreadable project"
                );
                diagnostics.push(diagnostic);
            }
        }
    }

    if projects.is_empty() && diagnostics.is_empty() && path.is_dir() {
        // Loose sources: the directory is the project
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("workspace")
            .to_string();
        let mut sources = Vec::new();
        walk_dir(&path, "cs", config, false, &mut sources);
        sources.sort();
        projects.push(ProjectManifest {
            name,
            path: None,
            sources,
            references: Vec::new(),
        });
    }

    debug!(
        root = %root.display(),
        projects = projects.len(),
        skipped = diagnostics.len(),
        "Discovered projects"
    );

    Ok(Discovery {
        root,
        projects,
        diagnostics,
    })
}

/// `.csproj` paths listed in a solution file, in solution order.
fn solution_manifests(solution: &Path) -> Result<Vec<PathBuf>> {
    let content = std::fs::read_to_string(solution).map_err(|e| Error::Workspace {
        path: solution.to_path_buf(),
        message: e.to_string(),
    })?;
    let dir = solution.parent().unwrap_or(Path::new("."));
    Ok(parse_solution(&content)
        .into_iter()
        .map(|(_, relative)| dir.join(relative))
        .collect())
}

/// `(name, relative path)` of each project entry. Solution folders and
/// other non-C# entries are left out.
pub(crate) fn parse_solution(content: &str) -> Vec<(String, PathBuf)> {
    SOLUTION_PROJECT
        .captures_iter(content)
        .filter(|c| c[2].to_ascii_lowercase().ends_with(".csproj"))
        .map(|c| (c[1].to_string(), normalize_separators(&c[2])))
        .collect()
}

/// Items of a project manifest that navigation cares about.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ManifestItems {
    /// Explicit `<Compile Include>` paths, wildcards left out
    pub compile: Vec<PathBuf>,
    pub references: Vec<PathBuf>,
}

pub(crate) fn parse_manifest(content: &str) -> ManifestItems {
    let compile = COMPILE_ITEM
        .captures_iter(content)
        .map(|c| c[1].to_string())
        .filter(|include| !include.contains('*'))
        .map(|include| normalize_separators(&include))
        .collect();
    let references = PROJECT_REFERENCE
        .captures_iter(content)
        .map(|c| normalize_separators(&c[1]))
        .collect();
    ManifestItems {
        compile,
        references,
    }
}

fn read_manifest(path: &Path, config: &Config) -> std::result::Result<ProjectManifest, LoadDiagnostic> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| LoadDiagnostic::manifest_unreadable(path.to_path_buf(), e.to_string()))?;
    let Some(dir) = path.parent() else {
        return Err(LoadDiagnostic::manifest_unreadable(
            path.to_path_buf(),
            "project file has no parent directory",
        ));
    };
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    let items = parse_manifest(&content);
    let sources = if items.compile.is_empty() {
        let mut sources = Vec::new();
        walk_dir(dir, "cs", config, true, &mut sources);
        sources.sort();
        sources
    } else {
        items.compile.iter().map(|c| lexical_join(dir, c)).collect()
    };
    let references = items
        .references
        .iter()
        .map(|r| lexical_join(dir, r))
        .collect();

    debug!(project = %name, documents = sources.len(), "Read project manifest");

    Ok(ProjectManifest {
        name,
        path: Some(path.to_path_buf()),
        sources,
        references,
    })
}

/// Recursively collect files with `extension` under `dir`.
///
/// Hidden and excluded directories are skipped. With `stop_at_projects`,
/// subdirectories holding their own `.csproj` are left to that project.
/// Unreadable directories are logged and skipped.
pub(crate) fn walk_dir(
    dir: &Path,
    extension: &str,
    config: &Config,
    stop_at_projects: bool,
    files: &mut Vec<PathBuf>,
) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            warn!(
                directory = %dir.display(),
                error = %e,
                "Cannot read directory, skipping"
            );
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(
                    directory = %dir.display(),
                    error = %e,
                    "Failed to read directory entry, skipping"
                );
                continue;
            }
        };
        let path = entry.path();

        if path.is_dir() {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.starts_with('.') || config.is_excluded_dir(name) {
                continue;
            }
            if stop_at_projects && files_with_extension(&path, "csproj").is_ok_and(|p| !p.is_empty()) {
                continue;
            }
            walk_dir(&path, extension, config, stop_at_projects, files);
        } else if path.is_file()
            && extension_of(&path).is_some_and(|e| e.eq_ignore_ascii_case(extension))
        {
            files.push(path);
        }
    }
}

/// Files directly inside `dir` with `extension`, sorted.
fn files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut found: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && extension_of(p).is_some_and(|e| e.eq_ignore_ascii_case(extension)))
        .collect();
    found.sort();
    Ok(found)
}

fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

/// Manifests use `\` separators regardless of platform.
fn normalize_separators(path: &str) -> PathBuf {
    PathBuf::from(path.replace('\\', "/"))
}

/// Join and fold `..` segments without touching the file system.
fn lexical_join(base: &Path, relative: &Path) -> PathBuf {
    use std::path::Component;

    let mut joined = PathBuf::new();
    for component in base.join(relative).components() {
        match component {
            Component::ParentDir => {
                joined.pop();
            }
            Component::CurDir => {}
            other => joined.push(other),
        }
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOLUTION: &str = r#"
Microsoft Visual Studio Solution File, Format Version 12.00
Project("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}") = "Shop", "src\Shop\Shop.csproj", "{11111111-1111-1111-1111-111111111111}"
EndProject
Project("{2150E333-8FDC-42A3-9474-1A3956D46DE8}") = "Solution Items", "Solution Items", "{22222222-2222-2222-2222-222222222222}"
EndProject
Project("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}") = "Shop.Tests", "tests\Shop.Tests\Shop.Tests.csproj", "{33333333-3333-3333-3333-333333333333}"
EndProject
"#;

    #[test]
    fn solution_lists_csharp_projects_in_order() {
        let projects = parse_solution(SOLUTION);

        assert_eq!(projects, vec![
            ("Shop".to_string(), PathBuf::from("src/Shop/Shop.csproj")),
            (
                "Shop.Tests".to_string(),
                PathBuf::from("tests/Shop.Tests/Shop.Tests.csproj")
            ),
        ]);
    }

    #[test]
    fn manifest_items_skip_wildcards() {
        let items = parse_manifest(
            r#"<Project Sdk="Microsoft.NET.Sdk">
  <ItemGroup>
    <Compile Include="Models\Order.cs" />
    <Compile Include="Generated\**\*.cs" />
    <ProjectReference Include="..\Shop\Shop.csproj" />
  </ItemGroup>
</Project>"#,
        );

        assert_eq!(items.compile, vec![PathBuf::from("Models/Order.cs")]);
        assert_eq!(items.references, vec![PathBuf::from("../Shop/Shop.csproj")]);
    }

    #[test]
    fn lexical_join_folds_parent_segments() {
        let joined = lexical_join(Path::new("/work/tests/Shop.Tests"), Path::new("../../src/Shop/Shop.csproj"));

        assert_eq!(joined, PathBuf::from("/work/src/Shop/Shop.csproj"));
    }

    #[test]
    fn project_sources_stop_at_nested_projects() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let root = dir.path();
        std::fs::create_dir_all(root.join("Nested")).expect("should create dir");
        std::fs::create_dir_all(root.join("obj")).expect("should create dir");
        std::fs::write(root.join("App.csproj"), "<Project />").expect("should write");
        std::fs::write(root.join("Program.cs"), "class Program { }").expect("should write");
        std::fs::write(root.join("obj/Generated.cs"), "class Generated { }").expect("should write");
        std::fs::write(root.join("Nested/Nested.csproj"), "<Project />").expect("should write");
        std::fs::write(root.join("Nested/Inner.cs"), "class Inner { }").expect("should write");

        let discovery = discover(&root.join("App.csproj"), &Config::default()).expect("should discover");

        assert_eq!(discovery.projects.len(), 1);
        let sources: Vec<_> = discovery.projects[0]
            .sources
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(sources, vec!["Program.cs"]);
    }

    #[test]
    fn unreadable_project_becomes_diagnostic() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        std::fs::write(
            dir.path().join("Broken.sln"),
            "Project(\"{FAE04EC0}\") = \"Missing\", \"Missing\\Missing.csproj\", \"{1}\"\n",
        )
        .expect("should write");

        let discovery = discover(dir.path(), &Config::default()).expect("load should not fail");

        assert!(discovery.projects.is_empty());
        assert_eq!(discovery.diagnostics.len(), 1);
        assert!(discovery.diagnostics[0].kind.is_input_error());
    }

    #[test]
    fn directory_without_projects_is_one_project() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        std::fs::write(dir.path().join("Loose.cs"), "class Loose { }").expect("should write");

        let discovery = discover(dir.path(), &Config::default()).expect("should discover");

        assert_eq!(discovery.projects.len(), 1);
        assert!(discovery.projects[0].path.is_none());
        assert_eq!(discovery.projects[0].sources.len(), 1);
    }
}
