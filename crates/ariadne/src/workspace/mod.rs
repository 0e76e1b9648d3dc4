//! Loaded solutions: projects, documents and their compilations.
//!
//! A [`Workspace`] is loaded once and then only read. Documents parse on
//! first use and projects build their [`Compilation`] on first use, so a
//! query that touches one project never parses the others' sources.
//!
//! ## Failure model
//!
//! Nothing below the solution file fails a load. Unreadable manifests are
//! recorded when the workspace loads; unreadable or unparseable documents
//! are recorded when first touched. Both are reported by
//! [`Workspace::diagnostics`] and otherwise drop out of every scan.

mod cache;
pub(crate) mod solution;

pub use cache::WorkspaceCache;

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{LoadDiagnostic, Result};
use crate::frontend::{Compilation, SyntaxTree};

/// A source file and its lazily parsed tree.
#[derive(Debug)]
pub struct Document {
    path: PathBuf,
    tree: OnceLock<std::result::Result<Arc<SyntaxTree>, LoadDiagnostic>>,
}

impl Document {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            tree: OnceLock::new(),
        }
    }

    /// Absolute path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without directories.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
    }

    /// The parsed tree, or `None` when the file could not be read or parsed.
    pub fn syntax_tree(&self) -> Option<Arc<SyntaxTree>> {
        self.tree
            .get_or_init(|| {
                SyntaxTree::load(&self.path).map(Arc::new).inspect_err(|diagnostic| {
                    warn!(
                        path = %diagnostic.path.display(),
                        error = %diagnostic.message,
                        "Skipping document"
                    );
                })
            })
            .as_ref()
            .ok()
            .cloned()
    }

    fn diagnostic(&self) -> Option<&LoadDiagnostic> {
        self.tree.get().and_then(|r| r.as_ref().err())
    }
}

/// A project: named, ordered documents and one compilation.
#[derive(Debug)]
pub struct Project {
    name: String,
    path: Option<PathBuf>,
    documents: Vec<Document>,
    /// Indices of directly referenced projects
    references: Vec<usize>,
    compilation: OnceLock<Compilation>,
}

impl Project {
    /// Project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `.csproj`, if the project has one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Documents in project order.
    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    fn trees(&self) -> Vec<Arc<SyntaxTree>> {
        self.documents.iter().filter_map(Document::syntax_tree).collect()
    }

    fn file_stem(&self) -> Option<&str> {
        self.path.as_deref().and_then(Path::file_stem).and_then(|s| s.to_str())
    }
}

/// A loaded solution.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    config: Config,
    projects: Vec<Project>,
    load_diagnostics: Vec<LoadDiagnostic>,
}

impl Workspace {
    /// Load a workspace from a `.sln`, a `.csproj` or a directory.
    ///
    /// Configuration comes from `.ariadne.yaml` in the workspace root.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Workspace`] if the path doesn't exist or the
    /// solution file can't be read, and [`crate::Error::Config`] for a
    /// malformed configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let config_dir = if path.is_dir() {
            path.to_path_buf()
        } else {
            path.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf)
        };
        let config = Config::discover(&config_dir)?;
        Self::load_with_config(path, config)
    }

    /// Load a workspace with explicit configuration.
    ///
    /// # Errors
    ///
    /// Same as [`Workspace::load`], minus configuration errors.
    pub fn load_with_config(path: &Path, config: Config) -> Result<Self> {
        let discovery = solution::discover(path, &config)?;

        let manifest_paths: Vec<Option<PathBuf>> = discovery
            .projects
            .iter()
            .map(|p| p.path.clone())
            .collect();
        let projects = discovery
            .projects
            .into_iter()
            .map(|manifest| {
                let references = manifest
                    .references
                    .iter()
                    .filter_map(|reference| {
                        let found = manifest_paths
                            .iter()
                            .position(|p| p.as_deref().is_some_and(|p| same_file(p, reference)));
                        if found.is_none() {
                            debug!(
                                project = %manifest.name,
                                reference = %reference.display(),
                                "Project reference is not part of the workspace"
                            );
                        }
                        found
                    })
                    .collect();
                Project {
                    name: manifest.name,
                    path: manifest.path,
                    documents: manifest.sources.into_iter().map(Document::new).collect(),
                    references,
                    compilation: OnceLock::new(),
                }
            })
            .collect::<Vec<_>>();

        debug!(
            root = %discovery.root.display(),
            projects = projects.len(),
            documents = projects.iter().map(|p| p.documents.len()).sum::<usize>(),
            "Loaded workspace"
        );

        Ok(Self {
            root: discovery.root,
            config,
            projects,
            load_diagnostics: discovery.diagnostics,
        })
    }

    /// Directory results are reported relative to.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Effective configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Projects in workspace order.
    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Every project and document that dropped out so far.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<LoadDiagnostic> {
        let documents = self
            .projects
            .iter()
            .flat_map(|p| p.documents.iter())
            .filter_map(Document::diagnostic)
            .cloned();
        self.load_diagnostics.iter().cloned().chain(documents).collect()
    }

    /// The compilation of `project`: its own trees, then the trees of every
    /// project it references, transitively.
    pub fn compilation<'w>(&'w self, project: &'w Project) -> &'w Compilation {
        project.compilation.get_or_init(|| {
            let mut trees = project.trees();
            let own = trees.len();
            for referenced in self.referenced_projects(project) {
                trees.extend(referenced.trees());
            }
            debug!(project = %project.name, documents = own, "Binding project");
            Compilation::new(trees, own)
        })
    }

    /// Transitively referenced projects, nearest first, each once.
    fn referenced_projects<'w>(&'w self, project: &'w Project) -> Vec<&'w Project> {
        let mut seen = HashSet::new();
        let mut queue: VecDeque<usize> = project.references.iter().copied().collect();
        let mut found = Vec::new();
        while let Some(index) = queue.pop_front() {
            let Some(referenced) = self.projects.get(index) else {
                continue;
            };
            if std::ptr::eq(referenced, project) || !seen.insert(index) {
                continue;
            }
            found.push(referenced);
            queue.extend(referenced.references.iter().copied());
        }
        found
    }

    /// Find a document from an absolute, root-relative or cwd-relative path,
    /// falling back to a case-insensitive file name match.
    #[must_use]
    pub fn resolve_document_path(&self, input: &str) -> Option<(&Project, &Document)> {
        let given = Path::new(input);
        let mut attempts = Vec::new();
        if given.is_absolute() && given.exists() {
            attempts.push(given.to_path_buf());
        }
        let under_root = self.root.join(given);
        if under_root.exists() {
            attempts.push(under_root);
        }
        if let Ok(cwd) = std::env::current_dir() {
            let under_cwd = cwd.join(given);
            if under_cwd.exists() {
                attempts.push(under_cwd);
            }
        }

        for attempt in &attempts {
            let found = self.documents().find(|(_, d)| same_file(d.path(), attempt));
            if found.is_some() {
                return found;
            }
        }

        let file_name = given.file_name().and_then(|n| n.to_str())?;
        self.documents()
            .find(|(_, d)| d.file_name().eq_ignore_ascii_case(file_name))
    }

    /// Find a project by name or by its file stem, case-insensitively.
    #[must_use]
    pub fn find_project_by_name(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| {
            p.name.eq_ignore_ascii_case(name) || p.file_stem().is_some_and(|s| s.eq_ignore_ascii_case(name))
        })
    }

    /// `path` relative to the workspace root, with `/` separators.
    #[must_use]
    pub fn relative_path(&self, path: &Path) -> String {
        relative_path(path, &self.root)
    }

    /// Every document with its project, in workspace order.
    pub fn documents(&self) -> impl Iterator<Item = (&Project, &Document)> {
        self.projects
            .iter()
            .flat_map(|p| p.documents.iter().map(move |d| (p, d)))
    }
}

/// `absolute` relative to `root` with `/` separators. A path outside the
/// root comes back as given.
#[must_use]
pub fn relative_path(absolute: &Path, root: &Path) -> String {
    match absolute.strip_prefix(root) {
        Ok(relative) => relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => absolute.to_string_lossy().replace('\\', "/"),
    }
}

/// Path equality that tolerates differing spellings of the same file.
fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("should create parent dirs");
        }
        std::fs::write(path, content).expect("should write file");
    }

    fn two_project_solution() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let root = dir.path();
        write(
            root,
            "Shop.sln",
            concat!(
                "Project(\"{FAE04EC0}\") = \"Core\", \"Core\\Core.csproj\", \"{1}\"\nEndProject\n",
                "Project(\"{FAE04EC0}\") = \"App\", \"App\\App.csproj\", \"{2}\"\nEndProject\n",
            ),
        );
        write(root, "Core/Core.csproj", "<Project />");
        write(root, "Core/Order.cs", "namespace Core { public class Order { } }");
        write(
            root,
            "App/App.csproj",
            r#"<Project><ItemGroup><ProjectReference Include="..\Core\Core.csproj" /></ItemGroup></Project>"#,
        );
        write(root, "App/Program.cs", "using Core; class Program { Order _order; }");
        dir
    }

    #[test]
    fn compilation_includes_referenced_trees_after_own() {
        let dir = two_project_solution();
        let workspace = Workspace::load(&dir.path().join("Shop.sln")).expect("should load");

        let app = workspace.find_project_by_name("app").expect("project should exist");
        let compilation = workspace.compilation(app);

        assert_eq!(compilation.own_trees().len(), 1);
        assert_eq!(compilation.trees().len(), 2);
        assert!(compilation.trees()[1].path().ends_with("Core/Order.cs"));
    }

    #[test]
    fn documents_resolve_by_relative_path_and_file_name() {
        let dir = two_project_solution();
        let workspace = Workspace::load(&dir.path().join("Shop.sln")).expect("should load");

        let (project, document) = workspace
            .resolve_document_path("Core/Order.cs")
            .expect("relative path should resolve");
        assert_eq!(project.name(), "Core");
        assert_eq!(workspace.relative_path(document.path()), "Core/Order.cs");

        let (_, by_name) = workspace
            .resolve_document_path("program.CS")
            .expect("file name fallback should resolve");
        assert_eq!(by_name.file_name(), "Program.cs");

        assert!(workspace.resolve_document_path("Missing.cs").is_none());
    }

    #[test]
    fn relative_path_outside_root_is_unchanged() {
        let path = Path::new("/elsewhere/File.cs");

        assert_eq!(relative_path(path, Path::new("/work")), "/elsewhere/File.cs");
        assert_eq!(relative_path(Path::new("/work/a/b.cs"), Path::new("/work")), "a/b.cs");
    }
}
