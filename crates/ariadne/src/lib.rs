//! # Ariadne: Cross-Reference Navigation for C# Solutions
//!
//! Ariadne answers structural questions about a multi-project C# codebase:
//! where a symbol is declared, who calls a method, what implements an
//! interface, which types derive from a class. It parses sources with
//! tree-sitter, binds them through a lightweight frontend, and returns
//! deterministic, serializable records.
//!
//! ## Design Philosophy
//!
//! - **Semantic, not textual** - a reference counts only when it binds to the target symbol
//! - **Text first, bind second** - files that never mention a name are skipped before binding
//! - **First match wins** - ambiguous names resolve to the first declaration in workspace order
//! - **Best effort loading** - broken projects and documents drop out; queries still run
//! - **Embeddable** - Library first, CLI second
//!
//! ## Quick Start
//!
//! ```no_run
//! use ariadne::{Navigator, WorkspaceCache};
//! use std::path::Path;
//!
//! let cache = WorkspaceCache::new();
//! let navigator = Navigator::open(&cache, Path::new("/path/to/Shop.sln"))?;
//!
//! let callers = navigator.find_callers("Calculator.Add")?;
//! println!("{} callers", callers.total_count);
//!
//! let hierarchy = navigator.get_hierarchy("ScientificCalculator")?;
//! println!("bases: {:?}", hierarchy.base_types);
//! # Ok::<(), ariadne::Error>(())
//! ```

mod config;
mod error;
mod features;
pub mod frontend;
mod query;
mod types;
mod workspace;

pub use config::{CONFIG_FILE_NAME, Config};
pub use error::{Error, ErrorKind, LoadDiagnostic, LoadDiagnosticKind, Result};
pub use features::{LineKind, parse_feature, scan_features};
pub use query::attributes::{STEP_KEYWORDS, attribute_name_matches, short_attribute_name, step_scope};
pub use types::{
    Accessibility, AttributeMatch, AttributeSearchResult, CallerInfo, CallersResult, ClassInfo,
    ClassListResult, ClassStructure, ConstructorDepsResult, ConstructorInfo, ConstructorParameter,
    DeclKind, Feature, FeatureScenariosResult, FeatureSummary, HierarchyResult,
    ImplementationResult, InjectionKind, InjectionSite, InstantiationInfo, InstantiationResult,
    InterfaceConsumersResult, LineRange, MemberInfo, MethodInfo, MethodResult, MethodsResult,
    Modifier, Modifiers, NamespaceInfo, NamespaceStructureResult, OverridableResult,
    ParameterInfo, Scenario, StepDefinition, StepDefinitionResult, SymbolLocation,
    SymbolSearchResult, TypeLocation, UsageInfo, UsageResult,
};
pub use workspace::{Document, Project, Workspace, WorkspaceCache};

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use query::{attributes, dependencies, hierarchy, outline, references};

/// Query interface over one loaded workspace.
///
/// A `Navigator` is cheap to create: it holds a shared handle to a
/// [`Workspace`] and the pre-filter setting. Every query rebuilds its
/// result from the workspace; nothing is cached between calls beyond the
/// parsed trees and compilations the workspace itself memoizes.
#[derive(Debug, Clone)]
pub struct Navigator {
    workspace: Arc<Workspace>,
    prefilter: bool,
}

impl Navigator {
    /// Navigate a workspace that is already loaded.
    ///
    /// The pre-filter setting comes from the workspace's configuration.
    #[must_use]
    pub fn new(workspace: Arc<Workspace>) -> Self {
        let prefilter = workspace.config().prefilter;
        Self {
            workspace,
            prefilter,
        }
    }

    /// Load (or reuse) the workspace at `path` through `cache`.
    ///
    /// `path` may be a `.sln`, a `.csproj` or a directory.
    ///
    /// # Errors
    ///
    /// Propagates workspace load failures, see [`Workspace::load`].
    pub fn open(cache: &WorkspaceCache, path: &Path) -> Result<Self> {
        let workspace = cache.get_or_load(path)?;
        debug!(
            root = %workspace.root().display(),
            projects = workspace.projects().len(),
            "Opened workspace"
        );
        Ok(Self::new(workspace))
    }

    /// Enable or disable the textual pre-filter for reference scans.
    ///
    /// Results are identical either way; disabling only costs time.
    #[must_use]
    pub fn with_prefilter(mut self, prefilter: bool) -> Self {
        self.prefilter = prefilter;
        self
    }

    /// The underlying workspace.
    #[must_use]
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Whether reference scans skip trees that never mention the target.
    #[must_use]
    pub fn prefilter(&self) -> bool {
        self.prefilter
    }

    /// Projects and documents that dropped out while loading or parsing.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<LoadDiagnostic> {
        self.workspace.diagnostics()
    }

    // === Declarations ===

    /// Every declaration named `name`, optionally of one kind.
    ///
    /// # Errors
    ///
    /// `InvalidQuery` for an unsupported kind, `NotFound` when nothing matches.
    pub fn find_symbol(&self, name: &str, kind: Option<&str>) -> Result<SymbolSearchResult> {
        outline::find_symbol(&self.workspace, name, kind)
    }

    /// Members of a class in a given file.
    ///
    /// # Errors
    ///
    /// `NotFound` when the file or class isn't in the workspace.
    pub fn list_class(&self, file: &str, class_name: &str) -> Result<ClassStructure> {
        outline::list_class(&self.workspace, file, class_name)
    }

    /// Types in a namespace and its sub-namespaces.
    ///
    /// # Errors
    ///
    /// `InvalidQuery` for an empty namespace.
    pub fn list_classes(&self, namespace: &str) -> Result<ClassListResult> {
        outline::list_classes(&self.workspace, namespace)
    }

    /// A project's namespaces and the types in each.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown project.
    pub fn get_namespace_structure(&self, project: &str) -> Result<NamespaceStructureResult> {
        outline::get_namespace_structure(&self.workspace, project)
    }

    /// A method's signature and source.
    ///
    /// # Errors
    ///
    /// `NotFound` when the file or method isn't there.
    pub fn get_method(
        &self,
        file: Option<&str>,
        class_name: Option<&str>,
        method_name: &str,
    ) -> Result<MethodResult> {
        outline::get_method(&self.workspace, file, class_name, method_name)
    }

    /// Several methods of one class, from a comma-separated list.
    ///
    /// # Errors
    ///
    /// `NotFound` when the class declares none of them.
    pub fn get_methods(&self, class_name: &str, method_names: &str) -> Result<MethodsResult> {
        outline::get_methods(&self.workspace, class_name, method_names)
    }

    /// Override modifiers of a method and what it overrides.
    ///
    /// # Errors
    ///
    /// `NotFound` when the class doesn't declare the method.
    pub fn check_overridable(&self, class_name: &str, method_name: &str) -> Result<OverridableResult> {
        outline::check_overridable(&self.workspace, class_name, method_name)
    }

    // === References ===

    /// Every reference to a method, property or type (`Name` or `Type.Name`).
    ///
    /// # Errors
    ///
    /// `NotFound` when no declaration matches.
    pub fn find_usages(&self, query: &str) -> Result<UsageResult> {
        references::find_usages(&self.workspace, query, self.prefilter)
    }

    /// Every invocation of a method (`Method` or `Type.Method`).
    ///
    /// # Errors
    ///
    /// `NotFound` when no method matches.
    pub fn find_callers(&self, query: &str) -> Result<CallersResult> {
        references::find_callers(&self.workspace, query, self.prefilter)
    }

    /// Every `new` of a type.
    ///
    /// # Errors
    ///
    /// `NotFound` when no type matches.
    pub fn find_instantiations(&self, class_name: &str) -> Result<InstantiationResult> {
        references::find_instantiations(&self.workspace, class_name, self.prefilter)
    }

    // === Hierarchy ===

    /// Base chain, interfaces and derived types of a type.
    ///
    /// # Errors
    ///
    /// `NotFound` when no type matches.
    pub fn get_hierarchy(&self, class_name: &str) -> Result<HierarchyResult> {
        hierarchy::get_hierarchy(&self.workspace, class_name)
    }

    /// Classes, structs and records implementing an interface.
    ///
    /// # Errors
    ///
    /// `NotFound` when no interface matches.
    pub fn find_implementations(&self, interface: &str) -> Result<ImplementationResult> {
        hierarchy::find_implementations(&self.workspace, interface)
    }

    // === Attributes ===

    /// Declarations carrying an attribute, optionally filtered by its text.
    ///
    /// # Errors
    ///
    /// `InvalidQuery` for an empty attribute name.
    pub fn find_by_attribute(
        &self,
        attribute: &str,
        pattern: Option<&str>,
    ) -> Result<AttributeSearchResult> {
        attributes::find_by_attribute(&self.workspace, attribute, pattern)
    }

    /// Step definition methods whose pattern contains `pattern`.
    ///
    /// # Errors
    ///
    /// `InvalidQuery` for an empty pattern.
    pub fn find_step_definitions(&self, pattern: &str) -> Result<StepDefinitionResult> {
        attributes::find_step_definitions(&self.workspace, pattern)
    }

    // === Dependencies ===

    /// Constructors of a type and the parameters each takes.
    ///
    /// # Errors
    ///
    /// `NotFound` when no type matches.
    pub fn get_constructor_deps(&self, class_name: &str) -> Result<ConstructorDepsResult> {
        dependencies::get_constructor_deps(&self.workspace, class_name)
    }

    /// Where an interface is defined, implemented and injected.
    ///
    /// # Errors
    ///
    /// `NotFound` when no interface matches.
    pub fn find_interface_consumers(&self, interface: &str) -> Result<InterfaceConsumersResult> {
        dependencies::find_interface_consumers(&self.workspace, interface)
    }

    // === Features ===

    /// Feature files and their scenarios under `path`.
    ///
    /// The directory is independent of the workspace; only the configured
    /// feature extension and excluded directories are taken from it.
    ///
    /// # Errors
    ///
    /// `NotFound` when the directory doesn't exist.
    pub fn list_feature_scenarios(&self, path: &str) -> Result<FeatureScenariosResult> {
        features::list_feature_scenarios(path, self.workspace.config())
    }
}

/// Feature files and their scenarios under `path`, with default settings.
///
/// Needs no workspace.
///
/// # Errors
///
/// `NotFound` when the directory doesn't exist.
pub fn list_feature_scenarios(path: &str) -> Result<FeatureScenariosResult> {
    features::list_feature_scenarios(path, &Config::default())
}
