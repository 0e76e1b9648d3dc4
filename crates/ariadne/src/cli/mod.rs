//! Subcommands and their dispatch.
//!
//! Each subcommand maps onto one [`Navigator`] query. Feature listing is the
//! only command that works without loading a workspace.

pub mod output;

use std::path::PathBuf;

use ariadne::{Navigator, WorkspaceCache};
use clap::Subcommand;

use output::render;

/// Settings shared by every subcommand.
pub struct Options {
    /// Solution file, project file or directory to load
    pub solution: PathBuf,
    /// Disable the textual pre-filter
    pub no_prefilter: bool,
}

/// Available queries
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Find declarations by name
    FindSymbol {
        /// Symbol name (case-insensitive)
        name: String,

        /// Restrict to one kind: class, struct, interface, method, property
        #[arg(short, long)]
        kind: Option<String>,
    },

    /// Find every reference to a method, property or type
    FindUsages {
        /// `Name` or `Type.Name`
        symbol: String,
    },

    /// Find every invocation of a method
    FindCallers {
        /// `Method` or `Type.Method`
        symbol: String,
    },

    /// Find every `new` of a type
    FindInstantiations {
        /// Type name
        class_name: String,
    },

    /// Show base types, interfaces and derived types
    GetHierarchy {
        /// Type name
        class_name: String,
    },

    /// Find classes, structs and records implementing an interface
    FindImplementations {
        /// Interface name
        interface: String,
    },

    /// Find declarations carrying an attribute
    FindByAttribute {
        /// Attribute name, with or without the `Attribute` suffix
        attribute: String,

        /// Substring the attribute text must contain
        #[arg(short, long)]
        pattern: Option<String>,
    },

    /// Find step definitions whose pattern contains a substring
    FindStepDefinitions {
        /// Substring of the step regex (case-insensitive)
        pattern: String,
    },

    /// List a type's constructors and their parameters
    GetConstructorDeps {
        /// Type name
        class_name: String,
    },

    /// Show where an interface is defined, implemented and injected
    FindInterfaceConsumers {
        /// Interface name
        interface: String,
    },

    /// List feature files and their scenarios under a directory
    ListFeatureScenarios {
        /// Directory to scan
        path: String,
    },

    /// List the members of a class in a file
    ListClass {
        /// Document path (absolute, relative, or file name)
        file: String,

        /// Class name (case-sensitive)
        class_name: String,
    },

    /// List the types of a namespace and its sub-namespaces
    ListClasses {
        /// Namespace name
        namespace: String,
    },

    /// Group a project's types by namespace
    GetNamespaceStructure {
        /// Project name
        project: String,
    },

    /// Show a method's signature and source
    GetMethod {
        /// Method name
        method_name: String,

        /// Restrict to one document
        #[arg(short, long)]
        file: Option<String>,

        /// Restrict to one containing class
        #[arg(short, long)]
        class: Option<String>,
    },

    /// Show several methods of one class
    GetMethods {
        /// Class name
        class_name: String,

        /// Comma-separated method names
        methods: String,
    },

    /// Show whether a method can be overridden
    CheckOverridable {
        /// Class name
        class_name: String,

        /// Method name
        method_name: String,
    },
}

/// Run one subcommand and render its result as JSON.
///
/// # Errors
///
/// Propagates workspace load and query failures.
pub fn run(command: Commands, options: &Options) -> ariadne::Result<String> {
    if let Commands::ListFeatureScenarios { path } = &command {
        return render(&ariadne::list_feature_scenarios(path)?);
    }

    let cache = WorkspaceCache::new();
    let mut navigator = Navigator::open(&cache, &options.solution)?;
    if options.no_prefilter {
        navigator = navigator.with_prefilter(false);
    }

    match command {
        Commands::FindSymbol { name, kind } => render(&navigator.find_symbol(&name, kind.as_deref())?),
        Commands::FindUsages { symbol } => render(&navigator.find_usages(&symbol)?),
        Commands::FindCallers { symbol } => render(&navigator.find_callers(&symbol)?),
        Commands::FindInstantiations { class_name } => {
            render(&navigator.find_instantiations(&class_name)?)
        }
        Commands::GetHierarchy { class_name } => render(&navigator.get_hierarchy(&class_name)?),
        Commands::FindImplementations { interface } => {
            render(&navigator.find_implementations(&interface)?)
        }
        Commands::FindByAttribute { attribute, pattern } => {
            render(&navigator.find_by_attribute(&attribute, pattern.as_deref())?)
        }
        Commands::FindStepDefinitions { pattern } => {
            render(&navigator.find_step_definitions(&pattern)?)
        }
        Commands::GetConstructorDeps { class_name } => {
            render(&navigator.get_constructor_deps(&class_name)?)
        }
        Commands::FindInterfaceConsumers { interface } => {
            render(&navigator.find_interface_consumers(&interface)?)
        }
        Commands::ListFeatureScenarios { path } => {
            render(&navigator.list_feature_scenarios(&path)?)
        }
        Commands::ListClass { file, class_name } => render(&navigator.list_class(&file, &class_name)?),
        Commands::ListClasses { namespace } => render(&navigator.list_classes(&namespace)?),
        Commands::GetNamespaceStructure { project } => {
            render(&navigator.get_namespace_structure(&project)?)
        }
        Commands::GetMethod {
            method_name,
            file,
            class,
        } => render(&navigator.get_method(file.as_deref(), class.as_deref(), &method_name)?),
        Commands::GetMethods {
            class_name,
            methods,
        } => render(&navigator.get_methods(&class_name, &methods)?),
        Commands::CheckOverridable {
            class_name,
            method_name,
        } => render(&navigator.check_overridable(&class_name, &method_name)?),
    }
}
