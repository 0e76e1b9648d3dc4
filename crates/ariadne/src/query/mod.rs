//! Navigation queries over a loaded [`Workspace`].
//!
//! Every query follows the same shape: validate the input, locate a target
//! declaration (first match in workspace order), scan the project trees,
//! and aggregate one serializable record. Nothing here mutates the
//! workspace; results are rebuilt on every call.
//!
//! | Module | Queries |
//! |--------|---------|
//! | [`locator`] | target lookup shared by the others |
//! | [`references`] | usages, callers, instantiations |
//! | [`hierarchy`] | base chain, derived types, implementations |
//! | [`attributes`] | attribute search, step definitions |
//! | [`dependencies`] | constructor dependencies, interface consumers |
//! | [`outline`] | symbol search, class and namespace outlines, methods |

pub(crate) mod attributes;
pub(crate) mod dependencies;
pub(crate) mod hierarchy;
pub(crate) mod locator;
pub(crate) mod outline;
pub(crate) mod references;

use std::sync::Arc;

use tree_sitter::Node;

use crate::frontend::syntax::{self, node_kinds};
use crate::frontend::{Compilation, SemanticModel, SyntaxTree};
use crate::workspace::{Project, Workspace};

/// Reported when a reference sits outside any method, constructor or property.
pub(crate) const TOP_LEVEL: &str = "(top-level)";

/// Reported when a reference sits outside any class, struct or record.
pub(crate) const GLOBAL: &str = "(global)";

/// Type declarations the navigation queries treat as classes: everything
/// that can hold members, enums excluded.
pub(crate) const CLASS_LIKE: &[&str] = &[
    node_kinds::CLASS_DECLARATION,
    node_kinds::STRUCT_DECLARATION,
    node_kinds::INTERFACE_DECLARATION,
    node_kinds::RECORD_DECLARATION,
    node_kinds::RECORD_STRUCT_DECLARATION,
];

/// One of a project's own trees, bound against the project's compilation.
pub(crate) struct ProjectTree<'w> {
    pub model: SemanticModel<'w>,
}

impl<'w> ProjectTree<'w> {
    pub fn tree(&self) -> &'w SyntaxTree {
        self.model.tree()
    }
}

/// Own trees of every project, in workspace order, each with a binder.
///
/// Compilations are built as the iterator reaches their project, so a scan
/// that stops early never binds the remaining projects.
pub(crate) fn project_trees(workspace: &Workspace) -> impl Iterator<Item = ProjectTree<'_>> {
    workspace.projects().iter().flat_map(move |project| {
        let compilation: &Compilation = workspace.compilation(project);
        (0..compilation.own_trees().len()).filter_map(move |index| {
            compilation
                .semantic_model(index)
                .map(|model| ProjectTree { model })
        })
    })
}

/// Parsed documents of every project, in workspace order, without binding.
///
/// Documents that fail to parse are skipped.
pub(crate) fn document_trees(
    workspace: &Workspace,
) -> impl Iterator<Item = (&Project, Arc<SyntaxTree>)> {
    workspace
        .documents()
        .filter_map(|(project, document)| document.syntax_tree().map(|tree| (project, tree)))
}

/// A `Type.Member` query split into its last two segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MemberQuery<'q> {
    pub name: &'q str,
    pub container: Option<&'q str>,
}

impl<'q> MemberQuery<'q> {
    /// `Shop.Calculator.Add` searches `Add` declared in `Calculator`.
    pub fn parse(query: &'q str) -> Self {
        let mut segments = query.trim().rsplit('.');
        let name = segments.next().unwrap_or_default();
        let container = segments.next().filter(|s| !s.is_empty());
        Self { name, container }
    }
}

/// Containing member name of `node`, or [`TOP_LEVEL`].
pub(crate) fn member_context(tree: &SyntaxTree, node: &Node<'_>) -> String {
    syntax::containing_member_name(tree, node)
        .unwrap_or(TOP_LEVEL)
        .to_string()
}

/// Containing class name of `node`, or `fallback`.
pub(crate) fn class_context(tree: &SyntaxTree, node: &Node<'_>, fallback: &str) -> String {
    syntax::containing_class_name(tree, node)
        .unwrap_or(fallback)
        .to_string()
}

/// The trimmed source line `node` starts on.
pub(crate) fn context_line(tree: &SyntaxTree, node: &Node<'_>) -> String {
    tree.line_text(syntax::line_of(node)).trim().to_string()
}

/// Nodes of the given kinds under `root`, in document order.
pub(crate) fn nodes_of_kind<'t>(root: Node<'t>, kinds: &[&str]) -> Vec<Node<'t>> {
    syntax::descendants(root)
        .into_iter()
        .filter(|n| kinds.contains(&n.kind()))
        .collect()
}

/// Whether a declaration's name equals `name`, ignoring ASCII case.
pub(crate) fn named(tree: &SyntaxTree, node: &Node<'_>, name: &str) -> bool {
    syntax::declaration_name(tree, node).is_some_and(|n| n.eq_ignore_ascii_case(name))
}

/// Members declared directly in a type's body, in source order.
pub(crate) fn direct_members<'t>(type_decl: &Node<'t>, kind: &str) -> Vec<Node<'t>> {
    let body = type_decl.child_by_field_name("body").or_else(|| {
        syntax::named_children(type_decl)
            .into_iter()
            .find(|c| c.kind() == node_kinds::DECLARATION_LIST)
    });
    body.map_or_else(Vec::new, |body| {
        syntax::named_children(&body)
            .into_iter()
            .filter(|m| m.kind() == kind)
            .collect()
    })
}
