//! Finds the declaration a query names.
//!
//! The locator is deliberately simple: projects in workspace order, trees in
//! project order, declarations in document order, and the first declaration
//! whose name matches (ignoring case) wins. Overloads and partial type
//! fragments collapse to whichever comes first.

use tracing::debug;
use tree_sitter::Node;

use super::{CLASS_LIKE, ProjectTree, named, nodes_of_kind, project_trees};
use crate::frontend::syntax::{self, node_kinds};
use crate::frontend::{Symbol, SyntaxTree};
use crate::workspace::Workspace;

/// Declaration shapes a query can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    Method,
    Property,
    Class,
    Interface,
    /// Class, struct, interface or record.
    AnyType,
}

impl Shape {
    fn node_kinds(self) -> &'static [&'static str] {
        match self {
            Self::Method => &[node_kinds::METHOD_DECLARATION],
            Self::Property => &[node_kinds::PROPERTY_DECLARATION],
            Self::Class => &[node_kinds::CLASS_DECLARATION],
            Self::Interface => &[node_kinds::INTERFACE_DECLARATION],
            Self::AnyType => CLASS_LIKE,
        }
    }
}

/// A located target: its symbol and where it is declared.
pub(crate) struct Located<'w> {
    pub symbol: Symbol,
    pub tree: &'w SyntaxTree,
    pub line: u32,
}

/// First declaration named `name` in workspace order.
///
/// Within each tree the shapes are tried in the order given. When
/// `container` is set, the declaration's immediately enclosing type must
/// carry that name (ignoring case).
pub(crate) fn locate<'w>(
    workspace: &'w Workspace,
    name: &str,
    container: Option<&str>,
    shapes: &[Shape],
) -> Option<Located<'w>> {
    for entry in project_trees(workspace) {
        for shape in shapes {
            if let Some(found) = locate_in_tree(&entry, name, container, *shape) {
                debug!(
                    name,
                    symbol = %found.symbol,
                    file = %found.tree.path().display(),
                    "Located target"
                );
                return Some(found);
            }
        }
    }
    None
}

fn locate_in_tree<'w>(
    entry: &ProjectTree<'w>,
    name: &str,
    container: Option<&str>,
    shape: Shape,
) -> Option<Located<'w>> {
    let tree = entry.tree();
    let declaration = first_declaration(tree, tree.root(), name, container, shape)?;
    let symbol = entry.model.declared_symbol(&declaration)?;
    Some(Located {
        symbol,
        tree,
        line: syntax::line_of(&declaration),
    })
}

/// First declaration of `shape` under `root` named `name`.
pub(crate) fn first_declaration<'t>(
    tree: &SyntaxTree,
    root: Node<'t>,
    name: &str,
    container: Option<&str>,
    shape: Shape,
) -> Option<Node<'t>> {
    nodes_of_kind(root, shape.node_kinds())
        .into_iter()
        .filter(|decl| named(tree, decl, name))
        .find(|decl| {
            container.is_none_or(|expected| {
                syntax::enclosing_type_name(tree, decl)
                    .is_some_and(|actual| actual.eq_ignore_ascii_case(expected))
            })
        })
}
