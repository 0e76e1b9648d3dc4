//! Type hierarchy walks: base chains, derived types and implementations.

use tracing::debug;
use tree_sitter::Node;

use super::locator::{Shape, locate};
use super::{ProjectTree, nodes_of_kind, project_trees};
use crate::error::{Error, Result, require};
use crate::frontend::syntax::{self, node_kinds};
use crate::frontend::{Symbol, symbols_match};
use crate::types::{DeclKind, HierarchyResult, ImplementationResult, TypeLocation};
use crate::workspace::Workspace;

/// Terminal entry of every base chain.
const ROOT_TYPE: &str = "object";

/// Base chain, interface set and derived types of a type.
///
/// # Errors
///
/// [`Error::InvalidQuery`] for an empty name, [`Error::NotFound`] when no
/// type declaration matches.
pub fn get_hierarchy(workspace: &Workspace, class_name: &str) -> Result<HierarchyResult> {
    require(class_name, "class name")?;
    let located = locate(workspace, class_name.trim(), None, &[Shape::AnyType])
        .ok_or_else(|| Error::not_found("class", class_name))?;
    let target = located.symbol;

    let mut base_types: Vec<String> = target
        .base_chain()
        .iter()
        .map(simple_name)
        .take_while(|name| !is_root_type(name))
        .collect();
    base_types.push(ROOT_TYPE.to_string());

    let mut interfaces: Vec<String> = Vec::new();
    for iface in target.all_interfaces() {
        let name = simple_name(&iface);
        if !interfaces.contains(&name) {
            interfaces.push(name);
        }
    }

    let mut derived_types = Vec::new();
    for entry in project_trees(workspace) {
        let file_path = workspace.relative_path(entry.tree().path());
        for shape in [DerivedShape::Classes, DerivedShape::Records] {
            for decl in nodes_of_kind(entry.tree().root(), shape.node_kinds()) {
                let Some(candidate) = entry.model.declared_symbol(&decl) else {
                    continue;
                };
                if symbols_match(&candidate, &target) {
                    continue;
                }
                if derives_from(&candidate, &target) {
                    derived_types.push(type_location(&entry, &decl, file_path.clone()));
                }
            }
        }
    }

    debug!(
        class_name,
        bases = base_types.len(),
        derived = derived_types.len(),
        "Walked hierarchy"
    );
    Ok(HierarchyResult {
        class_name: target.name().to_string(),
        file_path: workspace.relative_path(located.tree.path()),
        namespace: target.namespace().to_string(),
        base_types,
        interfaces,
        derived_types,
    })
}

#[derive(Clone, Copy)]
enum DerivedShape {
    Classes,
    Records,
}

impl DerivedShape {
    fn node_kinds(self) -> &'static [&'static str] {
        match self {
            Self::Classes => &[node_kinds::CLASS_DECLARATION],
            Self::Records => &[
                node_kinds::RECORD_DECLARATION,
                node_kinds::RECORD_STRUCT_DECLARATION,
            ],
        }
    }
}

/// Whether `candidate`'s own base chain reaches `target`.
fn derives_from(candidate: &Symbol, target: &Symbol) -> bool {
    candidate
        .base_chain()
        .iter()
        .any(|base| symbols_match(base, target))
}

/// Every class, struct and record whose interface set contains the named
/// interface.
///
/// # Errors
///
/// [`Error::InvalidQuery`] for an empty name, [`Error::NotFound`] when no
/// interface declaration matches.
pub fn find_implementations(workspace: &Workspace, interface: &str) -> Result<ImplementationResult> {
    require(interface, "interface name")?;
    let target = locate(workspace, interface.trim(), None, &[Shape::Interface])
        .ok_or_else(|| Error::not_found("interface", interface))?
        .symbol;

    let mut implementations = Vec::new();
    for entry in project_trees(workspace) {
        implementations.extend(implementations_in_tree(workspace, &entry, &target));
    }

    debug!(interface, implementations = implementations.len(), "Found implementations");
    Ok(ImplementationResult {
        interface: interface.to_string(),
        total_count: implementations.len(),
        implementations,
    })
}

/// Implementations of `target` declared in one tree: classes, then structs,
/// then records.
pub(crate) fn implementations_in_tree(
    workspace: &Workspace,
    entry: &ProjectTree<'_>,
    target: &Symbol,
) -> Vec<TypeLocation> {
    const SHAPES: [&[&str]; 3] = [
        &[node_kinds::CLASS_DECLARATION],
        &[node_kinds::STRUCT_DECLARATION],
        &[
            node_kinds::RECORD_DECLARATION,
            node_kinds::RECORD_STRUCT_DECLARATION,
        ],
    ];

    let file_path = workspace.relative_path(entry.tree().path());
    let mut found = Vec::new();
    for kinds in SHAPES {
        for decl in nodes_of_kind(entry.tree().root(), kinds) {
            let implements = entry.model.declared_symbol(&decl).is_some_and(|candidate| {
                candidate
                    .all_interfaces()
                    .iter()
                    .any(|iface| symbols_match(iface, target))
            });
            if implements {
                found.push(type_location(entry, &decl, file_path.clone()));
            }
        }
    }
    found
}

pub(crate) fn type_location(
    entry: &ProjectTree<'_>,
    decl: &Node<'_>,
    file_path: String,
) -> TypeLocation {
    let tree = entry.tree();
    TypeLocation {
        name: syntax::declaration_name(tree, decl)
            .unwrap_or_default()
            .to_string(),
        kind: match decl.kind() {
            node_kinds::STRUCT_DECLARATION => DeclKind::Struct,
            node_kinds::RECORD_DECLARATION | node_kinds::RECORD_STRUCT_DECLARATION => {
                DeclKind::Record
            }
            _ => DeclKind::Class,
        },
        file_path,
        line: syntax::line_of(decl),
        namespace: syntax::namespace_of(tree, decl),
    }
}

/// Simple name of a type: no namespace, no type arguments.
fn simple_name(symbol: &Symbol) -> String {
    let name = symbol.name();
    let name = name.split('<').next().unwrap_or(name);
    name.rsplit('.').next().unwrap_or(name).to_string()
}

fn is_root_type(name: &str) -> bool {
    name == ROOT_TYPE || name == "Object"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_type_matches_keyword_and_framework_name() {
        assert!(is_root_type("object"));
        assert!(is_root_type("Object"));
        assert!(!is_root_type("ObjectPool"));
    }
}
