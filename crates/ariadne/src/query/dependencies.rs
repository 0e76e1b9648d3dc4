//! Dependency surface: what a class takes in its constructors, and where an
//! interface is implemented or injected.

use tracing::debug;
use tree_sitter::Node;

use super::hierarchy::implementations_in_tree;
use super::locator::{Shape, first_declaration, locate};
use super::outline::{constructor_signature, parameter_nodes};
use super::{ProjectTree, direct_members, nodes_of_kind, project_trees};
use crate::error::{Error, Result, require};
use crate::frontend::syntax::{self, node_kinds};
use crate::frontend::{Symbol, declarator_name, symbols_match};
use crate::types::{
    ConstructorDepsResult, ConstructorInfo, ConstructorParameter, InjectionKind, InjectionSite,
    InterfaceConsumersResult,
};
use crate::workspace::Workspace;

/// Written in place of a missing parameter type (lambda-style parameters).
const IMPLICIT_TYPE: &str = "var";

/// Constructors of the first type named `class_name` and the parameters
/// each one takes.
///
/// A class without constructors is still reported, with none listed. Other
/// type kinds are skipped unless they declare a constructor.
///
/// # Errors
///
/// [`Error::InvalidQuery`] for an empty name, [`Error::NotFound`] when no
/// matching type qualifies.
pub fn get_constructor_deps(workspace: &Workspace, class_name: &str) -> Result<ConstructorDepsResult> {
    require(class_name, "class name")?;
    let name = class_name.trim();

    for entry in project_trees(workspace) {
        let tree = entry.tree();
        let Some(class_node) = first_declaration(tree, tree.root(), name, None, Shape::AnyType) else {
            continue;
        };

        let constructors: Vec<ConstructorInfo> =
            direct_members(&class_node, node_kinds::CONSTRUCTOR_DECLARATION)
                .iter()
                .map(|ctor| ConstructorInfo {
                    parameters: parameter_nodes(ctor)
                        .iter()
                        .map(|param| constructor_parameter(&entry, param))
                        .collect(),
                    line_range: syntax::line_range(ctor),
                    signature: constructor_signature(tree, ctor),
                })
                .collect();

        if constructors.is_empty() && class_node.kind() != node_kinds::CLASS_DECLARATION {
            continue;
        }
        debug!(class_name, constructors = constructors.len(), "Collected constructor dependencies");
        return Ok(ConstructorDepsResult {
            class_name: syntax::declaration_name(tree, &class_node)
                .unwrap_or(name)
                .to_string(),
            file_path: workspace.relative_path(tree.path()),
            namespace: syntax::namespace_of(tree, &class_node),
            constructors,
        });
    }

    Err(Error::not_found("class", class_name))
}

fn constructor_parameter(entry: &ProjectTree<'_>, param: &Node<'_>) -> ConstructorParameter {
    let tree = entry.tree();
    let type_node = param.child_by_field_name("type");
    let type_name = type_node.map_or(IMPLICIT_TYPE, |t| tree.text(&t)).to_string();
    let full_type_name = type_node
        .and_then(|t| entry.model.type_at(&t))
        .map_or_else(|| type_name.clone(), |t| qualified_display(&t));
    ConstructorParameter {
        name: syntax::declaration_name(tree, param)
            .unwrap_or_default()
            .to_string(),
        type_name,
        full_type_name,
    }
}

/// Fully qualified display form without a leading `global::`.
fn qualified_display(symbol: &Symbol) -> String {
    let display = symbol.display_string();
    match display.strip_prefix("global::") {
        Some(rest) => rest.to_string(),
        None => display,
    }
}

/// Where an interface is defined, implemented and injected.
///
/// Injection sites are constructor parameters, fields and properties of
/// classes, structs and records whose declared type is the interface or a
/// generic with the interface as a direct type argument.
///
/// # Errors
///
/// [`Error::InvalidQuery`] for an empty name, [`Error::NotFound`] when no
/// interface declaration matches.
pub fn find_interface_consumers(
    workspace: &Workspace,
    interface: &str,
) -> Result<InterfaceConsumersResult> {
    require(interface, "interface name")?;
    let located = locate(workspace, interface.trim(), None, &[Shape::Interface])
        .ok_or_else(|| Error::not_found("interface", interface))?;
    let target = &located.symbol;

    let mut implementations = Vec::new();
    let mut injections = Vec::new();
    for entry in project_trees(workspace) {
        implementations.extend(implementations_in_tree(workspace, &entry, target));
        injections.extend(injections_in_tree(workspace, &entry, target));
    }

    debug!(
        interface,
        implementations = implementations.len(),
        injections = injections.len(),
        "Found interface consumers"
    );
    Ok(InterfaceConsumersResult {
        interface: interface.to_string(),
        defined_in: Some(workspace.relative_path(located.tree.path())),
        definition_line: Some(located.line),
        implementations,
        injections,
    })
}

/// Constructor parameters, then fields, then properties typed by `target`.
fn injections_in_tree(
    workspace: &Workspace,
    entry: &ProjectTree<'_>,
    target: &Symbol,
) -> Vec<InjectionSite> {
    let tree = entry.tree();
    let root = tree.root();
    let file_path = workspace.relative_path(tree.path());
    let typed_by_target = |type_node: Option<Node<'_>>| {
        type_node
            .and_then(|t| entry.model.type_at(&t))
            .is_some_and(|t| matches_interface(&t, target))
    };
    let site = |class_name: &str, member_name: &str, member_type, line| InjectionSite {
        class_name: class_name.to_string(),
        member_name: member_name.to_string(),
        member_type,
        file_path: file_path.clone(),
        line,
    };

    let mut found = Vec::new();
    for ctor in nodes_of_kind(root, &[node_kinds::CONSTRUCTOR_DECLARATION]) {
        let Some(class_name) = syntax::containing_class_name(tree, &ctor) else {
            continue;
        };
        for param in parameter_nodes(&ctor) {
            if typed_by_target(param.child_by_field_name("type")) {
                let name = syntax::declaration_name(tree, &param).unwrap_or_default();
                found.push(site(
                    class_name,
                    name,
                    InjectionKind::ConstructorParameter,
                    syntax::line_of(&param),
                ));
            }
        }
    }

    for field in nodes_of_kind(root, &[node_kinds::FIELD_DECLARATION]) {
        let Some(class_name) = syntax::containing_class_name(tree, &field) else {
            continue;
        };
        let Some(declaration) = syntax::named_children(&field)
            .into_iter()
            .find(|c| c.kind() == node_kinds::VARIABLE_DECLARATION)
        else {
            continue;
        };
        if !typed_by_target(declaration.child_by_field_name("type")) {
            continue;
        }
        for declarator in syntax::named_children(&declaration)
            .into_iter()
            .filter(|c| c.kind() == node_kinds::VARIABLE_DECLARATOR)
        {
            let name = declarator_name(tree, &declarator).unwrap_or_default();
            found.push(site(class_name, name, InjectionKind::Field, syntax::line_of(&field)));
        }
    }

    for property in nodes_of_kind(root, &[node_kinds::PROPERTY_DECLARATION]) {
        let Some(class_name) = syntax::containing_class_name(tree, &property) else {
            continue;
        };
        if typed_by_target(property.child_by_field_name("type")) {
            let name = syntax::declaration_name(tree, &property).unwrap_or_default();
            found.push(site(
                class_name,
                name,
                InjectionKind::Property,
                syntax::line_of(&property),
            ));
        }
    }
    found
}

/// The interface itself, or a generic with it as a direct type argument.
/// Deeper nesting (`Lazy<IEnumerable<T>>`) is not unwrapped.
fn matches_interface(declared: &Symbol, target: &Symbol) -> bool {
    if declared.is_array() {
        return false;
    }
    symbols_match(declared, target)
        || declared
            .type_arguments()
            .iter()
            .any(|arg| symbols_match(arg, target))
}
