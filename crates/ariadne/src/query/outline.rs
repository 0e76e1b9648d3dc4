//! Declaration outlines: symbol search, class and namespace listings,
//! method bodies and override information.
//!
//! Everything here except [`check_overridable`] reads syntax only, so these
//! queries never build a compilation.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;
use tree_sitter::Node;

use super::locator::{Shape, first_declaration};
use super::{CLASS_LIKE, direct_members, document_trees, named, nodes_of_kind, project_trees};
use crate::error::{Error, Result, require};
use crate::frontend::syntax::{self, node_kinds};
use crate::frontend::{SyntaxTree, declarator_name, return_type_node};
use crate::types::{
    ClassInfo, ClassListResult, ClassStructure, DeclKind, LineRange, MemberInfo, MethodInfo,
    MethodResult, MethodsResult, Modifier, NamespaceInfo, NamespaceStructureResult,
    OverridableResult, ParameterInfo, SymbolLocation, SymbolSearchResult,
};
use crate::workspace::Workspace;

/// Namespace reported for types declared outside any namespace.
const GLOBAL_NAMESPACE: &str = "(global)";

/// Kinds `find_symbol` can filter on, in scan order.
const SEARCHABLE: &[(DeclKind, &str)] = &[
    (DeclKind::Class, node_kinds::CLASS_DECLARATION),
    (DeclKind::Struct, node_kinds::STRUCT_DECLARATION),
    (DeclKind::Interface, node_kinds::INTERFACE_DECLARATION),
    (DeclKind::Method, node_kinds::METHOD_DECLARATION),
    (DeclKind::Property, node_kinds::PROPERTY_DECLARATION),
];

// ============================================================================
// Symbol search
// ============================================================================

/// Every declaration named `name`, optionally restricted to one kind.
///
/// # Errors
///
/// [`Error::InvalidQuery`] for an empty name or an unsupported kind,
/// [`Error::NotFound`] when nothing matches.
pub fn find_symbol(workspace: &Workspace, name: &str, kind: Option<&str>) -> Result<SymbolSearchResult> {
    require(name, "symbol name")?;
    let name = name.trim();
    let filter = match kind.map(str::trim).filter(|k| !k.is_empty()) {
        None => None,
        Some(k) => Some(
            DeclKind::parse(k)
                .filter(|parsed| SEARCHABLE.iter().any(|(d, _)| d == parsed))
                .ok_or_else(|| {
                    Error::InvalidQuery(format!(
                        "unsupported kind '{k}', expected class, struct, interface, method or property"
                    ))
                })?,
        ),
    };

    let mut results = Vec::new();
    for (_, tree) in document_trees(workspace) {
        let file_path = workspace.relative_path(tree.path());
        for (decl_kind, node_kind) in SEARCHABLE {
            if filter.is_some_and(|f| f != *decl_kind) {
                continue;
            }
            for decl in nodes_of_kind(tree.root(), &[*node_kind]) {
                if !named(&tree, &decl, name) {
                    continue;
                }
                results.push(symbol_location(&tree, &decl, *decl_kind, file_path.clone()));
            }
        }
    }

    if results.is_empty() {
        return Err(Error::not_found("symbol", name));
    }
    debug!(name, results = results.len(), "Found symbols");
    Ok(SymbolSearchResult {
        symbol_name: name.to_string(),
        kind: filter.map_or("any", |k| k.as_str()).to_string(),
        results,
    })
}

fn symbol_location(tree: &SyntaxTree, decl: &Node<'_>, kind: DeclKind, file_path: String) -> SymbolLocation {
    let namespace = syntax::namespace_of(tree, decl);
    let declared = syntax::declaration_name(tree, decl).unwrap_or_default();
    let (line_range, full_name) = if kind.is_type() {
        (syntax::line_range(decl), dotted(&[namespace.as_str(), declared]))
    } else {
        let class_name = syntax::enclosing_type_name(tree, decl).unwrap_or_default();
        let range = if kind == DeclKind::Property {
            let line = syntax::line_of(decl);
            LineRange(line, line)
        } else {
            syntax::line_range(decl)
        };
        (range, dotted(&[namespace.as_str(), class_name, declared]))
    };
    SymbolLocation {
        file_path,
        line_range,
        namespace,
        full_name,
    }
}

/// Join the non-empty parts with dots.
fn dotted(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(".")
}

// ============================================================================
// Class outlines
// ============================================================================

/// Members of the class `class_name` declared in `file`.
///
/// The class name must match exactly. Members come grouped: fields (one
/// entry per declarator), properties, constructors, then methods.
///
/// # Errors
///
/// [`Error::InvalidQuery`] when either argument is empty,
/// [`Error::NotFound`] when the file or the class isn't there.
pub fn list_class(workspace: &Workspace, file: &str, class_name: &str) -> Result<ClassStructure> {
    require(file, "file path")?;
    require(class_name, "class name")?;

    let (_, document) = workspace
        .resolve_document_path(file)
        .ok_or_else(|| Error::not_found("file", file))?;
    let tree = document
        .syntax_tree()
        .ok_or_else(|| Error::not_found("file", file))?;
    let class_node = nodes_of_kind(tree.root(), CLASS_LIKE)
        .into_iter()
        .find(|decl| syntax::declaration_name(&tree, decl) == Some(class_name.trim()))
        .ok_or_else(|| Error::not_found("class", class_name))?;

    let mut members = Vec::new();
    members.extend(field_members(&tree, &class_node));
    members.extend(
        direct_members(&class_node, node_kinds::PROPERTY_DECLARATION)
            .iter()
            .map(|p| property_member(&tree, p)),
    );
    members.extend(
        direct_members(&class_node, node_kinds::CONSTRUCTOR_DECLARATION)
            .iter()
            .map(|c| constructor_member(&tree, c)),
    );
    members.extend(
        direct_members(&class_node, node_kinds::METHOD_DECLARATION)
            .iter()
            .map(|m| method_member(&tree, m)),
    );

    Ok(ClassStructure {
        class_name: class_name.trim().to_string(),
        namespace: syntax::namespace_of(&tree, &class_node),
        line_range: syntax::line_range(&class_node),
        file_path: workspace.relative_path(tree.path()),
        members,
    })
}

fn field_members(tree: &SyntaxTree, class_node: &Node<'_>) -> Vec<MemberInfo> {
    let mut members = Vec::new();
    for field in direct_members(class_node, node_kinds::FIELD_DECLARATION) {
        let Some(declaration) = syntax::named_children(&field)
            .into_iter()
            .find(|c| c.kind() == node_kinds::VARIABLE_DECLARATION)
        else {
            continue;
        };
        let mods = syntax::modifiers(tree, &field);
        let type_name = tree.field_text(&declaration, "type").unwrap_or_default();
        for declarator in syntax::named_children(&declaration)
            .into_iter()
            .filter(|c| c.kind() == node_kinds::VARIABLE_DECLARATOR)
        {
            let name = declarator_name(tree, &declarator).unwrap_or_default();
            let mut member = MemberInfo::new(DeclKind::Field, name.to_string(), mods.accessibility());
            member.type_name = Some(type_name.to_string());
            member.line = Some(syntax::line_of(&field));
            member.is_readonly = Some(mods.has(Modifier::Readonly));
            member.is_static = Some(mods.has(Modifier::Static));
            members.push(member);
        }
    }
    members
}

fn property_member(tree: &SyntaxTree, property: &Node<'_>) -> MemberInfo {
    let mods = syntax::modifiers(tree, property);
    let name = syntax::declaration_name(tree, property).unwrap_or_default();
    let accessors = syntax::named_children(property)
        .into_iter()
        .find(|c| c.kind() == node_kinds::ACCESSOR_LIST)
        .map(|list| accessor_keywords(tree, &list));
    let expression_bodied = syntax::named_children(property)
        .iter()
        .any(|c| c.kind() == node_kinds::ARROW_EXPRESSION_CLAUSE);

    let mut member = MemberInfo::new(DeclKind::Property, name.to_string(), mods.accessibility());
    member.type_name = tree.field_text(property, "type").map(ToString::to_string);
    member.line = Some(syntax::line_of(property));
    member.has_getter = Some(
        accessors
            .as_ref()
            .map_or(expression_bodied, |keywords| keywords.contains(&"get")),
    );
    member.has_setter = Some(accessors.as_ref().is_some_and(|keywords| {
        keywords.contains(&"set") || keywords.contains(&"init")
    }));
    member.is_static = Some(mods.has(Modifier::Static));
    member
}

/// `get`, `set` and `init` keywords of an accessor list.
fn accessor_keywords<'a>(tree: &'a SyntaxTree, list: &Node<'_>) -> Vec<&'a str> {
    let mut keywords = Vec::new();
    for accessor in syntax::named_children(list)
        .into_iter()
        .filter(|a| a.kind() == node_kinds::ACCESSOR_DECLARATION)
    {
        let mut cursor = accessor.walk();
        let keyword = accessor
            .children(&mut cursor)
            .map(|c| tree.text(&c))
            .find(|text| matches!(*text, "get" | "set" | "init"));
        keywords.extend(keyword);
    }
    keywords
}

fn constructor_member(tree: &SyntaxTree, ctor: &Node<'_>) -> MemberInfo {
    let mods = syntax::modifiers(tree, ctor);
    let name = syntax::declaration_name(tree, ctor).unwrap_or_default();
    let mut member = MemberInfo::new(DeclKind::Constructor, name.to_string(), mods.accessibility());
    member.line_range = Some(syntax::line_range(ctor));
    member.signature = Some(constructor_signature(tree, ctor));
    member.is_static = Some(mods.has(Modifier::Static));
    member.parameters = Some(parameters(tree, ctor));
    member
}

fn method_member(tree: &SyntaxTree, method: &Node<'_>) -> MemberInfo {
    let mods = syntax::modifiers(tree, method);
    let name = syntax::declaration_name(tree, method).unwrap_or_default();
    let mut member = MemberInfo::new(DeclKind::Method, name.to_string(), mods.accessibility());
    member.line_range = Some(syntax::line_range(method));
    member.signature = Some(method_signature(tree, method));
    member.is_async = Some(mods.has(Modifier::Async));
    member.is_static = Some(mods.has(Modifier::Static));
    member.return_type = Some(return_type_text(tree, method).to_string());
    member.parameters = Some(parameters(tree, method));
    member
}

/// Type declarations in `namespace` or any namespace below it, one per
/// name, sorted by name.
///
/// # Errors
///
/// [`Error::InvalidQuery`] for an empty namespace.
pub fn list_classes(workspace: &Workspace, namespace: &str) -> Result<ClassListResult> {
    require(namespace, "namespace")?;
    let namespace = namespace.trim();
    let nested_prefix = format!("{}.", namespace.to_lowercase());

    let mut seen = HashSet::new();
    let mut classes = Vec::new();
    for (_, tree) in document_trees(workspace) {
        let file_path = workspace.relative_path(tree.path());
        for decl in nodes_of_kind(tree.root(), CLASS_LIKE) {
            let declared_in = syntax::namespace_of(&tree, &decl);
            let in_scope = declared_in.eq_ignore_ascii_case(namespace)
                || declared_in.to_lowercase().starts_with(&nested_prefix);
            if !in_scope {
                continue;
            }
            let name = syntax::declaration_name(&tree, &decl).unwrap_or_default();
            // Partial types contribute one entry, from their first fragment
            if !seen.insert(name.to_string()) {
                continue;
            }
            let mods = syntax::modifiers(&tree, &decl);
            classes.push(ClassInfo {
                name: name.to_string(),
                file_path: file_path.clone(),
                line_range: syntax::line_range(&decl),
                accessibility: mods.accessibility(),
                is_static: mods.has(Modifier::Static),
            });
        }
    }
    classes.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(ClassListResult {
        namespace: namespace.to_string(),
        total_classes: classes.len(),
        classes,
    })
}

/// A project's type names grouped by namespace, both sorted.
///
/// # Errors
///
/// [`Error::InvalidQuery`] for an empty name, [`Error::NotFound`] when no
/// project has that name.
pub fn get_namespace_structure(workspace: &Workspace, project_name: &str) -> Result<NamespaceStructureResult> {
    require(project_name, "project name")?;
    let project = workspace
        .find_project_by_name(project_name.trim())
        .ok_or_else(|| Error::not_found("project", project_name))?;

    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for tree in project.documents().iter().filter_map(|d| d.syntax_tree()) {
        for decl in nodes_of_kind(tree.root(), CLASS_LIKE) {
            let mut namespace = syntax::namespace_of(&tree, &decl);
            if namespace.is_empty() {
                namespace = GLOBAL_NAMESPACE.to_string();
            }
            let name = syntax::declaration_name(&tree, &decl).unwrap_or_default();
            let classes = grouped.entry(namespace).or_default();
            if !classes.iter().any(|c| c == name) {
                classes.push(name.to_string());
            }
        }
    }

    let namespaces = grouped
        .into_iter()
        .map(|(name, mut classes)| {
            classes.sort();
            NamespaceInfo {
                name,
                class_count: classes.len(),
                classes,
            }
        })
        .collect();

    Ok(NamespaceStructureResult {
        project_name: project_name.to_string(),
        namespaces,
    })
}

// ============================================================================
// Methods
// ============================================================================

/// The first method named `method_name`, optionally within a class and a
/// file, with its full source text.
///
/// # Errors
///
/// [`Error::InvalidQuery`] for an empty method name, [`Error::NotFound`]
/// when the file or the method isn't there.
pub fn get_method(
    workspace: &Workspace,
    file: Option<&str>,
    class_name: Option<&str>,
    method_name: &str,
) -> Result<MethodResult> {
    require(method_name, "method name")?;
    let method_name = method_name.trim();
    let class_name = class_name.map(str::trim).filter(|c| !c.is_empty());

    if let Some(file) = file.filter(|f| !f.trim().is_empty()) {
        let (_, document) = workspace
            .resolve_document_path(file)
            .ok_or_else(|| Error::not_found("file", file))?;
        return document
            .syntax_tree()
            .and_then(|tree| method_in_tree(workspace, &tree, class_name, method_name))
            .ok_or_else(|| Error::not_found("method", method_name));
    }

    document_trees(workspace)
        .find_map(|(_, tree)| method_in_tree(workspace, &tree, class_name, method_name))
        .ok_or_else(|| Error::not_found("method", method_name))
}

fn method_in_tree(
    workspace: &Workspace,
    tree: &SyntaxTree,
    class_name: Option<&str>,
    method_name: &str,
) -> Option<MethodResult> {
    let method = nodes_of_kind(tree.root(), &[node_kinds::METHOD_DECLARATION])
        .into_iter()
        .filter(|m| named(tree, m, method_name))
        .find(|m| {
            class_name.is_none_or(|expected| {
                syntax::containing_class_name(tree, m)
                    .is_some_and(|actual| actual.eq_ignore_ascii_case(expected))
            })
        })?;

    let mods = syntax::modifiers(tree, &method);
    Some(MethodResult {
        method_name: syntax::declaration_name(tree, &method)
            .unwrap_or_default()
            .to_string(),
        class_name: syntax::containing_class_name(tree, &method)
            .unwrap_or_default()
            .to_string(),
        line_range: syntax::line_range(&method),
        file_path: workspace.relative_path(tree.path()),
        signature: method_signature(tree, &method),
        accessibility: mods.accessibility(),
        is_async: mods.has(Modifier::Async),
        return_type: return_type_text(tree, &method).to_string(),
        parameters: parameters(tree, &method),
        source_code: source_with_trivia(tree, &method),
    })
}

/// Several methods of one class, looked up by a comma-separated list.
///
/// The first type named `class_name` that declares at least one of the
/// methods wins; names it doesn't declare are left out.
///
/// # Errors
///
/// [`Error::InvalidQuery`] when either argument is empty,
/// [`Error::NotFound`] when no such type declares any of the methods.
pub fn get_methods(workspace: &Workspace, class_name: &str, method_names: &str) -> Result<MethodsResult> {
    require(class_name, "class name")?;
    require(method_names, "method names")?;
    let class_name = class_name.trim();
    let wanted: Vec<&str> = method_names
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .collect();

    for (_, tree) in document_trees(workspace) {
        let Some(class_node) = first_declaration(&tree, tree.root(), class_name, None, Shape::AnyType)
        else {
            continue;
        };
        let declared = direct_members(&class_node, node_kinds::METHOD_DECLARATION);
        let methods: Vec<MethodInfo> = wanted
            .iter()
            .filter_map(|name| declared.iter().find(|m| named(&tree, m, name)))
            .map(|method| {
                let mods = syntax::modifiers(&tree, method);
                MethodInfo {
                    name: syntax::declaration_name(&tree, method)
                        .unwrap_or_default()
                        .to_string(),
                    signature: method_signature(&tree, method),
                    line_range: syntax::line_range(method),
                    source_code: source_with_trivia(&tree, method),
                    return_type: return_type_text(&tree, method).to_string(),
                    parameters: parameters(&tree, method),
                    accessibility: mods.accessibility(),
                    is_async: mods.has(Modifier::Async),
                }
            })
            .collect();

        if !methods.is_empty() {
            return Ok(MethodsResult {
                class_name: syntax::declaration_name(&tree, &class_node)
                    .unwrap_or(class_name)
                    .to_string(),
                file_path: workspace.relative_path(tree.path()),
                methods,
            });
        }
    }

    Err(Error::not_found("methods of class", class_name))
}

/// Override modifiers of a method and what it overrides.
///
/// # Errors
///
/// [`Error::InvalidQuery`] when either argument is empty,
/// [`Error::NotFound`] when the class doesn't declare the method.
pub fn check_overridable(
    workspace: &Workspace,
    class_name: &str,
    method_name: &str,
) -> Result<OverridableResult> {
    require(class_name, "class name")?;
    require(method_name, "method name")?;
    let (class_name, method_name) = (class_name.trim(), method_name.trim());

    for entry in project_trees(workspace) {
        let tree = entry.tree();
        let Some(class_node) = first_declaration(tree, tree.root(), class_name, None, Shape::AnyType)
        else {
            continue;
        };
        let Some(method) = direct_members(&class_node, node_kinds::METHOD_DECLARATION)
            .into_iter()
            .find(|m| named(tree, m, method_name))
        else {
            continue;
        };

        let mods = syntax::modifiers(tree, &method);
        let is_virtual = mods.has(Modifier::Virtual);
        let is_override = mods.has(Modifier::Override);
        let is_abstract = mods.has(Modifier::Abstract);
        let is_sealed = mods.has(Modifier::Sealed);
        let is_static = mods.has(Modifier::Static);

        let base_method = if is_override {
            entry
                .model
                .declared_symbol(&method)
                .and_then(|symbol| symbol.overridden_method())
                .map(|overridden| {
                    let owner = overridden
                        .containing_type()
                        .map(|t| t.name().to_string())
                        .unwrap_or_default();
                    format!("{owner}.{}", overridden.name())
                })
        } else {
            None
        };

        return Ok(OverridableResult {
            class_name: syntax::declaration_name(tree, &class_node)
                .unwrap_or(class_name)
                .to_string(),
            method_name: syntax::declaration_name(tree, &method)
                .unwrap_or(method_name)
                .to_string(),
            is_virtual,
            is_override,
            is_abstract,
            is_sealed,
            can_be_overridden: !is_static && !is_sealed && (is_virtual || is_abstract || is_override),
            base_method,
            file_path: workspace.relative_path(tree.path()),
            line: syntax::line_of(&method),
        });
    }

    Err(Error::not_found("method", format!("{class_name}.{method_name}")))
}

// ============================================================================
// Signatures
// ============================================================================

/// `public static async Task<int> Name<T>(int a, string b)`.
fn method_signature(tree: &SyntaxTree, method: &Node<'_>) -> String {
    let mods = syntax::modifiers(tree, method);
    let mut words = vec![mods.accessibility().as_str()];
    for (modifier, keyword) in [
        (Modifier::Static, "static"),
        (Modifier::Async, "async"),
        (Modifier::Virtual, "virtual"),
        (Modifier::Override, "override"),
        (Modifier::Abstract, "abstract"),
    ] {
        if mods.has(modifier) {
            words.push(keyword);
        }
    }
    let name = syntax::declaration_name(tree, method).unwrap_or_default();
    let type_parameters = syntax::named_children(method)
        .into_iter()
        .find(|c| c.kind() == node_kinds::TYPE_PARAMETER_LIST)
        .map_or("", |list| tree.text(&list));
    format!(
        "{} {} {name}{type_parameters}{}",
        words.join(" "),
        return_type_text(tree, method),
        parameter_list_text(tree, method)
    )
}

/// `public Name(int a)`, with `static` for type initializers.
pub(crate) fn constructor_signature(tree: &SyntaxTree, ctor: &Node<'_>) -> String {
    let mods = syntax::modifiers(tree, ctor);
    let mut words = vec![mods.accessibility().as_str()];
    if mods.has(Modifier::Static) {
        words.push("static");
    }
    let name = syntax::declaration_name(tree, ctor).unwrap_or_default();
    format!("{} {name}{}", words.join(" "), parameter_list_text(tree, ctor))
}

fn return_type_text<'a>(tree: &'a SyntaxTree, method: &Node<'_>) -> &'a str {
    return_type_node(method).map_or("", |t| tree.text(&t))
}

fn parameter_list<'t>(callable: &Node<'t>) -> Option<Node<'t>> {
    callable.child_by_field_name("parameters").or_else(|| {
        syntax::named_children(callable)
            .into_iter()
            .find(|c| c.kind() == node_kinds::PARAMETER_LIST)
    })
}

fn parameter_list_text<'a>(tree: &'a SyntaxTree, callable: &Node<'_>) -> &'a str {
    parameter_list(callable).map_or("()", |list| tree.text(&list))
}

/// Parameter nodes of a method or constructor, in order.
pub(crate) fn parameter_nodes<'t>(callable: &Node<'t>) -> Vec<Node<'t>> {
    parameter_list(callable).map_or_else(Vec::new, |list| {
        syntax::named_children(&list)
            .into_iter()
            .filter(|p| p.kind() == node_kinds::PARAMETER || p.kind() == "parameter_array")
            .collect()
    })
}

/// Parameters with their types as written; an untyped parameter is `var`.
fn parameters(tree: &SyntaxTree, callable: &Node<'_>) -> Vec<ParameterInfo> {
    parameter_nodes(callable)
        .iter()
        .map(|p| ParameterInfo {
            name: syntax::declaration_name(tree, p)
                .unwrap_or_default()
                .to_string(),
            type_name: tree.field_text(p, "type").unwrap_or("var").to_string(),
        })
        .collect()
}

/// Source of a declaration with its leading comments and indentation, up to
/// the end of its last line.
fn source_with_trivia(tree: &SyntaxTree, node: &Node<'_>) -> String {
    let mut first = *node;
    while let Some(previous) = first.prev_sibling() {
        let adjacent = previous.end_position().row + 1 >= first.start_position().row;
        if previous.kind() != "comment" || !adjacent {
            break;
        }
        first = previous;
    }

    let source = tree.source();
    let start = source[..first.start_byte()].rfind('\n').map_or(0, |i| i + 1);
    let end = source[node.end_byte()..]
        .find('\n')
        .map_or(source.len(), |i| node.end_byte() + i + 1);
    source.get(start..end).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn parse(code: &str) -> SyntaxTree {
        SyntaxTree::parse(PathBuf::from("Outline.cs"), code.to_string())
            .expect("parsing test code should succeed")
    }

    fn first<'t>(tree: &'t SyntaxTree, kind: &str) -> Node<'t> {
        nodes_of_kind(tree.root(), &[kind])
            .into_iter()
            .next()
            .expect("node kind should be present")
    }

    #[test]
    fn method_signature_lists_modifiers_in_fixed_order() {
        let tree = parse(
            "class C { protected internal static async Task<T> Load<T>(int id, string name) => default; }",
        );

        let signature = method_signature(&tree, &first(&tree, node_kinds::METHOD_DECLARATION));

        assert_eq!(
            signature,
            "protected internal static async Task<T> Load<T>(int id, string name)"
        );
    }

    #[test]
    fn method_signature_defaults_to_private() {
        let tree = parse("class C { override void Tick() { } }");

        let signature = method_signature(&tree, &first(&tree, node_kinds::METHOD_DECLARATION));

        assert_eq!(signature, "private override void Tick()");
    }

    #[test]
    fn constructor_signature_includes_static() {
        let tree = parse("class C { static C() { } }");

        let signature = constructor_signature(&tree, &first(&tree, node_kinds::CONSTRUCTOR_DECLARATION));

        assert_eq!(signature, "private static C()");
    }

    #[test]
    fn parameters_keep_written_types() {
        let tree = parse("class C { void M(Dictionary<string, int> map, int[] xs) { } }");

        let params = parameters(&tree, &first(&tree, node_kinds::METHOD_DECLARATION));

        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "map");
        assert_eq!(params[0].type_name, "Dictionary<string, int>");
        assert_eq!(params[1].type_name, "int[]");
    }

    #[test]
    fn source_includes_leading_comments() {
        let tree = parse(
            "class C\n{\n    int x;\n\n    /// <summary>Adds.</summary>\n    public int Add(int a) => a;\n}\n",
        );

        let source = source_with_trivia(&tree, &first(&tree, node_kinds::METHOD_DECLARATION));

        assert_eq!(
            source,
            "    /// <summary>Adds.</summary>\n    public int Add(int a) => a;\n"
        );
    }

    #[test]
    fn property_accessors_are_detected() {
        let tree = parse(
            "class C { public int A { get; init; } public int B => 1; public int D { set { } } }",
        );
        let properties = nodes_of_kind(tree.root(), &[node_kinds::PROPERTY_DECLARATION]);

        let members: Vec<_> = properties.iter().map(|p| property_member(&tree, p)).collect();

        assert_eq!(members[0].has_getter, Some(true));
        assert_eq!(members[0].has_setter, Some(true));
        assert_eq!(members[1].has_getter, Some(true));
        assert_eq!(members[1].has_setter, Some(false));
        assert_eq!(members[2].has_getter, Some(false));
        assert_eq!(members[2].has_setter, Some(true));
    }

    #[test]
    fn dotted_skips_empty_parts() {
        assert_eq!(dotted(&["", "Calculator", "Add"]), "Calculator.Add");
        assert_eq!(dotted(&["Shop", "Calculator"]), "Shop.Calculator");
    }
}
