//! Declaration collection.
//!
//! Builds the [`SymbolTable`] for a compilation in three passes:
//!
//! 1. **Declare**: walk every tree and create a symbol for each type,
//!    member and parameter. Partial types merge into their first fragment.
//!    Type syntax is queued, not resolved, since later trees may declare it.
//! 2. **Resolve**: resolve the queued base lists and member types now that
//!    every type name is known.
//! 3. **Link**: record the overridden method of every `override`.

use std::sync::Arc;

use tree_sitter::Node;

use super::scope::{TypeResolver, type_key, type_parameter_name};
use super::symbols::{DeclSite, SymbolData, SymbolId, SymbolKey, SymbolTable, TypeRef, UsingScope};
use super::syntax::{self, SyntaxTree, node_kinds};
use crate::types::{DeclKind, Modifier};

/// Build the declaration table for a set of trees.
pub(crate) fn build_symbol_table(trees: &[Arc<SyntaxTree>]) -> SymbolTable {
    let mut collector = Collector::default();
    for (index, tree) in trees.iter().enumerate() {
        collector.table.usings.push(collect_usings(tree));
        collector.declare_children(index, tree, tree.root(), &Scope::default());
    }

    let Collector { mut table, pending } = collector;
    let resolved: Vec<_> = pending
        .iter()
        .map(|p| (p.symbol, resolve_pending(&table, trees, p)))
        .collect();
    for (id, resolution) in resolved {
        apply_resolution(&mut table, id, resolution);
    }

    link_overrides(&mut table);
    table.compute_qualified_names();

    tracing::debug!(
        trees = trees.len(),
        symbols = table.len(),
        "Built symbol table"
    );
    table
}

/// Where the declaration walk currently is.
#[derive(Debug, Clone, Default)]
struct Scope {
    namespace: String,
    container: Option<SymbolId>,
}

/// Type syntax waiting for the second pass.
struct Pending<'t> {
    symbol: SymbolId,
    tree: usize,
    node: Node<'t>,
    what: PendingKind,
}

#[derive(Debug, Clone, Copy)]
enum PendingKind {
    /// A `base_list`; `bases_allowed` is false for structs and interfaces
    Bases { bases_allowed: bool },
    /// Declared type of a member or parameter
    MemberType,
}

enum Resolution {
    Bases { base: Option<TypeRef>, interfaces: Vec<TypeRef> },
    MemberType(TypeRef),
}

#[derive(Default)]
struct Collector<'t> {
    table: SymbolTable,
    pending: Vec<Pending<'t>>,
}

impl<'t> Collector<'t> {
    fn declare_children(&mut self, tree_index: usize, tree: &'t SyntaxTree, node: Node<'t>, scope: &Scope) {
        // A file-scoped namespace applies to every later sibling
        let mut scope = scope.clone();
        for child in syntax::named_children(&node) {
            if child.kind() == node_kinds::FILE_SCOPED_NAMESPACE_DECLARATION {
                scope.namespace = join(&scope.namespace, syntax::declaration_name(tree, &child).unwrap_or_default());
                self.declare_children(tree_index, tree, child, &scope);
            } else {
                self.declare(tree_index, tree, child, &scope);
            }
        }
    }

    fn declare(&mut self, tree_index: usize, tree: &'t SyntaxTree, node: Node<'t>, scope: &Scope) {
        use node_kinds::{
            CONSTRUCTOR_DECLARATION, DECLARATION_LIST, FIELD_DECLARATION, METHOD_DECLARATION,
            NAMESPACE_DECLARATION, PROPERTY_DECLARATION,
        };

        match node.kind() {
            NAMESPACE_DECLARATION => {
                let inner = Scope {
                    namespace: join(&scope.namespace, syntax::declaration_name(tree, &node).unwrap_or_default()),
                    container: None,
                };
                if let Some(body) = body_of(&node) {
                    self.declare_children(tree_index, tree, body, &inner);
                }
            }
            DECLARATION_LIST => self.declare_children(tree_index, tree, node, scope),
            kind if syntax::is_type_declaration(kind) => self.declare_type(tree_index, tree, node, scope),
            METHOD_DECLARATION | CONSTRUCTOR_DECLARATION => {
                if let Some(container) = scope.container {
                    self.declare_callable(tree_index, tree, node, container);
                }
            }
            PROPERTY_DECLARATION => {
                if let Some(container) = scope.container {
                    self.declare_property(tree_index, tree, node, container);
                }
            }
            FIELD_DECLARATION => {
                if let Some(container) = scope.container {
                    self.declare_fields(tree_index, tree, node, container);
                }
            }
            _ => {}
        }
    }

    fn declare_type(&mut self, tree_index: usize, tree: &'t SyntaxTree, node: Node<'t>, scope: &Scope) {
        use node_kinds::{INTERFACE_DECLARATION, PARAMETER_LIST, STRUCT_DECLARATION};

        let Some(name) = syntax::declaration_name(tree, &node) else {
            return;
        };
        let kind = type_kind(node.kind());
        let modifiers = syntax::modifiers(tree, &node);

        let mut data = SymbolData::new(kind, name);
        data.namespace.clone_from(&scope.namespace);
        data.container = scope.container;
        data.modifiers = modifiers;
        data.type_parameters = type_parameters(tree, &node);
        data.site = Some(site(tree_index, &node));

        let key = match scope.container {
            Some(outer) => format!("{}.{name}", type_key(&self.table, outer)),
            None => join(&scope.namespace, name),
        };

        // Partial fragments contribute members and bases to the first one
        let existing = self
            .table
            .type_by_qualified(&key)
            .filter(|id| modifiers.has(Modifier::Partial) && self.table.get(*id).modifiers.has(Modifier::Partial));
        let id = match existing {
            Some(id) => id,
            None => {
                let id = self.table.push(data);
                self.table.types_by_qualified.entry(key).or_insert(id);
                self.table.types_by_simple.entry(name.to_string()).or_default().push(id);
                if let Some(outer) = scope.container {
                    self.table.get_mut(outer).members.push(id);
                }
                id
            }
        };
        self.table.by_node.insert((tree_index, node.id()), id);

        if let Some(bases) = syntax::named_children(&node)
            .into_iter()
            .find(|c| c.kind() == node_kinds::BASE_LIST)
        {
            let bases_allowed = !matches!(node.kind(), STRUCT_DECLARATION | INTERFACE_DECLARATION)
                && kind != DeclKind::Struct;
            self.pending.push(Pending {
                symbol: id,
                tree: tree_index,
                node: bases,
                what: PendingKind::Bases { bases_allowed },
            });
        }

        // Positional record parameters become properties
        if matches!(kind, DeclKind::Record | DeclKind::Struct)
            && let Some(params) = syntax::named_children(&node)
                .into_iter()
                .find(|c| c.kind() == PARAMETER_LIST)
        {
            for param in syntax::named_children(&params) {
                if !is_parameter(&param) {
                    continue;
                }
                let Some(param_name) = syntax::declaration_name(tree, &param) else {
                    continue;
                };
                let mut property = SymbolData::new(DeclKind::Property, param_name);
                property.container = Some(id);
                property.namespace.clone_from(&scope.namespace);
                property.modifiers.insert(Modifier::Public);
                property.site = Some(site(tree_index, &param));
                property.type_text = tree.field_text(&param, "type").map(str::to_string);
                let property_id = self.add_member(tree_index, &param, property, id);
                self.queue_type(property_id, tree_index, param.child_by_field_name("type"));
            }
        }

        if let Some(body) = body_of(&node) {
            let inner = Scope {
                namespace: scope.namespace.clone(),
                container: Some(id),
            };
            self.declare_children(tree_index, tree, body, &inner);
        }
    }

    fn declare_callable(&mut self, tree_index: usize, tree: &'t SyntaxTree, node: Node<'t>, container: SymbolId) {
        let Some(name) = syntax::declaration_name(tree, &node) else {
            return;
        };
        let kind = if node.kind() == node_kinds::CONSTRUCTOR_DECLARATION {
            DeclKind::Constructor
        } else {
            DeclKind::Method
        };

        let mut data = SymbolData::new(kind, name);
        data.container = Some(container);
        data.namespace.clone_from(&self.table.get(container).namespace);
        data.modifiers = syntax::modifiers(tree, &node);
        data.type_parameters = type_parameters(tree, &node);
        data.site = Some(site(tree_index, &node));
        let return_type = return_type_node(&node);
        data.type_text = return_type.map(|r| tree.text(&r).to_string());
        let id = self.add_member(tree_index, &node, data, container);
        self.queue_type(id, tree_index, return_type);

        let Some(params) = node.child_by_field_name("parameters") else {
            return;
        };
        let mut required = 0;
        for param in syntax::named_children(&params) {
            if !is_parameter(&param) {
                continue;
            }
            let Some(param_name) = syntax::declaration_name(tree, &param) else {
                continue;
            };
            let variadic = is_variadic(tree, &param);
            let optional = is_optional(&param);
            if !variadic && !optional {
                required += 1;
            }

            let mut data = SymbolData::new(DeclKind::Parameter, param_name);
            data.container = Some(id);
            data.namespace.clone_from(&self.table.get(container).namespace);
            data.site = Some(site(tree_index, &param));
            data.type_text = tree.field_text(&param, "type").map(str::to_string);
            data.variadic = variadic;
            let param_id = self.table.push(data);
            self.table.by_node.insert((tree_index, param.id()), param_id);
            let method = self.table.get_mut(id);
            method.parameters.push(param_id);
            method.variadic |= variadic;
            self.queue_type(param_id, tree_index, param.child_by_field_name("type"));
        }
        self.table.get_mut(id).required_parameters = required;
    }

    fn declare_property(&mut self, tree_index: usize, tree: &'t SyntaxTree, node: Node<'t>, container: SymbolId) {
        let Some(name) = syntax::declaration_name(tree, &node) else {
            return;
        };
        let mut data = SymbolData::new(DeclKind::Property, name);
        data.container = Some(container);
        data.namespace.clone_from(&self.table.get(container).namespace);
        data.modifiers = syntax::modifiers(tree, &node);
        data.site = Some(site(tree_index, &node));
        data.type_text = tree.field_text(&node, "type").map(str::to_string);
        let id = self.add_member(tree_index, &node, data, container);
        self.queue_type(id, tree_index, node.child_by_field_name("type"));
    }

    fn declare_fields(&mut self, tree_index: usize, tree: &'t SyntaxTree, node: Node<'t>, container: SymbolId) {
        let Some(declaration) = syntax::named_children(&node)
            .into_iter()
            .find(|c| c.kind() == node_kinds::VARIABLE_DECLARATION)
        else {
            return;
        };
        let modifiers = syntax::modifiers(tree, &node);
        let type_node = declaration.child_by_field_name("type");

        for declarator in syntax::named_children(&declaration) {
            if declarator.kind() != node_kinds::VARIABLE_DECLARATOR {
                continue;
            }
            let Some(name) = declarator_name(tree, &declarator) else {
                continue;
            };
            let mut data = SymbolData::new(DeclKind::Field, name);
            data.container = Some(container);
            data.namespace.clone_from(&self.table.get(container).namespace);
            data.modifiers = modifiers;
            data.site = Some(site(tree_index, &node));
            data.type_text = type_node.map(|t| tree.text(&t).to_string());
            let id = self.add_member(tree_index, &declarator, data, container);
            self.queue_type(id, tree_index, type_node);
        }
    }

    fn add_member(&mut self, tree_index: usize, node: &Node<'_>, data: SymbolData, container: SymbolId) -> SymbolId {
        let id = self.table.push(data);
        self.table.by_node.insert((tree_index, node.id()), id);
        self.table.get_mut(container).members.push(id);
        id
    }

    fn queue_type(&mut self, symbol: SymbolId, tree: usize, node: Option<Node<'t>>) {
        if let Some(node) = node {
            self.pending.push(Pending {
                symbol,
                tree,
                node,
                what: PendingKind::MemberType,
            });
        }
    }
}

fn resolve_pending(table: &SymbolTable, trees: &[Arc<SyntaxTree>], pending: &Pending<'_>) -> Resolution {
    let resolver = TypeResolver::new(table, &trees[pending.tree], pending.tree);
    match pending.what {
        PendingKind::MemberType => Resolution::MemberType(resolver.resolve(pending.node)),
        PendingKind::Bases { bases_allowed } => {
            let mut base = None;
            let mut interfaces = Vec::new();
            for (position, entry) in base_entries(&pending.node).into_iter().enumerate() {
                let resolved = resolver.resolve(entry);
                if bases_allowed && position == 0 && is_base_class(table, &resolved) {
                    base = Some(resolved);
                } else {
                    interfaces.push(resolved);
                }
            }
            Resolution::Bases { base, interfaces }
        }
    }
}

/// Classify the first base-list entry of a class or record.
fn is_base_class(table: &SymbolTable, resolved: &TypeRef) -> bool {
    match &resolved.target {
        SymbolKey::Declared(id) => table.get(*id).kind != DeclKind::Interface,
        SymbolKey::External(name) => {
            let simple = name.rsplit('.').next().unwrap_or(name);
            !looks_like_interface(simple)
        }
    }
}

/// The `IName` convention for interfaces.
pub(crate) fn looks_like_interface(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next() == Some('I') && chars.next().is_some_and(char::is_uppercase)
}

fn apply_resolution(table: &mut SymbolTable, id: SymbolId, resolution: Resolution) {
    let data = table.get_mut(id);
    match resolution {
        Resolution::MemberType(resolved) => data.declared_type = Some(resolved),
        Resolution::Bases { base, interfaces } => {
            if data.base_type.is_none() {
                data.base_type = base;
            }
            for iface in interfaces {
                if !data.interfaces.contains(&iface) {
                    data.interfaces.push(iface);
                }
            }
        }
    }
}

fn link_overrides(table: &mut SymbolTable) {
    let mut links = Vec::new();
    for id in table.ids() {
        let data = table.get(id);
        if data.kind != DeclKind::Method || !data.modifiers.has(Modifier::Override) {
            continue;
        }
        let Some(container) = data.container else {
            continue;
        };
        let arity = data.parameters.len();
        let found = table
            .declared_base_chain(container)
            .iter()
            .filter_map(|base| match base.target {
                SymbolKey::Declared(base_id) => Some(base_id),
                SymbolKey::External(_) => None,
            })
            .find_map(|base_id| {
                table.get(base_id).members.iter().copied().find(|m| {
                    let member = table.get(*m);
                    member.kind == DeclKind::Method
                        && member.name == data.name
                        && member.parameters.len() == arity
                })
            });
        if let Some(overridden) = found {
            links.push((id, overridden));
        }
    }
    for (id, overridden) in links {
        table.get_mut(id).overridden = Some(overridden);
    }
}

// ============================================================================
// Syntax helpers
// ============================================================================

fn join(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else if name.is_empty() {
        namespace.to_string()
    } else {
        format!("{namespace}.{name}")
    }
}

fn type_kind(node_kind: &str) -> DeclKind {
    match node_kind {
        node_kinds::STRUCT_DECLARATION | node_kinds::RECORD_STRUCT_DECLARATION => DeclKind::Struct,
        node_kinds::INTERFACE_DECLARATION => DeclKind::Interface,
        node_kinds::RECORD_DECLARATION => DeclKind::Record,
        node_kinds::ENUM_DECLARATION => DeclKind::Enum,
        _ => DeclKind::Class,
    }
}

fn site(tree_index: usize, node: &Node<'_>) -> DeclSite {
    DeclSite {
        tree: tree_index,
        byte_range: node.byte_range(),
        lines: syntax::line_range(node),
    }
}

/// The member list of a type or namespace block.
fn body_of<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    node.child_by_field_name("body").or_else(|| {
        syntax::named_children(node)
            .into_iter()
            .find(|c| c.kind() == node_kinds::DECLARATION_LIST)
    })
}

/// Return type of a method; grammar revisions use `returns` or `type`.
pub(crate) fn return_type_node<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    if node.kind() != node_kinds::METHOD_DECLARATION && node.kind() != node_kinds::LOCAL_FUNCTION_STATEMENT {
        return None;
    }
    node.child_by_field_name("returns")
        .or_else(|| node.child_by_field_name("type"))
}

fn type_parameters(tree: &SyntaxTree, node: &Node<'_>) -> Vec<String> {
    syntax::named_children(node)
        .into_iter()
        .find(|c| c.kind() == node_kinds::TYPE_PARAMETER_LIST)
        .map_or_else(Vec::new, |list| {
            syntax::named_children(&list)
                .into_iter()
                .filter(|p| p.kind() == node_kinds::TYPE_PARAMETER)
                .map(|p| type_parameter_name(tree, &p).to_string())
                .collect()
        })
}

fn is_parameter(node: &Node<'_>) -> bool {
    matches!(node.kind(), node_kinds::PARAMETER | "parameter_array")
}

/// `params` parameter.
pub(crate) fn is_variadic(tree: &SyntaxTree, param: &Node<'_>) -> bool {
    if param.kind() == "parameter_array" {
        return true;
    }
    let mut cursor = param.walk();
    param
        .children(&mut cursor)
        .any(|c| tree.text(&c) == "params")
}

/// Parameter with a default value.
pub(crate) fn is_optional(param: &Node<'_>) -> bool {
    let mut cursor = param.walk();
    param
        .children(&mut cursor)
        .any(|c| c.kind() == "=" || c.kind() == node_kinds::EQUALS_VALUE_CLAUSE)
}

/// Name of a `variable_declarator`.
pub(crate) fn declarator_name<'a>(tree: &'a SyntaxTree, declarator: &Node<'_>) -> Option<&'a str> {
    declarator
        .child_by_field_name("name")
        .or_else(|| {
            syntax::named_children(declarator)
                .into_iter()
                .find(|c| c.kind() == node_kinds::IDENTIFIER)
        })
        .map(|n| tree.text(&n))
}

/// Entries of a `base_list`, unwrapping primary-constructor base calls.
fn base_entries<'t>(base_list: &Node<'t>) -> Vec<Node<'t>> {
    syntax::named_children(base_list)
        .into_iter()
        .filter_map(|entry| match entry.kind() {
            node_kinds::ARGUMENT_LIST => None,
            node_kinds::PRIMARY_CONSTRUCTOR_BASE_TYPE => entry
                .child_by_field_name("type")
                .or_else(|| entry.named_child(0)),
            _ => Some(entry),
        })
        .collect()
}

/// `using` directives of a tree with the byte range each one covers.
fn collect_usings(tree: &SyntaxTree) -> Vec<UsingScope> {
    syntax::descendants(tree.root())
        .into_iter()
        .filter(|n| n.kind() == node_kinds::USING_DIRECTIVE)
        .filter_map(|node| {
            let mut using = parse_using_directive(tree, &node)?;
            using.scope = syntax::ancestor_of_kind(&node, &[node_kinds::NAMESPACE_DECLARATION])
                .map_or(0..tree.source().len(), |ns| ns.byte_range());
            Some(using)
        })
        .collect()
}

fn parse_using_directive(tree: &SyntaxTree, node: &Node<'_>) -> Option<UsingScope> {
    use node_kinds::{ALIAS_QUALIFIED_NAME, GENERIC_NAME, IDENTIFIER, NAME_EQUALS, QUALIFIED_NAME};

    let mut alias = None;
    let mut target = None;
    let mut is_static = false;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "static" => is_static = true,
            NAME_EQUALS => {
                // The alias is inside the name_equals node
                alias = child
                    .child_by_field_name("name")
                    .or_else(|| child.named_child(0))
                    .map(|n| tree.text(&n).to_string());
            }
            IDENTIFIER if child.next_sibling().is_some_and(|n| tree.text(&n) == "=") => {
                alias = Some(tree.text(&child).to_string());
            }
            IDENTIFIER | QUALIFIED_NAME | GENERIC_NAME | ALIAS_QUALIFIED_NAME => {
                let text: String = tree.text(&child).split_whitespace().collect();
                let text = text.strip_prefix("global::").map_or(text.clone(), str::to_string);
                target = Some(text);
            }
            _ => {}
        }
    }

    Some(UsingScope {
        target: target?,
        alias,
        is_static,
        scope: 0..0,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn parse_csharp(name: &str, code: &str) -> Arc<SyntaxTree> {
        Arc::new(
            SyntaxTree::parse(PathBuf::from(name), code.to_string())
                .expect("parsing test code should succeed"),
        )
    }

    fn find(table: &SymbolTable, qualified: &str) -> SymbolId {
        table
            .ids()
            .find(|id| table.qualified_name(*id) == qualified)
            .unwrap_or_else(|| panic!("{qualified} should be declared"))
    }

    #[test]
    fn declares_types_and_members_with_qualified_names() {
        let tree = parse_csharp(
            "Calculator.cs",
            r"
namespace Shop.Math
{
    public class Calculator
    {
        private int _total;
        public int Total { get; set; }
        public Calculator(int seed) { }
        public int Add(int a, int b) => a + b;
    }
}
",
        );
        let table = build_symbol_table(&[tree]);

        let class = find(&table, "Shop.Math.Calculator");
        assert_eq!(table.get(class).kind, DeclKind::Class);
        assert_eq!(table.get(class).members.len(), 4);
        find(&table, "Shop.Math.Calculator._total");
        find(&table, "Shop.Math.Calculator.Total");
        find(&table, "Shop.Math.Calculator.Calculator(int)");
        let add = find(&table, "Shop.Math.Calculator.Add(int, int)");
        assert_eq!(table.get(add).required_parameters, 2);
        find(&table, "Shop.Math.Calculator.Add(int, int).a");
    }

    #[test]
    fn classifies_base_list_entries() {
        let tree = parse_csharp(
            "Shapes.cs",
            r"
namespace Geo;
public interface IShape { }
public class Shape : IShape { }
public class Circle : Shape, IDisposable, IShape { }
public class Widget : Component { }
public struct Point : IEquatable<Point> { }
",
        );
        let table = build_symbol_table(&[tree]);

        let shape = find(&table, "Geo.Shape");
        assert!(table.get(shape).base_type.is_none());
        assert_eq!(table.get(shape).interfaces.len(), 1);

        let circle = find(&table, "Geo.Circle");
        assert_eq!(
            table.get(circle).base_type,
            Some(TypeRef::declared(shape))
        );
        assert_eq!(table.get(circle).interfaces.len(), 2);

        let widget = find(&table, "Geo.Widget");
        assert_eq!(
            table.get(widget).base_type.as_ref().and_then(TypeRef::external_name),
            Some("Component")
        );

        let point = find(&table, "Geo.Point");
        assert!(table.get(point).base_type.is_none());
        assert_eq!(table.get(point).interfaces.len(), 1);
    }

    #[test]
    fn resolves_types_across_trees_and_usings() {
        let model = parse_csharp("Order.cs", "namespace Shop.Orders { public class Order { } }");
        let service = parse_csharp(
            "Service.cs",
            r"
using Shop.Orders;
namespace Shop.Services
{
    public class OrderService
    {
        private readonly Order _last;
    }
}
",
        );
        let table = build_symbol_table(&[model, service]);

        let order = find(&table, "Shop.Orders.Order");
        let field = find(&table, "Shop.Services.OrderService._last");
        assert_eq!(table.get(field).declared_type, Some(TypeRef::declared(order)));
    }

    #[test]
    fn partial_types_merge() {
        let first = parse_csharp("A.cs", "namespace N { public partial class Widget { void A() {} } }");
        let second = parse_csharp("B.cs", "namespace N { public partial class Widget : IWidget { void B() {} } }");
        let table = build_symbol_table(&[first, second]);

        let widget = find(&table, "N.Widget");
        assert_eq!(table.get(widget).members.len(), 2);
        assert_eq!(table.get(widget).interfaces.len(), 1);
        assert_eq!(table.types_named("Widget").len(), 1);
    }

    #[test]
    fn links_overrides_up_the_base_chain() {
        let tree = parse_csharp(
            "Calc.cs",
            r"
public class Calculator { public virtual int Add(int a, int b) => a + b; }
public class Scientific : Calculator { }
public class Fancy : Scientific { public override int Add(int a, int b) => base.Add(a, b); }
",
        );
        let table = build_symbol_table(&[tree]);

        let overriding = find(&table, "Fancy.Add(int, int)");
        let base = find(&table, "Calculator.Add(int, int)");
        assert_eq!(table.get(overriding).overridden, Some(base));
    }

    #[test]
    fn record_parameters_become_properties() {
        let tree = parse_csharp("User.cs", "namespace M; public record User(string Name, int Age);");
        let table = build_symbol_table(&[tree]);

        let user = find(&table, "M.User");
        assert_eq!(table.get(user).kind, DeclKind::Record);
        let age = find(&table, "M.User.Age");
        assert_eq!(table.get(age).kind, DeclKind::Property);
    }

    #[test]
    fn optional_and_params_parameters_are_not_required() {
        let tree = parse_csharp(
            "Log.cs",
            "class Log { void Write(string fmt, int level = 0, params object[] args) {} }",
        );
        let table = build_symbol_table(&[tree]);

        let write = find(&table, "Log.Write(string, int, object[])");
        assert_eq!(table.get(write).required_parameters, 1);
        assert!(table.get(write).variadic);
    }

    #[test]
    fn interface_naming_convention() {
        assert!(looks_like_interface("IDisposable"));
        assert!(!looks_like_interface("Item"));
        assert!(!looks_like_interface("I"));
    }

    #[test]
    fn using_alias_is_parsed() {
        let tree = parse_csharp("U.cs", "using Repo = Shop.Data.Repository;\nusing static System.Math;\nclass A {}");
        let usings = collect_usings(&tree);

        assert_eq!(usings.len(), 2);
        assert_eq!(usings[0].alias.as_deref(), Some("Repo"));
        assert_eq!(usings[0].target, "Shop.Data.Repository");
        assert!(usings[1].is_static);
        assert_eq!(usings[1].target, "System.Math");
    }
}
