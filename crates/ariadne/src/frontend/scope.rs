//! Type name lookup.
//!
//! [`TypeResolver`] turns type syntax into a [`TypeRef`] against a finished
//! declaration table. It is shared by declaration collection (base lists,
//! member types) and by the binder (casts, creations, `typeof`-like type
//! positions).
//!
//! ## Lookup order for a simple name
//!
//! 1. Type parameters of enclosing methods and types
//! 2. Nested types of enclosing types, innermost first
//! 3. The enclosing namespace and each of its parents, then the global namespace
//! 4. `using` aliases and imported namespaces in scope
//! 5. Any declared type with that simple name, first declared wins
//! 6. Otherwise an external type carrying the written name

use tree_sitter::Node;

use super::symbols::{SymbolId, SymbolKey, SymbolTable, TypeRef};
use super::syntax::{self, SyntaxTree, node_kinds};

/// Resolves type syntax within one tree of a compilation.
pub(crate) struct TypeResolver<'a> {
    pub(crate) table: &'a SymbolTable,
    pub(crate) tree: &'a SyntaxTree,
    pub(crate) tree_index: usize,
}

impl<'a> TypeResolver<'a> {
    pub(crate) fn new(table: &'a SymbolTable, tree: &'a SyntaxTree, tree_index: usize) -> Self {
        Self {
            table,
            tree,
            tree_index,
        }
    }

    /// Resolve a type syntax node.
    pub(crate) fn resolve(&self, node: Node<'_>) -> TypeRef {
        use node_kinds::{
            ALIAS_QUALIFIED_NAME, ARRAY_TYPE, GENERIC_NAME, IDENTIFIER, IMPLICIT_TYPE,
            NULLABLE_TYPE, PREDEFINED_TYPE, QUALIFIED_NAME,
        };

        match node.kind() {
            PREDEFINED_TYPE | IMPLICIT_TYPE => TypeRef::external(self.tree.text(&node)),
            NULLABLE_TYPE => match type_child(&node) {
                Some(inner) => self.resolve(inner),
                None => TypeRef::external(self.tree.text(&node).trim_end_matches('?')),
            },
            ARRAY_TYPE => {
                let element = type_child(&node).map(|e| self.resolve(e));
                let element_text = type_child(&node).map_or("object", |e| self.tree.text(&e));
                TypeRef {
                    target: SymbolKey::External(format!("{element_text}[]").into()),
                    args: element.into_iter().collect(),
                }
            }
            IDENTIFIER => self.resolve_simple(self.tree.text(&node), Vec::new(), node),
            GENERIC_NAME => {
                let name = generic_identifier(self.tree, &node);
                let args = self.type_arguments(&node);
                self.resolve_simple(name, args, node)
            }
            QUALIFIED_NAME | ALIAS_QUALIFIED_NAME => self.resolve_qualified(node),
            _ => TypeRef::external(self.tree.text(&node)),
        }
    }

    /// Resolved type arguments of a `generic_name`.
    pub(crate) fn type_arguments(&self, generic: &Node<'_>) -> Vec<TypeRef> {
        let list = syntax::named_children(generic)
            .into_iter()
            .find(|c| c.kind() == node_kinds::TYPE_ARGUMENT_LIST);
        list.map_or_else(Vec::new, |list| {
            syntax::named_children(&list)
                .into_iter()
                .map(|arg| self.resolve(arg))
                .collect()
        })
    }

    fn resolve_simple(&self, name: &str, args: Vec<TypeRef>, context: Node<'_>) -> TypeRef {
        if self.is_type_parameter(name, context) {
            return TypeRef {
                target: SymbolKey::External(name.into()),
                args,
            };
        }
        let target = match self.lookup_type(name, context) {
            Some(id) => SymbolKey::Declared(id),
            None => SymbolKey::External(name.into()),
        };
        TypeRef { target, args }
    }

    fn resolve_qualified(&self, node: Node<'_>) -> TypeRef {
        // The last segment carries the type arguments, if any
        let last = node.child_by_field_name("name");
        let args = last
            .filter(|n| n.kind() == node_kinds::GENERIC_NAME)
            .map_or_else(Vec::new, |n| self.type_arguments(&n));
        let dotted = dotted_name(self.tree, &node);

        let target = match self.lookup_qualified(&dotted, node) {
            Some(id) => SymbolKey::Declared(id),
            None => SymbolKey::External(dotted.into()),
        };
        TypeRef { target, args }
    }

    /// Look up a simple type name from `context`.
    pub(crate) fn lookup_type(&self, name: &str, context: Node<'_>) -> Option<SymbolId> {
        self.nested_type(name, context)
            .or_else(|| self.namespace_type(name, context))
            .or_else(|| self.imported_type(name, context))
            .or_else(|| self.table.types_named(name).first().copied())
    }

    /// Look up a dotted type name (`Orders.Order`, `global::Shop.Order`).
    pub(crate) fn lookup_qualified(&self, dotted: &str, context: Node<'_>) -> Option<SymbolId> {
        let dotted = dotted.strip_prefix("global::").unwrap_or(dotted);
        if let Some(id) = self.table.type_by_qualified(dotted) {
            return Some(id);
        }
        let namespace = syntax::namespace_of(self.tree, &context);
        for prefix in namespace_prefixes(&namespace) {
            if let Some(id) = self.table.type_by_qualified(&format!("{prefix}.{dotted}")) {
                return Some(id);
            }
        }
        let (head, rest) = dotted.split_once('.')?;
        for using in self.usings_in_scope(context) {
            match &using.alias {
                Some(alias) if alias == head => {
                    return self
                        .table
                        .type_by_qualified(&format!("{}.{rest}", using.target));
                }
                Some(_) => {}
                None => {
                    if let Some(id) = self
                        .table
                        .type_by_qualified(&format!("{}.{dotted}", using.target))
                    {
                        return Some(id);
                    }
                }
            }
        }
        // Nested type of a type found by simple lookup: `Outer.Inner`
        let outer = self.lookup_type(head, context)?;
        self.table
            .type_by_qualified(&format!("{}.{rest}", self.type_key(outer)))
    }

    /// Whether `name` is a type parameter of a method or type enclosing `context`.
    pub(crate) fn is_type_parameter(&self, name: &str, context: Node<'_>) -> bool {
        let mut current = Some(context);
        while let Some(node) = current {
            let params = syntax::named_children(&node)
                .into_iter()
                .find(|c| c.kind() == node_kinds::TYPE_PARAMETER_LIST);
            if let Some(list) = params {
                let declared = syntax::named_children(&list).into_iter().any(|p| {
                    p.kind() == node_kinds::TYPE_PARAMETER
                        && type_parameter_name(self.tree, &p) == name
                });
                if declared {
                    return true;
                }
            }
            current = node.parent();
        }
        false
    }

    fn nested_type(&self, name: &str, context: Node<'_>) -> Option<SymbolId> {
        let mut current = Some(context);
        while let Some(node) = current {
            if syntax::is_type_declaration(node.kind())
                && let Some(owner) = self.table.symbol_for_node(self.tree_index, node.id())
            {
                let found = self.table.get(owner).members.iter().copied().find(|m| {
                    let member = self.table.get(*m);
                    member.kind.is_type() && member.name == name
                });
                if found.is_some() {
                    return found;
                }
            }
            current = node.parent();
        }
        None
    }

    fn namespace_type(&self, name: &str, context: Node<'_>) -> Option<SymbolId> {
        let namespace = syntax::namespace_of(self.tree, &context);
        namespace_prefixes(&namespace)
            .into_iter()
            .find_map(|prefix| {
                self.table
                    .type_by_qualified(&format!("{prefix}.{name}"))
            })
            .or_else(|| self.table.type_by_qualified(name))
    }

    fn imported_type(&self, name: &str, context: Node<'_>) -> Option<SymbolId> {
        let usings = self.usings_in_scope(context);
        if let Some(alias) = usings
            .iter()
            .find(|u| u.alias.as_deref() == Some(name))
        {
            return self.table.type_by_qualified(&alias.target);
        }
        usings
            .iter()
            .filter(|u| u.alias.is_none())
            .find_map(|u| self.table.type_by_qualified(&format!("{}.{name}", u.target)))
    }

    fn usings_in_scope(&self, context: Node<'_>) -> Vec<&super::symbols::UsingScope> {
        let offset = context.start_byte();
        self.table
            .usings
            .get(self.tree_index)
            .map_or_else(Vec::new, |usings| {
                usings
                    .iter()
                    .filter(|u| u.scope.contains(&offset))
                    .collect()
            })
    }

    /// `Namespace.Outer.Name` key of a declared type.
    pub(crate) fn type_key(&self, id: SymbolId) -> String {
        type_key(self.table, id)
    }
}

/// `Namespace.Outer.Name` lookup key of a declared type, without type
/// parameters.
pub(crate) fn type_key(table: &SymbolTable, id: SymbolId) -> String {
    let data = table.get(id);
    let prefix = match data.container {
        Some(outer) if table.get(outer).kind.is_type() => type_key(table, outer),
        _ => data.namespace.clone(),
    };
    if prefix.is_empty() {
        data.name.clone()
    } else {
        format!("{prefix}.{}", data.name)
    }
}

/// `Shop.Orders` yields `["Shop.Orders", "Shop"]`.
fn namespace_prefixes(namespace: &str) -> Vec<&str> {
    let mut prefixes = Vec::new();
    let mut current = namespace;
    while !current.is_empty() {
        prefixes.push(current);
        current = current.rsplit_once('.').map_or("", |(parent, _)| parent);
    }
    prefixes
}

/// The wrapped type of a nullable or array type.
fn type_child<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    node.child_by_field_name("type")
        .or_else(|| node.named_child(0))
}

/// Identifier of a `generic_name`.
pub(crate) fn generic_identifier<'a>(tree: &'a SyntaxTree, node: &Node<'_>) -> &'a str {
    node.child_by_field_name("name")
        .or_else(|| {
            syntax::named_children(node)
                .into_iter()
                .find(|c| c.kind() == node_kinds::IDENTIFIER)
        })
        .map_or("", |n| tree.text(&n))
}

/// Name declared by a `type_parameter`.
pub(crate) fn type_parameter_name<'a>(tree: &'a SyntaxTree, node: &Node<'_>) -> &'a str {
    node.child_by_field_name("name")
        .or_else(|| {
            syntax::named_children(node)
                .into_iter()
                .find(|c| c.kind() == node_kinds::IDENTIFIER)
        })
        .map_or_else(|| tree.text(node), |n| tree.text(&n))
}

/// Dotted form of a (possibly qualified, possibly generic) name, without
/// type arguments: `Shop.Repository<Order>` yields `Shop.Repository`.
pub(crate) fn dotted_name(tree: &SyntaxTree, node: &Node<'_>) -> String {
    match node.kind() {
        node_kinds::QUALIFIED_NAME => {
            let qualifier = node
                .child_by_field_name("qualifier")
                .map(|q| dotted_name(tree, &q))
                .unwrap_or_default();
            let name = node
                .child_by_field_name("name")
                .map(|n| dotted_name(tree, &n))
                .unwrap_or_default();
            if qualifier.is_empty() {
                name
            } else {
                format!("{qualifier}.{name}")
            }
        }
        node_kinds::GENERIC_NAME => generic_identifier(tree, node).to_string(),
        node_kinds::ALIAS_QUALIFIED_NAME => {
            let text = tree.text(node);
            let text = text.split_once("::").map_or(text, |(_, rest)| rest);
            text.split('<').next().unwrap_or(text).to_string()
        }
        _ => tree.text(node).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_prefixes_walk_outward() {
        assert_eq!(namespace_prefixes("Shop.Orders.Api"), [
            "Shop.Orders.Api",
            "Shop.Orders",
            "Shop"
        ]);
        assert!(namespace_prefixes("").is_empty());
    }
}
