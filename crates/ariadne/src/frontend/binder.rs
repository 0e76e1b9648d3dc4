//! Semantic binding of syntax nodes.
//!
//! A [`SemanticModel`] answers three questions about nodes of one tree:
//! which symbol a declaration declares, which symbol (or candidate set) a
//! reference resolves to, and what type a type or expression denotes.
//!
//! ## Design
//!
//! Binding is lazy and per node: nothing is cached beyond the declaration
//! table, so a model is cheap to create and throw away per document.
//! Expression typing covers what navigation needs (receivers of member
//! accesses and the targets of `new()`), not the full language. Locals
//! never produce symbols; a name bound to a local shadows any member with
//! that name and resolves to nothing.

use tree_sitter::Node;

use super::compilation::Compilation;
use super::declarations::{declarator_name, return_type_node};
use super::scope::{TypeResolver, generic_identifier};
use super::symbols::{Symbol, SymbolId, SymbolKey, TypeRef};
use super::syntax::{self, SyntaxTree, node_kinds};
use crate::types::{DeclKind, Modifier};

/// Bound on nested expression inference (`var` chains, receivers of receivers).
const MAX_INFERENCE_DEPTH: usize = 8;

/// Kinds whose `name` field introduces a new name rather than referencing one.
const DECLARING_KINDS: &[&str] = &[
    node_kinds::CLASS_DECLARATION,
    node_kinds::STRUCT_DECLARATION,
    node_kinds::INTERFACE_DECLARATION,
    node_kinds::ENUM_DECLARATION,
    node_kinds::RECORD_DECLARATION,
    node_kinds::RECORD_STRUCT_DECLARATION,
    node_kinds::METHOD_DECLARATION,
    node_kinds::CONSTRUCTOR_DECLARATION,
    node_kinds::PROPERTY_DECLARATION,
    node_kinds::PARAMETER,
    node_kinds::TYPE_PARAMETER,
    node_kinds::NAMESPACE_DECLARATION,
    node_kinds::FILE_SCOPED_NAMESPACE_DECLARATION,
    node_kinds::LOCAL_FUNCTION_STATEMENT,
    node_kinds::CATCH_DECLARATION,
    node_kinds::DECLARATION_EXPRESSION,
    node_kinds::DECLARATION_PATTERN,
    "destructor_declaration",
    "enum_member_declaration",
    "delegate_declaration",
    "event_declaration",
    "parameter_array",
];

/// Member nodes that bound the search for locals.
const MEMBER_SCOPES: &[&str] = &[
    node_kinds::METHOD_DECLARATION,
    node_kinds::CONSTRUCTOR_DECLARATION,
    node_kinds::PROPERTY_DECLARATION,
    node_kinds::FIELD_DECLARATION,
    "destructor_declaration",
    "operator_declaration",
    "conversion_operator_declaration",
    "indexer_declaration",
];

/// What a reference resolves to.
///
/// `symbol` is set when binding is unambiguous. Otherwise `candidates`
/// holds every symbol the reference could mean.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// The bound symbol
    pub symbol: Option<Symbol>,
    /// Every plausible target when binding is ambiguous
    pub candidates: Vec<Symbol>,
}

impl Resolution {
    fn none() -> Self {
        Self::default()
    }

    fn resolved(symbol: Symbol) -> Self {
        Self {
            symbol: Some(symbol),
            candidates: Vec::new(),
        }
    }

    /// The resolved symbol, or else the first candidate.
    #[must_use]
    pub fn first(&self) -> Option<&Symbol> {
        self.symbol.as_ref().or_else(|| self.candidates.first())
    }

    /// Whether nothing was bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbol.is_none() && self.candidates.is_empty()
    }
}

/// A local variable as seen from a later use.
#[derive(Debug, Clone, Copy)]
struct LocalVar<'t> {
    /// Declared type; `var` or absent means inferred
    type_node: Option<Node<'t>>,
    /// Initializer expression
    value: Option<Node<'t>>,
    /// Collection a `foreach` variable iterates
    element_of: Option<Node<'t>>,
}

impl LocalVar<'_> {
    fn untyped() -> Self {
        Self {
            type_node: None,
            value: None,
            element_of: None,
        }
    }
}

/// Binder for one tree of a compilation.
pub struct SemanticModel<'c> {
    compilation: &'c Compilation,
    tree_index: usize,
}

impl<'c> SemanticModel<'c> {
    pub(crate) fn new(compilation: &'c Compilation, tree_index: usize) -> Self {
        Self {
            compilation,
            tree_index,
        }
    }

    /// The tree this model binds.
    #[must_use]
    pub fn tree(&self) -> &'c SyntaxTree {
        &self.compilation.trees()[self.tree_index]
    }

    fn resolver(&self) -> TypeResolver<'c> {
        TypeResolver::new(self.compilation.table(), self.tree(), self.tree_index)
    }

    fn symbol(&self, id: SymbolId) -> Symbol {
        self.compilation.symbol(id)
    }

    fn type_symbol(&self, type_ref: &TypeRef) -> Symbol {
        Symbol::from_type_ref(self.compilation.table(), type_ref)
    }

    // ========================================================================
    // Public binding surface
    // ========================================================================

    /// Symbol declared by a declaration node.
    ///
    /// A field declaration yields the symbol of its first declarator.
    #[must_use]
    pub fn declared_symbol(&self, node: &Node<'_>) -> Option<Symbol> {
        let node = if node.kind() == node_kinds::FIELD_DECLARATION {
            first_declarator(node)?
        } else {
            *node
        };
        self.compilation
            .table()
            .symbol_for_node(self.tree_index, node.id())
            .map(|id| self.symbol(id))
    }

    /// Symbol (or candidates) a reference node binds to.
    ///
    /// Accepts identifiers, generic and qualified names, member accesses,
    /// invocations and object creations. Anything else binds to nothing.
    #[must_use]
    pub fn resolved_or_candidate_symbols(&self, node: &Node<'_>) -> Resolution {
        self.resolve_node(*node, 0)
    }

    /// Type denoted by type syntax, or the type of an expression.
    #[must_use]
    pub fn type_at(&self, node: &Node<'_>) -> Option<Symbol> {
        use node_kinds::{
            ALIAS_QUALIFIED_NAME, ARRAY_TYPE, GENERIC_NAME, IDENTIFIER, NULLABLE_TYPE,
            PREDEFINED_TYPE, QUALIFIED_NAME,
        };

        let is_type_syntax = match node.kind() {
            PREDEFINED_TYPE | ARRAY_TYPE | NULLABLE_TYPE | QUALIFIED_NAME | ALIAS_QUALIFIED_NAME => true,
            IDENTIFIER | GENERIC_NAME => is_type_position(node),
            _ => false,
        };
        let type_ref = if is_type_syntax {
            Some(self.resolver().resolve(*node))
        } else {
            self.expression_type(*node, 0)
        };
        type_ref.map(|t| self.type_symbol(&t))
    }

    // ========================================================================
    // Reference resolution
    // ========================================================================

    fn resolve_node(&self, node: Node<'_>, depth: usize) -> Resolution {
        use node_kinds::{
            ALIAS_QUALIFIED_NAME, GENERIC_NAME, IDENTIFIER, IMPLICIT_OBJECT_CREATION_EXPRESSION,
            INVOCATION_EXPRESSION, MEMBER_ACCESS_EXPRESSION, MEMBER_BINDING_EXPRESSION,
            OBJECT_CREATION_EXPRESSION, QUALIFIED_NAME,
        };

        match node.kind() {
            INVOCATION_EXPRESSION => node
                .child_by_field_name("function")
                .map_or_else(Resolution::none, |f| self.resolve_callee(f, depth)),
            OBJECT_CREATION_EXPRESSION | IMPLICIT_OBJECT_CREATION_EXPRESSION => {
                self.resolve_creation(node, depth)
            }
            MEMBER_ACCESS_EXPRESSION | MEMBER_BINDING_EXPRESSION => node
                .child_by_field_name("name")
                .map_or_else(Resolution::none, |n| self.resolve_name(n, depth)),
            IDENTIFIER | GENERIC_NAME => self.resolve_name(node, depth),
            QUALIFIED_NAME | ALIAS_QUALIFIED_NAME => self.resolve_type_syntax(node),
            _ => Resolution::none(),
        }
    }

    fn resolve_callee(&self, function: Node<'_>, depth: usize) -> Resolution {
        match function.kind() {
            node_kinds::MEMBER_ACCESS_EXPRESSION | node_kinds::MEMBER_BINDING_EXPRESSION => function
                .child_by_field_name("name")
                .map_or_else(Resolution::none, |n| self.resolve_name(n, depth)),
            node_kinds::IDENTIFIER | node_kinds::GENERIC_NAME => self.resolve_name(function, depth),
            // `x?.M(...)` calls the member bound at the tail of the access
            node_kinds::CONDITIONAL_ACCESS_EXPRESSION => syntax::named_children(&function)
                .into_iter()
                .rev()
                .find(|c| c.kind() == node_kinds::MEMBER_BINDING_EXPRESSION)
                .and_then(|binding| binding.child_by_field_name("name"))
                .map_or_else(Resolution::none, |n| self.resolve_name(n, depth)),
            _ => Resolution::none(),
        }
    }

    /// Constructor a creation expression calls, or the created type when it
    /// declares no constructors.
    fn resolve_creation(&self, creation: Node<'_>, depth: usize) -> Resolution {
        let Some(created) = self.creation_type(creation, depth) else {
            return Resolution::none();
        };
        let arity = argument_count(&creation);
        let constructors: Vec<_> = self
            .type_symbol(&created)
            .members()
            .into_iter()
            .filter(|m| m.kind() == DeclKind::Constructor)
            .collect();
        if constructors.is_empty() {
            return Resolution::resolved(self.type_symbol(&created));
        }
        select_overload(constructors, Some(arity))
    }

    fn resolve_name(&self, node: Node<'_>, depth: usize) -> Resolution {
        use node_kinds::{
            ALIAS_QUALIFIED_NAME, GENERIC_NAME, IDENTIFIER, MEMBER_ACCESS_EXPRESSION,
            MEMBER_BINDING_EXPRESSION, QUALIFIED_NAME,
        };

        // The identifier of a generic name binds as the generic name
        if node.kind() == IDENTIFIER
            && let Some(parent) = node.parent()
            && parent.kind() == GENERIC_NAME
        {
            return self.resolve_name(parent, depth);
        }

        let tree = self.tree();
        let name = simple_name(tree, &node);
        let Some(parent) = node.parent() else {
            return Resolution::none();
        };

        if is_declaration_name(&node) {
            return self
                .declared_symbol(&parent)
                .map_or_else(Resolution::none, Resolution::resolved);
        }
        if in_namespace_name(&node) {
            return Resolution::none();
        }

        match parent.kind() {
            MEMBER_ACCESS_EXPRESSION if syntax::is_field(&parent, "name", &node) => {
                let Some(receiver) = parent.child_by_field_name("expression") else {
                    return Resolution::none();
                };
                return self.resolve_member_of(receiver, name, invocation_arity(&parent), depth);
            }
            MEMBER_BINDING_EXPRESSION => {
                let Some(receiver) = conditional_receiver(&parent) else {
                    return Resolution::none();
                };
                return self.resolve_member_of(receiver, name, invocation_arity(&parent), depth);
            }
            QUALIFIED_NAME | ALIAS_QUALIFIED_NAME => {
                if syntax::is_field(&parent, "name", &node) {
                    return self.resolve_type_syntax(parent);
                }
                // A qualifier is a namespace or an enclosing type
                return self
                    .resolver()
                    .lookup_type(name, node)
                    .map_or_else(Resolution::none, |id| Resolution::resolved(self.symbol(id)));
            }
            node_kinds::ATTRIBUTE => return self.resolve_attribute(name, node),
            _ => {}
        }

        if is_type_position(&node) {
            return self.resolve_type_syntax(node);
        }
        self.resolve_simple_name(node, name, invocation_arity(&node))
    }

    fn resolve_type_syntax(&self, node: Node<'_>) -> Resolution {
        let resolved = self.resolver().resolve(node);
        Resolution::resolved(self.type_symbol(&resolved))
    }

    /// `[Obsolete]` binds to `Obsolete` or `ObsoleteAttribute`.
    fn resolve_attribute(&self, name: &str, node: Node<'_>) -> Resolution {
        let resolver = self.resolver();
        let found = resolver
            .lookup_type(name, node)
            .or_else(|| resolver.lookup_type(&format!("{name}Attribute"), node));
        let symbol = match found {
            Some(id) => self.symbol(id),
            None => self.type_symbol(&TypeRef::external(name)),
        };
        Resolution::resolved(symbol)
    }

    /// Bind a simple name in expression context: locals, then parameters,
    /// then members of enclosing types, then types.
    fn resolve_simple_name(&self, node: Node<'_>, name: &str, arity: Option<usize>) -> Resolution {
        if self.find_local(name, node).is_some() {
            return Resolution::none();
        }
        if let Some(param) = self.find_parameter(name, node) {
            return Resolution::resolved(param);
        }
        for owner in self.enclosing_types(node) {
            let found = self.lookup_member(&TypeRef::declared(owner), name);
            if !found.is_empty() {
                return select_overload(found, arity);
            }
        }
        self.resolver()
            .lookup_type(name, node)
            .map_or_else(Resolution::none, |id| Resolution::resolved(self.symbol(id)))
    }

    fn resolve_member_of(&self, receiver: Node<'_>, name: &str, arity: Option<usize>, depth: usize) -> Resolution {
        let Some(receiver_type) = self.expression_type(receiver, depth + 1) else {
            return Resolution::none();
        };
        let found = self.lookup_member(&receiver_type, name);
        if found.is_empty() {
            return Resolution::none();
        }
        select_overload(found, arity)
    }

    /// Members named `name` on a type. The type itself is searched first,
    /// then each base type, then every interface; the first level with a
    /// match wins.
    fn lookup_member(&self, owner: &TypeRef, name: &str) -> Vec<Symbol> {
        if !matches!(owner.target, SymbolKey::Declared(_)) {
            return Vec::new();
        }
        let start = self.type_symbol(owner);
        let levels = std::iter::once(start.clone())
            .chain(start.base_chain())
            .chain(start.all_interfaces());
        for level in levels {
            let found: Vec<_> = level
                .members()
                .into_iter()
                .filter(|m| m.name() == name)
                .collect();
            if !found.is_empty() {
                return found;
            }
        }
        Vec::new()
    }

    // ========================================================================
    // Expression typing
    // ========================================================================

    fn expression_type(&self, expr: Node<'_>, depth: usize) -> Option<TypeRef> {
        use node_kinds::{
            AWAIT_EXPRESSION, BASE, BASE_EXPRESSION, CAST_EXPRESSION, GENERIC_NAME, IDENTIFIER,
            IMPLICIT_OBJECT_CREATION_EXPRESSION, INTERPOLATED_STRING_EXPRESSION,
            INVOCATION_EXPRESSION, MEMBER_ACCESS_EXPRESSION, OBJECT_CREATION_EXPRESSION,
            PARENTHESIZED_EXPRESSION, PREDEFINED_TYPE, RAW_STRING_LITERAL, STRING_LITERAL, THIS,
            THIS_EXPRESSION, VERBATIM_STRING_LITERAL,
        };

        if depth > MAX_INFERENCE_DEPTH {
            return None;
        }
        let tree = self.tree();

        match expr.kind() {
            PARENTHESIZED_EXPRESSION => expr
                .named_child(0)
                .and_then(|inner| self.expression_type(inner, depth + 1)),
            THIS_EXPRESSION | THIS => self.enclosing_types(expr).first().map(|id| TypeRef::declared(*id)),
            BASE_EXPRESSION | BASE => self
                .enclosing_types(expr)
                .first()
                .and_then(|id| self.compilation.table().get(*id).base_type.clone()),
            IDENTIFIER => match tree.text(&expr) {
                "this" => self.enclosing_types(expr).first().map(|id| TypeRef::declared(*id)),
                "base" => self
                    .enclosing_types(expr)
                    .first()
                    .and_then(|id| self.compilation.table().get(*id).base_type.clone()),
                _ => self.identifier_type(expr, depth),
            },
            GENERIC_NAME => Some(self.resolver().resolve(expr)),
            PREDEFINED_TYPE => Some(TypeRef::external(tree.text(&expr))),
            MEMBER_ACCESS_EXPRESSION => self.member_access_type(expr, depth),
            INVOCATION_EXPRESSION => {
                let resolution = self.resolve_node(expr, depth + 1);
                let method = resolution.first()?;
                method.data()?.declared_type.clone()
            }
            OBJECT_CREATION_EXPRESSION | IMPLICIT_OBJECT_CREATION_EXPRESSION => self.creation_type(expr, depth),
            CAST_EXPRESSION => expr
                .child_by_field_name("type")
                .map(|t| self.resolver().resolve(t)),
            "as_expression" => expr
                .child_by_field_name("right")
                .map(|t| self.resolver().resolve(t)),
            AWAIT_EXPRESSION => {
                let awaited = expr.named_child(0)?;
                self.expression_type(awaited, depth + 1).map(unwrap_task)
            }
            "element_access_expression" => {
                let collection = expr.child_by_field_name("expression")?;
                let collection_type = self.expression_type(collection, depth + 1)?;
                collection_type.args.last().cloned()
            }
            STRING_LITERAL | VERBATIM_STRING_LITERAL | RAW_STRING_LITERAL | INTERPOLATED_STRING_EXPRESSION => {
                Some(TypeRef::external("string"))
            }
            "integer_literal" => Some(TypeRef::external("int")),
            "boolean_literal" => Some(TypeRef::external("bool")),
            _ => None,
        }
    }

    fn identifier_type(&self, ident: Node<'_>, depth: usize) -> Option<TypeRef> {
        let name = self.tree().text(&ident);
        if let Some(local) = self.find_local(name, ident) {
            return self.local_type(local, depth + 1);
        }
        if let Some(param) = self.find_parameter(name, ident) {
            return param.data()?.declared_type.clone();
        }
        for owner in self.enclosing_types(ident) {
            let found = self.lookup_member(&TypeRef::declared(owner), name);
            if found.is_empty() {
                continue;
            }
            let member = found
                .iter()
                .find(|m| matches!(m.kind(), DeclKind::Field | DeclKind::Property))?;
            return member.data()?.declared_type.clone();
        }
        // Static access through a type name
        self.resolver()
            .lookup_type(name, ident)
            .map(TypeRef::declared)
    }

    fn member_access_type(&self, access: Node<'_>, depth: usize) -> Option<TypeRef> {
        let receiver = access.child_by_field_name("expression")?;
        let name_node = access.child_by_field_name("name")?;
        let name = simple_name(self.tree(), &name_node);

        match self.expression_type(receiver, depth + 1) {
            Some(receiver_type) => {
                let found = self.lookup_member(&receiver_type, name);
                let member = found.iter().find(|m| !m.kind().is_callable())?;
                if member.kind().is_type() {
                    return member.declared_id().map(TypeRef::declared);
                }
                member.data()?.declared_type.clone()
            }
            // `Shop.Util.MathHelper` spelled through namespaces
            None => {
                let dotted: String = self.tree().text(&access).split_whitespace().collect();
                self.resolver()
                    .lookup_qualified(&dotted, access)
                    .map(TypeRef::declared)
            }
        }
    }

    fn local_type(&self, local: LocalVar<'_>, depth: usize) -> Option<TypeRef> {
        if let Some(type_node) = local.type_node
            && !self.is_var(&type_node)
        {
            return Some(self.resolver().resolve(type_node));
        }
        if let Some(collection) = local.element_of {
            let collection_type = self.expression_type(collection, depth + 1)?;
            return collection_type.args.last().cloned();
        }
        local
            .value
            .and_then(|value| self.expression_type(value, depth + 1))
    }

    /// Type a creation expression constructs.
    fn creation_type(&self, creation: Node<'_>, depth: usize) -> Option<TypeRef> {
        if creation.kind() == node_kinds::IMPLICIT_OBJECT_CREATION_EXPRESSION {
            return self.contextual_type(creation, depth + 1);
        }
        creation
            .child_by_field_name("type")
            .map(|t| self.resolver().resolve(t))
    }

    /// Target type of a `new()` from its surroundings: a declaration, an
    /// assignment, or a return.
    fn contextual_type(&self, creation: Node<'_>, depth: usize) -> Option<TypeRef> {
        use node_kinds::{
            ARROW_EXPRESSION_CLAUSE, ASSIGNMENT_EXPRESSION, EQUALS_VALUE_CLAUSE, LAMBDA_EXPRESSION,
            LOCAL_FUNCTION_STATEMENT, METHOD_DECLARATION, PROPERTY_DECLARATION, RETURN_STATEMENT,
            VARIABLE_DECLARATION, VARIABLE_DECLARATOR,
        };

        if depth > MAX_INFERENCE_DEPTH {
            return None;
        }
        let mut parent = creation.parent()?;
        if parent.kind() == EQUALS_VALUE_CLAUSE {
            parent = parent.parent()?;
        }

        match parent.kind() {
            VARIABLE_DECLARATOR => {
                let declaration = parent
                    .parent()
                    .filter(|d| d.kind() == VARIABLE_DECLARATION)?;
                let type_node = declaration.child_by_field_name("type")?;
                (!self.is_var(&type_node)).then(|| self.resolver().resolve(type_node))
            }
            PROPERTY_DECLARATION => parent
                .child_by_field_name("type")
                .map(|t| self.resolver().resolve(t)),
            ASSIGNMENT_EXPRESSION if syntax::is_field(&parent, "right", &creation) => {
                let target = parent.child_by_field_name("left")?;
                self.expression_type(target, depth + 1)
            }
            RETURN_STATEMENT | ARROW_EXPRESSION_CLAUSE => {
                let owner = syntax::ancestor_of_kind(
                    &parent,
                    &[METHOD_DECLARATION, LOCAL_FUNCTION_STATEMENT, PROPERTY_DECLARATION, LAMBDA_EXPRESSION],
                )?;
                match owner.kind() {
                    LAMBDA_EXPRESSION => None,
                    PROPERTY_DECLARATION => owner
                        .child_by_field_name("type")
                        .map(|t| self.resolver().resolve(t)),
                    _ => {
                        let returned = self.resolver().resolve(return_type_node(&owner)?);
                        let is_async = syntax::modifiers(self.tree(), &owner).has(Modifier::Async);
                        Some(if is_async { unwrap_task(returned) } else { returned })
                    }
                }
            }
            _ => None,
        }
    }

    fn is_var(&self, type_node: &Node<'_>) -> bool {
        type_node.kind() == node_kinds::IMPLICIT_TYPE || self.tree().text(type_node) == "var"
    }

    // ========================================================================
    // Scopes
    // ========================================================================

    /// Declared types enclosing `node`, innermost first.
    fn enclosing_types(&self, node: Node<'_>) -> Vec<SymbolId> {
        let table = self.compilation.table();
        let mut types = Vec::new();
        let mut current = node.parent();
        while let Some(n) = current {
            if syntax::is_type_declaration(n.kind())
                && let Some(id) = table.symbol_for_node(self.tree_index, n.id())
            {
                types.push(id);
            }
            current = n.parent();
        }
        types
    }

    /// Parameter of the enclosing method or constructor named `name`.
    fn find_parameter(&self, name: &str, at: Node<'_>) -> Option<Symbol> {
        let callable = syntax::ancestor_of_kind(
            &at,
            &[node_kinds::METHOD_DECLARATION, node_kinds::CONSTRUCTOR_DECLARATION],
        )?;
        let params = callable.child_by_field_name("parameters")?;
        syntax::named_children(&params)
            .into_iter()
            .find(|p| syntax::declaration_name(self.tree(), p) == Some(name))
            .and_then(|p| self.declared_symbol(&p))
    }

    /// Nearest local declared before `at` within its member (or within the
    /// top-level statements).
    fn find_local<'t>(&self, name: &str, at: Node<'t>) -> Option<LocalVar<'t>> {
        let roots: Vec<Node<'t>> = match syntax::ancestor_of_kind(&at, MEMBER_SCOPES) {
            Some(member) => vec![member],
            None => {
                syntax::ancestor_of_kind(&at, &[node_kinds::GLOBAL_STATEMENT])?;
                let mut unit = at;
                while let Some(parent) = unit.parent() {
                    unit = parent;
                }
                syntax::named_children(&unit)
                    .into_iter()
                    .filter(|c| c.kind() == node_kinds::GLOBAL_STATEMENT)
                    .collect()
            }
        };

        let mut found = None;
        for root in roots {
            for node in syntax::descendants(root) {
                if node.start_byte() >= at.start_byte() {
                    break;
                }
                if let Some(local) = self.local_declared_by(node, name, at) {
                    found = Some(local);
                }
            }
        }
        found
    }

    /// The local `node` declares under `name`, if it is in scope at `at`.
    fn local_declared_by<'t>(&self, node: Node<'t>, name: &str, at: Node<'_>) -> Option<LocalVar<'t>> {
        use node_kinds::{
            ANONYMOUS_METHOD_EXPRESSION, CATCH_DECLARATION, DECLARATION_EXPRESSION,
            DECLARATION_PATTERN, FOREACH_STATEMENT, IDENTIFIER, LAMBDA_EXPRESSION,
            LOCAL_FUNCTION_STATEMENT, PARAMETER, PARAMETER_LIST, VARIABLE_DECLARATION,
            VARIABLE_DECLARATOR,
        };

        let tree = self.tree();
        match node.kind() {
            VARIABLE_DECLARATOR => {
                let declaration = node.parent().filter(|p| p.kind() == VARIABLE_DECLARATION)?;
                // A variable is not in scope inside its own initializer
                if declarator_name(tree, &node)? != name || contains(&node, &at) {
                    return None;
                }
                Some(LocalVar {
                    type_node: declaration.child_by_field_name("type"),
                    value: declarator_value(&node),
                    element_of: None,
                })
            }
            FOREACH_STATEMENT => {
                let left = node.child_by_field_name("left")?;
                if tree.text(&left) != name || !contains(&node, &at) {
                    return None;
                }
                Some(LocalVar {
                    type_node: node.child_by_field_name("type"),
                    value: None,
                    element_of: node.child_by_field_name("right"),
                })
            }
            CATCH_DECLARATION => {
                let clause = node.parent()?;
                if syntax::declaration_name(tree, &node)? != name || !contains(&clause, &at) {
                    return None;
                }
                Some(LocalVar {
                    type_node: node.child_by_field_name("type"),
                    ..LocalVar::untyped()
                })
            }
            DECLARATION_EXPRESSION | DECLARATION_PATTERN => {
                let designated = node
                    .child_by_field_name("name")
                    .or_else(|| node.child_by_field_name("designation"))?;
                if tree.text(&designated).trim() != name {
                    return None;
                }
                Some(LocalVar {
                    type_node: node.child_by_field_name("type"),
                    ..LocalVar::untyped()
                })
            }
            PARAMETER => {
                let owner = node
                    .parent()
                    .filter(|p| p.kind() == PARAMETER_LIST)?
                    .parent()?;
                let is_nested_function = matches!(
                    owner.kind(),
                    LAMBDA_EXPRESSION | LOCAL_FUNCTION_STATEMENT | ANONYMOUS_METHOD_EXPRESSION
                );
                if !is_nested_function
                    || syntax::declaration_name(tree, &node)? != name
                    || !contains(&owner, &at)
                {
                    return None;
                }
                Some(LocalVar {
                    type_node: node.child_by_field_name("type"),
                    ..LocalVar::untyped()
                })
            }
            LAMBDA_EXPRESSION => {
                let param = node
                    .child_by_field_name("parameters")
                    .filter(|p| p.kind() == IDENTIFIER)?;
                (tree.text(&param) == name && contains(&node, &at)).then(LocalVar::untyped)
            }
            LOCAL_FUNCTION_STATEMENT => {
                (syntax::declaration_name(tree, &node)? == name).then(LocalVar::untyped)
            }
            _ => None,
        }
    }
}

// ============================================================================
// Free helpers
// ============================================================================

/// Pick the overload that fits `arity`. Non-invoked names prefer a field or
/// property; an unresolvable method group becomes a candidate set.
fn select_overload(found: Vec<Symbol>, arity: Option<usize>) -> Resolution {
    match arity {
        Some(count) => {
            if !found.iter().any(|m| m.kind().is_callable()) {
                // Invoking a delegate-typed field or property
                return found.into_iter().next().map_or_else(Resolution::none, Resolution::resolved);
            }
            let callables: Vec<_> = found.into_iter().filter(|m| m.kind().is_callable()).collect();
            match callables.iter().find(|m| accepts_arity(m, count)) {
                Some(best) => Resolution::resolved(best.clone()),
                None => Resolution {
                    symbol: None,
                    candidates: callables,
                },
            }
        }
        None => {
            if let Some(value) = found.iter().find(|m| !m.kind().is_callable()) {
                return Resolution::resolved(value.clone());
            }
            if found.len() == 1 {
                return found.into_iter().next().map_or_else(Resolution::none, Resolution::resolved);
            }
            Resolution {
                symbol: None,
                candidates: found,
            }
        }
    }
}

fn accepts_arity(method: &Symbol, count: usize) -> bool {
    method.data().is_some_and(|d| {
        let total = d.parameters.len();
        count >= d.required_parameters && (count <= total || d.variadic)
    })
}

/// `Task<T>` and `ValueTask<T>` unwrap to `T`.
fn unwrap_task(awaited: TypeRef) -> TypeRef {
    let is_task = awaited
        .external_name()
        .is_some_and(|n| n.ends_with("Task") || n.ends_with("ValueTask"));
    if is_task && awaited.args.len() == 1 {
        return awaited.args.into_iter().next().unwrap_or_else(|| TypeRef::external("void"));
    }
    awaited
}

fn simple_name<'a>(tree: &'a SyntaxTree, node: &Node<'_>) -> &'a str {
    if node.kind() == node_kinds::GENERIC_NAME {
        generic_identifier(tree, node)
    } else {
        tree.text(node)
    }
}

fn contains(outer: &Node<'_>, inner: &Node<'_>) -> bool {
    outer.start_byte() <= inner.start_byte() && inner.end_byte() <= outer.end_byte()
}

fn first_declarator<'t>(field: &Node<'t>) -> Option<Node<'t>> {
    let declaration = syntax::named_children(field)
        .into_iter()
        .find(|c| c.kind() == node_kinds::VARIABLE_DECLARATION)?;
    syntax::named_children(&declaration)
        .into_iter()
        .find(|c| c.kind() == node_kinds::VARIABLE_DECLARATOR)
}

/// Initializer of a `variable_declarator`.
fn declarator_value<'t>(declarator: &Node<'t>) -> Option<Node<'t>> {
    if let Some(value) = declarator
        .child_by_field_name("value")
        .or_else(|| declarator.child_by_field_name("initializer"))
    {
        return Some(value);
    }
    let children = syntax::named_children(declarator);
    if let Some(clause) = children
        .iter()
        .find(|c| c.kind() == node_kinds::EQUALS_VALUE_CLAUSE)
    {
        return clause.named_child(0);
    }
    let mut cursor = declarator.walk();
    let has_equals = declarator.children(&mut cursor).any(|c| c.kind() == "=");
    if has_equals { children.last().copied() } else { None }
}

/// Argument count of an invocation or creation.
fn argument_count(call: &Node<'_>) -> usize {
    let arguments = call.child_by_field_name("arguments").or_else(|| {
        syntax::named_children(call)
            .into_iter()
            .find(|c| c.kind() == node_kinds::ARGUMENT_LIST)
    });
    arguments.map_or(0, |list| {
        syntax::named_children(&list)
            .iter()
            .filter(|a| a.kind() == node_kinds::ARGUMENT)
            .count()
    })
}

/// Argument count when `node` is the function of an invocation.
fn invocation_arity(node: &Node<'_>) -> Option<usize> {
    let parent = node.parent()?;
    match parent.kind() {
        node_kinds::INVOCATION_EXPRESSION if syntax::is_field(&parent, "function", node) => {
            Some(argument_count(&parent))
        }
        node_kinds::CONDITIONAL_ACCESS_EXPRESSION
            if node.kind() == node_kinds::MEMBER_BINDING_EXPRESSION =>
        {
            invocation_arity(&parent)
        }
        _ => None,
    }
}

/// Receiver of a `?.member` binding.
fn conditional_receiver<'t>(binding: &Node<'t>) -> Option<Node<'t>> {
    let access = syntax::ancestor_of_kind(binding, &[node_kinds::CONDITIONAL_ACCESS_EXPRESSION])?;
    access
        .child_by_field_name("condition")
        .or_else(|| access.named_child(0))
}

/// Whether `node` is the name a declaration introduces.
#[must_use]
pub fn is_declaration_name(node: &Node<'_>) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    match parent.kind() {
        node_kinds::FOREACH_STATEMENT => syntax::is_field(&parent, "left", node),
        node_kinds::VARIABLE_DECLARATOR => {
            syntax::is_field(&parent, "name", node)
                || parent
                    .named_child(0)
                    .is_some_and(|first| syntax::same_node(&first, node))
        }
        node_kinds::LAMBDA_EXPRESSION => syntax::is_field(&parent, "parameters", node),
        "single_variable_designation" | node_kinds::NAME_EQUALS => true,
        node_kinds::USING_DIRECTIVE => node
            .next_sibling()
            .is_some_and(|n| n.kind() == "="),
        kind if DECLARING_KINDS.contains(&kind) => syntax::is_field(&parent, "name", node),
        _ => false,
    }
}

/// Whether `node` is written where a type is expected.
#[must_use]
pub fn is_type_position(node: &Node<'_>) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    match parent.kind() {
        node_kinds::TYPE_ARGUMENT_LIST
        | node_kinds::BASE_LIST
        | node_kinds::ARRAY_TYPE
        | node_kinds::NULLABLE_TYPE
        | node_kinds::PRIMARY_CONSTRUCTOR_BASE_TYPE
        | "type_parameter_constraint"
        | "type_constraint"
        | "typeof_expression"
        | "default_expression"
        | "pointer_type"
        | "ref_type" => true,
        "as_expression" | "is_expression" => syntax::is_field(&parent, "right", node),
        _ => syntax::is_field(&parent, "type", node) || syntax::is_field(&parent, "returns", node),
    }
}

/// Whether `node` is part of a namespace name or a plain `using` import.
fn in_namespace_name(node: &Node<'_>) -> bool {
    let mut top = *node;
    while let Some(parent) = top.parent() {
        if parent.kind() != node_kinds::QUALIFIED_NAME {
            break;
        }
        top = parent;
    }
    let Some(parent) = top.parent() else {
        return false;
    };
    match parent.kind() {
        node_kinds::NAMESPACE_DECLARATION | node_kinds::FILE_SCOPED_NAMESPACE_DECLARATION => {
            syntax::is_field(&parent, "name", &top)
        }
        node_kinds::USING_DIRECTIVE => {
            let source_is_alias = {
                let mut cursor = parent.walk();
                parent.children(&mut cursor).any(|c| c.kind() == "=" || c.kind() == node_kinds::NAME_EQUALS)
            };
            !source_is_alias
        }
        _ => false,
    }
}
