//! Syntax trees and tree-sitter helpers for C# sources.
//!
//! Everything here is purely syntactic: parsing a document, reading node
//! text and positions, and answering "what encloses this node" questions.
//! Semantic questions live in the binder.

// Tree-sitter returns usize for positions, but lines are reported as u32.
// This is safe for practical source files (no file has 4 billion lines).
#![allow(clippy::cast_possible_truncation)]

use std::path::{Path, PathBuf};

use tree_sitter::Node;

use crate::error::{Error, LoadDiagnostic, Result};
use crate::types::{LineRange, Modifier, Modifiers};

/// Tree-sitter node kind constants for the C# grammar.
///
/// These match the node types defined in tree-sitter-c-sharp. Where grammar
/// revisions disagree on a name, both spellings are listed.
pub(crate) mod node_kinds {
    // Type declarations
    pub const CLASS_DECLARATION: &str = "class_declaration";
    pub const STRUCT_DECLARATION: &str = "struct_declaration";
    pub const INTERFACE_DECLARATION: &str = "interface_declaration";
    pub const ENUM_DECLARATION: &str = "enum_declaration";
    pub const RECORD_DECLARATION: &str = "record_declaration";
    pub const RECORD_STRUCT_DECLARATION: &str = "record_struct_declaration";

    // Members
    pub const METHOD_DECLARATION: &str = "method_declaration";
    pub const CONSTRUCTOR_DECLARATION: &str = "constructor_declaration";
    pub const PROPERTY_DECLARATION: &str = "property_declaration";
    pub const FIELD_DECLARATION: &str = "field_declaration";
    pub const LOCAL_FUNCTION_STATEMENT: &str = "local_function_statement";
    pub const ACCESSOR_LIST: &str = "accessor_list";
    pub const ACCESSOR_DECLARATION: &str = "accessor_declaration";

    // Namespaces & imports
    pub const COMPILATION_UNIT: &str = "compilation_unit";
    pub const NAMESPACE_DECLARATION: &str = "namespace_declaration";
    pub const FILE_SCOPED_NAMESPACE_DECLARATION: &str = "file_scoped_namespace_declaration";
    pub const USING_DIRECTIVE: &str = "using_directive";
    pub const NAME_EQUALS: &str = "name_equals";

    // Expressions
    pub const INVOCATION_EXPRESSION: &str = "invocation_expression";
    pub const OBJECT_CREATION_EXPRESSION: &str = "object_creation_expression";
    pub const IMPLICIT_OBJECT_CREATION_EXPRESSION: &str = "implicit_object_creation_expression";
    pub const MEMBER_ACCESS_EXPRESSION: &str = "member_access_expression";
    pub const CONDITIONAL_ACCESS_EXPRESSION: &str = "conditional_access_expression";
    pub const MEMBER_BINDING_EXPRESSION: &str = "member_binding_expression";
    pub const CAST_EXPRESSION: &str = "cast_expression";
    pub const PARENTHESIZED_EXPRESSION: &str = "parenthesized_expression";
    pub const AWAIT_EXPRESSION: &str = "await_expression";
    pub const ASSIGNMENT_EXPRESSION: &str = "assignment_expression";
    pub const THIS_EXPRESSION: &str = "this_expression";
    pub const BASE_EXPRESSION: &str = "base_expression";
    pub const THIS: &str = "this";
    pub const BASE: &str = "base";
    pub const LAMBDA_EXPRESSION: &str = "lambda_expression";
    pub const ANONYMOUS_METHOD_EXPRESSION: &str = "anonymous_method_expression";

    // Statements and declaration expressions
    pub const FOREACH_STATEMENT: &str = "foreach_statement";
    pub const RETURN_STATEMENT: &str = "return_statement";
    pub const CATCH_DECLARATION: &str = "catch_declaration";
    pub const DECLARATION_EXPRESSION: &str = "declaration_expression";
    pub const DECLARATION_PATTERN: &str = "declaration_pattern";
    pub const VARIABLE_DECLARATION: &str = "variable_declaration";
    pub const VARIABLE_DECLARATOR: &str = "variable_declarator";
    pub const EQUALS_VALUE_CLAUSE: &str = "equals_value_clause";
    pub const ARROW_EXPRESSION_CLAUSE: &str = "arrow_expression_clause";
    pub const GLOBAL_STATEMENT: &str = "global_statement";

    // Types & identifiers
    pub const IDENTIFIER: &str = "identifier";
    pub const QUALIFIED_NAME: &str = "qualified_name";
    pub const ALIAS_QUALIFIED_NAME: &str = "alias_qualified_name";
    pub const GENERIC_NAME: &str = "generic_name";
    pub const PREDEFINED_TYPE: &str = "predefined_type";
    pub const IMPLICIT_TYPE: &str = "implicit_type";
    pub const NULLABLE_TYPE: &str = "nullable_type";
    pub const ARRAY_TYPE: &str = "array_type";
    pub const TYPE_ARGUMENT_LIST: &str = "type_argument_list";
    pub const TYPE_PARAMETER_LIST: &str = "type_parameter_list";
    pub const TYPE_PARAMETER: &str = "type_parameter";

    // Structure
    pub const DECLARATION_LIST: &str = "declaration_list";
    pub const PARAMETER_LIST: &str = "parameter_list";
    pub const PARAMETER: &str = "parameter";
    pub const ARGUMENT_LIST: &str = "argument_list";
    pub const ARGUMENT: &str = "argument";
    pub const MODIFIER: &str = "modifier";
    pub const BASE_LIST: &str = "base_list";
    pub const PRIMARY_CONSTRUCTOR_BASE_TYPE: &str = "primary_constructor_base_type";

    // Attributes
    pub const ATTRIBUTE_LIST: &str = "attribute_list";
    pub const ATTRIBUTE: &str = "attribute";
    pub const ATTRIBUTE_ARGUMENT_LIST: &str = "attribute_argument_list";
    pub const ATTRIBUTE_ARGUMENT: &str = "attribute_argument";

    // Literals
    pub const STRING_LITERAL: &str = "string_literal";
    pub const VERBATIM_STRING_LITERAL: &str = "verbatim_string_literal";
    pub const RAW_STRING_LITERAL: &str = "raw_string_literal";
    pub const INTERPOLATED_STRING_EXPRESSION: &str = "interpolated_string_expression";
}

use node_kinds::{
    CLASS_DECLARATION, COMPILATION_UNIT, CONSTRUCTOR_DECLARATION, ENUM_DECLARATION,
    FILE_SCOPED_NAMESPACE_DECLARATION, INTERFACE_DECLARATION, METHOD_DECLARATION, MODIFIER,
    NAMESPACE_DECLARATION, PROPERTY_DECLARATION, RECORD_DECLARATION, RECORD_STRUCT_DECLARATION,
    STRUCT_DECLARATION,
};

/// Kinds that declare a named type.
pub(crate) const TYPE_DECLARATIONS: &[&str] = &[
    CLASS_DECLARATION,
    STRUCT_DECLARATION,
    INTERFACE_DECLARATION,
    RECORD_DECLARATION,
    RECORD_STRUCT_DECLARATION,
    ENUM_DECLARATION,
];

/// Whether `kind` declares a named type.
pub(crate) fn is_type_declaration(kind: &str) -> bool {
    TYPE_DECLARATIONS.contains(&kind)
}

/// A parsed C# document.
///
/// Owns its source text so node text can be borrowed for as long as the
/// tree lives. Trees are shared between compilations behind an `Arc`.
pub struct SyntaxTree {
    path: PathBuf,
    source: String,
    tree: tree_sitter::Tree,
    line_starts: Vec<usize>,
}

impl std::fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("path", &self.path)
            .field("lines", &self.line_starts.len())
            .finish_non_exhaustive()
    }
}

impl SyntaxTree {
    /// Read and parse a document from disk.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadDiagnostic`] when the file can't be read, isn't UTF-8,
    /// or tree-sitter produces no tree. Callers skip the document.
    pub fn load(path: &Path) -> std::result::Result<Self, LoadDiagnostic> {
        let bytes = std::fs::read(path).map_err(|e| LoadDiagnostic::io_error(path.to_path_buf(), &e))?;
        let source =
            String::from_utf8(bytes).map_err(|_| LoadDiagnostic::encoding_error(path.to_path_buf()))?;
        Self::parse(path.to_path_buf(), source)
            .map_err(|e| LoadDiagnostic::parse_failed(path.to_path_buf(), e.to_string()))
    }

    /// Parse source text that is already in memory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parser`] if the grammar can't be loaded or no tree
    /// is produced.
    pub fn parse(path: PathBuf, source: String) -> Result<Self> {
        // Visual Studio writes a byte order mark; positions are reported without it
        let source = match source.strip_prefix('\u{feff}') {
            Some(rest) => rest.to_string(),
            None => source,
        };

        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .map_err(|e| Error::Parser(e.to_string()))?;
        let tree = parser.parse(&source, None).ok_or_else(|| {
            Error::Parser(format!("tree-sitter returned no tree for {}", path.display()))
        })?;

        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();

        Ok(Self {
            path,
            source,
            tree,
            line_starts,
        })
    }

    /// Absolute path of the document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Root `compilation_unit` node.
    #[must_use]
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Text of a node, or `""` if its range isn't valid UTF-8.
    #[must_use]
    pub fn text<'a>(&'a self, node: &Node<'_>) -> &'a str {
        node_text(node, &self.source).unwrap_or_default()
    }

    /// Text of a named field of `node`, if present.
    #[must_use]
    pub fn field_text<'a>(&'a self, node: &Node<'_>, field: &str) -> Option<&'a str> {
        node.child_by_field_name(field).map(|n| self.text(&n))
    }

    /// Text of the 1-based `line`, without its terminator.
    #[must_use]
    pub fn line_text(&self, line: u32) -> &str {
        let idx = (line as usize).saturating_sub(1);
        let Some(&start) = self.line_starts.get(idx) else {
            return "";
        };
        let end = self
            .line_starts
            .get(idx + 1)
            .map_or(self.source.len(), |next| next - 1);
        self.source
            .get(start..end)
            .unwrap_or_default()
            .trim_end_matches('\r')
    }

    /// Whether the source mentions `needle`, ignoring ASCII case.
    #[must_use]
    pub fn mentions(&self, needle: &str) -> bool {
        contains_ignore_case(&self.source, needle)
    }
}

/// Get text content of a tree-sitter node.
///
/// Returns `None` if the node's byte range does not fall on UTF-8 boundaries.
pub fn node_text<'a>(node: &Node<'_>, source: &'a str) -> Option<&'a str> {
    let text = source.get(node.byte_range());
    if text.is_none() {
        tracing::trace!(
            byte_range = ?node.byte_range(),
            node_kind = %node.kind(),
            "Node range is not on a UTF-8 boundary"
        );
    }
    text
}

/// Case-insensitive substring test.
#[must_use]
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// 1-based start line of a node.
#[must_use]
pub fn line_of(node: &Node<'_>) -> u32 {
    node.start_position().row as u32 + 1
}

/// 1-based start column of a node.
#[must_use]
pub fn column_of(node: &Node<'_>) -> u32 {
    node.start_position().column as u32 + 1
}

/// 1-based inclusive line range of a node.
#[must_use]
pub fn line_range(node: &Node<'_>) -> LineRange {
    LineRange(line_of(node), node.end_position().row as u32 + 1)
}

/// All named nodes under `root`, including `root`, in document order.
#[must_use]
pub fn descendants<'t>(root: Node<'t>) -> Vec<Node<'t>> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        out.push(node);
        let mut cursor = node.walk();
        let children: Vec<_> = node.named_children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    out
}

/// Named children of a node, collected.
#[must_use]
pub fn named_children<'t>(node: &Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// Nearest ancestor (excluding `node`) whose kind is in `kinds`.
#[must_use]
pub fn ancestor_of_kind<'t>(node: &Node<'t>, kinds: &[&str]) -> Option<Node<'t>> {
    let mut current = node.parent();
    while let Some(n) = current {
        if kinds.contains(&n.kind()) {
            return Some(n);
        }
        current = n.parent();
    }
    None
}

/// Whether `a` and `b` are the same node.
#[must_use]
pub fn same_node(a: &Node<'_>, b: &Node<'_>) -> bool {
    a.id() == b.id()
}

/// Whether `child` is the node stored under `field` of `parent`.
#[must_use]
pub fn is_field(parent: &Node<'_>, field: &str, child: &Node<'_>) -> bool {
    parent
        .child_by_field_name(field)
        .is_some_and(|n| same_node(&n, child))
}

/// Declared name of a declaration node (the `name` field).
#[must_use]
pub fn declaration_name<'a>(tree: &'a SyntaxTree, node: &Node<'_>) -> Option<&'a str> {
    tree.field_text(node, "name")
}

/// Modifier keywords attached to a declaration.
#[must_use]
pub fn modifiers(tree: &SyntaxTree, node: &Node<'_>) -> Modifiers {
    let mut mods = Modifiers::default();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == MODIFIER {
            // Some grammar revisions nest the keyword, others make it the node text
            for keyword in tree.text(&child).split_whitespace() {
                if let Some(m) = Modifier::from_keyword(keyword) {
                    mods.insert(m);
                }
            }
        }
    }
    mods
}

/// Namespace enclosing `node`, dotted, or `""` for the global namespace.
///
/// Nested namespace blocks are joined; a file-scoped namespace applies to
/// everything after it in the compilation unit.
#[must_use]
pub fn namespace_of(tree: &SyntaxTree, node: &Node<'_>) -> String {
    let mut parts = Vec::new();
    let mut current = node.parent();
    while let Some(n) = current {
        match n.kind() {
            NAMESPACE_DECLARATION | FILE_SCOPED_NAMESPACE_DECLARATION => {
                if let Some(name) = declaration_name(tree, &n) {
                    parts.push(name.to_string());
                }
            }
            COMPILATION_UNIT => {
                if let Some(name) = file_scoped_namespace_before(tree, &n, node.start_byte()) {
                    parts.push(name.to_string());
                }
            }
            _ => {}
        }
        current = n.parent();
    }
    parts.reverse();
    parts.join(".")
}

/// A file-scoped namespace declared in `unit` before `offset`, for grammars
/// that make its members siblings rather than children.
fn file_scoped_namespace_before<'a>(
    tree: &'a SyntaxTree,
    unit: &Node<'_>,
    offset: usize,
) -> Option<&'a str> {
    let mut cursor = unit.walk();
    let found = unit.named_children(&mut cursor).find(|c| {
        c.kind() == FILE_SCOPED_NAMESPACE_DECLARATION
            && c.start_byte() < offset
            && c.end_byte() <= offset
    });
    found.and_then(|ns| declaration_name(tree, &ns))
}

/// Name of the method, constructor, or property enclosing `node`.
#[must_use]
pub fn containing_member_name<'a>(tree: &'a SyntaxTree, node: &Node<'_>) -> Option<&'a str> {
    ancestor_of_kind(
        node,
        &[METHOD_DECLARATION, CONSTRUCTOR_DECLARATION, PROPERTY_DECLARATION],
    )
    .and_then(|member| declaration_name(tree, &member))
}

/// Name of the class, struct, or record enclosing `node`.
///
/// Interfaces and enums are deliberately not considered containing classes.
#[must_use]
pub fn containing_class_name<'a>(tree: &'a SyntaxTree, node: &Node<'_>) -> Option<&'a str> {
    ancestor_of_kind(
        node,
        &[
            CLASS_DECLARATION,
            STRUCT_DECLARATION,
            RECORD_DECLARATION,
            RECORD_STRUCT_DECLARATION,
        ],
    )
    .and_then(|decl| declaration_name(tree, &decl))
}

/// Name of the type declaration (of any kind) immediately enclosing `node`.
#[must_use]
pub fn enclosing_type_name<'a>(tree: &'a SyntaxTree, node: &Node<'_>) -> Option<&'a str> {
    ancestor_of_kind(node, TYPE_DECLARATIONS).and_then(|decl| declaration_name(tree, &decl))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_csharp(code: &str) -> SyntaxTree {
        SyntaxTree::parse(PathBuf::from("Test.cs"), code.to_string())
            .expect("parsing test code should succeed")
    }

    fn first_of_kind<'t>(tree: &'t SyntaxTree, kind: &str) -> Node<'t> {
        descendants(tree.root())
            .into_iter()
            .find(|n| n.kind() == kind)
            .expect("node kind should be present")
    }

    #[test]
    fn line_text_strips_terminators() {
        let tree = parse_csharp("class A\r\n{\r\n    int x;\r\n}\r\n");

        assert_eq!(tree.line_text(1), "class A");
        assert_eq!(tree.line_text(3), "    int x;");
        assert_eq!(tree.line_text(99), "");
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let tree = parse_csharp("\u{feff}class A {}");

        let class = first_of_kind(&tree, node_kinds::CLASS_DECLARATION);
        assert_eq!(declaration_name(&tree, &class), Some("A"));
        assert_eq!(column_of(&class), 1);
    }

    #[test]
    fn block_namespace_is_reported() {
        let tree = parse_csharp("namespace Shop.Orders { class Order {} }");

        let class = first_of_kind(&tree, node_kinds::CLASS_DECLARATION);
        assert_eq!(namespace_of(&tree, &class), "Shop.Orders");
    }

    #[test]
    fn nested_namespaces_are_joined() {
        let tree = parse_csharp("namespace Shop { namespace Orders { class Order {} } }");

        let class = first_of_kind(&tree, node_kinds::CLASS_DECLARATION);
        assert_eq!(namespace_of(&tree, &class), "Shop.Orders");
    }

    #[test]
    fn file_scoped_namespace_is_reported() {
        let tree = parse_csharp("namespace Shop.Billing;\n\npublic class Invoice {}\n");

        let class = first_of_kind(&tree, node_kinds::CLASS_DECLARATION);
        assert_eq!(namespace_of(&tree, &class), "Shop.Billing");
    }

    #[test]
    fn global_namespace_is_empty() {
        let tree = parse_csharp("class Loose {}");

        let class = first_of_kind(&tree, node_kinds::CLASS_DECLARATION);
        assert_eq!(namespace_of(&tree, &class), "");
    }

    #[test]
    fn containing_names_are_found() {
        let tree = parse_csharp(
            "class Outer { void Run() { Helper(); } int Count => Compute(); }",
        );

        let call = first_of_kind(&tree, node_kinds::INVOCATION_EXPRESSION);
        assert_eq!(containing_member_name(&tree, &call), Some("Run"));
        assert_eq!(containing_class_name(&tree, &call), Some("Outer"));
    }

    #[test]
    fn interface_is_not_a_containing_class() {
        let tree = parse_csharp("interface IShape { double Area(); }");

        let method = first_of_kind(&tree, node_kinds::METHOD_DECLARATION);
        assert_eq!(containing_class_name(&tree, &method), None);
        assert_eq!(enclosing_type_name(&tree, &method), Some("IShape"));
    }

    #[test]
    fn modifiers_are_collected() {
        let tree = parse_csharp("class A { protected internal static void M() {} }");

        let method = first_of_kind(&tree, node_kinds::METHOD_DECLARATION);
        let mods = modifiers(&tree, &method);
        assert!(mods.has(Modifier::Static));
        assert_eq!(mods.accessibility().as_str(), "protected internal");
    }

    #[test]
    fn mentions_is_case_insensitive() {
        let tree = parse_csharp("class Calculator {}");

        assert!(tree.mentions("calculator"));
        assert!(!tree.mentions("Widget"));
    }
}
