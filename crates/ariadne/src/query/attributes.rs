//! Attribute search and behavior step definitions.
//!
//! Both are purely syntactic: an attribute matches on the name as written,
//! never on what it binds to. That keeps `[Obsolete]`, `[ObsoleteAttribute]`
//! and `[System.Obsolete]` interchangeable without framework metadata.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use tree_sitter::Node;

use super::{GLOBAL, document_trees, nodes_of_kind};
use crate::error::{Result, require};
use crate::frontend::syntax::{self, node_kinds};
use crate::frontend::{SyntaxTree, declarator_name};
use crate::types::{AttributeMatch, AttributeSearchResult, DeclKind, StepDefinition, StepDefinitionResult};
use crate::workspace::Workspace;

const ATTRIBUTE_SUFFIX: &str = "Attribute";

/// Attribute names that bind a method to a behavior step, in match order.
pub const STEP_KEYWORDS: &[&str] = &["Given", "When", "Then", "And", "But", "StepDefinition"];

/// Class name suffixes dropped before deriving a step scope.
const STEP_CLASS_SUFFIXES: &[&str] = &["Steps", "StepDefinitions", "StepDefs"];

static WORD_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("([a-z])([A-Z])").expect("Invalid regex"));

// ============================================================================
// Name matching
// ============================================================================

/// `ObsoleteAttribute` and `Obsolete` both normalize to `Obsolete`.
#[must_use]
pub fn short_attribute_name(name: &str) -> &str {
    let name = name.trim();
    let cut = name.len().saturating_sub(ATTRIBUTE_SUFFIX.len());
    match name.get(cut..) {
        Some(suffix) if cut > 0 && suffix.eq_ignore_ascii_case(ATTRIBUTE_SUFFIX) => &name[..cut],
        _ => name,
    }
}

/// Whether an attribute written as `written` is the attribute `short`.
///
/// Accepts the short and the suffixed form, either alone or as the last
/// segment of a qualified name, ignoring case.
#[must_use]
pub fn attribute_name_matches(written: &str, short: &str) -> bool {
    let long = format!("{short}{ATTRIBUTE_SUFFIX}");
    let last_segment = written.rsplit('.').next().unwrap_or(written);
    [short, long.as_str()]
        .iter()
        .any(|form| written.eq_ignore_ascii_case(form) || last_segment.eq_ignore_ascii_case(form))
}

/// Human-readable area of a step class: `OrderCheckoutSteps` becomes
/// `Order Checkout`.
#[must_use]
pub fn step_scope(class_name: &str) -> String {
    let stripped = STEP_CLASS_SUFFIXES
        .iter()
        .find_map(|suffix| {
            let cut = class_name.len().checked_sub(suffix.len())?;
            class_name
                .get(cut..)
                .filter(|tail| tail.eq_ignore_ascii_case(suffix))
                .map(|_| &class_name[..cut])
        })
        .unwrap_or(class_name);
    WORD_BOUNDARY.replace_all(stripped, "$1 $2").into_owned()
}

// ============================================================================
// Attribute search
// ============================================================================

/// Declaration kinds searched for attributes.
fn attribute_target_kind(node_kind: &str) -> Option<DeclKind> {
    Some(match node_kind {
        node_kinds::CLASS_DECLARATION => DeclKind::Class,
        node_kinds::STRUCT_DECLARATION | node_kinds::RECORD_STRUCT_DECLARATION => DeclKind::Struct,
        node_kinds::INTERFACE_DECLARATION => DeclKind::Interface,
        node_kinds::RECORD_DECLARATION => DeclKind::Record,
        node_kinds::ENUM_DECLARATION => DeclKind::Enum,
        node_kinds::METHOD_DECLARATION => DeclKind::Method,
        node_kinds::PROPERTY_DECLARATION => DeclKind::Property,
        node_kinds::FIELD_DECLARATION => DeclKind::Field,
        node_kinds::PARAMETER => DeclKind::Parameter,
        _ => return None,
    })
}

/// Every type, method, property, field and parameter carrying the
/// attribute, in document order.
///
/// With a `pattern`, the attribute's full text (arguments included) must
/// also contain it, ignoring case.
///
/// # Errors
///
/// [`crate::Error::InvalidQuery`] for an empty attribute name.
pub fn find_by_attribute(
    workspace: &Workspace,
    attribute: &str,
    pattern: Option<&str>,
) -> Result<AttributeSearchResult> {
    require(attribute, "attribute name")?;
    let short = short_attribute_name(attribute);
    let pattern = pattern.filter(|p| !p.is_empty());

    let mut matches = Vec::new();
    for (_, tree) in document_trees(workspace) {
        let file_path = workspace.relative_path(tree.path());
        for node in syntax::descendants(tree.root()) {
            let Some(member_type) = attribute_target_kind(node.kind()) else {
                continue;
            };
            let Some(attribute_text) = matching_attribute(&tree, &node, short, pattern) else {
                continue;
            };
            matches.push(AttributeMatch {
                member_type,
                name: attributed_name(&tree, &node, member_type),
                attribute_arguments: format!("[{attribute_text}]"),
                file_path: file_path.clone(),
                line: syntax::line_of(&node),
                containing_class: syntax::containing_class_name(&tree, &node)
                    .unwrap_or(if member_type.is_type() { "(none)" } else { GLOBAL })
                    .to_string(),
                namespace: syntax::namespace_of(&tree, &node),
            });
        }
    }

    debug!(attribute, matches = matches.len(), "Searched attributes");
    Ok(AttributeSearchResult {
        attribute: attribute.to_string(),
        pattern: pattern.map(ToString::to_string),
        total_count: matches.len(),
        matches,
    })
}

/// Attributes attached directly to a declaration, in source order.
fn attributes_of<'t>(decl: &Node<'t>) -> Vec<Node<'t>> {
    syntax::named_children(decl)
        .into_iter()
        .filter(|c| c.kind() == node_kinds::ATTRIBUTE_LIST)
        .flat_map(|list| syntax::named_children(&list))
        .filter(|a| a.kind() == node_kinds::ATTRIBUTE)
        .collect()
}

/// Text of the first attribute on `decl` that matches, without brackets.
fn matching_attribute<'a>(
    tree: &'a SyntaxTree,
    decl: &Node<'_>,
    short: &str,
    pattern: Option<&str>,
) -> Option<&'a str> {
    attributes_of(decl).into_iter().find_map(|attribute| {
        let written = tree.field_text(&attribute, "name")?;
        if !attribute_name_matches(written, short) {
            return None;
        }
        let text = tree.text(&attribute);
        pattern
            .is_none_or(|p| syntax::contains_ignore_case(text, p))
            .then_some(text)
    })
}

/// Reported name of an attributed declaration.
fn attributed_name(tree: &SyntaxTree, node: &Node<'_>, kind: DeclKind) -> String {
    match kind {
        DeclKind::Field => first_field_name(tree, node).unwrap_or("(unknown)").to_string(),
        DeclKind::Parameter => {
            let method = syntax::containing_member_name(tree, node).unwrap_or("(unknown)");
            let name = syntax::declaration_name(tree, node).unwrap_or_default();
            format!("{method}.{name}")
        }
        _ => syntax::declaration_name(tree, node)
            .unwrap_or_default()
            .to_string(),
    }
}

fn first_field_name<'a>(tree: &'a SyntaxTree, field: &Node<'_>) -> Option<&'a str> {
    let declaration = syntax::named_children(field)
        .into_iter()
        .find(|c| c.kind() == node_kinds::VARIABLE_DECLARATION)?;
    let declarator = syntax::named_children(&declaration)
        .into_iter()
        .find(|c| c.kind() == node_kinds::VARIABLE_DECLARATOR)?;
    declarator_name(tree, &declarator)
}

// ============================================================================
// Step definitions
// ============================================================================

/// Methods whose step attribute text contains `pattern`, ignoring case.
///
/// Only the first matching step attribute of each method is reported.
///
/// # Errors
///
/// [`crate::Error::InvalidQuery`] for an empty pattern.
pub fn find_step_definitions(workspace: &Workspace, pattern: &str) -> Result<StepDefinitionResult> {
    require(pattern, "pattern")?;

    let mut matches = Vec::new();
    for (_, tree) in document_trees(workspace) {
        for method in nodes_of_kind(tree.root(), &[node_kinds::METHOD_DECLARATION]) {
            if let Some(step) = step_definition(workspace, &tree, &method, pattern) {
                matches.push(step);
            }
        }
    }

    debug!(pattern, matches = matches.len(), "Found step definitions");
    Ok(StepDefinitionResult {
        pattern: pattern.to_string(),
        total_count: matches.len(),
        matches,
    })
}

fn step_definition(
    workspace: &Workspace,
    tree: &SyntaxTree,
    method: &Node<'_>,
    pattern: &str,
) -> Option<StepDefinition> {
    attributes_of(method).into_iter().find_map(|attribute| {
        let written = tree.field_text(&attribute, "name")?;
        let keyword = STEP_KEYWORDS
            .iter()
            .find(|k| attribute_name_matches(written, k))?;
        let regex = first_argument_text(tree, &attribute)?;
        if regex.is_empty() || !syntax::contains_ignore_case(&regex, pattern) {
            return None;
        }

        let class_name = syntax::containing_class_name(tree, method).unwrap_or("(unknown)");
        let lines = syntax::line_range(method);
        Some(StepDefinition {
            step_type: (*keyword).to_string(),
            regex,
            file_path: workspace.relative_path(tree.path()),
            class_name: class_name.to_string(),
            method_name: syntax::declaration_name(tree, method)
                .unwrap_or_default()
                .to_string(),
            start_line: lines.start(),
            end_line: lines.end(),
            line_count: lines.line_count(),
            scope: step_scope(class_name),
        })
    })
}

/// First argument of an attribute as the string it denotes.
fn first_argument_text(tree: &SyntaxTree, attribute: &Node<'_>) -> Option<String> {
    let arguments = syntax::named_children(attribute)
        .into_iter()
        .find(|c| c.kind() == node_kinds::ATTRIBUTE_ARGUMENT_LIST)?;
    let first = syntax::named_children(&arguments)
        .into_iter()
        .find(|c| c.kind() == node_kinds::ATTRIBUTE_ARGUMENT)?;
    // A named argument puts its `name_equals` first
    let expression = syntax::named_children(&first).into_iter().last()?;
    let text = tree.text(&expression);
    Some(match expression.kind() {
        node_kinds::STRING_LITERAL => unescape_regular(text),
        node_kinds::VERBATIM_STRING_LITERAL => unescape_verbatim(text),
        node_kinds::RAW_STRING_LITERAL => text.trim_matches('"').trim().to_string(),
        node_kinds::INTERPOLATED_STRING_EXPRESSION => text.to_string(),
        _ => text.trim_matches('"').to_string(),
    })
}

/// Value of a `"..."` literal.
fn unescape_regular(literal: &str) -> String {
    let body = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(literal);
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('a') => out.push('\u{7}'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Value of a `@"..."` literal.
fn unescape_verbatim(literal: &str) -> String {
    let body = literal
        .strip_prefix("@\"")
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(literal);
    body.replace("\"\"", "\"")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;

    fn parse(code: &str) -> SyntaxTree {
        SyntaxTree::parse(PathBuf::from("Steps.cs"), code.to_string())
            .expect("parsing test code should succeed")
    }

    fn first_attribute_argument(code: &str) -> Option<String> {
        let tree = parse(code);
        let attribute = nodes_of_kind(tree.root(), &[node_kinds::ATTRIBUTE])
            .into_iter()
            .next()
            .expect("should contain an attribute");
        first_argument_text(&tree, &attribute)
    }

    #[rstest]
    #[case("Obsolete", "Obsolete")]
    #[case("ObsoleteAttribute", "Obsolete")]
    #[case("obsoleteattribute", "obsolete")]
    #[case("Attribute", "Attribute")]
    fn short_name_strips_suffix(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(short_attribute_name(input), expected);
    }

    #[rstest]
    #[case("Obsolete", true)]
    #[case("obsolete", true)]
    #[case("ObsoleteAttribute", true)]
    #[case("System.Obsolete", true)]
    #[case("System.ObsoleteAttribute", true)]
    #[case("NotObsolete", false)]
    #[case("Obsolete.Other", false)]
    fn attribute_names_match_both_forms(#[case] written: &str, #[case] expected: bool) {
        assert_eq!(attribute_name_matches(written, "Obsolete"), expected);
    }

    #[rstest]
    #[case("OrderCheckoutSteps", "Order Checkout")]
    #[case("PaymentStepDefinitions", "Payment")]
    #[case("LoginStepDefs", "Login")]
    #[case("Checkout", "Checkout")]
    #[case("shoppingcartsteps", "shoppingcart")]
    fn scope_is_derived_from_class_name(#[case] class_name: &str, #[case] expected: &str) {
        assert_eq!(step_scope(class_name), expected);
    }

    #[test]
    fn regular_literal_is_unescaped() {
        let regex = first_argument_text_of(r#"[Given("^I have (\\d+) items\tin \"cart\"$")] void M() {}"#);

        assert_eq!(regex.as_deref(), Some("^I have (\\d+) items\tin \"cart\"$"));
    }

    #[test]
    fn verbatim_literal_keeps_backslashes() {
        let regex = first_argument_text_of(r#"[When(@"I pay (\d+) ""euros""")] void M() {}"#);

        assert_eq!(regex.as_deref(), Some(r#"I pay (\d+) "euros""#));
    }

    #[test]
    fn interpolated_literal_passes_through() {
        let regex = first_argument_text_of(r#"[Then($"total is {Total}")] void M() {}"#);

        assert_eq!(regex.as_deref(), Some(r#"$"total is {Total}""#));
    }

    #[test]
    fn attribute_without_arguments_has_no_text() {
        assert_eq!(first_argument_text_of("[Given] void M() {}"), None);
    }

    fn first_argument_text_of(member: &str) -> Option<String> {
        first_attribute_argument(&format!("class Steps {{ {member} }}"))
    }

    proptest! {
        #[test]
        fn suffixed_step_classes_scope_to_their_words(
            words in prop::collection::vec("[A-Z][a-z]{1,6}", 1..4)
        ) {
            let class_name = format!("{}Steps", words.concat());

            prop_assert_eq!(step_scope(&class_name), words.join(" "));
        }

        #[test]
        fn every_written_form_matches_its_short_name(name in "[A-Z][a-z]{1,10}") {
            prop_assume!(!name.to_ascii_lowercase().ends_with("attribute"));
            let short = short_attribute_name(&name).to_string();

            prop_assert!(attribute_name_matches(&name, &short));
            let suffixed = format!("{name}Attribute");
            let qualified = format!("Acme.Testing.{name}");
            prop_assert!(attribute_name_matches(&suffixed, &short));
            prop_assert!(attribute_name_matches(&qualified, &short));
            prop_assert_eq!(short_attribute_name(&suffixed), short.as_str());
        }
    }
}
