//! Cross-reference scans: usages, callers and instantiations.
//!
//! Each scan locates its target once, then walks every project tree:
//!
//! 1. **Pre-filter**: a tree whose text never mentions the target's simple
//!    name (ignoring case) is skipped unbound, unless it contains a
//!    target-typed `new(...)`, whose type comes from a declaration that may
//!    live in another file.
//! 2. **Candidates**: nodes of the shape the query cares about.
//! 3. **Binding**: each candidate binds through the tree's semantic model and
//!    is compared with [`symbols_match`], so references from other projects'
//!    compilations still match by qualified name.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};
use tree_sitter::Node;

use super::locator::{Shape, locate};
use super::{
    GLOBAL, MemberQuery, ProjectTree, class_context, context_line, member_context, nodes_of_kind,
    project_trees,
};
use crate::error::{Error, Result, require};
use crate::frontend::syntax::{self, node_kinds};
use crate::frontend::{Symbol, is_declaration_name, symbols_match};
use crate::types::{
    CallerInfo, CallersResult, DeclKind, InstantiationInfo, InstantiationResult, UsageInfo,
    UsageResult,
};
use crate::workspace::Workspace;

const CREATIONS: &[&str] = &[
    node_kinds::OBJECT_CREATION_EXPRESSION,
    node_kinds::IMPLICIT_OBJECT_CREATION_EXPRESSION,
];

/// `new(` not preceded by a type name. Also matches `new()` constraints.
static TARGET_TYPED_NEW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bnew\s*\(").expect("Invalid regex"));

/// Trees worth binding for a target named `name`.
fn scanned_trees<'w>(
    workspace: &'w Workspace,
    name: &'w str,
    prefilter: bool,
) -> impl Iterator<Item = ProjectTree<'w>> {
    project_trees(workspace).filter(move |entry| {
        let tree = entry.tree();
        let keep = !prefilter || tree.mentions(name) || TARGET_TYPED_NEW.is_match(tree.source());
        if !keep {
            trace!(file = %entry.tree().path().display(), "Pre-filter skipped tree");
        }
        keep
    })
}

/// Every reference to a method, property or type.
///
/// `query` is `Name` or `Type.Name`. Methods are preferred over properties,
/// and a bare name falls back to a class declaration.
///
/// # Errors
///
/// [`Error::InvalidQuery`] for an empty query, [`Error::NotFound`] when no
/// declaration matches.
pub fn find_usages(workspace: &Workspace, query: &str, prefilter: bool) -> Result<UsageResult> {
    require(query, "symbol name")?;
    let MemberQuery { name, container } = MemberQuery::parse(query);

    let shapes: &[Shape] = if container.is_some() {
        &[Shape::Method, Shape::Property]
    } else {
        &[Shape::Method, Shape::Property, Shape::Class]
    };
    let target = locate(workspace, name, container, shapes)
        .ok_or_else(|| Error::not_found("symbol", query))?
        .symbol;

    let mut usages: Vec<UsageInfo> = Vec::new();
    for entry in scanned_trees(workspace, name, prefilter) {
        let tree = entry.tree();
        let file_path = workspace.relative_path(tree.path());
        let nodes = syntax::descendants(tree.root());

        for identifier in nodes.iter().filter(|n| n.kind() == node_kinds::IDENTIFIER) {
            if !tree.text(identifier).eq_ignore_ascii_case(name) || is_declaration_name(identifier) {
                continue;
            }
            let resolution = entry.model.resolved_or_candidate_symbols(identifier);
            if resolution.first().is_some_and(|s| symbols_match(&target, s)) {
                usages.push(usage(&entry, identifier, file_path.clone()));
            }
        }

        if !target.kind().is_type() {
            continue;
        }
        // Creations already seen through their type identifier stay single
        let mut seen: HashSet<u32> = usages
            .iter()
            .filter(|u| u.file_path == file_path)
            .map(|u| u.line)
            .collect();
        for creation in nodes
            .iter()
            .filter(|n| n.kind() == node_kinds::OBJECT_CREATION_EXPRESSION)
        {
            let mentions_name = creation
                .child_by_field_name("type")
                .is_some_and(|t| syntax::contains_ignore_case(tree.text(&t), name));
            if !mentions_name || seen.contains(&syntax::line_of(creation)) {
                continue;
            }
            if entry
                .model
                .type_at(creation)
                .is_some_and(|t| symbols_match(&target, &t))
            {
                seen.insert(syntax::line_of(creation));
                usages.push(usage(&entry, creation, file_path.clone()));
            }
        }
    }

    debug!(query, usages = usages.len(), "Found usages");
    Ok(UsageResult {
        symbol_name: query.to_string(),
        total_usages: usages.len(),
        usages,
    })
}

fn usage(entry: &ProjectTree<'_>, node: &Node<'_>, file_path: String) -> UsageInfo {
    let tree = entry.tree();
    UsageInfo {
        file_path,
        line: syntax::line_of(node),
        column: syntax::column_of(node),
        context_code: context_line(tree, node),
        method_context: member_context(tree, node),
    }
}

/// Every invocation of a method.
///
/// `query` is `Method` or `Type.Method`. An invocation that sits directly in
/// the target's own body, not nested in another call, is treated as the
/// declaration echoing itself and is not reported.
///
/// # Errors
///
/// [`Error::InvalidQuery`] for an empty query, [`Error::NotFound`] when no
/// method matches.
pub fn find_callers(workspace: &Workspace, query: &str, prefilter: bool) -> Result<CallersResult> {
    require(query, "method name")?;
    let MemberQuery { name, container } = MemberQuery::parse(query);

    let target = locate(workspace, name, container, &[Shape::Method])
        .ok_or_else(|| Error::not_found("method", query))?
        .symbol;

    let mut callers = Vec::new();
    for entry in scanned_trees(workspace, name, prefilter) {
        let tree = entry.tree();
        let file_path = workspace.relative_path(tree.path());

        for invocation in nodes_of_kind(tree.root(), &[node_kinds::INVOCATION_EXPRESSION]) {
            let resolution = entry.model.resolved_or_candidate_symbols(&invocation);
            let Some(invoked) = resolution.first() else {
                continue;
            };
            if invoked.kind() != DeclKind::Method || !symbols_match(&target, invoked) {
                continue;
            }
            if is_self_invocation(&entry, &invocation, &target) {
                trace!(line = syntax::line_of(&invocation), "Skipping self invocation");
                continue;
            }
            callers.push(CallerInfo {
                caller_class: class_context(tree, &invocation, GLOBAL),
                caller_method: member_context(tree, &invocation),
                file_path: file_path.clone(),
                line: syntax::line_of(&invocation),
                context_code: context_line(tree, &invocation),
            });
        }
    }

    debug!(query, callers = callers.len(), "Found callers");
    Ok(CallersResult {
        symbol: query.to_string(),
        total_count: callers.len(),
        callers,
    })
}

/// The enclosing method is the target and no other call wraps `invocation`.
fn is_self_invocation(entry: &ProjectTree<'_>, invocation: &Node<'_>, target: &Symbol) -> bool {
    let mut current = invocation.parent();
    while let Some(node) = current {
        match node.kind() {
            node_kinds::INVOCATION_EXPRESSION => return false,
            node_kinds::METHOD_DECLARATION => {
                return entry
                    .model
                    .declared_symbol(&node)
                    .is_some_and(|enclosing| symbols_match(target, &enclosing));
            }
            node_kinds::LOCAL_FUNCTION_STATEMENT
            | node_kinds::LAMBDA_EXPRESSION
            | node_kinds::ANONYMOUS_METHOD_EXPRESSION => return false,
            _ => current = node.parent(),
        }
    }
    false
}

/// Every construction of a type, explicit `new T(...)` and target-typed
/// `new(...)` alike, in document order.
///
/// # Errors
///
/// [`Error::InvalidQuery`] for an empty name, [`Error::NotFound`] when no
/// type declaration matches.
pub fn find_instantiations(
    workspace: &Workspace,
    class_name: &str,
    prefilter: bool,
) -> Result<InstantiationResult> {
    require(class_name, "class name")?;
    let name = class_name.trim();

    let target = locate(workspace, name, None, &[Shape::AnyType])
        .ok_or_else(|| Error::not_found("class", class_name))?
        .symbol;

    let mut instantiations = Vec::new();
    for entry in scanned_trees(workspace, name, prefilter) {
        let tree = entry.tree();
        let file_path = workspace.relative_path(tree.path());

        for creation in nodes_of_kind(tree.root(), CREATIONS) {
            let Some(created) = entry.model.type_at(&creation) else {
                continue;
            };
            if !symbols_match(&target, &created) {
                continue;
            }
            instantiations.push(InstantiationInfo {
                file_path: file_path.clone(),
                line: syntax::line_of(&creation),
                containing_method: member_context(tree, &creation),
                containing_class: class_context(tree, &creation, GLOBAL),
                context_code: context_line(tree, &creation),
            });
        }
    }

    debug!(class_name, instantiations = instantiations.len(), "Found instantiations");
    Ok(InstantiationResult {
        class_name: class_name.to_string(),
        total_count: instantiations.len(),
        instantiations,
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("_c = new();", true)]
    #[case("Calculator c = new (1, 2);", true)]
    #[case("where T : new()", true)]
    #[case("var c = new Calculator();", false)]
    #[case("var renewed = true;", false)]
    fn target_typed_new_is_recognized(#[case] source: &str, #[case] expected: bool) {
        assert_eq!(TARGET_TYPED_NEW.is_match(source), expected);
    }
}
