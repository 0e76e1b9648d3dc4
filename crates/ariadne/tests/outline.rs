//! Integration tests for symbol search, class outlines and method lookup.

mod common;

use ariadne::{Accessibility, DeclKind, Error, ErrorKind, LineRange};
use common::{shop, workspace_with_files};
use rstest::rstest;

// ============================================================================
// Symbol search
// ============================================================================

#[test]
fn find_symbol_lists_every_declaration_in_workspace_order() {
    let (_dir, navigator) = shop();

    let result = navigator.find_symbol("Add", None).expect("search failed");

    assert_eq!(result.kind, "any");
    let found: Vec<_> = result
        .results
        .iter()
        .map(|r| (r.file_path.as_str(), r.full_name.as_str(), r.line_range))
        .collect();
    assert_eq!(
        found,
        vec![
            ("Shop.Core/Calculator.cs", "Shop.Core.Calculator.Add", LineRange(7, 10)),
            ("Shop.Core/Calculator.cs", "Shop.Core.Calculator.Add", LineRange(12, 15)),
            ("Shop.Core/ICalculator.cs", "Shop.Core.ICalculator.Add", LineRange(5, 5)),
            (
                "Shop.Core/ScientificCalculator.cs",
                "Shop.Core.ScientificCalculator.Add",
                LineRange(5, 8)
            ),
        ]
    );
}

#[test]
fn find_symbol_kind_filter_restricts_results() {
    let (_dir, navigator) = shop();

    let result = navigator.find_symbol("calculator", Some("class")).expect("search failed");

    assert_eq!(result.kind, "class");
    assert_eq!(result.results.len(), 1);
    assert_eq!(result.results[0].full_name, "Shop.Core.Calculator");
    assert_eq!(result.results[0].namespace, "Shop.Core");
}

#[test]
fn properties_report_a_single_line() {
    let (_dir, navigator) = shop();

    let result = navigator.find_symbol("Title", Some("property")).expect("search failed");

    assert_eq!(result.results[0].line_range, LineRange(15, 15));
    assert_eq!(result.results[0].full_name, "Shop.App.ReportService.Title");
}

#[test]
fn unsupported_kind_is_invalid() {
    let (_dir, navigator) = shop();

    let err = navigator.find_symbol("Add", Some("enum")).expect_err("should fail");

    assert_eq!(err.kind(), ErrorKind::InvalidQuery);
}

#[test]
fn no_declaration_is_not_found() {
    let (_dir, navigator) = shop();

    let err = navigator.find_symbol("Divide", None).expect_err("should fail");

    assert!(matches!(err, Error::NotFound { what: "symbol", .. }));
}

// ============================================================================
// Class outlines
// ============================================================================

#[test]
fn list_class_groups_fields_properties_constructors_methods() {
    let (_dir, navigator) = shop();

    let result = navigator
        .list_class("Shop.App/ReportService.cs", "ReportService")
        .expect("outline failed");

    assert_eq!(result.namespace, "Shop.App");
    assert_eq!(result.line_range, LineRange(5, 21));
    let kinds: Vec<_> = result.members.iter().map(|m| (m.kind, m.name.as_str())).collect();
    assert_eq!(
        kinds,
        vec![
            (DeclKind::Field, "_calculator"),
            (DeclKind::Property, "Title"),
            (DeclKind::Constructor, "ReportService"),
            (DeclKind::Method, "Total"),
        ]
    );

    let field = &result.members[0];
    assert_eq!(field.type_name.as_deref(), Some("ICalculator"));
    assert_eq!(field.accessibility, Accessibility::Private);
    assert_eq!(field.is_readonly, Some(true));
    assert_eq!(field.line, Some(7));

    let property = &result.members[1];
    assert_eq!(property.has_getter, Some(true));
    assert_eq!(property.has_setter, Some(false));

    let method = &result.members[3];
    assert_eq!(method.signature.as_deref(), Some("public int Total(int a, int b)"));
    assert_eq!(method.return_type.as_deref(), Some("int"));
    assert_eq!(method.line_range, Some(LineRange(17, 20)));
}

#[test]
fn list_class_resolves_bare_file_names() {
    let (_dir, navigator) = shop();

    let result = navigator.list_class("calculator.cs", "Calculator").expect("outline failed");

    assert_eq!(result.file_path, "Shop.Core/Calculator.cs");
    assert_eq!(result.members.len(), 3);
    assert_eq!(
        result.members[0].signature.as_deref(),
        Some("public virtual int Add(int a, int b)")
    );
}

#[rstest]
#[case("Missing.cs", "Calculator", "file")]
#[case("Calculator.cs", "calculator", "class")]
fn list_class_not_found(#[case] file: &str, #[case] class_name: &str, #[case] what: &str) {
    let (_dir, navigator) = shop();

    let err = navigator.list_class(file, class_name).expect_err("should fail");

    assert!(matches!(err, Error::NotFound { what: w, .. } if w == what));
}

#[test]
fn list_classes_includes_sub_namespaces_sorted() {
    let (_dir, navigator) = shop();

    let result = navigator.list_classes("shop").expect("listing failed");

    let names: Vec<_> = result.classes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Calculator",
            "CalculatorSteps",
            "ICalculator",
            "Program",
            "ReportService",
            "ScientificCalculator",
        ]
    );
    assert_eq!(result.total_classes, 6);
    let program = result.classes.iter().find(|c| c.name == "Program").expect("Program listed");
    assert!(program.is_static);
}

#[test]
fn list_classes_does_not_match_namespace_prefixes() {
    let (_dir, navigator) = shop();

    let result = navigator.list_classes("Shop.App.Step").expect("listing failed");

    assert_eq!(result.total_classes, 0);
}

#[test]
fn namespace_structure_groups_types_by_namespace() {
    let (_dir, navigator) = shop();

    let result = navigator.get_namespace_structure("shop.app").expect("structure failed");

    let namespaces: Vec<_> = result
        .namespaces
        .iter()
        .map(|n| (n.name.as_str(), n.classes.clone()))
        .collect();
    assert_eq!(
        namespaces,
        vec![
            ("Shop.App", vec!["Program".to_string(), "ReportService".to_string()]),
            ("Shop.App.Steps", vec!["CalculatorSteps".to_string()]),
        ]
    );
}

#[test]
fn global_types_are_grouped_under_global() {
    let (_dir, navigator) = workspace_with_files(&[("Loose.cs", "public class Loose { }\n")]);
    let project = navigator.workspace().projects()[0].name().to_string();

    let result = navigator.get_namespace_structure(&project).expect("structure failed");

    assert_eq!(result.namespaces[0].name, "(global)");
    assert_eq!(result.namespaces[0].class_count, 1);
}

#[test]
fn unknown_project_is_not_found() {
    let (_dir, navigator) = shop();

    let err = navigator.get_namespace_structure("Shop.Web").expect_err("should fail");

    assert!(matches!(err, Error::NotFound { what: "project", .. }));
}

// ============================================================================
// Methods
// ============================================================================

#[test]
fn get_method_returns_source_and_signature() {
    let (_dir, navigator) = shop();

    let result = navigator
        .get_method(None, Some("reportservice"), "total")
        .expect("method failed");

    assert_eq!(result.method_name, "Total");
    assert_eq!(result.class_name, "ReportService");
    assert_eq!(result.line_range, LineRange(17, 20));
    assert_eq!(result.parameters.len(), 2);
    assert!(result.source_code.starts_with("        public int Total(int a, int b)"));
    assert!(result.source_code.contains("return _calculator.Add(a, b);"));
}

#[test]
fn get_method_with_file_searches_only_that_file() {
    let (_dir, navigator) = shop();

    let result = navigator
        .get_method(Some("ScientificCalculator.cs"), None, "Add")
        .expect("method failed");

    assert_eq!(result.class_name, "ScientificCalculator");
    assert_eq!(result.signature, "public override int Add(int a, int b)");
}

#[test]
fn get_methods_returns_requested_methods_found() {
    let (_dir, navigator) = shop();

    let result = navigator
        .get_methods("Calculator", " Sum , Add, Divide")
        .expect("methods failed");

    let names: Vec<_> = result.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Sum", "Add"]);
    assert_eq!(result.methods[1].line_range, LineRange(7, 10));
}

#[test]
fn get_methods_without_matches_is_not_found() {
    let (_dir, navigator) = shop();

    let err = navigator.get_methods("Calculator", "Divide").expect_err("should fail");

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn override_reports_its_base_method() {
    let (_dir, navigator) = shop();

    let result = navigator
        .check_overridable("ScientificCalculator", "Add")
        .expect("check failed");

    assert!(result.is_override);
    assert!(result.can_be_overridden);
    assert_eq!(result.base_method.as_deref(), Some("Calculator.Add"));
    assert_eq!(result.line, 5);
}

#[rstest]
#[case("Calculator", "Add", true, true)]
#[case("Calculator", "Sum", false, false)]
#[case("ScientificCalculator", "Square", false, false)]
fn overridability_follows_modifiers(
    #[case] class_name: &str,
    #[case] method: &str,
    #[case] is_virtual: bool,
    #[case] can_override: bool,
) {
    let (_dir, navigator) = shop();

    let result = navigator.check_overridable(class_name, method).expect("check failed");

    assert_eq!(result.is_virtual, is_virtual);
    assert_eq!(result.can_be_overridden, can_override);
    assert_eq!(result.base_method, None);
}
