//! Integration tests for type hierarchy walks and implementations.

mod common;

use ariadne::{DeclKind, Error};
use common::{shop, workspace_with_files};
use rstest::rstest;

#[test]
fn derived_class_reports_base_chain_ending_at_object() {
    let (_dir, navigator) = shop();

    let result = navigator.get_hierarchy("ScientificCalculator").expect("hierarchy failed");

    assert_eq!(result.class_name, "ScientificCalculator");
    assert_eq!(result.namespace, "Shop.Core");
    assert_eq!(result.file_path, "Shop.Core/ScientificCalculator.cs");
    assert_eq!(result.base_types, vec!["Calculator", "object"]);
    assert_eq!(result.interfaces, vec!["ICalculator"]);
    assert!(result.derived_types.is_empty());
}

#[test]
fn base_class_lists_derived_types() {
    let (_dir, navigator) = shop();

    let result = navigator.get_hierarchy("Calculator").expect("hierarchy failed");

    assert_eq!(result.base_types, vec!["object"]);
    assert_eq!(result.derived_types.len(), 1);
    let derived = &result.derived_types[0];
    assert_eq!(derived.name, "ScientificCalculator");
    assert_eq!(derived.kind, DeclKind::Class);
    assert_eq!(derived.file_path, "Shop.Core/ScientificCalculator.cs");
    assert_eq!(derived.line, 3);
    assert_eq!(derived.namespace, "Shop.Core");
}

#[test]
fn type_name_matches_ignoring_case() {
    let (_dir, navigator) = shop();

    let result = navigator.get_hierarchy("calculator").expect("hierarchy failed");

    assert_eq!(result.class_name, "Calculator");
}

#[test]
fn self_referencing_base_never_derives_from_itself() {
    let (_dir, navigator) = workspace_with_files(&[(
        "Loop.cs",
        r"namespace Odd
{
    public class Loop : Loop
    {
    }

    public class Leaf : Loop
    {
    }
}
",
    )]);

    let result = navigator.get_hierarchy("Loop").expect("hierarchy failed");

    assert!(result.derived_types.iter().all(|d| d.name != "Loop"));
    assert_eq!(
        result.derived_types.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(),
        vec!["Leaf"]
    );
    assert_eq!(result.base_types.last().map(String::as_str), Some("object"));
}

#[test]
fn records_and_structs_are_implementations() {
    let (_dir, navigator) = workspace_with_files(&[(
        "Shapes.cs",
        r"namespace Geometry
{
    public interface IShape
    {
        double Area();
    }

    public struct Square : IShape
    {
        public double Area() => 1;
    }

    public record Circle(double Radius) : IShape
    {
        public double Area() => 3.14 * Radius * Radius;
    }

    public class Triangle : IShape
    {
        public double Area() => 0.5;
    }
}
",
    )]);

    let result = navigator.find_implementations("IShape").expect("implementations failed");

    let found: Vec<_> = result
        .implementations
        .iter()
        .map(|i| (i.name.as_str(), i.kind))
        .collect();
    assert_eq!(
        found,
        vec![
            ("Triangle", DeclKind::Class),
            ("Square", DeclKind::Struct),
            ("Circle", DeclKind::Record),
        ]
    );
    assert_eq!(result.total_count, 3);
}

#[test]
fn implementations_include_inherited_interfaces() {
    let (_dir, navigator) = shop();

    let result = navigator.find_implementations("ICalculator").expect("implementations failed");

    let names: Vec<_> = result.implementations.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Calculator", "ScientificCalculator"]);
    assert_eq!(result.interface, "ICalculator");
}

#[rstest]
#[case("Calculator")]
#[case("ScientificCalculator")]
#[case("ReportService")]
#[case("Program")]
#[case("CalculatorSteps")]
fn hierarchy_and_implementations_agree(#[case] type_name: &str) {
    let (_dir, navigator) = shop();

    let hierarchy = navigator.get_hierarchy(type_name).expect("hierarchy failed");
    let implementations = navigator
        .find_implementations("ICalculator")
        .expect("implementations failed");

    let declares = hierarchy.interfaces.iter().any(|i| i == "ICalculator");
    let implemented = implementations
        .implementations
        .iter()
        .any(|i| i.name == type_name);
    assert_eq!(declares, implemented);
}

#[test]
fn classes_are_not_interfaces() {
    let (_dir, navigator) = shop();

    let err = navigator.find_implementations("Calculator").expect_err("should fail");

    assert!(matches!(err, Error::NotFound { what: "interface", .. }));
}

#[test]
fn unknown_type_is_not_found() {
    let (_dir, navigator) = shop();

    let err = navigator.get_hierarchy("Abacus").expect_err("should fail");

    assert_eq!(err.to_string(), "class 'Abacus' not found");
}
