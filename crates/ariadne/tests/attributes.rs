//! Integration tests for attribute search and step definitions.

mod common;

use ariadne::{DeclKind, ErrorKind};
use common::{shop, workspace_with_files};
use rstest::rstest;

// ============================================================================
// Attribute search
// ============================================================================

#[test]
fn obsolete_member_is_the_only_match() {
    let (_dir, navigator) = workspace_with_files(&[(
        "Legacy.cs",
        r#"using System;

namespace Legacy
{
    public class Ledger
    {
        [Obsolete("msg")]
        public void Old()
        {
        }

        public void Current()
        {
        }
    }
}
"#,
    )]);

    let result = navigator.find_by_attribute("Obsolete", None).expect("search failed");

    assert_eq!(result.total_count, 1);
    let found = &result.matches[0];
    assert_eq!(found.name, "Old");
    assert_eq!(found.member_type, DeclKind::Method);
    assert!(found.attribute_arguments.contains("\"msg\""));
    assert_eq!(found.attribute_arguments, "[Obsolete(\"msg\")]");
    assert_eq!(found.containing_class, "Ledger");
    assert_eq!(found.namespace, "Legacy");
    assert_eq!(found.line, 7);
}

#[rstest]
#[case("Obsolete")]
#[case("ObsoleteAttribute")]
#[case("obsolete")]
fn attribute_name_forms_are_equivalent(#[case] attribute: &str) {
    let (_dir, navigator) = shop();

    let result = navigator.find_by_attribute(attribute, None).expect("search failed");

    let names: Vec<_> = result.matches.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Sum", "WhenIPressAdd"]);
}

#[test]
fn pattern_narrows_matches() {
    let (_dir, navigator) = shop();

    let all = navigator.find_by_attribute("Obsolete", None).expect("search failed");
    let narrowed = navigator
        .find_by_attribute("Obsolete", Some("use add"))
        .expect("search failed");

    assert!(narrowed.total_count <= all.total_count);
    assert!(narrowed.matches.iter().all(|m| all.matches.contains(m)));
    assert_eq!(narrowed.total_count, 1);
    assert_eq!(narrowed.matches[0].file_path, "Shop.Core/Calculator.cs");
    assert_eq!(narrowed.pattern.as_deref(), Some("use add"));
}

#[test]
fn types_fields_and_parameters_are_searched() {
    let (_dir, navigator) = workspace_with_files(&[(
        "Model.cs",
        r"namespace Model
{
    [Serializable]
    public class Order
    {
        [Serializable]
        private int _id, _version;

        public void Save([Serializable] string path)
        {
        }
    }
}
",
    )]);

    let result = navigator.find_by_attribute("Serializable", None).expect("search failed");

    let found: Vec<_> = result
        .matches
        .iter()
        .map(|m| (m.member_type, m.name.as_str(), m.containing_class.as_str()))
        .collect();
    assert_eq!(
        found,
        vec![
            (DeclKind::Class, "Order", "(none)"),
            (DeclKind::Field, "_id", "Order"),
            (DeclKind::Parameter, "Save.path", "Order"),
        ]
    );
}

#[test]
fn blank_attribute_is_invalid() {
    let (_dir, navigator) = shop();

    let err = navigator.find_by_attribute(" ", None).expect_err("should fail");

    assert_eq!(err.kind(), ErrorKind::InvalidQuery);
}

// ============================================================================
// Step definitions
// ============================================================================

#[test]
fn step_definition_carries_keyword_regex_and_scope() {
    let (_dir, navigator) = shop();

    let result = navigator.find_step_definitions("calculator").expect("steps failed");

    assert_eq!(result.total_count, 1);
    let step = &result.matches[0];
    assert_eq!(step.step_type, "Given");
    assert_eq!(step.regex, "I have entered (.*) into the calculator");
    assert_eq!(step.file_path, "Shop.App/Steps/CalculatorSteps.cs");
    assert_eq!(step.class_name, "CalculatorSteps");
    assert_eq!(step.method_name, "GivenIHaveEntered");
    assert_eq!((step.start_line, step.end_line, step.line_count), (9, 12, 4));
    assert_eq!(step.scope, "Calculator");
}

#[rstest]
#[case("PRESS", vec!["WhenIPressAdd"])]
#[case("(.*)", vec!["GivenIHaveEntered", "ThenTheResultShouldBe"])]
#[case("divide", vec![])]
fn step_pattern_is_a_case_insensitive_substring(#[case] pattern: &str, #[case] expected: Vec<&str>) {
    let (_dir, navigator) = shop();

    let result = navigator.find_step_definitions(pattern).expect("steps failed");

    let methods: Vec<_> = result.matches.iter().map(|s| s.method_name.as_str()).collect();
    assert_eq!(methods, expected);
}

#[test]
fn step_definitions_serialize_keyword_as_type() {
    let (_dir, navigator) = shop();

    let result = navigator.find_step_definitions("screen").expect("steps failed");
    let json = serde_json::to_value(&result).expect("should serialize");

    assert_eq!(json["matches"][0]["type"], "Then");
    assert_eq!(json["matches"][0]["regex"], "the result should be (.*) on the screen");
}
