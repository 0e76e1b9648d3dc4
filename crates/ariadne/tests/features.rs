//! Integration tests for feature-file scanning.

mod common;

use ariadne::{Config, Error, list_feature_scenarios, scan_features};
use common::{shop_files, write_files};

#[test]
fn scan_lists_features_in_path_order_across_locales() {
    let dir = shop_files();
    let features_dir = dir.path().join("Features");

    let result = list_feature_scenarios(features_dir.to_str().expect("utf-8 path"))
        .expect("scan failed");

    let files: Vec<_> = result.features.iter().map(|f| f.file.as_str()).collect();
    assert_eq!(files, vec!["Calculator.feature", "pt/Calculadora.feature"]);
    assert_eq!(result.summary.total_features, 2);
    assert_eq!(result.summary.total_scenarios, 3);

    let calculator = &result.features[0];
    assert_eq!(calculator.name, "Calculator");
    let scenarios: Vec<_> = calculator
        .scenarios
        .iter()
        .map(|s| (s.line, s.name.as_str()))
        .collect();
    assert_eq!(scenarios, vec![(4, "Add two numbers"), (7, "Add many numbers")]);

    let portuguese = &result.features[1];
    assert_eq!(portuguese.name, "Calculadora");
    assert_eq!(portuguese.scenarios[0].line, 4);
    assert_eq!(portuguese.scenarios[0].name, "Somar dois números");
}

#[test]
fn files_without_a_feature_heading_are_skipped() {
    let dir = write_files(&[
        ("notes.feature", "# just a comment\nSome prose\n"),
        ("real.feature", "Feature: Real\n  Scenario: One\n"),
    ]);

    let features = scan_features(dir.path(), &Config::default());

    assert_eq!(features.len(), 1);
    assert_eq!(features[0].file, "real.feature");
}

#[test]
fn excluded_directories_are_not_scanned() {
    let dir = write_files(&[
        ("bin/Debug/Copied.feature", "Feature: Copied\n"),
        ("Specs/Kept.feature", "Feature: Kept\n"),
    ]);

    let features = scan_features(dir.path(), &Config::default());

    let names: Vec<_> = features.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Kept"]);
}

#[test]
fn configured_extension_is_honored() {
    let dir = write_files(&[
        ("a.feature", "Feature: Default\n"),
        ("b.story", "Feature: Custom\n  Scenario: Only\n"),
    ]);
    let config = Config {
        feature_extension: "story".to_string(),
        ..Config::default()
    };

    let features = scan_features(dir.path(), &config);

    assert_eq!(features.len(), 1);
    assert_eq!(features[0].name, "Custom");
}

#[test]
fn missing_directory_is_not_found() {
    let dir = write_files(&[]);
    let missing = dir.path().join("nowhere");

    let err = list_feature_scenarios(missing.to_str().expect("utf-8 path"))
        .expect_err("should fail");

    assert!(matches!(err, Error::NotFound { what: "directory", .. }));
}

#[test]
fn summary_serializes_camel_case() {
    let dir = shop_files();
    let features_dir = dir.path().join("Features");

    let result = list_feature_scenarios(features_dir.to_str().expect("utf-8 path"))
        .expect("scan failed");
    let json = serde_json::to_value(&result).expect("should serialize");

    assert_eq!(json["summary"]["totalFeatures"], 2);
    assert_eq!(json["summary"]["totalScenarios"], 3);
    assert_eq!(json["features"][0]["scenarios"][1]["line"], 7);
}
