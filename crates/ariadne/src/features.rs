//! Behavior feature file scanning.
//!
//! Feature files are read line by line; no grammar is involved. Each trimmed
//! line is classified by its leading keyword, matched case-insensitively
//! against per-locale keyword tables. Outline keywords are tried before
//! plain scenario keywords so `Scenario Outline:` never reads as a
//! `Scenario:` line.

use std::path::{Component, Path};

use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result, require};
use crate::types::{Feature, FeatureScenariosResult, FeatureSummary, Scenario};
use crate::workspace::solution::walk_dir;

/// Stripped from the start of a file before its lines are classified.
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Feature headers: EN, PT-BR, PT, FR, ES, DE, IT, JA, KO, RU, UK.
const FEATURE_KEYWORDS: &[&str] = &[
    "Feature:",
    "Funcionalidade:",
    "Característica:",
    "Caracteristica:",
    "Fonctionnalité:",
    "Función:",
    "Funcion:",
    "Funktionalität:",
    "Funzionalità:",
    "機能:",
    "기능:",
    "Функция:",
    "Функціонал:",
];

/// Scenario outline and template headers, same locales.
const OUTLINE_KEYWORDS: &[&str] = &[
    "Scenario Outline:",
    "Scenario Template:",
    "Esquema do Cenário:",
    "Esquema do Cenario:",
    "Delineação do Cenário:",
    "Esquema del escenario:",
    "Plan du Scénario:",
    "Szenariovorlage:",
    "Schema dello scenario:",
    "シナリオアウトライン:",
    "시나리오 개요:",
    "Структура сценария:",
    "Структура сценарію:",
];

/// Plain scenario headers: EN, PT-BR, FR, ES, DE, JA, KO, RU, UK.
const SCENARIO_KEYWORDS: &[&str] = &[
    "Scenario:",
    "Cenário:",
    "Cenario:",
    "Exemplo:",
    "Scénario:",
    "Escenario:",
    "Szenario:",
    "シナリオ:",
    "시나리오:",
    "Сценарий:",
    "Сценарій:",
];

/// What a single feature file line declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `Feature: name`
    Feature(&'a str),
    /// `Scenario Outline: name` or one of its translations
    Outline(&'a str),
    /// `Scenario: name` or one of its translations
    Scenario(&'a str),
}

impl<'a> LineKind<'a> {
    /// Classify a line by its leading keyword, if it has one.
    ///
    /// The line is trimmed first; the returned name is the trimmed text after
    /// the keyword.
    #[must_use]
    pub fn classify(line: &'a str) -> Option<Self> {
        let line = line.trim();
        if let Some(name) = strip_keyword(line, FEATURE_KEYWORDS) {
            return Some(Self::Feature(name));
        }
        if let Some(name) = strip_keyword(line, OUTLINE_KEYWORDS) {
            return Some(Self::Outline(name));
        }
        strip_keyword(line, SCENARIO_KEYWORDS).map(Self::Scenario)
    }
}

/// Text after the first keyword `line` starts with, ignoring case.
fn strip_keyword<'a>(line: &'a str, keywords: &[&str]) -> Option<&'a str> {
    keywords.iter().find_map(|keyword| {
        let mut line_chars = line.char_indices();
        for expected in keyword.chars() {
            let (_, actual) = line_chars.next()?;
            if !chars_eq_ignore_case(actual, expected) {
                return None;
            }
        }
        let rest = line_chars.next().map_or(line.len(), |(i, _)| i);
        Some(line[rest..].trim())
    })
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Feature and scenario headers of one file's text, or `None` if it never
/// declares a feature.
///
/// When a file declares several features, the last name wins and every
/// scenario is kept.
#[must_use]
pub fn parse_feature(file: &str, text: &str) -> Option<Feature> {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    let mut name = None;
    let mut scenarios = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line_number = u32::try_from(index + 1).unwrap_or(u32::MAX);
        match LineKind::classify(line) {
            Some(LineKind::Feature(feature)) => name = Some(feature.to_string()),
            Some(LineKind::Outline(scenario) | LineKind::Scenario(scenario)) => {
                scenarios.push(Scenario {
                    line: line_number,
                    name: scenario.to_string(),
                });
            }
            None => {}
        }
    }
    name.map(|name| Feature {
        file: file.to_string(),
        name,
        scenarios,
    })
}

/// Every feature file under `root`, in sorted path order.
///
/// Paths are reported relative to `root` with `/` separators. Files that
/// can't be read are logged and skipped, as are files without a feature.
#[must_use]
pub fn scan_features(root: &Path, config: &Config) -> Vec<Feature> {
    let mut files = Vec::new();
    walk_dir(root, &config.feature_extension, config, false, &mut files);
    files.sort();

    let mut features = Vec::new();
    for path in files {
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Cannot read feature file, skipping");
                continue;
            }
        };
        let relative = slash_relative(root, &path);
        match parse_feature(&relative, &text) {
            Some(feature) => features.push(feature),
            None => debug!(file = %relative, "No feature header, skipping"),
        }
    }
    features
}

fn slash_relative(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Features and scenarios under a directory, with totals.
///
/// # Errors
///
/// [`Error::InvalidQuery`] for an empty path, [`Error::NotFound`] when the
/// directory doesn't exist.
pub fn list_feature_scenarios(path: &str, config: &Config) -> Result<FeatureScenariosResult> {
    require(path, "path")?;
    let root = Path::new(path.trim());
    if !root.is_dir() {
        return Err(Error::not_found("directory", path));
    }

    let features = scan_features(root, config);
    let summary = FeatureSummary {
        total_features: features.len(),
        total_scenarios: features.iter().map(|f| f.scenarios.len()).sum(),
    };
    debug!(
        path,
        features = summary.total_features,
        scenarios = summary.total_scenarios,
        "Scanned feature files"
    );
    Ok(FeatureScenariosResult {
        path: path.to_string(),
        features,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Feature: Login", LineKind::Feature("Login"))]
    #[case("  feature:   Login  ", LineKind::Feature("Login"))]
    #[case("Funcionalidade: Entrar", LineKind::Feature("Entrar"))]
    #[case("FONCTIONNALITÉ: Connexion", LineKind::Feature("Connexion"))]
    #[case("機能: ログイン", LineKind::Feature("ログイン"))]
    #[case("Scenario Outline: Many", LineKind::Outline("Many"))]
    #[case("Scenario Template: Many", LineKind::Outline("Many"))]
    #[case("Szenariovorlage: Viele", LineKind::Outline("Viele"))]
    #[case("Scenario: One", LineKind::Scenario("One"))]
    #[case("Cenário: Um", LineKind::Scenario("Um"))]
    #[case("Сценарій: Один", LineKind::Scenario("Один"))]
    fn classifies_keyword_lines(#[case] line: &str, #[case] expected: LineKind<'_>) {
        assert_eq!(LineKind::classify(line), Some(expected));
    }

    #[rstest]
    #[case("Given a user")]
    #[case("# Scenario: commented out")]
    #[case("Scenarios are listed below")]
    #[case("")]
    fn ignores_other_lines(#[case] line: &str) {
        assert_eq!(LineKind::classify(line), None);
    }

    #[test]
    fn parse_feature_records_one_based_lines() {
        let text = "@tag\nFeature: Calculator\n\n  Scenario: Add\n    Given 1\n  Scenario Outline: Sum of <a>\n";

        let feature = parse_feature("calc.feature", text).expect("should find a feature");

        assert_eq!(feature.name, "Calculator");
        assert_eq!(
            feature.scenarios,
            vec![
                Scenario {
                    line: 4,
                    name: "Add".to_string()
                },
                Scenario {
                    line: 6,
                    name: "Sum of <a>".to_string()
                },
            ]
        );
    }

    #[test]
    fn parse_feature_without_header_is_dropped() {
        assert_eq!(parse_feature("x.feature", "Scenario: Orphan\n"), None);
    }

    #[test]
    fn scan_features_walks_sorted_with_slash_paths() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let nested = dir.path().join("b").join("deep");
        std::fs::create_dir_all(&nested).expect("should create dirs");
        std::fs::write(nested.join("z.feature"), "Feature: Z\nScenario: z1\n").expect("should write");
        std::fs::write(dir.path().join("a.feature"), "Feature: A\n").expect("should write");
        std::fs::write(dir.path().join("notes.feature"), "just notes\n").expect("should write");
        std::fs::write(dir.path().join("readme.md"), "Feature: ignored\n").expect("should write");

        let features = scan_features(dir.path(), &Config::default());

        let files: Vec<_> = features.iter().map(|f| f.file.as_str()).collect();
        assert_eq!(files, vec!["a.feature", "b/deep/z.feature"]);
        assert_eq!(features[1].scenarios.len(), 1);
    }

    #[test]
    fn byte_order_mark_does_not_hide_the_header() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        std::fs::write(dir.path().join("a.feature"), "\u{feff}Feature: Bom\n  Scenario: One\n")
            .expect("should write");

        let features = scan_features(dir.path(), &Config::default());

        assert_eq!(features.len(), 1);
        assert_eq!(features[0].name, "Bom");
        assert_eq!(features[0].scenarios[0].line, 2);
    }

    #[test]
    fn missing_directory_is_not_found() {
        let err = list_feature_scenarios("/definitely/not/here", &Config::default())
            .expect_err("should fail");

        assert!(matches!(err, Error::NotFound { .. }));
    }

    proptest! {
        #[test]
        fn outline_lines_never_classify_as_plain_scenarios(name in "[A-Za-z0-9 ]{0,24}") {
            let line = format!("Scenario Outline: {name}");

            prop_assert_eq!(LineKind::classify(&line), Some(LineKind::Outline(name.trim())));
        }

        #[test]
        fn keyword_case_does_not_matter(upper in any::<bool>(), name in "[a-z]{1,12}") {
            let keyword = if upper { "SCENARIO:" } else { "scenario:" };
            let line = format!("{keyword} {name}");

            prop_assert_eq!(LineKind::classify(&line), Some(LineKind::Scenario(name.as_str())));
        }
    }
}
