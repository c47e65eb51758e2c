// SPDX-License-Identifier: PMPL-1.0-or-later

//! Tests for SARIF 2.1.0 output format

use fas_locale::lint::{lint_po, LintOptions, LintReport};
use fas_locale::po;
use fas_locale::report::sarif;
use std::path::Path;

const BROKEN: &str = r#"msgid ""
msgstr ""
"Content-Type: text/plain; charset=UTF-8\n"
"Language: sv\n"
"Plural-Forms: nplurals=2; plural=(n != 1);\n"

#: fedora/tg/identity/jsonfasprovider2.py:388
#, python-format
msgid "Error logging in %(user)s: %(error)s"
msgstr "Fel vid inloggning av %(anvandare)s: %(error)s"

#: fedora/tg/templates/genshi/login.html:29
msgid "You are not logged in"
msgstr ""
"#;

fn make_test_report() -> LintReport {
    let file = po::parse(BROKEN).expect("fixture should parse");
    lint_po(&file, Path::new("locales/sv.po"), &LintOptions::new())
}

fn sarif_value() -> serde_json::Value {
    let report = make_test_report();
    let json = sarif::to_sarif_json([&report]).expect("SARIF conversion should succeed");
    serde_json::from_str(&json).expect("SARIF output should be valid JSON")
}

#[test]
fn test_sarif_schema_and_version() {
    let parsed = sarif_value();
    assert_eq!(parsed["version"], "2.1.0");
    let schema = parsed["$schema"].as_str().unwrap();
    assert!(
        schema.contains("sarif-schema-2.1.0"),
        "schema should reference SARIF 2.1.0"
    );
}

#[test]
fn test_sarif_single_run_with_tool_info() {
    let parsed = sarif_value();
    let runs = parsed["runs"].as_array().expect("runs should be an array");
    assert_eq!(runs.len(), 1, "should have exactly one run");

    let driver = &runs[0]["tool"]["driver"];
    assert_eq!(driver["name"], "fas-locale");
    assert!(driver["version"].is_string());
    assert!(driver["informationUri"].is_string());
}

#[test]
fn test_sarif_results_match_findings() {
    let parsed = sarif_value();
    let results = parsed["runs"][0]["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);

    let mismatch = &results[0];
    assert_eq!(mismatch["ruleId"], "PO001");
    assert_eq!(mismatch["level"], "error");
    let physical = &mismatch["locations"][0]["physicalLocation"];
    assert_eq!(physical["artifactLocation"]["uri"], "locales/sv.po");
    assert_eq!(physical["region"]["startLine"], 9);

    let untranslated = &results[1];
    assert_eq!(untranslated["ruleId"], "PO007");
    assert_eq!(untranslated["level"], "note");
}

#[test]
fn test_sarif_rules_deduplicated() {
    let report = make_test_report();
    let json = sarif::to_sarif_json([&report, &report]).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    let rules = parsed["runs"][0]["tool"]["driver"]["rules"]
        .as_array()
        .unwrap();
    let ids: Vec<&str> = rules.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["PO001", "PO007"]);
    assert_eq!(rules[0]["name"], "placeholder-mismatch");
    assert_eq!(rules[0]["defaultConfiguration"]["level"], "error");
    assert_eq!(
        parsed["runs"][0]["results"].as_array().unwrap().len(),
        4,
        "every finding of both reports is a result"
    );
}

#[test]
fn test_sarif_empty_report() {
    let json = sarif::to_sarif_json(std::iter::empty::<&LintReport>()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(parsed["runs"][0]["results"].as_array().unwrap().is_empty());
    assert!(parsed["runs"][0]["tool"]["driver"]["rules"]
        .as_array()
        .unwrap()
        .is_empty());
}
