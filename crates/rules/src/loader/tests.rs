//! Tests for rule file loading.

use std::fs;

use tempfile::TempDir;

use super::*;

const VALID_RULES: &str = r#"
states:
  - when: is_failure
    notify: failures
warnings:
  - notify: [ops, audit]
"#;

#[test]
fn load_valid_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notifications.yaml");
    fs::write(&path, VALID_RULES).unwrap();

    let book = load_rule_book(&path).unwrap();
    assert_eq!(book.states().len(), 1);
    assert_eq!(book.warnings().len(), 1);
    assert_eq!(book.warnings().rules()[0].topics(), ["ops", "audit"]);
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = load_rule_book(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, RuleError::Io(_)));
}

#[test]
fn malformed_yaml_is_parse_error() {
    let err = parse_rule_book("states: [unclosed").unwrap_err();
    assert!(matches!(err, RuleError::Parse(_)));
}

#[test]
fn empty_file_is_configuration_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.yaml");
    fs::write(&path, "").unwrap();

    let err = load_rule_book(&path).unwrap_err();
    assert!(matches!(err, RuleError::Configuration(_)));
    assert!(err.to_string().contains("No notification rules"));
}

#[test]
fn non_string_topic_is_configuration_error() {
    let err = parse_rule_book("warnings:\n  - notify: [ops, {a: 1}]\n").unwrap_err();
    match err {
        RuleError::Configuration(result) => {
            assert!(!result.valid);
            assert_eq!(result.errors[0].path, "warnings[0].notify[1]");
        }
        other => panic!("unexpected error: {other}"),
    }
}
