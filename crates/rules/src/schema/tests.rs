//! Tests for schema types.

use super::*;

const MIXED_DOCUMENT_YAML: &str = r#"
states:
  - when: 'is_failure'
    notify: job-failures
  - notify: [audit, ops-alerts]
warnings:
  - when: 'seconds_since_last > 3600'
    notify:
      - ops-alerts
"#;

#[test]
fn parse_mixed_document() {
    let doc: RuleDocument = serde_yaml::from_str(MIXED_DOCUMENT_YAML).unwrap();

    let states = doc.rules(RuleCategory::States);
    assert_eq!(states.len(), 2);
    assert_eq!(states[0].condition.as_deref(), Some("is_failure"));
    assert_eq!(states[0].notify, NotifyTarget::Single("job-failures".to_string()));
    assert!(states[1].condition.is_none());
    assert_eq!(states[1].notify.topics(), ["audit", "ops-alerts"]);

    let warnings = doc.rules(RuleCategory::Warnings);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].notify.topics(), ["ops-alerts"]);
}

#[test]
fn missing_section_yields_no_rules() {
    let doc: RuleDocument = serde_yaml::from_str("states:\n  - notify: a\n").unwrap();
    assert!(doc.warnings.is_none());
    assert!(doc.rules(RuleCategory::Warnings).is_empty());
}

#[test]
fn single_topic_flattens_to_one_element() {
    let target = NotifyTarget::Single("alerts".to_string());
    assert_eq!(target.topics(), ["alerts"]);
}

#[test]
fn category_sections() {
    assert_eq!(RuleCategory::States.section(), "states");
    assert_eq!(RuleCategory::Warnings.to_string(), "warnings");
}
