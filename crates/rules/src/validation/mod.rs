//! Structural validation of raw rule documents.
//!
//! Runs against the generic YAML tree (before typed deserialization) so that
//! wrongly-typed `when` / `notify` fields are reported with their path instead
//! of as an opaque serde error. Returns a [`ValidationResult`] with errors
//! (disable notifications) and warnings (advisory).

mod rule_checks;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::schema::RuleCategory;

// ── Result types ────────────────────────────────────────────────────

/// Overall validation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// A blocking validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Path-like location, e.g. `"states[1].notify"`.
    pub path: String,
    pub message: String,
}

/// A non-blocking advisory warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationResult {
    pub(crate) fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    pub(crate) fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            path: path.into(),
            message: message.into(),
        });
    }
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            if err.path.is_empty() {
                write!(f, "{}", err.message)?;
            } else {
                write!(f, "{}: {}", err.path, err.message)?;
            }
        }
        Ok(())
    }
}

// ── Public API ──────────────────────────────────────────────────────

/// Validate a parsed rule document.
///
/// At least one of `states` / `warnings` must be present and non-empty;
/// every rule must carry a string `when` (if any) and a `notify` that is a
/// string or a non-empty list of strings.
pub fn validate_document(doc: &Value) -> ValidationResult {
    let mut result = ValidationResult::new();

    let mapping = match doc {
        Value::Mapping(m) => m,
        Value::Null => {
            result.error("", "No notification rules defined");
            return result;
        }
        _ => {
            result.error("", "Rule document must be a mapping with `states` and/or `warnings`");
            return result;
        }
    };

    for key in mapping.keys() {
        let known = key
            .as_str()
            .map(|k| RuleCategory::ALL.iter().any(|c| c.section() == k))
            .unwrap_or(false);
        if !known {
            result.warn(key_label(key), "Unknown top-level section is ignored");
        }
    }

    let mut total_rules = 0;
    for category in RuleCategory::ALL {
        let section = category.section();
        match mapping.get(section) {
            None | Some(Value::Null) => {}
            Some(Value::Sequence(rules)) => {
                total_rules += rules.len();
                for (i, rule) in rules.iter().enumerate() {
                    rule_checks::validate_rule(&format!("{section}[{i}]"), rule, &mut result);
                }
            }
            Some(_) => result.error(section, "Section must be a list of rules"),
        }
    }

    if total_rules == 0 {
        result.error(
            "",
            "No notification rules defined: `states` and `warnings` are both absent or empty",
        );
    }

    result
}

fn key_label(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|_| "<key>".to_string()),
    }
}
