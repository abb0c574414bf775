//! File and string entry points for building a [`RuleBook`].

use std::fs;
use std::path::Path;

use tracing::info;

use crate::book::RuleBook;

use super::error::Result;

/// Read, validate and compile the rule document at `path`.
pub fn load_rule_book(path: &Path) -> Result<RuleBook> {
    let yaml = fs::read_to_string(path)?;
    let book = parse_rule_book(&yaml)?;
    info!(
        path = %path.display(),
        state_rules = book.states().len(),
        warning_rules = book.warnings().len(),
        "loaded notification rules"
    );
    Ok(book)
}

/// Validate and compile a YAML rule document held in memory.
pub fn parse_rule_book(yaml: &str) -> Result<RuleBook> {
    let doc: serde_yaml::Value = serde_yaml::from_str(yaml)?;
    RuleBook::from_value(doc)
}
