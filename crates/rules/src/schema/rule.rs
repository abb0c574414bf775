//! Rule and document types.

use serde::{Deserialize, Serialize};

/// Event category a rule section applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleCategory {
    States,
    Warnings,
}

impl RuleCategory {
    pub const ALL: [RuleCategory; 2] = [RuleCategory::States, RuleCategory::Warnings];

    /// Top-level document key holding this category's rules.
    pub fn section(&self) -> &'static str {
        match self {
            RuleCategory::States => "states",
            RuleCategory::Warnings => "warnings",
        }
    }
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.section())
    }
}

/// A condition/topics pair. A missing `when` always matches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rule {
    #[serde(default, rename = "when", skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    pub notify: NotifyTarget,
}

/// One topic name or an ordered list of them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum NotifyTarget {
    Single(String),
    Multiple(Vec<String>),
}

impl NotifyTarget {
    /// Topics in declaration order.
    pub fn topics(&self) -> &[String] {
        match self {
            NotifyTarget::Single(topic) => std::slice::from_ref(topic),
            NotifyTarget::Multiple(topics) => topics,
        }
    }
}

/// Parsed rule document, one optional section per category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RuleDocument {
    #[serde(default)]
    pub states: Option<Vec<Rule>>,
    #[serde(default)]
    pub warnings: Option<Vec<Rule>>,
}

impl RuleDocument {
    pub fn rules(&self, category: RuleCategory) -> &[Rule] {
        let section = match category {
            RuleCategory::States => &self.states,
            RuleCategory::Warnings => &self.warnings,
        };
        section.as_deref().unwrap_or(&[])
    }
}
