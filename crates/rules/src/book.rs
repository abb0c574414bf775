//! Compiled rule sets and topic resolution.
//!
//! A [`RuleBook`] is built once from a validated document and never mutated.
//! Resolution walks a category's rules in declaration order and concatenates
//! the topics of every matching rule. Duplicates are kept: two matching rules
//! naming the same topic produce two publishes.

use serde_yaml::Value;
use tracing::{debug, warn};

use crate::context::EvaluationContext;
use crate::evaluator::Condition;
use crate::loader::{Result, RuleError};
use crate::schema::{Rule, RuleCategory, RuleDocument};
use crate::validation::validate_document;

// ── Compiled rule ───────────────────────────────────────────────────

#[derive(Debug)]
pub struct CompiledRule {
    condition: Option<Condition>,
    topics: Vec<String>,
}

impl CompiledRule {
    pub fn compile(rule: &Rule) -> Self {
        Self {
            condition: rule.condition.as_deref().map(Condition::compile),
            topics: rule.notify.topics().to_vec(),
        }
    }

    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }
}

// ── Rule set ────────────────────────────────────────────────────────

/// Ordered rules for one event category.
#[derive(Debug)]
pub struct RuleSet {
    category: RuleCategory,
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    pub fn compile(category: RuleCategory, rules: &[Rule]) -> Self {
        let rules: Vec<CompiledRule> = rules.iter().map(CompiledRule::compile).collect();
        for (index, rule) in rules.iter().enumerate() {
            if let Some(condition) = rule.condition().filter(|c| !c.is_compiled()) {
                warn!(
                    category = %category,
                    index,
                    condition = %condition.source(),
                    "rule condition does not compile; rule will never match"
                );
            }
        }
        Self { category, rules }
    }

    pub fn category(&self) -> RuleCategory {
        self.category
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// Topics of every matching rule, in rule order then topic order.
    ///
    /// A rule whose condition fails to compile or evaluate is logged and
    /// skipped; the remaining rules are still evaluated.
    pub fn resolve(&self, ctx: &EvaluationContext) -> Vec<String> {
        let mut topics = Vec::new();

        for (index, rule) in self.rules.iter().enumerate() {
            let matched = match rule.condition() {
                None => true,
                Some(condition) => match condition.evaluate(ctx) {
                    Ok(matched) => matched,
                    Err(e) => {
                        warn!(
                            category = %self.category,
                            index,
                            condition = %condition.source(),
                            error = %e,
                            "rule condition invalid; treating as non-matching"
                        );
                        false
                    }
                },
            };

            if matched {
                topics.extend(rule.topics().iter().cloned());
            }
        }

        debug!(category = %self.category, topics = topics.len(), "resolved notification topics");
        topics
    }
}

// ── Rule book ───────────────────────────────────────────────────────

/// Immutable state and warning rule sets.
#[derive(Debug)]
pub struct RuleBook {
    states: RuleSet,
    warnings: RuleSet,
}

impl RuleBook {
    /// Validate a raw document and compile it.
    ///
    /// Validation warnings are logged; any validation error rejects the whole
    /// document with [`RuleError::Configuration`].
    pub fn from_value(doc: Value) -> Result<Self> {
        let validation = validate_document(&doc);
        for warning in &validation.warnings {
            warn!(path = %warning.path, "{}", warning.message);
        }
        if !validation.valid {
            return Err(RuleError::Configuration(validation));
        }

        let document: RuleDocument = serde_yaml::from_value(doc)?;
        Ok(Self::compile(&document))
    }

    /// Compile an already-typed document without structural validation.
    pub fn compile(document: &RuleDocument) -> Self {
        Self {
            states: RuleSet::compile(RuleCategory::States, document.rules(RuleCategory::States)),
            warnings: RuleSet::compile(
                RuleCategory::Warnings,
                document.rules(RuleCategory::Warnings),
            ),
        }
    }

    pub fn states(&self) -> &RuleSet {
        &self.states
    }

    pub fn warnings(&self) -> &RuleSet {
        &self.warnings
    }

    pub fn resolve_state(&self, ctx: &EvaluationContext) -> Vec<String> {
        self.states.resolve(ctx)
    }

    pub fn resolve_warning(&self, ctx: &EvaluationContext) -> Vec<String> {
        self.warnings.resolve(ctx)
    }
}
