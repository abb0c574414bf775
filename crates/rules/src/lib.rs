//! Notification rule engine for job lifecycle and warning events.
//!
//! This crate provides:
//! - YAML rule documents with `states` / `warnings` sections
//! - Structural validation that disables the feature on malformed input
//! - Flat evaluation contexts built from job snapshots and warning events
//! - Per-warning rate tracking for time-since-last-occurrence predicates
//! - Condition evaluation with per-rule failure isolation
//! - Ordered, non-deduplicated topic resolution

pub mod book;
pub mod context;
pub mod evaluator;
pub mod loader;
pub mod rate;
pub mod schema;
pub mod validation;

pub use book::{CompiledRule, RuleBook, RuleSet};
pub use context::{ContextBuilder, EvaluationContext, CONTEXT_VERSION};
pub use evaluator::{Condition, EvaluationError};
pub use loader::{load_rule_book, parse_rule_book, Result, RuleError};
pub use rate::RateState;
