//! Rule condition compilation and evaluation.
//!
//! Conditions are `evalexpr` expressions over the variables of an
//! [`EvaluationContext`]:
//! - Comparison: `==`, `!=`, `<`, `<=`, `>`, `>=`
//! - Logic: `&&`, `||`, `!`, parentheses
//! - Literals: `"strings"`, integers, floats, `true` / `false`
//! - Functions: `has_group("NAME")` plus the evalexpr builtins
//!
//! A condition matches only when it evaluates to the boolean `true`. Any
//! other value is a non-match; compile and evaluation failures are reported
//! as [`EvaluationError`] and the caller treats the rule as non-matching.

use evalexpr::{EvalexprError, Node, Value};

use crate::context::EvaluationContext;

/// Errors raised while compiling or evaluating one rule condition.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("condition `{condition}` does not compile: {message}")]
    Compile { condition: String, message: String },

    #[error("condition `{condition}` failed to evaluate: {source}")]
    Evaluate {
        condition: String,
        #[source]
        source: EvalexprError,
    },
}

/// A rule condition compiled once when the rule book is built.
///
/// Compilation failures are kept rather than raised: a bad condition only
/// disables its own rule, and is reported each time that rule is evaluated.
#[derive(Debug)]
pub struct Condition {
    source: String,
    compiled: Result<Node, String>,
}

impl Condition {
    pub fn compile(source: impl Into<String>) -> Self {
        let source = source.into();
        let compiled = evalexpr::build_operator_tree(&source).map_err(|e| e.to_string());
        Self { source, compiled }
    }

    /// Original condition text.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.is_ok()
    }

    /// Evaluate against `ctx`. `Ok(true)` only for a boolean `true` result.
    pub fn evaluate(&self, ctx: &EvaluationContext) -> Result<bool, EvaluationError> {
        let node = self.compiled.as_ref().map_err(|message| EvaluationError::Compile {
            condition: self.source.clone(),
            message: message.clone(),
        })?;

        let value = node
            .eval_with_context(ctx.as_evalexpr())
            .map_err(|source| EvaluationError::Evaluate {
                condition: self.source.clone(),
                source,
            })?;

        Ok(matches!(value, Value::Boolean(true)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextBuilder;
    use crate::rate::RateState;
    use herald_core::{ExecutionState, JobSnapshot};
    use std::sync::Arc;

    fn failed_job_context() -> EvaluationContext {
        let job = JobSnapshot::new("build-7", "i-1", ExecutionState::Failed);
        ContextBuilder::new(Arc::new(RateState::new())).state_context(&job)
    }

    #[test]
    fn boolean_true_matches() {
        let ctx = failed_job_context();
        assert!(Condition::compile(r#"state == "FAILED""#).evaluate(&ctx).unwrap());
        assert!(Condition::compile("is_failure && job_id != \"other\"").evaluate(&ctx).unwrap());
        assert!(Condition::compile("true").evaluate(&ctx).unwrap());
    }

    #[test]
    fn boolean_false_does_not_match() {
        let ctx = failed_job_context();
        assert!(!Condition::compile(r#"state == "COMPLETED""#).evaluate(&ctx).unwrap());
        assert!(!Condition::compile("!is_failure").evaluate(&ctx).unwrap());
    }

    #[test]
    fn truthy_non_boolean_values_do_not_match() {
        let ctx = failed_job_context();
        for expr in ["1", r#""true""#, "job_id", "warning_total + 1"] {
            let matched = Condition::compile(expr).evaluate(&ctx).unwrap();
            assert!(!matched, "`{expr}` must not match");
        }
    }

    #[test]
    fn syntax_error_is_compile_error() {
        let condition = Condition::compile("(is_failure && true");
        assert!(!condition.is_compiled());
        let err = condition.evaluate(&failed_job_context()).unwrap_err();
        assert!(matches!(err, EvaluationError::Compile { .. }));
        assert!(err.to_string().contains("(is_failure && true"));
    }

    #[test]
    fn unknown_variable_is_evaluation_error() {
        let condition = Condition::compile("missing_field == 1");
        assert!(condition.is_compiled());
        let err = condition.evaluate(&failed_job_context()).unwrap_err();
        assert!(matches!(err, EvaluationError::Evaluate { .. }));
        assert_eq!(condition.source(), "missing_field == 1");
    }

    #[test]
    fn type_mismatch_is_evaluation_error() {
        let err = Condition::compile("job_id > 5")
            .evaluate(&failed_job_context())
            .unwrap_err();
        assert!(matches!(err, EvaluationError::Evaluate { .. }));
    }
}
