//! Flat evaluation contexts built from inbound events.
//!
//! Rule conditions never see host objects directly; they see only the
//! variables listed below (schema version [`CONTEXT_VERSION`]).
//!
//! | variable             | type            | events   |
//! |----------------------|-----------------|----------|
//! | `context_version`    | int             | all      |
//! | `job_id`             | string          | all      |
//! | `instance_id`        | string          | all      |
//! | `state`              | string          | all      |
//! | `is_failure`         | bool            | all      |
//! | `state_groups`       | tuple of string | all      |
//! | `warning_total`      | int             | all      |
//! | `warning_name`       | string          | warnings |
//! | `event_kind`         | string          | warnings |
//! | `occurrence_count`   | int             | warnings |
//! | `seconds_since_last` | float (or inf)  | warnings |
//!
//! The function `has_group("TERMINAL")` tests state-group membership.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use evalexpr::{
    Context, ContextWithMutableFunctions, ContextWithMutableVariables, Function, HashMapContext,
    Value,
};
use herald_core::{JobSnapshot, WarningEvent};

use crate::rate::RateState;

/// Version of the variable set exposed to conditions.
pub const CONTEXT_VERSION: i64 = 1;

/// Variables visible to one event's rule conditions. Read-only once built.
pub struct EvaluationContext {
    vars: HashMapContext,
}

impl EvaluationContext {
    fn new() -> Self {
        Self {
            vars: HashMapContext::new(),
        }
    }

    fn set(&mut self, name: &str, value: Value) {
        if let Err(e) = self.vars.set_value(name.to_string(), value) {
            tracing::warn!(variable = name, error = %e, "failed to set context variable");
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get_value(name)
    }

    pub(crate) fn as_evalexpr(&self) -> &HashMapContext {
        &self.vars
    }
}

impl std::fmt::Debug for EvaluationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluationContext").finish_non_exhaustive()
    }
}

/// Converts job and warning events into [`EvaluationContext`]s.
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    rate: Arc<RateState>,
}

impl ContextBuilder {
    pub fn new(rate: Arc<RateState>) -> Self {
        Self { rate }
    }

    pub fn rate_state(&self) -> &Arc<RateState> {
        &self.rate
    }

    /// Context for a lifecycle-state transition.
    pub fn state_context(&self, job: &JobSnapshot) -> EvaluationContext {
        let mut ctx = EvaluationContext::new();
        let groups: Vec<String> = job
            .state
            .groups()
            .iter()
            .map(|g| g.name().to_string())
            .collect();

        ctx.set("context_version", Value::Int(CONTEXT_VERSION));
        ctx.set("job_id", Value::String(job.job_id.clone()));
        ctx.set("instance_id", Value::String(job.instance_id.clone()));
        ctx.set("state", Value::String(job.state.name().to_string()));
        ctx.set("is_failure", Value::Boolean(job.state.is_failure()));
        ctx.set(
            "state_groups",
            Value::Tuple(groups.iter().cloned().map(Value::String).collect()),
        );
        ctx.set(
            "warning_total",
            Value::Int(i64::try_from(job.warning_total()).unwrap_or(i64::MAX)),
        );

        let has_group = Function::new(move |argument| {
            let name = argument.as_string()?;
            Ok(Value::Boolean(groups.iter().any(|g| *g == name)))
        });
        if let Err(e) = ctx.vars.set_function("has_group".to_string(), has_group) {
            tracing::warn!(error = %e, "failed to register has_group()");
        }

        ctx
    }

    /// Context for a warning event, stamped with the current time.
    ///
    /// Records the observation in the shared [`RateState`].
    pub fn warning_context(&self, job: &JobSnapshot, event: &WarningEvent) -> EvaluationContext {
        self.warning_context_at(job, event, Utc::now())
    }

    /// Same as [`warning_context`](Self::warning_context) with an explicit clock.
    pub fn warning_context_at(
        &self,
        job: &JobSnapshot,
        event: &WarningEvent,
        now: DateTime<Utc>,
    ) -> EvaluationContext {
        let mut ctx = self.state_context(job);
        let seconds_since_last = self.rate.observe(&event.warning.name, now);

        ctx.set("warning_name", Value::String(event.warning.name.clone()));
        ctx.set("event_kind", Value::String(event.kind.name().to_string()));
        ctx.set("occurrence_count", Value::Int(i64::from(event.count)));
        ctx.set("seconds_since_last", Value::Float(seconds_since_last));
        ctx
    }
}
