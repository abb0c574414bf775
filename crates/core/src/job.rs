//! Read-only job snapshots and warning events delivered by the host framework.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ── State groups ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StateGroup {
    BeforeExecution,
    Executing,
    Terminal,
    NotCompleted,
    Unsuccessful,
    Failure,
}

impl StateGroup {
    pub fn name(&self) -> &'static str {
        match self {
            StateGroup::BeforeExecution => "BEFORE_EXECUTION",
            StateGroup::Executing => "EXECUTING",
            StateGroup::Terminal => "TERMINAL",
            StateGroup::NotCompleted => "NOT_COMPLETED",
            StateGroup::Unsuccessful => "UNSUCCESSFUL",
            StateGroup::Failure => "FAILURE",
        }
    }
}

impl fmt::Display for StateGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Execution state ───────────────────────────────────────────

/// Lifecycle state of a job instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionState {
    Created,
    Pending,
    Waiting,
    Disabled,
    Triggered,
    Started,
    Running,
    Completed,
    Stopped,
    Cancelled,
    Interrupted,
    Failed,
    Error,
    Timeout,
    Skipped,
    #[serde(other)]
    Unknown,
}

impl ExecutionState {
    pub fn name(&self) -> &'static str {
        match self {
            ExecutionState::Created => "CREATED",
            ExecutionState::Pending => "PENDING",
            ExecutionState::Waiting => "WAITING",
            ExecutionState::Disabled => "DISABLED",
            ExecutionState::Triggered => "TRIGGERED",
            ExecutionState::Started => "STARTED",
            ExecutionState::Running => "RUNNING",
            ExecutionState::Completed => "COMPLETED",
            ExecutionState::Stopped => "STOPPED",
            ExecutionState::Cancelled => "CANCELLED",
            ExecutionState::Interrupted => "INTERRUPTED",
            ExecutionState::Failed => "FAILED",
            ExecutionState::Error => "ERROR",
            ExecutionState::Timeout => "TIMEOUT",
            ExecutionState::Skipped => "SKIPPED",
            ExecutionState::Unknown => "UNKNOWN",
        }
    }

    /// Groups this state belongs to, in a stable order.
    pub fn groups(&self) -> &'static [StateGroup] {
        use StateGroup::*;
        match self {
            ExecutionState::Created | ExecutionState::Pending | ExecutionState::Waiting => {
                &[BeforeExecution]
            }
            ExecutionState::Triggered | ExecutionState::Started | ExecutionState::Running => {
                &[Executing]
            }
            ExecutionState::Completed => &[Terminal],
            ExecutionState::Disabled
            | ExecutionState::Stopped
            | ExecutionState::Cancelled
            | ExecutionState::Skipped => &[Terminal, NotCompleted],
            ExecutionState::Interrupted => &[Terminal, NotCompleted, Unsuccessful],
            ExecutionState::Failed | ExecutionState::Error | ExecutionState::Timeout => {
                &[Terminal, NotCompleted, Unsuccessful, Failure]
            }
            ExecutionState::Unknown => &[],
        }
    }

    pub fn in_group(&self, group: StateGroup) -> bool {
        self.groups().contains(&group)
    }

    pub fn is_terminal(&self) -> bool {
        self.in_group(StateGroup::Terminal)
    }

    /// Whether entering this state signals a failure.
    pub fn is_failure(&self) -> bool {
        self.in_group(StateGroup::Failure)
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Job snapshot ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lifecycle {
    #[serde(default)]
    pub executed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_transition_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_executing_time: Option<Duration>,
}

/// Error recorded by the host when an execution fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionError {
    pub message: String,
    #[serde(default)]
    pub params: IndexMap<String, String>,
}

impl ExecutionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            params: IndexMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Point-in-time view of a job instance, owned by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub job_id: String,
    pub instance_id: String,
    pub state: ExecutionState,
    #[serde(default)]
    pub lifecycle: Lifecycle,
    /// Warning name → accumulated occurrence count.
    #[serde(default)]
    pub warnings: IndexMap<String, u32>,
    /// Last status message reported by the job.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub exec_error: Option<ExecutionError>,
}

impl JobSnapshot {
    pub fn new(job_id: impl Into<String>, instance_id: impl Into<String>, state: ExecutionState) -> Self {
        Self {
            job_id: job_id.into(),
            instance_id: instance_id.into(),
            state,
            lifecycle: Lifecycle::default(),
            warnings: IndexMap::new(),
            status: None,
            exec_error: None,
        }
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings.values().any(|&count| count > 0)
    }

    pub fn warning_total(&self) -> u64 {
        self.warnings.values().map(|&c| u64::from(c)).sum()
    }
}

// ── Warnings ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningEventKind {
    New,
    Updated,
    Removed,
    #[serde(other)]
    Unknown,
}

impl WarningEventKind {
    pub fn name(&self) -> &'static str {
        match self {
            WarningEventKind::New => "new",
            WarningEventKind::Updated => "updated",
            WarningEventKind::Removed => "removed",
            WarningEventKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for WarningEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A warning raised, updated or cleared on a running job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningEvent {
    pub warning: Warning,
    pub kind: WarningEventKind,
    /// Cumulative occurrence count for this warning on the job.
    pub count: u32,
}

impl WarningEvent {
    pub fn new(name: impl Into<String>, kind: WarningEventKind, count: u32) -> Self {
        Self {
            warning: Warning { name: name.into() },
            kind,
            count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_states_are_terminal() {
        for state in [ExecutionState::Failed, ExecutionState::Error, ExecutionState::Timeout] {
            assert!(state.is_failure(), "{state} should signal failure");
            assert!(state.is_terminal());
        }
        assert!(!ExecutionState::Completed.is_failure());
        assert!(!ExecutionState::Interrupted.is_failure());
        assert!(!ExecutionState::Running.is_terminal());
    }

    #[test]
    fn state_deserializes_from_screaming_case() {
        let state: ExecutionState = serde_json::from_str("\"RUNNING\"").unwrap();
        assert_eq!(state, ExecutionState::Running);
        let unknown: ExecutionState = serde_json::from_str("\"EXPLODED\"").unwrap();
        assert_eq!(unknown, ExecutionState::Unknown);
        assert!(unknown.groups().is_empty());
    }

    #[test]
    fn unknown_warning_kind_is_preserved_as_unknown() {
        let kind: WarningEventKind = serde_json::from_str("\"escalated\"").unwrap();
        assert_eq!(kind, WarningEventKind::Unknown);
    }

    #[test]
    fn has_warnings_ignores_zero_counts() {
        let mut job = JobSnapshot::new("j", "i", ExecutionState::Running);
        assert!(!job.has_warnings());
        job.warnings.insert("disk_low".into(), 0);
        assert!(!job.has_warnings());
        job.warnings.insert("mem_high".into(), 3);
        assert!(job.has_warnings());
        assert_eq!(job.warning_total(), 3);
    }
}
