//! Plain-text message composition for job notifications.
//!
//! A body is a sequence of sections separated by a blank line. Each section
//! is an underlined header followed by `Label: value` lines:
//!
//! ```text
//! Job Detail
//! ----------
//! Job: build-7
//! Instance: i-1
//! ...
//! ```
//!
//! Sections without lines are left out entirely.

use std::time::Duration;

use chrono::{DateTime, Utc};
use herald_core::{ExecutionState, JobSnapshot, WarningEvent, WarningEventKind};
use indexmap::IndexMap;

use crate::traits::Message;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";
const NOT_AVAILABLE: &str = "N/A";

// ── Sections ────────────────────────────────────────────────────────

/// A header plus its field lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSection {
    header: String,
    lines: Vec<String>,
}

impl MessageSection {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            lines: Vec::new(),
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Header, a dash rule of the same length, then the lines.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.header.len() * 2 + 1);
        out.push_str(&self.header);
        out.push('\n');
        out.push_str(&"-".repeat(self.header.chars().count()));
        for line in &self.lines {
            out.push('\n');
            out.push_str(line);
        }
        out
    }
}

/// Join the non-empty sections with a blank line.
pub fn render_sections(sections: &[MessageSection]) -> String {
    sections
        .iter()
        .filter(|s| !s.is_empty())
        .map(MessageSection::render)
        .collect::<Vec<_>>()
        .join("\n\n")
}

// ── Composer ────────────────────────────────────────────────────────

/// Builds subjects and bodies for state and warning notifications.
#[derive(Debug, Clone, Default)]
pub struct MessageComposer {
    host_info: IndexMap<String, String>,
}

impl MessageComposer {
    /// `host_info` is rendered as its own section when non-empty.
    pub fn new(host_info: IndexMap<String, String>) -> Self {
        Self { host_info }
    }

    pub fn compose_state(
        &self,
        job: &JobSnapshot,
        previous: ExecutionState,
        new: ExecutionState,
    ) -> Message {
        let mut sections = vec![job_section(job, false), self.host_info_section()];
        if new.is_failure() {
            sections.push(error_section(job));
        }
        Message {
            subject: state_subject(job, previous, new),
            body: render_sections(&sections),
        }
    }

    pub fn compose_warning(&self, job: &JobSnapshot, event: &WarningEvent) -> Message {
        let sections = [job_section(job, true), self.host_info_section()];
        Message {
            subject: warning_subject(job, event),
            body: render_sections(&sections),
        }
    }

    fn host_info_section(&self) -> MessageSection {
        let mut section = MessageSection::new("Host Info");
        for (name, value) in &self.host_info {
            section.push(format!("{name}: {value}"));
        }
        section
    }
}

// ── Subjects ────────────────────────────────────────────────────────

pub fn state_subject(job: &JobSnapshot, previous: ExecutionState, new: ExecutionState) -> String {
    let mut subject = format!(
        "Job {} changed state from {} to {}",
        job.job_id,
        previous.name(),
        new.name()
    );
    if new.is_failure() {
        subject.push('!');
    }
    if job.has_warnings() {
        subject.push_str(" with warnings!");
    }
    subject
}

pub fn warning_subject(job: &JobSnapshot, event: &WarningEvent) -> String {
    let name = &event.warning.name;
    match event.kind {
        WarningEventKind::New => {
            format!("!New warning {name} for {}@{}!", job.job_id, job.instance_id)
        }
        WarningEventKind::Updated => format!("Warning {name} updated for job {}", job.job_id),
        WarningEventKind::Removed => format!("Warning {name} removed for job {}", job.job_id),
        WarningEventKind::Unknown => {
            format!("Unrecognized warning event for {name} on job {}", job.job_id)
        }
    }
}

// ── Section builders ────────────────────────────────────────────────

fn job_section(job: &JobSnapshot, always_exec_time: bool) -> MessageSection {
    let lifecycle = &job.lifecycle;
    let mut s = MessageSection::new("Job Detail");
    s.push(format!("Job: {}", job.job_id));
    s.push(format!("Instance: {}", job.instance_id));
    s.push(format!("Executed: {}", format_timestamp(lifecycle.executed_at)));
    s.push(format!("State: {}", job.state.name()));
    s.push(format!(
        "State changed: {}",
        format_timestamp(lifecycle.last_transition_at)
    ));

    if job.state.is_terminal() || always_exec_time {
        let elapsed = lifecycle
            .total_executing_time
            .map(format_elapsed)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        s.push(format!("Execution Time: {elapsed}"));
    }

    let warnings: Vec<String> = job
        .warnings
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(name, count)| format!("{name}: {count}"))
        .collect();
    if !warnings.is_empty() {
        s.push(format!("Warnings: {}", warnings.join(",")));
    }
    s
}

fn error_section(job: &JobSnapshot) -> MessageSection {
    let mut s = MessageSection::new("Error Detail");
    match &job.exec_error {
        Some(error) => s.push(format!("Reason: {error}")),
        None => s.push(format!("Reason: {NOT_AVAILABLE}")),
    }
    if let Some(status) = job.status.as_deref().filter(|m| !m.is_empty()) {
        s.push(format!("Message: {status}"));
    }

    let params = job.exec_error.as_ref().map(|e| &e.params).filter(|p| !p.is_empty());
    match params {
        Some(params) => {
            s.push("Params:");
            for (key, value) in params {
                s.push(format!("  {key}: {value}"));
            }
        }
        None => s.push("Params: (none)"),
    }
    s
}

fn format_timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// `H:MM:SS`, hours unbounded.
fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
