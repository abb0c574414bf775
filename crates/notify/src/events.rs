//! Inbound host events in their JSON wire form.

use herald_core::{ExecutionState, JobSnapshot, WarningEvent};
use serde::{Deserialize, Serialize};

/// One observer callback from the host framework.
///
/// ```json
/// {"type": "state", "job": {...}, "previous": "RUNNING", "new": "FAILED"}
/// {"type": "warning", "job": {...}, "event": {"warning": {"name": "disk_low"}, "kind": "new", "count": 1}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    State {
        job: JobSnapshot,
        previous: ExecutionState,
        new: ExecutionState,
    },
    Warning {
        job: JobSnapshot,
        event: WarningEvent,
    },
}

impl HostEvent {
    pub fn from_json(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    pub fn job(&self) -> &JobSnapshot {
        match self {
            HostEvent::State { job, .. } | HostEvent::Warning { job, .. } => job,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::WarningEventKind;

    #[test]
    fn parse_state_event() {
        let event = HostEvent::from_json(
            r#"{"type":"state","job":{"job_id":"build-7","instance_id":"i-1","state":"FAILED",
                "lifecycle":{"executed_at":"2024-03-01T10:00:00Z"},
                "exec_error":{"message":"exit code 2","params":{"code":"2"}}},
                "previous":"RUNNING","new":"FAILED"}"#,
        )
        .unwrap();

        match event {
            HostEvent::State { job, previous, new } => {
                assert_eq!(job.job_id, "build-7");
                assert_eq!(previous, ExecutionState::Running);
                assert_eq!(new, ExecutionState::Failed);
                assert!(job.lifecycle.executed_at.is_some());
                assert_eq!(job.exec_error.unwrap().params["code"], "2");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn parse_warning_event() {
        let event = HostEvent::from_json(
            r#"{"type":"warning","job":{"job_id":"ingest","instance_id":"i-42","state":"RUNNING",
                "warnings":{"disk_low":1}},
                "event":{"warning":{"name":"disk_low"},"kind":"new","count":1}}"#,
        )
        .unwrap();

        assert_eq!(event.job().job_id, "ingest");
        match event {
            HostEvent::Warning { event, .. } => {
                assert_eq!(event.kind, WarningEventKind::New);
                assert_eq!(event.warning.name, "disk_low");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(HostEvent::from_json(r#"{"type":"heartbeat"}"#).is_err());
    }
}
