//! Integration tests that verify the sample rule document in `config/`
//! loads and resolves as documented.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use herald_core::{ExecutionState, JobSnapshot, WarningEvent, WarningEventKind};
use herald_rules::{load_rule_book, ContextBuilder, RateState, RuleBook};

const FAILURES: &str = "arn:aws:sns:eu-west-1:123456789012:job-failures";
const WARNINGS: &str = "arn:aws:sns:eu-west-1:123456789012:job-warnings";
const ON_CALL: &str = "arn:aws:sns:eu-west-1:123456789012:on-call";
const STORAGE: &str = "arn:aws:sns:eu-west-1:123456789012:storage-team";
const BACKUP: &str = "arn:aws:sns:eu-west-1:123456789012:backup-owners";

/// Resolve the config directory relative to the workspace root.
/// Integration tests run from the crate directory, so we go up two levels.
fn example_rules() -> RuleBook {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let path = manifest.join("../../config/notifications.example.yaml");
    load_rule_book(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

fn builder() -> ContextBuilder {
    ContextBuilder::new(Arc::new(RateState::new()))
}

#[test]
fn example_document_loads() {
    let book = example_rules();
    assert_eq!(book.states().len(), 3);
    assert_eq!(book.warnings().len(), 2);
    assert!(book
        .states()
        .rules()
        .iter()
        .chain(book.warnings().rules())
        .all(|r| r.condition().map(|c| c.is_compiled()).unwrap_or(true)));
}

#[test]
fn failed_job_notifies_failure_topic() {
    let book = example_rules();
    let job = JobSnapshot::new("build-7", "i-1", ExecutionState::Failed);
    assert_eq!(book.resolve_state(&builder().state_context(&job)), vec![FAILURES]);
}

#[test]
fn completed_with_warnings_notifies_warning_topic() {
    let book = example_rules();
    let mut job = JobSnapshot::new("build-7", "i-1", ExecutionState::Completed);
    assert!(book.resolve_state(&builder().state_context(&job)).is_empty());

    job.warnings.insert("disk_low".into(), 1);
    assert_eq!(book.resolve_state(&builder().state_context(&job)), vec![WARNINGS]);
}

#[test]
fn failed_backup_hits_two_rules_in_order() {
    let book = example_rules();
    let job = JobSnapshot::new("nightly-backup", "i-9", ExecutionState::Error);
    assert_eq!(
        book.resolve_state(&builder().state_context(&job)),
        vec![FAILURES, BACKUP]
    );
}

#[test]
fn new_warning_is_rate_limited_per_name() {
    let book = example_rules();
    let builder = builder();
    let job = JobSnapshot::new("ingest", "i-42", ExecutionState::Running);
    let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
    let disk = WarningEvent::new("disk_low", WarningEventKind::New, 1);

    let first = builder.warning_context_at(&job, &disk, t0);
    assert_eq!(book.resolve_warning(&first), vec![WARNINGS, ON_CALL]);

    let soon = builder.warning_context_at(&job, &disk, t0 + Duration::minutes(5));
    assert!(book.resolve_warning(&soon).is_empty());

    let later = builder.warning_context_at(&job, &disk, t0 + Duration::hours(3));
    assert_eq!(book.resolve_warning(&later), vec![WARNINGS, ON_CALL]);
}

#[test]
fn repeated_disk_warning_reaches_storage_team() {
    let book = example_rules();
    let job = JobSnapshot::new("ingest", "i-42", ExecutionState::Running);
    let event = WarningEvent::new("disk_low", WarningEventKind::Updated, 12);
    let ctx = builder().warning_context(&job, &event);
    assert_eq!(book.resolve_warning(&ctx), vec![STORAGE]);
}
