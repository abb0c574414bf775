//! notify-worker: feeds host events through the notification engine.
//!
//! Reads newline-delimited JSON [`HostEvent`]s from stdin:
//! - `{"type": "state", ...}`: job state transitions
//! - `{"type": "warning", ...}`: warning lifecycle events
//!
//! Malformed lines are logged and skipped. If the rule file is rejected the
//! worker keeps draining stdin without notifying.

use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use herald_core::config::{load_dotenv, Config};
use herald_notify::{HostEvent, NotificationEngine};

// ── CLI ─────────────────────────────────────────────────────────────

/// Job notification worker that publishes rule-matched events to SNS topics.
#[derive(Parser, Debug)]
#[command(name = "notify-worker", version, about)]
struct Cli {
    /// Path to the notification rules YAML file. Overrides the profiled
    /// `HERALD_RULES_FILE` setting.
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Log composed messages instead of publishing them.
    #[arg(long)]
    dry_run: bool,
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    load_dotenv();
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(rules) = cli.rules {
        config.notify.rules_file = rules;
    }
    if cli.dry_run {
        config.notify.dry_run = true;
    }
    config.log_summary();

    let engine = NotificationEngine::from_config(&config).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut handled = 0usize;
    let mut notified = 0usize;

    info!("notify-worker reading events from stdin");
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event = match HostEvent::from_json(line) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "skipping malformed event");
                continue;
            }
        };
        handled += 1;

        let Some(engine) = engine.as_ref() else {
            continue;
        };
        if let Some(report) = engine.handle(&event).await {
            notified += 1;
            info!(
                job_id = %event.job().job_id,
                topics = report.len(),
                failed = report.failed().count(),
                "event dispatched"
            );
        }
    }

    info!(handled, notified, "notify-worker exited cleanly");
    Ok(())
}
