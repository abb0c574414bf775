//! Publisher trait definition and shared error types.

use std::time::Duration;

/// Errors that can occur while publishing to a topic.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Publish timed out after {0:?}")]
    Timeout(Duration),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// A composed notification ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Message {
    pub subject: String,
    pub body: String,
}

/// Transport that delivers one message to one topic.
///
/// Retries and authentication belong to the implementation; the dispatcher
/// calls `publish` exactly once per resolved topic.
#[async_trait::async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, topic: &str, message: &Message) -> Result<(), PublishError>;

    /// Human-readable transport name (e.g., "sns", "log").
    fn name(&self) -> &str;
}

/// Result of publishing to a single topic.
#[derive(Debug, Clone)]
pub struct DispatchResult {
    pub topic: String,
    pub success: bool,
    pub error: Option<String>,
    pub duration_ms: u64,
}

/// Per-topic results of one dispatch, in topic order.
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    pub results: Vec<DispatchResult>,
}

impl DispatchReport {
    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|r| r.success)
    }

    pub fn failed(&self) -> impl Iterator<Item = &DispatchResult> {
        self.results.iter().filter(|r| !r.success)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
