//! Publishes a composed message to every resolved topic.
//!
//! The dispatcher receives the ordered topic list (duplicates included) and
//! issues one publish per entry. Attempts run concurrently and each is
//! bounded by a timeout; individual failures don't block or cancel other
//! topics.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;

use crate::traits::{DispatchReport, DispatchResult, Message, PublishError, Publisher};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fans a message out to topics through a single [`Publisher`].
#[derive(Clone)]
pub struct Dispatcher {
    publisher: Arc<dyn Publisher>,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(publisher: Arc<dyn Publisher>) -> Self {
        Self {
            publisher,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Bound each publish attempt by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn publisher_name(&self) -> &str {
        self.publisher.name()
    }

    /// Publish `message` to each topic and wait for every attempt.
    ///
    /// Returns one result per topic, in the order given.
    pub async fn dispatch(&self, topics: &[String], message: &Message) -> DispatchReport {
        if topics.is_empty() {
            tracing::debug!("No topics to publish to");
            return DispatchReport::default();
        }

        let attempts = topics.iter().map(|topic| self.attempt(topic, message));
        DispatchReport {
            results: join_all(attempts).await,
        }
    }

    async fn attempt(&self, topic: &str, message: &Message) -> DispatchResult {
        let start = Instant::now();
        let result = match tokio::time::timeout(self.timeout, self.publisher.publish(topic, message)).await {
            Ok(result) => result,
            Err(_) => Err(PublishError::Timeout(self.timeout)),
        };
        let duration_ms = start.elapsed().as_millis() as u64;

        let (success, error) = match result {
            Ok(()) => {
                tracing::debug!(
                    topic,
                    subject = %message.subject,
                    publisher = self.publisher.name(),
                    duration_ms,
                    "Notification published"
                );
                (true, None)
            }
            Err(e) => {
                tracing::warn!(
                    topic,
                    subject = %message.subject,
                    publisher = self.publisher.name(),
                    error = %e,
                    duration_ms,
                    "Notification publish failed"
                );
                (false, Some(e.to_string()))
            }
        };

        DispatchResult {
            topic: topic.to_string(),
            success,
            error,
            duration_ms,
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("publisher", &self.publisher.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every topic it is asked to publish to; fails for `fail_topic`.
    struct MockPublisher {
        published: Mutex<Vec<String>>,
        fail_topic: Option<String>,
        delay: Option<Duration>,
    }

    impl MockPublisher {
        fn new() -> Self {
            Self {
                published: Mutex::new(Vec::new()),
                fail_topic: None,
                delay: None,
            }
        }
    }

    #[async_trait::async_trait]
    impl Publisher for MockPublisher {
        async fn publish(&self, topic: &str, _message: &Message) -> Result<(), PublishError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.published.lock().unwrap().push(topic.to_string());
            if self.fail_topic.as_deref() == Some(topic) {
                Err(PublishError::Transport("mock failure".to_string()))
            } else {
                Ok(())
            }
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    fn message() -> Message {
        Message {
            subject: "test".to_string(),
            body: "test body".to_string(),
        }
    }

    fn topics(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn publishes_once_per_topic_including_duplicates() {
        let publisher = Arc::new(MockPublisher::new());
        let dispatcher = Dispatcher::new(publisher.clone());

        let report = dispatcher.dispatch(&topics(&["A", "B", "A"]), &message()).await;

        assert_eq!(report.len(), 3);
        assert!(report.all_succeeded());
        let mut published = publisher.published.lock().unwrap().clone();
        published.sort();
        assert_eq!(published, vec!["A", "A", "B"]);
        let reported: Vec<&str> = report.results.iter().map(|r| r.topic.as_str()).collect();
        assert_eq!(reported, vec!["A", "B", "A"]);
    }

    #[tokio::test]
    async fn partial_failure_doesnt_block() {
        let publisher = Arc::new(MockPublisher {
            fail_topic: Some("bad".to_string()),
            ..MockPublisher::new()
        });
        let dispatcher = Dispatcher::new(publisher.clone());

        let report = dispatcher.dispatch(&topics(&["bad", "ok"]), &message()).await;

        assert!(!report.all_succeeded());
        assert!(!report.results[0].success);
        assert!(report.results[0].error.as_deref().unwrap().contains("mock failure"));
        assert!(report.results[1].success);
        assert_eq!(report.failed().count(), 1);
        assert_eq!(publisher.published.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn slow_publish_times_out() {
        let publisher = Arc::new(MockPublisher {
            delay: Some(Duration::from_secs(5)),
            ..MockPublisher::new()
        });
        let dispatcher = Dispatcher::new(publisher).with_timeout(Duration::from_millis(20));

        let report = dispatcher.dispatch(&topics(&["slow"]), &message()).await;

        assert!(!report.all_succeeded());
        assert!(report.results[0].error.as_deref().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn no_topics_returns_empty() {
        let publisher = Arc::new(MockPublisher::new());
        let dispatcher = Dispatcher::new(publisher.clone());
        let report = dispatcher.dispatch(&[], &message()).await;
        assert!(report.is_empty());
        assert!(publisher.published.lock().unwrap().is_empty());
    }
}
