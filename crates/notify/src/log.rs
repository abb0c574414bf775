//! Dry-run publisher that logs instead of delivering.

use async_trait::async_trait;

use crate::traits::{Message, PublishError, Publisher};

#[derive(Debug, Default, Clone)]
pub struct LogPublisher;

#[async_trait]
impl Publisher for LogPublisher {
    async fn publish(&self, topic: &str, message: &Message) -> Result<(), PublishError> {
        tracing::info!(
            topic,
            subject = %message.subject,
            body = %message.body,
            "Dry run: notification not published"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}
