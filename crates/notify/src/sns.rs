//! AWS SNS publisher. Topics are SNS topic ARNs.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_sns::config::Region;
use aws_sdk_sns::Client;
use tracing::{debug, info};

use herald_core::config::AwsConfig;

use crate::traits::{Message, PublishError, Publisher};

/// SNS rejects subjects longer than this.
const MAX_SUBJECT_CHARS: usize = 100;

/// SNS-backed publisher.
#[derive(Debug, Clone)]
pub struct SnsPublisher {
    client: Client,
}

impl SnsPublisher {
    /// Create a new SNS publisher from project config.
    ///
    /// Static credentials are used when both key id and secret are set;
    /// otherwise the default AWS credential chain is loaded.
    pub async fn new(aws: &AwsConfig) -> Self {
        let region = Region::new(aws.region.clone());

        let mut sns_config = if let (Some(key_id), Some(secret)) =
            (&aws.access_key_id, &aws.secret_access_key)
        {
            let creds = Credentials::new(
                key_id,
                secret,
                aws.session_token.clone(),
                None,
                "herald-sns-static",
            );
            aws_sdk_sns::Config::builder()
                .region(region)
                .behavior_version(BehaviorVersion::latest())
                .credentials_provider(creds)
        } else {
            let shared = aws_config::defaults(BehaviorVersion::latest())
                .region(region)
                .load()
                .await;
            aws_sdk_sns::config::Builder::from(&shared)
        };

        if let Some(endpoint) = aws.endpoint_url.as_deref().filter(|e| !e.is_empty()) {
            let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
                endpoint.to_string()
            } else {
                format!("https://{endpoint}")
            };
            sns_config = sns_config.endpoint_url(url);
        }

        info!(
            region = %aws.region,
            static_credentials = aws.has_static_credentials(),
            "SNS publisher initialized"
        );

        Self {
            client: Client::from_conf(sns_config.build()),
        }
    }

    /// Wrap an already-configured client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Publisher for SnsPublisher {
    async fn publish(&self, topic: &str, message: &Message) -> Result<(), PublishError> {
        if topic.is_empty() {
            return Err(PublishError::Config("empty topic ARN".to_string()));
        }

        let subject = truncate_subject(&message.subject);
        let output = self
            .client
            .publish()
            .topic_arn(topic)
            .subject(subject.clone())
            .message(message.body.clone())
            .send()
            .await
            .map_err(|e| PublishError::Transport(format!("SNS publish failed: {e:?}")))?;

        debug!(
            topic,
            subject = %subject,
            message_id = output.message_id().unwrap_or("unknown"),
            "SNS notified"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "sns"
    }
}

fn truncate_subject(subject: &str) -> String {
    subject.chars().take(MAX_SUBJECT_CHARS).collect()
}
