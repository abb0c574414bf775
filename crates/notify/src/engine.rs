//! Observer façade tying rules, composition and dispatch together.
//!
//! For each inbound event: build the evaluation context, resolve topics,
//! and, only if any topic matched, compose the message and publish it.

use std::sync::Arc;
use std::time::Duration;

use herald_core::{Config, ExecutionState, JobSnapshot, WarningEvent};
use herald_rules::{load_rule_book, ContextBuilder, RateState, RuleBook};
use tracing::{error, info};

use crate::composer::MessageComposer;
use crate::dispatcher::Dispatcher;
use crate::events::HostEvent;
use crate::log::LogPublisher;
use crate::sns::SnsPublisher;
use crate::traits::{DispatchReport, Message, Publisher};

/// A message and the topics it should go to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub topics: Vec<String>,
    pub message: Message,
}

pub struct NotificationEngine {
    rules: RuleBook,
    contexts: ContextBuilder,
    composer: MessageComposer,
    dispatcher: Dispatcher,
}

impl NotificationEngine {
    pub fn new(
        rules: RuleBook,
        composer: MessageComposer,
        dispatcher: Dispatcher,
        rate: Arc<RateState>,
    ) -> Self {
        Self {
            rules,
            contexts: ContextBuilder::new(rate),
            composer,
            dispatcher,
        }
    }

    /// Build the engine from environment config.
    ///
    /// Returns `None`, after logging the reason once, when the rule file
    /// cannot be loaded: notifications are then disabled and the host
    /// carries on unaffected.
    pub async fn from_config(config: &Config) -> Option<Self> {
        let rules = match load_rule_book(&config.notify.rules_file) {
            Ok(rules) => rules,
            Err(e) => {
                error!(
                    path = %config.notify.rules_file.display(),
                    error = %e,
                    "notification rules rejected; notifications disabled"
                );
                return None;
            }
        };

        let publisher: Arc<dyn Publisher> = if config.notify.dry_run {
            Arc::new(LogPublisher)
        } else {
            Arc::new(SnsPublisher::new(&config.aws).await)
        };
        let dispatcher = Dispatcher::new(publisher)
            .with_timeout(Duration::from_secs(config.notify.publish_timeout_secs));

        info!(
            publisher = dispatcher.publisher_name(),
            state_rules = rules.states().len(),
            warning_rules = rules.warnings().len(),
            "notification engine ready"
        );

        Some(Self::new(
            rules,
            MessageComposer::new(config.notify.host_info.clone()),
            dispatcher,
            Arc::new(RateState::new()),
        ))
    }

    pub fn rate_state(&self) -> &Arc<RateState> {
        self.contexts.rate_state()
    }

    /// Resolve and compose for a state transition, without publishing.
    pub fn prepare_state(
        &self,
        job: &JobSnapshot,
        previous: ExecutionState,
        new: ExecutionState,
    ) -> Option<Outbound> {
        let ctx = self.contexts.state_context(job);
        let topics = self.rules.resolve_state(&ctx);
        if topics.is_empty() {
            return None;
        }
        Some(Outbound {
            topics,
            message: self.composer.compose_state(job, previous, new),
        })
    }

    /// Resolve and compose for a warning event, without publishing.
    ///
    /// Always records the warning in the rate state, even if nothing matches.
    pub fn prepare_warning(&self, job: &JobSnapshot, event: &WarningEvent) -> Option<Outbound> {
        let ctx = self.contexts.warning_context(job, event);
        let topics = self.rules.resolve_warning(&ctx);
        if topics.is_empty() {
            return None;
        }
        Some(Outbound {
            topics,
            message: self.composer.compose_warning(job, event),
        })
    }

    /// Handle a state transition. `None` when no rule matched.
    pub async fn on_state_change(
        &self,
        job: &JobSnapshot,
        previous: ExecutionState,
        new: ExecutionState,
    ) -> Option<DispatchReport> {
        let outbound = self.prepare_state(job, previous, new)?;
        Some(self.publish(outbound).await)
    }

    /// Handle a warning event. `None` when no rule matched.
    pub async fn on_warning(&self, job: &JobSnapshot, event: &WarningEvent) -> Option<DispatchReport> {
        let outbound = self.prepare_warning(job, event)?;
        Some(self.publish(outbound).await)
    }

    pub async fn handle(&self, event: &HostEvent) -> Option<DispatchReport> {
        match event {
            HostEvent::State { job, previous, new } => {
                self.on_state_change(job, *previous, *new).await
            }
            HostEvent::Warning { job, event } => self.on_warning(job, event).await,
        }
    }

    async fn publish(&self, outbound: Outbound) -> DispatchReport {
        self.dispatcher
            .dispatch(&outbound.topics, &outbound.message)
            .await
    }
}

impl std::fmt::Debug for NotificationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationEngine")
            .field("state_rules", &self.rules.states().len())
            .field("warning_rules", &self.rules.warnings().len())
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}
