//! Notification delivery for job lifecycle and warning events.
//!
//! This crate provides:
//! - `Publisher` trait for pluggable topic transports
//! - SNS and dry-run (log) publisher implementations
//! - Plain-text message composition with fixed subject formats
//! - Dispatcher that fans one message out to every resolved topic
//! - `NotificationEngine`, the observer entry point for host events

pub mod composer;
pub mod dispatcher;
pub mod engine;
pub mod events;
pub mod log;
pub mod sns;
pub mod traits;

pub use composer::MessageComposer;
pub use dispatcher::Dispatcher;
pub use engine::{NotificationEngine, Outbound};
pub use events::HostEvent;
pub use log::LogPublisher;
pub use sns::SnsPublisher;
pub use traits::{DispatchReport, DispatchResult, Message, PublishError, Publisher};
