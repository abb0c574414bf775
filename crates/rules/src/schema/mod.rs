//! YAML schema types for notification rule documents.
//!
//! A document has two optional sections, `states` and `warnings`, each an
//! ordered list of [`Rule`]s:
//!
//! ```yaml
//! states:
//!   - when: is_failure
//!     notify: arn:aws:sns:eu-west-1:123456789012:job-failures
//! warnings:
//!   - notify: [ops-alerts, on-call]
//! ```

mod rule;

pub use rule::*;

#[cfg(test)]
mod tests;
