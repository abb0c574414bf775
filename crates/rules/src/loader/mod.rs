//! Rule document loading.
//!
//! Reads the YAML rule file once at startup, validates it and compiles it
//! into a [`RuleBook`](crate::book::RuleBook). Rules are not reloaded while
//! running.

mod core;
mod error;

#[cfg(test)]
mod tests;

pub use self::core::{load_rule_book, parse_rule_book};
pub use self::error::{Result, RuleError};
