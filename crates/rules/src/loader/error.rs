//! Error types for rule loading.

use crate::validation::ValidationResult;

/// Errors that prevent a rule book from being built.
///
/// Any of these disables notifications entirely; the host keeps running.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse/deserialization error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Structurally invalid rule document.
    #[error("Invalid notification rules: {0}")]
    Configuration(ValidationResult),
}

/// Result alias for rule operations.
pub type Result<T> = std::result::Result<T, RuleError>;
