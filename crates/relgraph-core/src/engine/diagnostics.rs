//! Collected errors and warnings.

use serde::Serialize;
use tracing::warn;

/// Recoverable problems found while resolving and checking a model.
///
/// Nothing here aborts a run. Messages are kept in insertion order and sorted
/// on [`Diagnostics::sort`] so that reports are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// Errors that forbid using the model.
    pub errors: Vec<String>,
    /// Warnings that are always surfaced but never fatal.
    pub warnings: Vec<String>,
}

impl Diagnostics {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error.
    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(error = %message, "Resolution error");
        self.errors.push(message);
    }

    /// Record a warning.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(warning = %message, "Resolution warning");
        self.warnings.push(message);
    }

    /// Append every message of `other`.
    pub fn extend(&mut self, other: Diagnostics) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Sort and deduplicate both lists.
    pub fn sort(&mut self) {
        self.errors.sort();
        self.errors.dedup();
        self.warnings.sort();
        self.warnings.dedup();
    }

    /// Check if no error was recorded.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
