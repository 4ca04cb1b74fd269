//! Error types for the timer engine and its persistence gateway.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Failures raised by a [`crate::storage::Store`] backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to open store at {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read '{key}': {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove '{key}': {source}")]
    Remove {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to clear store: {0}")]
    Clear(#[source] std::io::Error),

    #[error("failed to encode '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The backend refused the operation without an underlying I/O cause.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Per-field rejections for a malformed timer request.
///
/// Keys are the request field names (`name`, `category`, `duration`,
/// `halfwayAlert`), or `body` when the request is not a JSON object.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.insert(field, message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Add `other`'s failures for fields not already reported
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, message) in other.fields {
            self.fields.entry(field).or_insert(message);
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid timer")?;
        for (i, (field, message)) in self.fields.iter().enumerate() {
            let sep = if i == 0 { ": " } else { ", " };
            write!(f, "{}{}: {}", sep, field, message)?;
        }
        Ok(())
    }
}

/// Errors surfaced by the timer actor to its callers.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("persistence failure: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// The actor loop has shut down and no longer accepts commands.
    #[error("timer engine is not running")]
    Stopped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_display_lists_fields_in_order() {
        let mut errors = ValidationErrors::default();
        errors.add("name", "Timer name is required");
        errors.add("duration", "Duration must be a positive number");

        assert_eq!(
            errors.to_string(),
            "invalid timer: duration: Duration must be a positive number, name: Timer name is required"
        );
        assert_eq!(errors.get("name"), Some("Timer name is required"));
        assert!(errors.get("category").is_none());
    }
}
