//! Error types for the Pixela provider
//!
//! Every operation fails with a [`ProviderError`]; the host-facing entry
//! points turn those into [`Diagnostic`]s.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pixela_interfaces::PixelaError;

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Result type handed back to the host framework
pub type HostResult<T> = Result<T, Vec<Diagnostic>>;

/// Provider error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Network or client failure, surfaced verbatim
    #[error("{0}")]
    Transport(PixelaError),

    /// Pixela answered with a non-success status
    #[error("Pixela rejected the request (status {status}): {message}")]
    RemoteRejected {
        /// HTTP status code
        status: u16,
        /// Message forwarded from Pixela
        message: String,
    },

    /// The graph is missing from the remote listing
    #[error("cannot find graph {0:?}")]
    NotFound(String),

    /// An attribute that cannot change after creation was changed
    #[error("cannot update {field} of an existing graph ({from:?} -> {to:?})")]
    ImmutableFieldChanged {
        /// Attribute name
        field: String,
        /// Stored value
        from: String,
        /// Proposed value
        to: String,
    },

    /// The configuration record does not satisfy the schema
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The host asked for a resource type this provider does not serve
    #[error("Unknown resource type: {0}")]
    UnknownResourceType(String),

    /// Provider settings error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<PixelaError> for ProviderError {
    fn from(err: PixelaError) -> Self {
        match err {
            PixelaError::Rejected { status, message } => {
                ProviderError::RemoteRejected { status, message }
            }
            PixelaError::Configuration(message) => ProviderError::Configuration(message),
            other => ProviderError::Transport(other),
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::InvalidConfig(err.to_string())
    }
}

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The operation failed
    Error,
    /// The operation succeeded but something deserves attention
    Warning,
}

/// A message for the host framework
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Error or warning
    pub severity: Severity,
    /// One-line summary
    pub summary: String,
    /// Longer explanation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Attribute the diagnostic is about
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl Diagnostic {
    /// Error diagnostic
    pub fn error(summary: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: None,
            attribute: None,
        }
    }

    /// Warning diagnostic
    pub fn warning(summary: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: None,
            attribute: None,
        }
    }

    /// Attach a detail message
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Scope the diagnostic to an attribute
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Whether this diagnostic fails the operation
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl From<ProviderError> for Diagnostic {
    fn from(err: ProviderError) -> Self {
        let diagnostic = Diagnostic::error(err.to_string());
        match err {
            ProviderError::ImmutableFieldChanged { field, .. } => diagnostic
                .with_detail(format!(
                    "{} is fixed once the graph exists; recreate the resource instead",
                    field
                ))
                .with_attribute(field),
            ProviderError::NotFound(id) => diagnostic.with_detail(format!(
                "graph {:?} is not in the graph list of the configured user",
                id
            )),
            _ => diagnostic,
        }
    }
}

impl From<ProviderError> for Vec<Diagnostic> {
    fn from(err: ProviderError) -> Self {
        vec![Diagnostic::from(err)]
    }
}
