//! Error types for client runtime operations.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Durable failure stored by a completed [`CompletionSignal`](crate::CompletionSignal).
///
/// Shared so the same cause can be handed to the synchronization hook and to
/// every waiter that observes the failure.
pub type FailureCause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Comprehensive error type for all client runtime operations
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("I/O failure while waiting for provider: {cause}")]
    IoFailure {
        #[source]
        cause: FailureCause,
    },

    #[error("Wait was interrupted")]
    Interrupted,

    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    #[error("Destination is ambiguous: queue name '{queue_name}' and topic name '{topic_name}'")]
    AmbiguousDestination {
        queue_name: String,
        topic_name: String,
    },

    #[error("Unresolvable destination: {reason}")]
    UnresolvableDestination { reason: String },

    #[error("Unsupported destination: neither a queue nor a topic")]
    UnsupportedDestination,

    #[error("Invalid destination: {message}")]
    InvalidDestination { message: String },

    #[error("Message transformation failed: {source}")]
    MessageTransformation {
        #[source]
        source: Box<ClientError>,
    },

    #[error("Property '{name}' of type {from} cannot be converted to {to}")]
    PropertyConversion {
        name: String,
        from: &'static str,
        to: &'static str,
    },

    #[error("Foreign provider error: {message}")]
    Foreign { message: String },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] SerializationError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl ClientError {
    /// Wrap an arbitrary error as an I/O failure
    pub fn io_failure<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::IoFailure {
            cause: Arc::new(error),
        }
    }

    /// Wrap a nested failure raised while building a native message copy
    pub fn transformation(source: ClientError) -> Self {
        Self::MessageTransformation {
            source: Box::new(source),
        }
    }

    /// Check if error is transient and the operation may be retried by the caller
    pub fn is_transient(&self) -> bool {
        match self {
            Self::IoFailure { .. } => true,
            Self::Timeout { .. } => true,
            Self::Interrupted => false,
            Self::AmbiguousDestination { .. } => false,
            Self::UnresolvableDestination { .. } => false,
            Self::UnsupportedDestination => false,
            Self::InvalidDestination { .. } => false,
            Self::MessageTransformation { .. } => false,
            Self::PropertyConversion { .. } => false,
            Self::Foreign { .. } => false,
            Self::Serialization(_) => false,
            Self::Configuration(_) => false,
            Self::Validation(_) => false,
        }
    }

    /// Check if error was raised while classifying a destination
    pub fn is_destination_failure(&self) -> bool {
        matches!(
            self,
            Self::AmbiguousDestination { .. }
                | Self::UnresolvableDestination { .. }
                | Self::UnsupportedDestination
                | Self::InvalidDestination { .. }
        )
    }
}

/// Errors while encoding or decoding persisted values
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("JSON serialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Encoded value is empty")]
    Empty,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration parsing failed: {message}")]
    Parsing { message: String },
}

impl From<config::ConfigError> for ConfigurationError {
    fn from(error: config::ConfigError) -> Self {
        Self::Parsing {
            message: error.to_string(),
        }
    }
}

/// Validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    Required { field: String },

    #[error("Invalid format for {field}: {message}")]
    InvalidFormat { field: String, message: String },

    #[error("Value out of range for {field}: {message}")]
    OutOfRange { field: String, message: String },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
