//! Connection-scoped client configuration.

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Prefix for environment variables overriding configuration values.
///
/// Nested keys use a double underscore, e.g. `JMS_CLIENT__REQUEST_TIMEOUT_MS=5000`.
pub const ENV_PREFIX: &str = "JMS_CLIENT";

/// Configuration consulted by the runtime on behalf of a connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Time to wait for a provider request to complete, in milliseconds (0 waits indefinitely)
    pub request_timeout_ms: u64,

    /// Time to wait for a send to complete, in milliseconds (0 waits indefinitely)
    pub send_timeout_ms: u64,

    /// Reject message property names that are not valid identifiers
    pub validate_property_names: bool,

    /// Prefix applied to generated message ids
    pub message_id_prefix: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 60_000,
            send_timeout_ms: 0,
            validate_property_names: true,
            message_id_prefix: "ID:".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from an optional file and the environment.
    ///
    /// Sources are applied in order, later ones overriding earlier ones:
    /// built-in defaults, the file at `path` (format inferred from its
    /// extension), then `JMS_CLIENT__*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigurationError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            info!(path = %path.display(), "Loading client configuration from file");
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let loaded: Self = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        loaded.validate()?;
        debug!(config = ?loaded, "Client configuration loaded");
        Ok(loaded)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.message_id_prefix.is_empty() {
            return Err(ConfigurationError::Invalid {
                message: "message_id_prefix must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Request timeout, or `None` when requests wait indefinitely
    pub fn request_timeout(&self) -> Option<Duration> {
        millis_or_indefinite(self.request_timeout_ms)
    }

    /// Send timeout, or `None` when sends wait indefinitely
    pub fn send_timeout(&self) -> Option<Duration> {
        millis_or_indefinite(self.send_timeout_ms)
    }
}

fn millis_or_indefinite(millis: u64) -> Option<Duration> {
    (millis > 0).then(|| Duration::from_millis(millis))
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
