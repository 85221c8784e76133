//! Connection-scoped capabilities consulted by the runtime.

use crate::message::{BodyKind, Message, MessageId};
use crate::settings::ClientConfig;

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;

/// Connection facilities the runtime needs while building native objects.
///
/// Implemented by the connection-management layer. Only configuration and
/// message instantiation are exposed.
pub trait ConnectionContext: Send + Sync {
    /// Configuration of the owning connection
    fn config(&self) -> &ClientConfig;

    /// Instantiate an empty native message with a body of `kind`
    fn create_message(&self, kind: BodyKind) -> Message {
        Message::new(kind.empty_body())
            .with_property_name_validation(self.config().validate_property_names)
    }

    /// Generate a message id using the configured prefix
    fn next_message_id(&self) -> MessageId {
        MessageId::generate(&self.config().message_id_prefix)
    }
}

/// Connection context backed by a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct DefaultConnectionContext {
    config: ClientConfig,
}

impl DefaultConnectionContext {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }
}

impl ConnectionContext for DefaultConnectionContext {
    fn config(&self) -> &ClientConfig {
        &self.config
    }
}
