//! Common test utilities for jms-client-runtime integration tests
//!
//! This module provides:
//! - A foreign provider's destination and message types
//! - A recording synchronization hook
//! - Logging setup for tests

use bytes::Bytes;
use jms_client_runtime::{
    ClientError, DeliveryMode, DestinationCapabilities, DestinationRef, FailureCause,
    ForeignDestination, MessageBody, MessageSource, PropertyValue, SynchronizationHook, Timestamp,
};
use std::sync::Mutex;

/// Install a test log writer once per test binary
#[allow(dead_code)]
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

// ============================================================================
// Foreign Provider Destinations
// ============================================================================

/// Destination object of another provider, described by the accessors it exposes
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum OtherProviderDestination {
    Queue(String),
    Topic(String),
    TemporaryQueue(String),
    TemporaryTopic(String),
    /// Composite exposing both accessors
    QueueAndTopic {
        queue: Option<String>,
        topic: Option<String>,
    },
    /// Exposes neither accessor
    Plain,
    /// Accessors throw when called
    Broken,
}

impl ForeignDestination for OtherProviderDestination {
    fn capabilities(&self) -> Result<DestinationCapabilities, ClientError> {
        let capabilities = DestinationCapabilities::new();
        Ok(match self {
            Self::Queue(name) => capabilities.with_queue_name(Some(name.clone())),
            Self::Topic(name) => capabilities.with_topic_name(Some(name.clone())),
            Self::TemporaryQueue(name) => capabilities
                .with_queue_name(Some(name.clone()))
                .with_temporary(),
            Self::TemporaryTopic(name) => capabilities
                .with_topic_name(Some(name.clone()))
                .with_temporary(),
            Self::QueueAndTopic { queue, topic } => capabilities
                .with_queue_name(queue.clone())
                .with_topic_name(topic.clone()),
            Self::Plain => capabilities,
            Self::Broken => {
                return Err(ClientError::Foreign {
                    message: "session closed".to_string(),
                })
            }
        })
    }
}

// ============================================================================
// Foreign Provider Messages
// ============================================================================

/// Message object of another provider
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct OtherProviderMessage {
    pub message_id: Option<String>,
    pub correlation_id: Option<String>,
    pub message_type: Option<String>,
    pub destination: Option<OtherProviderDestination>,
    pub reply_to: Option<OtherProviderDestination>,
    pub delivery_mode: DeliveryMode,
    pub priority: u8,
    pub expiration: Option<Timestamp>,
    pub timestamp: Option<Timestamp>,
    pub redelivered: bool,
    pub properties: Vec<(String, PropertyValue)>,
    pub body: MessageBody,
}

#[allow(dead_code)]
impl OtherProviderMessage {
    pub fn bytes(payload: &'static [u8]) -> Self {
        Self::with_body(MessageBody::Bytes(Bytes::from_static(payload)))
    }

    pub fn text(text: &str) -> Self {
        Self::with_body(MessageBody::Text(Some(text.to_string())))
    }

    pub fn with_body(body: MessageBody) -> Self {
        Self {
            message_id: Some("ID:other-provider:1".to_string()),
            correlation_id: None,
            message_type: None,
            destination: None,
            reply_to: None,
            delivery_mode: DeliveryMode::Persistent,
            priority: 4,
            expiration: None,
            timestamp: None,
            redelivered: false,
            properties: Vec::new(),
            body,
        }
    }

    pub fn with_property(mut self, name: &str, value: impl Into<PropertyValue>) -> Self {
        self.properties.push((name.to_string(), value.into()));
        self
    }
}

fn foreign(destination: &Option<OtherProviderDestination>) -> Option<DestinationRef<'_>> {
    destination
        .as_ref()
        .map(|d| DestinationRef::Foreign(d as &dyn ForeignDestination))
}

impl MessageSource for OtherProviderMessage {
    fn message_id(&self) -> Result<Option<String>, ClientError> {
        Ok(self.message_id.clone())
    }

    fn correlation_id(&self) -> Result<Option<String>, ClientError> {
        Ok(self.correlation_id.clone())
    }

    fn message_type(&self) -> Result<Option<String>, ClientError> {
        Ok(self.message_type.clone())
    }

    fn destination(&self) -> Result<Option<DestinationRef<'_>>, ClientError> {
        Ok(foreign(&self.destination))
    }

    fn reply_to(&self) -> Result<Option<DestinationRef<'_>>, ClientError> {
        Ok(foreign(&self.reply_to))
    }

    fn delivery_mode(&self) -> Result<DeliveryMode, ClientError> {
        Ok(self.delivery_mode)
    }

    fn priority(&self) -> Result<u8, ClientError> {
        Ok(self.priority)
    }

    fn expiration(&self) -> Result<Option<Timestamp>, ClientError> {
        Ok(self.expiration)
    }

    fn timestamp(&self) -> Result<Option<Timestamp>, ClientError> {
        Ok(self.timestamp)
    }

    fn redelivered(&self) -> Result<bool, ClientError> {
        Ok(self.redelivered)
    }

    fn property_names(&self) -> Result<Vec<String>, ClientError> {
        Ok(self.properties.iter().map(|(name, _)| name.clone()).collect())
    }

    fn property(&self, name: &str) -> Result<Option<PropertyValue>, ClientError> {
        Ok(self
            .properties
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone()))
    }

    fn body(&self) -> Result<MessageBody, ClientError> {
        Ok(self.body.clone())
    }
}

// ============================================================================
// Recording Hook
// ============================================================================

/// Hook recording every callback in order
#[derive(Debug, Default)]
#[allow(dead_code)]
pub struct RecordingHook {
    events: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingHook {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl SynchronizationHook for RecordingHook {
    fn on_pending_success(&self) {
        self.events.lock().unwrap().push("success".to_string());
    }

    fn on_pending_failure(&self, cause: &FailureCause) {
        self.events.lock().unwrap().push(format!("failure: {}", cause));
    }
}
