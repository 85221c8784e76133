//! Native destination values.

use crate::error::ClientError;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

#[cfg(test)]
#[path = "destination_tests.rs"]
mod tests;

/// Kind of messaging destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationKind {
    /// Point-to-point destination
    Queue,
    /// Publish/subscribe destination
    Topic,
}

/// Native destination: a named queue or topic, optionally temporary.
///
/// Equality and hashing cover the kind, the temporary flag and the name, the
/// same fields that make up the encoded form. The deleted flag never takes
/// part. A queue never equals a topic of the same name, and a temporary
/// destination never equals a permanent one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Destination {
    kind: DestinationKind,
    name: String,
    temporary: bool,
    #[serde(skip)]
    deleted: bool,
}

impl Destination {
    /// Create a destination of the given kind
    pub fn new(kind: DestinationKind, name: impl Into<String>, temporary: bool) -> Self {
        Self {
            kind,
            name: name.into(),
            temporary,
            deleted: false,
        }
    }

    /// Create a permanent queue
    pub fn queue(name: impl Into<String>) -> Self {
        Self::new(DestinationKind::Queue, name, false)
    }

    /// Create a permanent topic
    pub fn topic(name: impl Into<String>) -> Self {
        Self::new(DestinationKind::Topic, name, false)
    }

    /// Create a temporary queue
    pub fn temporary_queue(name: impl Into<String>) -> Self {
        Self::new(DestinationKind::Queue, name, true)
    }

    /// Create a temporary topic
    pub fn temporary_topic(name: impl Into<String>) -> Self {
        Self::new(DestinationKind::Topic, name, true)
    }

    /// Get destination name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get destination kind
    pub fn kind(&self) -> DestinationKind {
        self.kind
    }

    /// Check if this is a queue
    pub fn is_queue(&self) -> bool {
        self.kind == DestinationKind::Queue
    }

    /// Check if this is a topic
    pub fn is_topic(&self) -> bool {
        self.kind == DestinationKind::Topic
    }

    /// Check if the destination only lives as long as its connection
    pub fn is_temporary(&self) -> bool {
        self.temporary
    }

    /// Check if a temporary destination has been deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Queue name, present only for queues
    pub fn queue_name(&self) -> Option<&str> {
        self.is_queue().then_some(self.name.as_str())
    }

    /// Topic name, present only for topics
    pub fn topic_name(&self) -> Option<&str> {
        self.is_topic().then_some(self.name.as_str())
    }

    /// Mark a temporary destination as deleted.
    ///
    /// The flag never reverts and has no effect on equality, hashing or the
    /// encoded form. Deleting an already deleted destination is a no-op.
    ///
    /// # Errors
    ///
    /// [`ClientError::InvalidDestination`] for permanent destinations.
    pub fn delete(&mut self) -> Result<(), ClientError> {
        if !self.temporary {
            return Err(ClientError::InvalidDestination {
                message: format!("{} is not temporary and cannot be deleted", self),
            });
        }

        self.deleted = true;
        Ok(())
    }
}

impl PartialEq for Destination {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.temporary == other.temporary && self.name == other.name
    }
}

impl Eq for Destination {}

impl Hash for Destination {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.temporary.hash(state);
        self.name.hash(state);
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let scheme = match (self.kind, self.temporary) {
            (DestinationKind::Queue, false) => "queue",
            (DestinationKind::Topic, false) => "topic",
            (DestinationKind::Queue, true) => "temp-queue",
            (DestinationKind::Topic, true) => "temp-topic",
        };
        write!(f, "{}://{}", scheme, self.name)
    }
}
