//! Classification of destinations from foreign messaging API implementations.
//!
//! A foreign destination is only known through the capabilities it exposes:
//! a queue-name accessor, a topic-name accessor and a delete accessor that
//! marks it as temporary. Each foreign binding provides a thin adapter
//! ([`ForeignDestination`]) that reports those capabilities once as a
//! [`DestinationCapabilities`] descriptor; [`resolve`] then maps the
//! descriptor onto a native [`Destination`] or rejects it.
//!
//! A foreign object exposing both name accessors is only accepted when
//! exactly one of them reports a name. When both do, the kind cannot be
//! determined and classification fails instead of picking one.

use crate::destination::{Destination, DestinationKind};
use crate::error::ClientError;
use std::borrow::Cow;
use tracing::{trace, warn};

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;

/// Capabilities reported by a foreign destination.
///
/// For each name capability the outer `Option` records whether the
/// accessor exists at all and the inner `Option` the name it reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestinationCapabilities {
    pub queue: Option<Option<String>>,
    pub topic: Option<Option<String>>,
    pub temporary: bool,
}

impl DestinationCapabilities {
    /// Descriptor with no capabilities
    pub fn new() -> Self {
        Self::default()
    }

    /// Expose a queue-name accessor reporting `name`
    pub fn with_queue_name(mut self, name: Option<String>) -> Self {
        self.queue = Some(name);
        self
    }

    /// Expose a topic-name accessor reporting `name`
    pub fn with_topic_name(mut self, name: Option<String>) -> Self {
        self.topic = Some(name);
        self
    }

    /// Expose the delete accessor of a temporary destination
    pub fn with_temporary(mut self) -> Self {
        self.temporary = true;
        self
    }
}

/// Boundary adapter for a destination from another API implementation
pub trait ForeignDestination {
    /// Probe the capabilities of this destination.
    ///
    /// Errors raised by the foreign accessors are returned unchanged.
    fn capabilities(&self) -> Result<DestinationCapabilities, ClientError>;
}

/// A destination of native or unknown origin
#[derive(Clone, Copy)]
pub enum DestinationRef<'a> {
    Native(&'a Destination),
    Foreign(&'a dyn ForeignDestination),
}

impl<'a> From<&'a Destination> for DestinationRef<'a> {
    fn from(destination: &'a Destination) -> Self {
        Self::Native(destination)
    }
}

impl std::fmt::Debug for DestinationRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native(destination) => f.debug_tuple("Native").field(destination).finish(),
            Self::Foreign(_) => f.write_str("Foreign(..)"),
        }
    }
}

/// Classify a destination of any origin.
///
/// Absent input yields `Ok(None)`. Native destinations are passed through
/// borrowed, without copying. Foreign destinations are probed and resolved
/// into a new owned value.
pub fn classify(
    input: Option<DestinationRef<'_>>,
) -> Result<Option<Cow<'_, Destination>>, ClientError> {
    match input {
        None => Ok(None),
        Some(DestinationRef::Native(destination)) => Ok(Some(Cow::Borrowed(destination))),
        Some(DestinationRef::Foreign(foreign)) => {
            let capabilities = foreign.capabilities()?;
            resolve(&capabilities).map(|destination| Some(Cow::Owned(destination)))
        }
    }
}

/// Resolve a capability descriptor into a native destination
pub fn resolve(capabilities: &DestinationCapabilities) -> Result<Destination, ClientError> {
    let resolved = resolve_kind(capabilities);

    match resolved {
        Ok((kind, name)) => {
            trace!(?kind, name = %name, temporary = capabilities.temporary, "Resolved foreign destination");
            Ok(Destination::new(kind, name, capabilities.temporary))
        }
        Err(error) => {
            warn!(error = %error, ?capabilities, "Foreign destination could not be classified");
            Err(error)
        }
    }
}

fn resolve_kind(
    capabilities: &DestinationCapabilities,
) -> Result<(DestinationKind, String), ClientError> {
    match (&capabilities.queue, &capabilities.topic) {
        (Some(queue_name), None) => named(DestinationKind::Queue, queue_name),
        (None, Some(topic_name)) => named(DestinationKind::Topic, topic_name),
        (Some(queue_name), Some(topic_name)) => match (queue_name, topic_name) {
            (Some(queue_name), Some(topic_name)) => Err(ClientError::AmbiguousDestination {
                queue_name: queue_name.clone(),
                topic_name: topic_name.clone(),
            }),
            (Some(queue_name), None) => Ok((DestinationKind::Queue, queue_name.clone())),
            (None, Some(topic_name)) => Ok((DestinationKind::Topic, topic_name.clone())),
            (None, None) => Err(ClientError::UnresolvableDestination {
                reason: "destination is both a queue and a topic but reports neither name"
                    .to_string(),
            }),
        },
        (None, None) => Err(ClientError::UnsupportedDestination),
    }
}

fn named(
    kind: DestinationKind,
    name: &Option<String>,
) -> Result<(DestinationKind, String), ClientError> {
    match name {
        Some(name) => Ok((kind, name.clone())),
        None => Err(ClientError::UnresolvableDestination {
            reason: format!("{:?} destination reports no name", kind),
        }),
    }
}
