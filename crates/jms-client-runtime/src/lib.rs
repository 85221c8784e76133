//! # JMS Client Runtime
//!
//! Client-side runtime for a JMS messaging client: request completion and
//! interoperability with messages and destinations created by other
//! implementations of the messaging API.
//!
//! This library provides:
//! - An exactly-once completion signal with blocking, timed and interruptible waits
//! - Synchronization hooks that run before waiting threads are released
//! - Classification of foreign destinations into native queues and topics
//! - Native copies of foreign messages, including typed application properties
//! - Destination values with a stable serialized form
//!
//! ## Module Organization
//!
//! - [completion] - Completion signal, synchronization hooks and the engine-facing result surface
//! - [interrupt] - Cooperative interruption of threads blocked on a signal
//! - [destination] - Native destination values
//! - [codec] - Serialized form of destinations
//! - [classifier] - Classification of foreign destinations
//! - [message] - Native message model and the read-only message view
//! - [transform] - Conversion of foreign messages and destinations
//! - [connection] - Connection facilities consulted while building messages
//! - [settings] - Client configuration
//! - [tracker] - Accounting of outstanding requests
//! - [error] - Error types for all runtime operations

// Module declarations
pub mod classifier;
pub mod codec;
pub mod completion;
pub mod connection;
pub mod destination;
pub mod error;
pub mod interrupt;
pub mod message;
pub mod settings;
pub mod tracker;
pub mod transform;

// Re-export commonly used types at crate root for convenience
pub use classifier::{classify, resolve, DestinationCapabilities, DestinationRef, ForeignDestination};
pub use codec::{decode_destination, encode_destination};
pub use completion::{AsyncResult, CompletionSignal, SynchronizationHook};
pub use connection::{ConnectionContext, DefaultConnectionContext};
pub use destination::{Destination, DestinationKind};
pub use error::{ClientError, ConfigurationError, FailureCause, SerializationError, ValidationError};
pub use interrupt::InterruptHandle;
pub use message::{
    BodyKind, DeliveryMode, Message, MessageBody, MessageId, MessageSource, PropertyValue, Timestamp,
};
pub use settings::ClientConfig;
pub use tracker::{InFlightTracker, TrackerMetrics};
pub use transform::{copy_properties, transform_destination, transform_message};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
