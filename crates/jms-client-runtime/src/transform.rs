//! Conversion of messages and destinations into native values.
//!
//! Messages handed to the client may come from another implementation of
//! the messaging API. Before such a message can be sent it is rebuilt as a
//! native [`Message`], with every embedded destination classified through
//! [`classify`].

use crate::classifier::{classify, DestinationRef};
use crate::connection::ConnectionContext;
use crate::destination::Destination;
use crate::error::ClientError;
use crate::message::{check_property_name, Message, MessageId, MessageSource};
use std::borrow::Cow;
use tracing::debug;

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;

/// Build a native copy of `source`.
///
/// Native sources are cloned, so the result is always a distinct value equal
/// to the source. Foreign sources are rebuilt field by field.
///
/// # Errors
///
/// [`ClientError::MessageTransformation`] wrapping the first failure raised
/// while reading the source or classifying one of its destinations.
pub fn transform_message(
    connection: &dyn ConnectionContext,
    source: &dyn MessageSource,
) -> Result<Message, ClientError> {
    if let Some(native) = source.as_native() {
        debug!(message_id = ?native.message_id, "Copying native message");
        return Ok(native.clone());
    }

    let copy = rebuild(connection, source).map_err(ClientError::transformation)?;
    debug!(
        message_id = ?copy.message_id,
        body_kind = ?copy.body.kind(),
        "Transformed foreign message"
    );
    Ok(copy)
}

/// Convert a destination of any origin into a native destination.
///
/// Native destinations are returned borrowed, as the same value. Foreign
/// destinations are classified into a new owned value.
pub fn transform_destination<'a>(
    _connection: &dyn ConnectionContext,
    destination: Option<DestinationRef<'a>>,
) -> Result<Option<Cow<'a, Destination>>, ClientError> {
    classify(destination)
}

/// Copy the message type and every application property from `source` to `target`.
///
/// Values keep their exact type. Property names are checked against the
/// connection's validation setting; `source` is only read.
pub fn copy_properties(
    connection: &dyn ConnectionContext,
    source: &dyn MessageSource,
    target: &mut Message,
) -> Result<(), ClientError> {
    let validate = connection.config().validate_property_names;

    target.message_type = source.message_type()?;

    for name in source.property_names()? {
        if let Some(value) = source.property(&name)? {
            check_property_name(&name, validate)?;
            target.insert_property(name, value);
        }
    }

    Ok(())
}

fn rebuild(
    connection: &dyn ConnectionContext,
    source: &dyn MessageSource,
) -> Result<Message, ClientError> {
    let body = source.body()?;
    let mut target = connection.create_message(body.kind());
    target.body = body;

    copy_headers(source, &mut target)?;
    copy_properties(connection, source, &mut target)?;

    Ok(target)
}

fn copy_headers(source: &dyn MessageSource, target: &mut Message) -> Result<(), ClientError> {
    target.message_id = source
        .message_id()?
        .filter(|id| !id.is_empty())
        .map(|id| id.parse::<MessageId>())
        .transpose()?;
    target.correlation_id = source.correlation_id()?;
    target.destination = classify(source.destination()?)?.map(Cow::into_owned);
    target.reply_to = classify(source.reply_to()?)?.map(Cow::into_owned);
    target.delivery_mode = source.delivery_mode()?;
    target.set_priority(source.priority()?)?;
    target.expiration = source.expiration()?;
    target.timestamp = source.timestamp()?;
    target.redelivered = source.redelivered()?;

    Ok(())
}
