//! Native message model: headers, typed properties and bodies.

use crate::classifier::DestinationRef;
use crate::destination::Destination;
use crate::error::{ClientError, ValidationError};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::LazyLock;

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;

/// Default JMS priority
pub const DEFAULT_PRIORITY: u8 = 4;

/// Highest JMS priority
pub const MAX_PRIORITY: u8 = 9;

/// Words that may not be used as property names (selector keywords)
const RESERVED_PROPERTY_NAMES: &[&str] = &[
    "NULL", "TRUE", "FALSE", "NOT", "AND", "OR", "BETWEEN", "LIKE", "IN", "IS", "ESCAPE",
];

/// Prefix of property names set by the messaging provider, not the application
const PROVIDER_PROPERTY_PREFIX: &str = "JMS";

static PROPERTY_NAME: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$"));

// ============================================================================
// Header Types
// ============================================================================

/// Identifier assigned to a message by its producer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    /// Generate a new random message ID carrying `prefix`
    pub fn generate(prefix: &str) -> Self {
        Self(format!("{}{}", prefix, uuid::Uuid::new_v4()))
    }

    /// Get message ID as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ValidationError::Required {
                field: "message_id".to_string(),
            });
        }

        Ok(Self(s.to_string()))
    }
}

/// Millisecond-precision timestamp used by time-valued headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create timestamp for current time
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Create timestamp from milliseconds since the Unix epoch
    pub fn from_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(Self)
    }

    /// Milliseconds since the Unix epoch
    pub fn as_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Get underlying DateTime
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Delivery guarantee requested by the producer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryMode {
    #[default]
    Persistent,
    NonPersistent,
}

// ============================================================================
// Properties
// ============================================================================

/// Typed value of an application property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
}

impl PropertyValue {
    /// Name of the value's type, as used in conversion errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::Byte(_) => "byte",
            Self::Short(_) => "short",
            Self::Int(_) => "int",
            Self::Long(_) => "long",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::String(_) => "String",
        }
    }

    /// Read as boolean. Strings convert case-insensitively, `"true"` only.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            Self::String(value) => Some(value.eq_ignore_ascii_case("true")),
            _ => None,
        }
    }

    /// Read as int, widening smaller integers and parsing strings
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Byte(value) => Some(i32::from(*value)),
            Self::Short(value) => Some(i32::from(*value)),
            Self::Int(value) => Some(*value),
            Self::String(value) => value.trim().parse().ok(),
            _ => None,
        }
    }

    /// Read as long, widening smaller integers and parsing strings
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Byte(value) => Some(i64::from(*value)),
            Self::Short(value) => Some(i64::from(*value)),
            Self::Int(value) => Some(i64::from(*value)),
            Self::Long(value) => Some(*value),
            Self::String(value) => value.trim().parse().ok(),
            _ => None,
        }
    }

    /// Read as double, widening floats and parsing strings
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(f64::from(*value)),
            Self::Double(value) => Some(*value),
            Self::String(value) => value.trim().parse().ok(),
            _ => None,
        }
    }

    /// Every value converts to its string form
    pub fn to_string_value(&self) -> String {
        match self {
            Self::Boolean(value) => value.to_string(),
            Self::Byte(value) => value.to_string(),
            Self::Short(value) => value.to_string(),
            Self::Int(value) => value.to_string(),
            Self::Long(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Double(value) => value.to_string(),
            Self::String(value) => value.clone(),
        }
    }
}

macro_rules! property_value_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for PropertyValue {
                fn from(value: $source) -> Self {
                    Self::$variant(value.into())
                }
            }
        )*
    };
}

property_value_from! {
    bool => Boolean,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    &str => String,
}

// ============================================================================
// Bodies
// ============================================================================

/// Kind of message body, used to pick the native message to instantiate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    Empty,
    Text,
    Bytes,
    Map,
    Stream,
    Object,
}

impl BodyKind {
    /// Empty body of this kind
    pub fn empty_body(self) -> MessageBody {
        match self {
            Self::Empty => MessageBody::Empty,
            Self::Text => MessageBody::Text(None),
            Self::Bytes => MessageBody::Bytes(Bytes::new()),
            Self::Map => MessageBody::Map(BTreeMap::new()),
            Self::Stream => MessageBody::Stream(Vec::new()),
            Self::Object => MessageBody::Object(None),
        }
    }
}

/// Message payload
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MessageBody {
    #[default]
    Empty,
    Text(Option<String>),
    Bytes(Bytes),
    Map(BTreeMap<String, PropertyValue>),
    Stream(Vec<PropertyValue>),
    /// Serialized object payload, opaque to the runtime
    Object(Option<Bytes>),
}

impl MessageBody {
    pub fn kind(&self) -> BodyKind {
        match self {
            Self::Empty => BodyKind::Empty,
            Self::Text(_) => BodyKind::Text,
            Self::Bytes(_) => BodyKind::Bytes,
            Self::Map(_) => BodyKind::Map,
            Self::Stream(_) => BodyKind::Stream,
            Self::Object(_) => BodyKind::Object,
        }
    }
}

// ============================================================================
// Message
// ============================================================================

/// A native message: standard headers, application properties and a body
#[derive(Debug, Clone)]
pub struct Message {
    pub message_id: Option<MessageId>,
    pub correlation_id: Option<String>,
    pub message_type: Option<String>,
    pub destination: Option<Destination>,
    pub reply_to: Option<Destination>,
    pub delivery_mode: DeliveryMode,
    pub expiration: Option<Timestamp>,
    pub timestamp: Option<Timestamp>,
    pub redelivered: bool,
    pub body: MessageBody,
    priority: u8,
    properties: BTreeMap<String, PropertyValue>,
    validate_property_names: bool,
}

impl Message {
    /// Create new message with body and default headers
    pub fn new(body: MessageBody) -> Self {
        Self {
            message_id: None,
            correlation_id: None,
            message_type: None,
            destination: None,
            reply_to: None,
            delivery_mode: DeliveryMode::default(),
            expiration: None,
            timestamp: None,
            redelivered: false,
            body,
            priority: DEFAULT_PRIORITY,
            properties: BTreeMap::new(),
            validate_property_names: true,
        }
    }

    /// Set message ID
    pub fn with_message_id(mut self, message_id: MessageId) -> Self {
        self.message_id = Some(message_id);
        self
    }

    /// Set correlation ID
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Set the application-defined message type
    pub fn with_type(mut self, message_type: impl Into<String>) -> Self {
        self.message_type = Some(message_type.into());
        self
    }

    /// Set the destination the message is sent to
    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = Some(destination);
        self
    }

    /// Set the destination replies should be sent to
    pub fn with_reply_to(mut self, reply_to: Destination) -> Self {
        self.reply_to = Some(reply_to);
        self
    }

    /// Enable or disable property name validation for this message
    pub fn with_property_name_validation(mut self, enabled: bool) -> Self {
        self.validate_property_names = enabled;
        self
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    /// Set priority, which must be between 0 and 9
    pub fn set_priority(&mut self, priority: u8) -> Result<(), ValidationError> {
        if priority > MAX_PRIORITY {
            return Err(ValidationError::OutOfRange {
                field: "priority".to_string(),
                message: format!("must be 0-{}, got {}", MAX_PRIORITY, priority),
            });
        }

        self.priority = priority;
        Ok(())
    }

    /// Set an application property, replacing any previous value.
    ///
    /// With name validation enabled, names starting with `JMS` are rejected
    /// because they belong to the provider.
    pub fn set_property(
        &mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Result<(), ValidationError> {
        let name = name.into();
        check_property_name(&name, self.validate_property_names)?;
        if self.validate_property_names && name.starts_with(PROVIDER_PROPERTY_PREFIX) {
            return Err(ValidationError::InvalidFormat {
                field: "property_name".to_string(),
                message: format!("'{}' is reserved for the provider", name),
            });
        }
        self.properties.insert(name, value.into());
        Ok(())
    }

    /// Insert a property whose name has already been checked
    pub(crate) fn insert_property(&mut self, name: String, value: PropertyValue) {
        self.properties.insert(name, value);
    }

    /// Get a property value as stored
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Property names in sorted order
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn clear_properties(&mut self) {
        self.properties.clear();
    }

    /// Read a property as boolean; absent properties read as `false`
    pub fn boolean_property(&self, name: &str) -> Result<bool, ClientError> {
        match self.properties.get(name) {
            None => Ok(false),
            Some(value) => value
                .as_bool()
                .ok_or_else(|| conversion_error(name, value, "boolean")),
        }
    }

    /// Read a property as string; every type converts
    pub fn string_property(&self, name: &str) -> Option<String> {
        self.properties.get(name).map(PropertyValue::to_string_value)
    }

    /// Read a property as int
    pub fn int_property(&self, name: &str) -> Result<Option<i32>, ClientError> {
        self.convert_property(name, "int", PropertyValue::as_i32)
    }

    /// Read a property as long
    pub fn long_property(&self, name: &str) -> Result<Option<i64>, ClientError> {
        self.convert_property(name, "long", PropertyValue::as_i64)
    }

    /// Read a property as double
    pub fn double_property(&self, name: &str) -> Result<Option<f64>, ClientError> {
        self.convert_property(name, "double", PropertyValue::as_f64)
    }

    fn convert_property<T>(
        &self,
        name: &str,
        to: &'static str,
        convert: impl Fn(&PropertyValue) -> Option<T>,
    ) -> Result<Option<T>, ClientError> {
        self.properties
            .get(name)
            .map(|value| convert(value).ok_or_else(|| conversion_error(name, value, to)))
            .transpose()
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::new(MessageBody::Empty)
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.message_id == other.message_id
            && self.correlation_id == other.correlation_id
            && self.message_type == other.message_type
            && self.destination == other.destination
            && self.reply_to == other.reply_to
            && self.delivery_mode == other.delivery_mode
            && self.expiration == other.expiration
            && self.timestamp == other.timestamp
            && self.redelivered == other.redelivered
            && self.priority == other.priority
            && self.properties == other.properties
            && self.body == other.body
    }
}

fn conversion_error(name: &str, value: &PropertyValue, to: &'static str) -> ClientError {
    ClientError::PropertyConversion {
        name: name.to_string(),
        from: value.type_name(),
        to,
    }
}

/// Check a property name against the identifier rules
pub fn check_property_name(name: &str, validate_identifier: bool) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "property_name".to_string(),
        });
    }

    if !validate_identifier {
        return Ok(());
    }

    let pattern = PROPERTY_NAME
        .as_ref()
        .map_err(|e| ValidationError::InvalidFormat {
            field: "property_name".to_string(),
            message: e.to_string(),
        })?;

    if !pattern.is_match(name) {
        return Err(ValidationError::InvalidFormat {
            field: "property_name".to_string(),
            message: format!("'{}' is not a valid identifier", name),
        });
    }

    if RESERVED_PROPERTY_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
    {
        return Err(ValidationError::InvalidFormat {
            field: "property_name".to_string(),
            message: format!("'{}' is a reserved word", name),
        });
    }

    Ok(())
}

// ============================================================================
// Message Source
// ============================================================================

/// Read-only view of a message of native or foreign origin.
///
/// Foreign bindings implement this over their own message objects. Every
/// accessor is fallible because foreign getters may fail.
pub trait MessageSource {
    /// The native message behind this view, if any
    fn as_native(&self) -> Option<&Message> {
        None
    }

    fn message_id(&self) -> Result<Option<String>, ClientError>;

    fn correlation_id(&self) -> Result<Option<String>, ClientError>;

    fn message_type(&self) -> Result<Option<String>, ClientError>;

    fn destination(&self) -> Result<Option<DestinationRef<'_>>, ClientError>;

    fn reply_to(&self) -> Result<Option<DestinationRef<'_>>, ClientError>;

    fn delivery_mode(&self) -> Result<DeliveryMode, ClientError>;

    fn priority(&self) -> Result<u8, ClientError>;

    fn expiration(&self) -> Result<Option<Timestamp>, ClientError>;

    fn timestamp(&self) -> Result<Option<Timestamp>, ClientError>;

    fn redelivered(&self) -> Result<bool, ClientError>;

    fn property_names(&self) -> Result<Vec<String>, ClientError>;

    fn property(&self, name: &str) -> Result<Option<PropertyValue>, ClientError>;

    fn body(&self) -> Result<MessageBody, ClientError>;
}

impl MessageSource for Message {
    fn as_native(&self) -> Option<&Message> {
        Some(self)
    }

    fn message_id(&self) -> Result<Option<String>, ClientError> {
        Ok(self.message_id.as_ref().map(|id| id.as_str().to_string()))
    }

    fn correlation_id(&self) -> Result<Option<String>, ClientError> {
        Ok(self.correlation_id.clone())
    }

    fn message_type(&self) -> Result<Option<String>, ClientError> {
        Ok(self.message_type.clone())
    }

    fn destination(&self) -> Result<Option<DestinationRef<'_>>, ClientError> {
        Ok(self.destination.as_ref().map(DestinationRef::Native))
    }

    fn reply_to(&self) -> Result<Option<DestinationRef<'_>>, ClientError> {
        Ok(self.reply_to.as_ref().map(DestinationRef::Native))
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
        Ok(self.properties.keys().cloned().collect())
    }

    fn property(&self, name: &str) -> Result<Option<PropertyValue>, ClientError> {
        Ok(self.properties.get(name).cloned())
    }

    fn body(&self) -> Result<MessageBody, ClientError> {
        Ok(self.body.clone())
    }
}
