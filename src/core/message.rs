//! # Message Model
//!
//! The message entity and its three payload variants.
//!
//! ```text
//! Message
//! ├── id: MessageId        // UUID v4, list key and deletion target
//! └── payload: Payload
//!     ├── Text(String)
//!     ├── Image { uri }
//!     └── Location(Coordinate)
//! ```
//!
//! Messages are immutable. The only way to get one is through a variant
//! constructor (`Message::new_text`, `new_image`, `new_location`) or from a
//! config seed entry (`MessageEntry`), and all of them validate. Editing is
//! delete-and-recreate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a message, unique across the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(Uuid);

impl MessageId {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closed set of payload tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Text,
    Image,
    Location,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Image => "image",
            MessageKind::Location => "location",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = MessageError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "text" => Ok(MessageKind::Text),
            "image" => Ok(MessageKind::Image),
            "location" => Ok(MessageKind::Location),
            other => Err(MessageError::UnsupportedVariant(other.to_string())),
        }
    }
}

/// A point on the globe. Only constructible with finite, in-range values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, MessageError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(MessageError::InvalidPayload {
                kind: MessageKind::Location,
                reason: "latitude and longitude must be numbers",
            });
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(MessageError::InvalidPayload {
                kind: MessageKind::Location,
                reason: "latitude must be within [-90, 90]",
            });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(MessageError::InvalidPayload {
                kind: MessageKind::Location,
                reason: "longitude must be within [-180, 180]",
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Variant payload. Exactly one per message, always matching its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Image { uri: String },
    Location(Coordinate),
}

impl Payload {
    pub fn kind(&self) -> MessageKind {
        match self {
            Payload::Text(_) => MessageKind::Text,
            Payload::Image { .. } => MessageKind::Image,
            Payload::Location(_) => MessageKind::Location,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    id: MessageId,
    payload: Payload,
}

impl Message {
    /// Build a text message. Empty content is rejected; anything else,
    /// whitespace included, is stored verbatim.
    pub fn new_text(content: impl Into<String>) -> Result<Self, MessageError> {
        let content = content.into();
        if content.is_empty() {
            return Err(MessageError::InvalidPayload {
                kind: MessageKind::Text,
                reason: "text content must not be empty",
            });
        }
        Ok(Self::with_payload(Payload::Text(content)))
    }

    pub fn new_image(uri: impl Into<String>) -> Result<Self, MessageError> {
        let uri = uri.into();
        if uri.is_empty() {
            return Err(MessageError::InvalidPayload {
                kind: MessageKind::Image,
                reason: "image uri must not be empty",
            });
        }
        Ok(Self::with_payload(Payload::Image { uri }))
    }

    /// Coordinates are validated by [`Coordinate::new`], so this cannot fail.
    pub fn new_location(coordinate: Coordinate) -> Self {
        Self::with_payload(Payload::Location(coordinate))
    }

    fn with_payload(payload: Payload) -> Self {
        Self {
            id: MessageId::fresh(),
            payload,
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn kind(&self) -> MessageKind {
        self.payload.kind()
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}

/// Untyped message description as it appears in config (`[[messages]]`).
///
/// The `type` tag is kept as a string so an unknown tag reaches
/// [`MessageEntry::into_message`] and fails loudly as `UnsupportedVariant`
/// instead of being rejected by the TOML parser with a generic error.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MessageEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<String>,
    pub uri: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl MessageEntry {
    pub fn text(content: &str) -> Self {
        Self {
            kind: MessageKind::Text.as_str().to_string(),
            text: Some(content.to_string()),
            ..Default::default()
        }
    }

    pub fn image(uri: &str) -> Self {
        Self {
            kind: MessageKind::Image.as_str().to_string(),
            uri: Some(uri.to_string()),
            ..Default::default()
        }
    }

    pub fn location(latitude: f64, longitude: f64) -> Self {
        Self {
            kind: MessageKind::Location.as_str().to_string(),
            latitude: Some(latitude),
            longitude: Some(longitude),
            ..Default::default()
        }
    }

    /// Validate the entry and build the message it describes.
    /// Fields belonging to other variants are ignored.
    pub fn into_message(self) -> Result<Message, MessageError> {
        match self.kind.parse::<MessageKind>()? {
            MessageKind::Text => Message::new_text(self.text.unwrap_or_default()),
            MessageKind::Image => Message::new_image(self.uri.unwrap_or_default()),
            MessageKind::Location => match (self.latitude, self.longitude) {
                (Some(lat), Some(lon)) => Ok(Message::new_location(Coordinate::new(lat, lon)?)),
                _ => Err(MessageError::InvalidPayload {
                    kind: MessageKind::Location,
                    reason: "location needs both latitude and longitude",
                }),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MessageError {
    /// Required variant field missing or malformed. The message never exists.
    InvalidPayload {
        kind: MessageKind,
        reason: &'static str,
    },
    /// A type tag outside `{text, image, location}`.
    UnsupportedVariant(String),
    /// Insert of an id already present in the collection.
    DuplicateId(MessageId),
}

impl fmt::Display for MessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageError::InvalidPayload { kind, reason } => {
                write!(f, "invalid {kind} payload: {reason}")
            }
            MessageError::UnsupportedVariant(tag) => {
                write!(f, "unsupported message variant: {tag:?}")
            }
            MessageError::DuplicateId(id) => write!(f, "duplicate message id: {id}"),
        }
    }
}

impl std::error::Error for MessageError {}
