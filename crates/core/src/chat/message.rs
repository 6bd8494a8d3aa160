use chrono::{DateTime, Utc};
use serde::Serialize;

/// Identifies a message within a chat widget.
///
/// Identifiers are allocated in increasing order and never reused, not
/// even after the session is reset.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
)]
pub struct MessageId(pub(crate) u64);

/// Who wrote a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The person typing in the chat box.
    User,
    /// The service.
    Bot,
}

/// A message in the chat. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    id: MessageId,
    text: String,
    sender: Sender,
    timestamp: DateTime<Utc>,
}

impl ChatMessage {
    #[inline]
    pub(crate) fn new(
        id: MessageId,
        text: String,
        sender: Sender,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            text,
            sender,
            timestamp,
        }
    }

    /// Returns the identifier of this message.
    #[inline]
    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the text of this message.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns who wrote this message.
    #[inline]
    pub fn sender(&self) -> Sender {
        self.sender
    }

    /// Returns when this message was added to the chat.
    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
