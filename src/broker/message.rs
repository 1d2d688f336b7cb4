use serde::{Deserialize, Serialize};

/// Represents one chat event routed by the broker.
///
/// A message is either direct (`broadcast == false`, delivered to
/// `recipient` only) or a broadcast (delivered to every participant registered
/// at dispatch time, `recipient` ignored). The broker does not check that the
/// two fields agree.
///
/// # Fields
///
/// - `sender` - Opaque identifier of the origin. Not required to be unique.
/// - `recipient` - Target participant for direct messages; leave empty for broadcasts.
/// - `content` - Opaque text payload.
/// - `broadcast` - Delivery mode.
/// - `timestamp` - Milliseconds since the Unix epoch, assigned by the dispatcher
///   when the message is dequeued. Whatever the sender puts here is overwritten.
///
/// # Example
///
/// ```rust
/// use chatcore::broker::Message;
///
/// let msg = Message::direct("alice", "bob", "hey");
/// assert!(!msg.broadcast);
/// assert_eq!(msg.timestamp, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: String,
    #[serde(default)]
    pub recipient: String,
    pub content: String,
    #[serde(default)]
    pub broadcast: bool,
    #[serde(default)]
    pub timestamp: i64,
}

impl Message {
    /// A message addressed to a single participant.
    pub fn direct(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            content: content.into(),
            broadcast: false,
            timestamp: 0,
        }
    }

    /// A message offered to every registered participant.
    pub fn broadcast(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            recipient: String::new(),
            content: content.into(),
            broadcast: true,
            timestamp: 0,
        }
    }
}
