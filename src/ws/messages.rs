//! WebSocket message types: envelope and client commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for requests; server-generated for events.
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp.
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    pub payload: serde_json::Value,
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client → Server command.
    Command,
    /// Server → Client response to a command.
    Response,
    /// Server → Client broadcast event.
    Event,
    /// Server → Client error.
    Error,
}

/// Commands that a client can send over WebSocket.
///
/// Subscriptions are per animal topic (`topic/animal/{animalId}`); a
/// subscribed client receives every location and heart-rate event
/// published for that animal.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Subscribe to an animal's event topic.
    Subscribe {
        /// Animal to follow.
        #[serde(rename = "animalId")]
        animal_id: uuid::Uuid,
    },
    /// Unsubscribe from an animal's event topic.
    Unsubscribe {
        /// Animal to stop following.
        #[serde(rename = "animalId")]
        animal_id: uuid::Uuid,
    },
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_command_parses() {
        let animal = uuid::Uuid::new_v4();
        let json = format!(r#"{{"command":"subscribe","animalId":"{animal}"}}"#);
        let Ok(WsCommand::Subscribe { animal_id }) = serde_json::from_str::<WsCommand>(&json)
        else {
            panic!("expected subscribe command");
        };
        assert_eq!(animal_id, animal);
    }

    #[test]
    fn unknown_command_is_rejected() {
        let json = r#"{"command":"replay","animalId":"00000000-0000-0000-0000-000000000000"}"#;
        assert!(serde_json::from_str::<WsCommand>(json).is_err());
    }
}
