//! WebSocket message types: envelope, commands, and events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::TallyEvent;

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for requests; server-generated for events.
    #[serde(default)]
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl WsMessage {
    /// Wraps a domain event for broadcast.
    #[must_use]
    pub fn event(event: &TallyEvent) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            msg_type: WsMessageType::Event,
            timestamp: Utc::now(),
            payload: serde_json::to_value(event).unwrap_or_default(),
        }
    }

    /// Answer to the command with id `id`.
    #[must_use]
    pub fn response(id: String, payload: serde_json::Value) -> Self {
        Self {
            id,
            msg_type: WsMessageType::Response,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Error answer to the command with id `id`.
    #[must_use]
    pub fn error(id: String, code: u16, message: &str) -> Self {
        Self {
            id,
            msg_type: WsMessageType::Error,
            timestamp: Utc::now(),
            payload: serde_json::json!({
                "code": code,
                "message": message,
            }),
        }
    }
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

/// Commands a client can send in the payload of a `command` message.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Receive serving and availability events for these beverages.
    /// `"*"` subscribes to every beverage.
    Subscribe {
        /// Beverage ids.
        beverage_ids: Vec<String>,
    },
    /// Stop receiving events for these beverages.
    Unsubscribe {
        /// Beverage ids.
        beverage_ids: Vec<String>,
    },
    /// Fetch the current live event.
    GetState,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::BeverageId;

    #[test]
    fn parses_subscribe_command() {
        let raw = r#"{"id":"1","type":"command","payload":{"command":"subscribe","beverage_ids":["hugo","*"]}}"#;
        let Ok(msg) = serde_json::from_str::<WsMessage>(raw) else {
            panic!("envelope did not parse");
        };
        assert_eq!(msg.msg_type, WsMessageType::Command);
        let Ok(WsCommand::Subscribe { beverage_ids }) = serde_json::from_value(msg.payload) else {
            panic!("command did not parse");
        };
        assert_eq!(beverage_ids, ["hugo", "*"]);
    }

    #[test]
    fn event_envelope_carries_payload() {
        let msg = WsMessage::event(&TallyEvent::AvailabilityToggled {
            beverage_id: BeverageId::new("hugo"),
            available: true,
            timestamp: Utc::now(),
        });
        assert_eq!(msg.msg_type, WsMessageType::Event);
        assert_eq!(
            msg.payload.get("eventType").and_then(|v| v.as_str()),
            Some("availability_toggled")
        );
        let Ok(json) = serde_json::to_value(&msg) else {
            panic!("serialize failed");
        };
        assert_eq!(json.get("type").and_then(|v| v.as_str()), Some("event"));
    }
}
