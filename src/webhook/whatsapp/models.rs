use serde::{Deserialize, Serialize};
use serde_json::Map;

/// Message to be sent via WhatsApp, as posted to `/whatsapp/send`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutgoingMessage {
    /// Destination phone number, e.g. "+6598232744"
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub message: String,
    /// Accepted for compatibility, outbound media is not sent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
}

impl OutgoingMessage {
    pub fn has_required_fields(&self) -> bool {
        !self.to.is_empty() && !self.message.is_empty()
    }
}

/// Uniform result of message operations, also the JSON error envelope
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MessageResult {
    pub success: bool,
    pub message: String,
    /// Message ID assigned by WhatsApp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl MessageResult {
    pub fn sent(id: Option<String>) -> Self {
        Self {
            success: true,
            message: "Message sent successfully".to_string(),
            id,
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            id: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            id: None,
        }
    }
}

/// Incoming WhatsApp message flattened out of the webhook envelope
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InboundMessageEvent {
    pub sender_id: String,
    /// Phone number ID of the business number that received the message
    pub recipient_id: String,
    /// Unix timestamp as sent by WhatsApp, not reparsed
    pub timestamp: String,
    pub message_id: String,
    /// Text body, empty for every type other than "text"
    pub body: String,
    #[serde(rename = "type")]
    pub msg_type: String,
    /// Media descriptor (id, mime type, hash, caption) for media messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<Map<String, serde_json::Value>>,
}
