//! # WhatsApp Graph API Schemas
//!
//! Request envelopes sent to the WhatsApp Business API and the responses it
//! returns for them.

use crate::consts;
use serde::{Deserialize, Serialize};

/// Envelope of an outbound text message
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct OutgoingTextMessage {
    /// Always "whatsapp"
    pub messaging_product: String,
    /// Always "individual"
    pub recipient_type: String,
    /// Recipient's WhatsApp ID (phone number without the leading "+")
    pub to: String,
    #[serde(rename = "type")]
    pub msg_type: String,
    pub text: OutgoingTextContent,
}

impl OutgoingTextMessage {
    /// Creates a new text message.
    ///
    /// WhatsApp expects the recipient without the international "+" prefix,
    /// so one leading "+" is removed from `to`.
    pub fn new(to: &str, body: &str) -> Self {
        Self {
            messaging_product: consts::WHATSAPP_MESSAGING_PRODUCT.to_string(),
            recipient_type: consts::WHATSAPP_RECIPIENT_TYPE.to_string(),
            to: to.strip_prefix('+').unwrap_or(to).to_string(),
            msg_type: consts::WHATSAPP_TEXT_TYPE.to_string(),
            text: OutgoingTextContent {
                body: body.to_string(),
            },
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct OutgoingTextContent {
    pub body: String,
}

/// Graph API answer to an accepted message send
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WhatsAppMessageResponse {
    pub messaging_product: String,
    pub contacts: Vec<WhatsAppContact>,
    pub messages: Vec<WhatsAppMessageStatus>,
}

impl WhatsAppMessageResponse {
    /// ID assigned by WhatsApp to the first message, if any
    pub fn first_message_id(&self) -> Option<&str> {
        self.messages
            .first()
            .map(|message| message.id.as_str())
            .filter(|id| !id.is_empty())
    }
}

/// Recipient as resolved by WhatsApp
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WhatsAppContact {
    pub wa_id: String,
    pub input: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WhatsAppMessageStatus {
    pub id: String,
}

/// Response of the business account phone numbers endpoint
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneNumbersResponse {
    pub data: Vec<PhoneNumber>,
    /// Paging cursors. Only the first page is ever read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,
}

/// Phone number registered in the WhatsApp Business account
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneNumber {
    /// Phone number ID used to send messages
    pub id: String,
    pub verified_name: String,
    pub display_phone_number: String,
    pub quality_rating: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Paging {
    pub cursors: Cursors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Cursors {
    pub before: String,
    pub after: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_message_envelope() {
        let message = OutgoingTextMessage::new("+6598765432", "hi");

        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            serde_json::json!({
                "messaging_product": "whatsapp",
                "recipient_type": "individual",
                "to": "6598765432",
                "type": "text",
                "text": {"body": "hi"}
            })
        );
    }

    #[test]
    fn test_plus_prefix_is_optional() {
        assert_eq!(
            OutgoingTextMessage::new("+6598765432", "hi"),
            OutgoingTextMessage::new("6598765432", "hi")
        );
    }

    #[test]
    fn test_plus_prefix_is_stripped_once() {
        assert_eq!(OutgoingTextMessage::new("++65", "hi").to, "+65");
        assert_eq!(OutgoingTextMessage::new("65+1", "hi").to, "65+1");
    }

    #[test]
    fn test_phone_numbers_response() {
        let response: PhoneNumbersResponse = serde_json::from_str(
            r#"{
                "data": [{
                    "verified_name": "Acme",
                    "display_phone_number": "+65 9123 4567",
                    "id": "106540352242922",
                    "quality_rating": "GREEN"
                }],
                "paging": {"cursors": {"before": "QVFI", "after": "QVFJ"}}
            }"#,
        )
        .unwrap();

        assert_eq!(response.data.len(), 1);
        assert_eq!(response.data[0].id, "106540352242922");
        assert_eq!(response.data[0].quality_rating, "GREEN");
        assert_eq!(response.paging.unwrap().cursors.after, "QVFJ");
    }

    #[test]
    fn test_first_message_id() {
        let response: WhatsAppMessageResponse =
            serde_json::from_str(r#"{"messages":[{"id":"wamid.1"},{"id":"wamid.2"}]}"#).unwrap();
        assert_eq!(response.first_message_id(), Some("wamid.1"));

        let response: WhatsAppMessageResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.first_message_id(), None);
    }
}
