//! Payloads POSTed by WhatsApp to the webhook.
//!
//! The shape is `entry[] -> changes[] -> value`, where `value` holds the
//! received messages and the delivery statuses of sent ones. Missing fields
//! and `null` values fall back to their defaults so partial notifications
//! still parse; only values of the wrong JSON type are rejected.

use serde::{Deserialize, Deserializer, Serialize};

/// Reads a JSON `null` as the field's default value
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WebhookPayload {
    /// "whatsapp_business_account" for this integration
    #[serde(deserialize_with = "null_as_default")]
    pub object: String,
    #[serde(deserialize_with = "null_as_default")]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Entry {
    /// WhatsApp Business account the notification belongs to
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub changes: Vec<Change>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Change {
    /// Subscribed field, only "messages" is handled
    #[serde(deserialize_with = "null_as_default")]
    pub field: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: Value,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Value {
    #[serde(deserialize_with = "null_as_default")]
    pub messaging_product: String,
    #[serde(deserialize_with = "null_as_default")]
    pub metadata: Metadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contacts: Option<Vec<Contact>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Message>>,
    /// Delivery updates of messages we sent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statuses: Option<Vec<Status>>,
}

/// Business number that received the notification
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Metadata {
    #[serde(deserialize_with = "null_as_default")]
    pub display_phone_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone_number_id: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Contact {
    #[serde(deserialize_with = "null_as_default")]
    pub profile: Profile,
    #[serde(deserialize_with = "null_as_default")]
    pub wa_id: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Profile {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

/// Received message. Exactly one of the content fields matches `msg_type`.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Message {
    /// Sender phone number, without "+"
    #[serde(deserialize_with = "null_as_default")]
    pub from: String,
    /// "wamid.*" identifier, stable across redeliveries
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Unix seconds as a string
    #[serde(deserialize_with = "null_as_default")]
    pub timestamp: String,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "null_as_default")]
    pub msg_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<MediaMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<MediaMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<MediaMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<MediaMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sticker: Option<MediaMessage>,
    /// Set when the message quotes an earlier one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
}

impl Message {
    /// Media descriptor matching the message type, if the type carries media
    pub fn media(&self) -> Option<&MediaMessage> {
        match self.msg_type.as_str() {
            "image" => self.image.as_ref(),
            "video" => self.video.as_ref(),
            "audio" => self.audio.as_ref(),
            "document" => self.document.as_ref(),
            "sticker" => self.sticker.as_ref(),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TextMessage {
    #[serde(deserialize_with = "null_as_default")]
    pub body: String,
}

/// Descriptor of an image, video, audio, document or sticker.
///
/// The file itself has to be downloaded with the media id, which this
/// service never does.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MediaMessage {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Documents only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Context {
    #[serde(deserialize_with = "null_as_default")]
    pub from: String,
    /// Id of the quoted message
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
}

/// Delivery update: "sent", "delivered", "read" or "failed"
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Status {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub timestamp: String,
    #[serde(deserialize_with = "null_as_default")]
    pub recipient_id: String,
}
