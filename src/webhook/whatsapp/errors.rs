use derive_more::{Display, Error};

/// Failures of the WhatsApp adapter.
///
/// A remote rejection of an outbound message is not one of these: it comes
/// back as a [`MessageResult`](super::models::MessageResult) with
/// `success: false`.
#[derive(Debug, Display, Error)]
pub enum WhatsAppError {
    #[display("failed to parse webhook payload: {_0}")]
    WebhookParse(serde_json::Error),
    #[display("no phone number configured for the business account")]
    NoPhoneNumberConfigured,
    #[display("API error (status {status}): {body}")]
    Api { status: u16, body: String },
    #[display("failed to send request: {_0}")]
    Transport(reqwest::Error),
    #[display("failed to parse response: {_0}")]
    InvalidResponse(serde_json::Error),
}
