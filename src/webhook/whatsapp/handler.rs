//! # WhatsApp Message Exchange
//!
//! Business logic of the relay: sending a text message through the Graph
//! API, turning webhook notifications into flat inbound events, and the
//! webhook subscription handshake.

use super::{
    client::{ApiReply, MessagingApi},
    errors::WhatsAppError,
    models::{InboundMessageEvent, MessageResult, OutgoingMessage},
    outgoing_schemas::{OutgoingTextMessage, WhatsAppMessageResponse},
    schemas::{Change, Message, Status, WebhookPayload},
};
use crate::{consts, metric};
use subtle::ConstantTimeEq;

/// Sends a text message via the WhatsApp Business API.
///
/// The sending number is the first phone number of the business account.
/// A remote rejection (status >= 400) is returned as a failed
/// [`MessageResult`]; errors are reserved for lookup failures, transport
/// failures and unreadable responses.
///
/// # Arguments
/// * `api` - WhatsApp API client
/// * `msg` - Message to send, `to` and `message` already validated as non-empty
pub async fn send_message(
    api: &dyn MessagingApi,
    msg: &OutgoingMessage,
) -> Result<MessageResult, WhatsAppError> {
    let phones = api.list_phone_numbers().await?;
    let phone = phones
        .data
        .first()
        .ok_or(WhatsAppError::NoPhoneNumberConfigured)?;
    log::info!(
        "sending from agent phone {id} ({name})",
        id = phone.id,
        name = phone.verified_name
    );

    if msg.media_url.is_some() {
        log::debug!("media_url is ignored, only text messages are sent");
    }

    let envelope = OutgoingTextMessage::new(&msg.to, &msg.message);
    let reply = api.post_message(&phone.id, &envelope).await?;

    read_send_reply(&reply)
}

/// Maps the Graph API answer to a message send into a [`MessageResult`]
pub fn read_send_reply(reply: &ApiReply) -> Result<MessageResult, WhatsAppError> {
    if reply.status >= 400 {
        return Ok(MessageResult::failed(format!(
            "API error (status {status}): {body}",
            status = reply.status,
            body = reply.body
        )));
    }

    let response: WhatsAppMessageResponse =
        serde_json::from_str(&reply.body).map_err(WhatsAppError::InvalidResponse)?;

    Ok(MessageResult::sent(
        response.first_message_id().map(str::to_string),
    ))
}

/// Parses a raw webhook body, a bare `null` being an empty payload
pub fn parse_webhook_payload(payload: &[u8]) -> Result<WebhookPayload, WhatsAppError> {
    serde_json::from_slice::<Option<WebhookPayload>>(payload)
        .map(Option::unwrap_or_default)
        .map_err(WhatsAppError::WebhookParse)
}

fn message_changes(payload: &WebhookPayload) -> impl Iterator<Item = &Change> {
    payload
        .entry
        .iter()
        .flat_map(|entry| &entry.changes)
        .filter(|change| change.field == consts::WEBHOOK_MESSAGES_FIELD)
}

/// Extracts every incoming message of a webhook payload.
///
/// Only "messages" field changes are considered.
pub fn extract_inbound_events(payload: &WebhookPayload) -> Vec<InboundMessageEvent> {
    message_changes(payload)
        .flat_map(|change| {
            change
                .value
                .messages
                .iter()
                .flatten()
                .map(move |message| to_inbound_event(message, &change.value.metadata.phone_number_id))
        })
        .collect()
}

/// Extracts the delivery status updates of a webhook payload
pub fn extract_statuses(payload: &WebhookPayload) -> Vec<&Status> {
    message_changes(payload)
        .filter_map(|change| change.value.statuses.as_ref())
        .flatten()
        .collect()
}

fn to_inbound_event(message: &Message, recipient_id: &str) -> InboundMessageEvent {
    let body = match (message.msg_type.as_str(), &message.text) {
        (consts::WHATSAPP_TEXT_TYPE, Some(text)) => text.body.clone(),
        _ => String::new(),
    };

    let media = message
        .media()
        .and_then(|media| serde_json::to_value(media).ok())
        .and_then(|value| match value {
            serde_json::Value::Object(map) => Some(map),
            _ => None,
        });

    InboundMessageEvent {
        sender_id: message.from.clone(),
        recipient_id: recipient_id.to_string(),
        timestamp: message.timestamp.clone(),
        message_id: message.id.clone(),
        body,
        msg_type: message.msg_type.clone(),
        media,
    }
}

/// Main webhook processor
///
/// Parses the payload and logs every incoming message. Nothing is stored and
/// redelivered messages are processed again.
///
/// # Returns
/// The extracted messages, or a [`WhatsAppError::WebhookParse`] if the body
/// is not a webhook payload.
pub fn process_webhook(payload: &[u8]) -> Result<Vec<InboundMessageEvent>, WhatsAppError> {
    let payload = parse_webhook_payload(payload)?;

    let events = extract_inbound_events(&payload);
    for event in &events {
        log::info!("received message: {event:?}");
        metric::incr_inbound_message_statds(&event.msg_type);
    }

    for status in extract_statuses(&payload) {
        log::debug!(
            "message {id} is now {status} for {recipient}",
            id = status.id,
            status = status.status,
            recipient = status.recipient_id
        );
    }

    Ok(events)
}

/// Outcome of the webhook subscription handshake
#[derive(Debug, PartialEq)]
pub enum Verification {
    /// Echo the challenge back
    Accepted(String),
    Rejected,
}

/// Checks a webhook verification request.
///
/// Accepted when `mode` is "subscribe" and `token` equals the configured
/// secret. An empty secret never matches.
pub fn verify_subscription(mode: &str, token: &str, challenge: &str, secret: &str) -> Verification {
    let token_matches: bool = token.as_bytes().ct_eq(secret.as_bytes()).into();

    if mode == consts::WEBHOOK_SUBSCRIBE_MODE && !secret.is_empty() && token_matches {
        return Verification::Accepted(challenge.to_string());
    }

    Verification::Rejected
}
