//! WhatsApp endpoint handlers
//!
//! - `POST /whatsapp/send` sends a text message
//! - `GET /whatsapp/webhook` answers the webhook verification handshake
//! - `POST /whatsapp/webhook` receives webhook notifications

use super::{
    handler::{self, Verification},
    models::{MessageResult, OutgoingMessage},
};
use crate::{api::AppState, errors, metric};
use ntex::{util::Bytes, web};

/// `hub.*` parameters of the handshake, absent ones are empty
#[derive(Debug, Default, PartialEq)]
pub struct VerifyQuery {
    pub mode: String,
    pub verify_token: String,
    pub challenge: String,
}

impl VerifyQuery {
    /// Picks the handshake parameters out of the raw query pairs.
    ///
    /// A repeated key keeps its first value.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let first = |key: &str| {
            pairs
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value.clone())
                .unwrap_or_default()
        };

        Self {
            mode: first("hub.mode"),
            verify_token: first("hub.verify_token"),
            challenge: first("hub.challenge"),
        }
    }
}

/// Send a WhatsApp text message
///
/// # Request Body
/// `{"to": "6598232744", "message": "hi", "media_url": null}`
///
/// # Returns
/// - 200 with a [`MessageResult`] once WhatsApp answered, even if it refused
/// - 400 if the body is not valid or `to`/`message` are empty
/// - 500 if WhatsApp could not be reached
#[web::post("/send")]
pub async fn send(
    body: Bytes,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let _span = logfire::span!("whatsapp_send").entered();

    let msg: OutgoingMessage =
        serde_json::from_slice(&body).map_err(|_| errors::ApiError::InvalidRequestFormat)?;

    if !msg.has_required_fields() {
        return Err(errors::ApiError::MissingRequiredFields.into());
    }

    let result = handler::send_message(app_state.whatsapp_api.as_ref(), &msg)
        .await
        .map_err(|e| {
            metric::incr_outbound_message_statds("failed");
            errors::ApiError::ExternalServiceError(e.to_string())
        })?;

    metric::incr_outbound_message_statds(if result.success { "sent" } else { "rejected" });

    Ok(web::HttpResponse::Ok().json(&result))
}

/// Answers the handshake WhatsApp runs when the webhook URL is registered.
///
/// Echoes `hub.challenge` as plain text with 200 when the token matches the
/// configured secret, otherwise 403.
#[web::get("/webhook")]
pub async fn verify(
    query: web::types::Query<Vec<(String, String)>>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let query = VerifyQuery::from_pairs(&query);
    let verification = handler::verify_subscription(
        &query.mode,
        &query.verify_token,
        &query.challenge,
        &app_state.webhook_secret,
    );

    match verification {
        Verification::Accepted(challenge) => {
            log::info!("webhook verification successful");
            Ok(web::HttpResponse::Ok()
                .content_type("text/plain")
                .body(challenge))
        }
        Verification::Rejected => {
            log::warn!("webhook verification failed: mode={}", query.mode);
            Ok(web::HttpResponse::Forbidden()
                .content_type("text/plain")
                .body("Verification failed"))
        }
    }
}

/// Receives webhook notifications.
///
/// Handled inline: WhatsApp waits up to 20 seconds for the answer.
///
/// # Returns
/// - 200 if the payload was parsed, whether or not it held messages
/// - 400 if the payload cannot be parsed
#[web::post("/webhook")]
pub async fn receive(body: Bytes) -> Result<impl web::Responder, web::Error> {
    let _span = logfire::span!("whatsapp_webhook").entered();

    handler::process_webhook(&body)
        .map_err(|e| errors::ApiError::InvalidPayload(e.to_string()))?;

    Ok(web::HttpResponse::Ok().json(&MessageResult::ok("Webhook processed successfully")))
}
