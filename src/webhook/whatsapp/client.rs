//! # WhatsApp API Client
//!
//! Client for the WhatsApp Business API (Meta Graph API). It lists the phone
//! numbers of the business account and posts message envelopes.
//!
//! Both calls authenticate with the access token as a bearer header.

use super::{
    errors::WhatsAppError,
    outgoing_schemas::{OutgoingTextMessage, PhoneNumbersResponse},
};
use crate::config::AppConfig;
use async_trait::async_trait;

/// Raw answer of the Graph API to a message send
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub status: u16,
    pub body: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagingApi: Send + Sync {
    /// Lists the phone numbers registered in the business account.
    ///
    /// Any non-2xx answer is an error carrying the status and raw body.
    async fn list_phone_numbers(&self) -> Result<PhoneNumbersResponse, WhatsAppError>;

    /// Posts a message envelope from the given phone number.
    ///
    /// HTTP error statuses are returned as an [`ApiReply`], only transport
    /// failures are errors.
    async fn post_message(
        &self,
        phone_number_id: &str,
        message: &OutgoingTextMessage,
    ) -> Result<ApiReply, WhatsAppError>;
}

pub type ImplMessagingApi = Box<dyn MessagingApi>;

/// WhatsApp Graph API client
#[derive(Clone)]
pub struct WhatsAppClient {
    /// HTTP client for making API requests
    client: reqwest::Client,
    /// Graph API base URL, e.g. "https://graph.facebook.com"
    graph_host: String,
    api_version: String,
    business_account_id: String,
    /// Authentication token
    access_token: String,
}

impl WhatsAppClient {
    pub fn new(app_config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            graph_host: app_config.whatsapp_graph_host.trim_end_matches('/').to_string(),
            api_version: app_config.whatsapp_api_version.clone(),
            business_account_id: app_config.whatsapp_business_account_id.clone(),
            access_token: app_config.whatsapp_access_token.clone(),
        }
    }

    /// Endpoint listing the phone numbers of the business account
    pub fn phone_numbers_endpoint(&self) -> String {
        format!(
            "{host}/{version}/{account}/phone_numbers",
            host = self.graph_host,
            version = self.api_version,
            account = self.business_account_id
        )
    }

    /// Endpoint for sending messages from a phone number
    pub fn send_msg_endpoint(&self, phone_number_id: &str) -> String {
        format!(
            "{host}/{version}/{phone_number_id}/messages",
            host = self.graph_host,
            version = self.api_version,
        )
    }
}

#[async_trait]
impl MessagingApi for WhatsAppClient {
    async fn list_phone_numbers(&self) -> Result<PhoneNumbersResponse, WhatsAppError> {
        let response = self
            .client
            .get(self.phone_numbers_endpoint())
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(WhatsAppError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(WhatsAppError::Transport)?;

        if !status.is_success() {
            return Err(WhatsAppError::Api {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(WhatsAppError::InvalidResponse)
    }

    async fn post_message(
        &self,
        phone_number_id: &str,
        message: &OutgoingTextMessage,
    ) -> Result<ApiReply, WhatsAppError> {
        let response = self
            .client
            .post(self.send_msg_endpoint(phone_number_id))
            .bearer_auth(&self.access_token)
            .header("Content-Type", "application/json")
            .json(message)
            .send()
            .await
            .map_err(WhatsAppError::Transport)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(WhatsAppError::Transport)?;
        log::debug!("sent message, response status {status}: {body}");

        Ok(ApiReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::config_from;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path},
    };

    fn client_for(server: &MockServer) -> WhatsAppClient {
        let graph_host = server.uri();
        WhatsAppClient::new(&config_from(&[
            ("META_WA_GRAPH_HOST", graph_host.as_str()),
            ("META_WA_API_VERSION", "v22.0"),
            ("META_WA_BUSINESS_ID", "biz-1"),
            ("META_WA_ACCESS_TOKEN", "token-1"),
        ]))
    }

    #[test]
    fn test_endpoints() {
        let client = WhatsAppClient::new(&config_from(&[
            ("META_WA_GRAPH_HOST", "https://graph.facebook.com/"),
            ("META_WA_BUSINESS_ID", "biz-1"),
        ]));

        assert_eq!(
            client.phone_numbers_endpoint(),
            "https://graph.facebook.com/v22.0/biz-1/phone_numbers"
        );
        assert_eq!(
            client.send_msg_endpoint("phone-1"),
            "https://graph.facebook.com/v22.0/phone-1/messages"
        );
    }

    #[ntex::test]
    async fn test_list_phone_numbers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v22.0/biz-1/phone_numbers"))
            .and(header("Authorization", "Bearer token-1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"data":[{"id":"phone-1","verified_name":"Acme","display_phone_number":"+65 9123 4567","quality_rating":"GREEN"}]}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let phones = client_for(&server).list_phone_numbers().await.unwrap();

        assert_eq!(phones.data.len(), 1);
        assert_eq!(phones.data[0].id, "phone-1");
        assert_eq!(phones.data[0].verified_name, "Acme");
    }

    #[ntex::test]
    async fn test_list_phone_numbers_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v22.0/biz-1/phone_numbers"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let err = client_for(&server).list_phone_numbers().await.unwrap_err();

        assert!(matches!(err, WhatsAppError::Api { status: 403, ref body } if body == "forbidden"));
        assert_eq!(err.to_string(), "API error (status 403): forbidden");
    }

    #[ntex::test]
    async fn test_list_phone_numbers_invalid_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).list_phone_numbers().await.unwrap_err();

        assert!(matches!(err, WhatsAppError::InvalidResponse(_)));
    }

    #[ntex::test]
    async fn test_post_message() {
        let server = MockServer::start().await;
        let message = OutgoingTextMessage::new("+6598765432", "hello");
        Mock::given(method("POST"))
            .and(path("/v22.0/phone-1/messages"))
            .and(header("Authorization", "Bearer token-1"))
            .and(body_json(serde_json::json!({
                "messaging_product": "whatsapp",
                "recipient_type": "individual",
                "to": "6598765432",
                "type": "text",
                "text": {"body": "hello"}
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"messages":[{"id":"wamid.1"}]}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let reply = client_for(&server)
            .post_message("phone-1", &message)
            .await
            .unwrap();

        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, r#"{"messages":[{"id":"wamid.1"}]}"#);
    }

    #[ntex::test]
    async fn test_post_message_error_status_is_a_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let reply = client_for(&server)
            .post_message("phone-1", &OutgoingTextMessage::new("65", "hi"))
            .await
            .unwrap();

        assert_eq!(
            reply,
            ApiReply {
                status: 401,
                body: "unauthorized".to_string()
            }
        );
    }

    #[ntex::test]
    async fn test_transport_failure() {
        let client = WhatsAppClient::new(&config_from(&[(
            "META_WA_GRAPH_HOST",
            "http://127.0.0.1:1",
        )]));

        let err = client.list_phone_numbers().await.unwrap_err();

        assert!(matches!(err, WhatsAppError::Transport(_)));
        assert!(err.to_string().starts_with("failed to send request"));
    }
}
