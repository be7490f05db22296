//! OpenAPI document and the HTML API reference built on top of it

use crate::consts;
use ntex::web;
use serde_json::json;

const REFERENCE_TEMPLATE: &str = r#"<!doctype html>
<html>
  <head>
    <title>{{ title }}</title>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
  </head>
  <body>
    <script id="api-reference" data-url="{{ document_url }}" data-configuration='{"darkMode": true}'></script>
    <script src="{{ cdn_url }}"></script>
  </body>
</html>
"#;

fn message_result_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "required": ["success", "message"],
        "properties": {
            "success": {"type": "boolean"},
            "message": {"type": "string"},
            "id": {"type": "string", "description": "WhatsApp message id, only on a sent message"}
        }
    })
}

/// OpenAPI 3 description of every endpoint served by the app
pub fn openapi_document() -> serde_json::Value {
    let message_result = json!({
        "content": {"application/json": {"schema": {"$ref": "#/components/schemas/MessageResult"}}}
    });

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": consts::API_TITLE,
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Relay between HTTP clients and the WhatsApp Business API"
        },
        "paths": {
            "/whatsapp/send": {
                "post": {
                    "tags": ["whatsapp"],
                    "summary": "Send a WhatsApp text message",
                    "requestBody": {
                        "required": true,
                        "content": {"application/json": {"schema": {"$ref": "#/components/schemas/OutgoingMessage"}}}
                    },
                    "responses": {
                        "200": {"description": "WhatsApp answered, see `success`", "content": message_result["content"]},
                        "400": {"description": "Malformed body or missing fields", "content": message_result["content"]},
                        "500": {"description": "WhatsApp could not be reached or has no phone number", "content": message_result["content"]}
                    }
                }
            },
            "/whatsapp/webhook": {
                "get": {
                    "tags": ["whatsapp"],
                    "summary": "Webhook verification handshake",
                    "parameters": [
                        {"name": "hub.mode", "in": "query", "schema": {"type": "string"}},
                        {"name": "hub.verify_token", "in": "query", "schema": {"type": "string"}},
                        {"name": "hub.challenge", "in": "query", "schema": {"type": "string"}}
                    ],
                    "responses": {
                        "200": {"description": "Challenge echoed back", "content": {"text/plain": {"schema": {"type": "string"}}}},
                        "403": {"description": "Verification failed", "content": {"text/plain": {"schema": {"type": "string"}}}}
                    }
                },
                "post": {
                    "tags": ["whatsapp"],
                    "summary": "Receive webhook notifications",
                    "requestBody": {
                        "required": true,
                        "content": {"application/json": {"schema": {"type": "object"}}}
                    },
                    "responses": {
                        "200": {"description": "Payload processed", "content": message_result["content"]},
                        "400": {"description": "Payload could not be parsed", "content": message_result["content"]}
                    }
                }
            },
            "/health": {
                "get": {
                    "tags": ["service"],
                    "summary": "Liveness probe",
                    "responses": {"200": {"description": "Service is up"}}
                }
            },
            "/dbinfo": {
                "get": {
                    "tags": ["service"],
                    "summary": "Database version and connection status",
                    "responses": {
                        "200": {"description": "Database reachable"},
                        "500": {"description": "Database unavailable"}
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "OutgoingMessage": {
                    "type": "object",
                    "required": ["to", "message"],
                    "properties": {
                        "to": {"type": "string", "example": "6598232744"},
                        "message": {"type": "string", "example": "hello"},
                        "media_url": {"type": "string", "nullable": true, "description": "Accepted and ignored"}
                    }
                },
                "MessageResult": message_result_schema()
            }
        }
    })
}

#[web::get("/openapi.json")]
pub async fn openapi_json() -> Result<impl web::Responder, web::Error> {
    Ok(web::HttpResponse::Ok().json(&openapi_document()))
}

/// Renders the reference page
fn render_reference() -> tera::Result<String> {
    let mut context = tera::Context::new();
    context.insert("title", consts::API_TITLE);
    context.insert("document_url", "/openapi.json");
    context.insert("cdn_url", consts::SCALAR_CDN_URL);

    tera::Tera::one_off(REFERENCE_TEMPLATE, &context, false)
}

#[web::get("/reference")]
pub async fn reference() -> Result<impl web::Responder, web::Error> {
    match render_reference() {
        Ok(content) => Ok(web::HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(content)),
        Err(e) => {
            log::error!("failed to render the API reference: {e}");
            Ok(web::HttpResponse::InternalServerError().finish())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntex::{http, web::test};

    #[test]
    fn test_openapi_document_paths() {
        let doc = openapi_document();

        assert_eq!(doc["info"]["title"], consts::API_TITLE);
        for path in ["/whatsapp/send", "/whatsapp/webhook", "/health", "/dbinfo"] {
            assert!(doc["paths"].get(path).is_some(), "missing {path}");
        }
        assert!(doc["paths"]["/whatsapp/webhook"].get("get").is_some());
        assert!(doc["paths"]["/whatsapp/webhook"].get("post").is_some());
        assert_eq!(
            doc["components"]["schemas"]["OutgoingMessage"]["required"],
            json!(["to", "message"])
        );
    }

    #[test]
    fn test_render_reference() {
        let html = render_reference().unwrap();

        assert!(html.contains(r#"data-url="/openapi.json""#));
        assert!(html.contains(consts::SCALAR_CDN_URL));
        assert!(html.contains("<title>wa-relay API</title>"));
        assert!(html.contains(r#""darkMode": true"#));
    }

    #[ntex::test]
    async fn test_reference_endpoints() {
        let app =
            test::init_service(web::App::new().service((openapi_json, reference))).await;

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/openapi.json").to_request())
                .await;
        assert_eq!(resp.status(), http::StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await).unwrap();
        assert_eq!(body, openapi_document());

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/reference").to_request())
                .await;
        assert_eq!(resp.status(), http::StatusCode::OK);
        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).contains("api-reference"));
    }
}
