//! Health check handlers

use super::AppState;
use ntex::web;
use serde_json::json;

/// Returns the health status of the API
#[web::get("/health")]
pub async fn health() -> Result<impl web::Responder, web::Error> {
    log::debug!("handling health check request");

    Ok(web::HttpResponse::Ok().json(&json!({
        "status": "healthy"
    })))
}

/// Returns version and connection status of the database
#[web::get("/dbinfo")]
pub async fn dbinfo(
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    match app_state.repo.get_version().await {
        Ok(version) => Ok(web::HttpResponse::Ok().json(&json!({
            "version": version,
            "status": "connected"
        }))),
        Err(e) => {
            log::error!("database info unavailable: {e:#}");
            Ok(web::HttpResponse::InternalServerError().json(&json!({
                "error": "Failed to get database information"
            })))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{repo::MockDbRepo, webhook::whatsapp::client::MockMessagingApi};
    use ntex::{http, web::test};

    fn app_state(repo: MockDbRepo) -> AppState {
        AppState {
            whatsapp_api: Box::new(MockMessagingApi::new()),
            repo: Box::new(repo),
            webhook_secret: String::new(),
        }
    }

    async fn get_json(state: AppState, uri: &str) -> (http::StatusCode, serde_json::Value) {
        let app = test::init_service(
            web::App::new()
                .state(state)
                .service((health, dbinfo)),
        )
        .await;
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = resp.status();
        let body = test::read_body(resp).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[ntex::test]
    async fn test_health() {
        let (status, body) = get_json(app_state(MockDbRepo::new()), "/health").await;

        assert_eq!(status, http::StatusCode::OK);
        assert_eq!(body, json!({"status": "healthy"}));
    }

    #[ntex::test]
    async fn test_dbinfo_connected() {
        let mut repo = MockDbRepo::new();
        repo.expect_get_version()
            .times(1)
            .returning(|| Ok("PostgreSQL 16.2 on x86_64-pc-linux-gnu".to_string()));

        let (status, body) = get_json(app_state(repo), "/dbinfo").await;

        assert_eq!(status, http::StatusCode::OK);
        assert_eq!(
            body,
            json!({"version": "PostgreSQL 16.2 on x86_64-pc-linux-gnu", "status": "connected"})
        );
    }

    #[ntex::test]
    async fn test_dbinfo_failure() {
        let mut repo = MockDbRepo::new();
        repo.expect_get_version()
            .times(1)
            .returning(|| Err(anyhow::anyhow!("connection refused")));

        let (status, body) = get_json(app_state(repo), "/dbinfo").await;

        assert_eq!(status, http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to get database information"}));
    }
}
