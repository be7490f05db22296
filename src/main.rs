//! # wa-relay
//!
//! HTTP relay between clients and the WhatsApp Business API. Sends text
//! messages on behalf of the configured business account, answers the
//! webhook verification handshake and receives webhook notifications.

pub mod api;
pub mod config;
pub mod consts;
pub mod errors;
pub mod logger;
pub mod metric;
pub mod repo;
pub mod tunnel;
pub mod utils;
pub mod webhook;

use anyhow::Context;
use envconfig::Envconfig;
use ntex::{time::Seconds, web};
use repo::DbRepo;

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine, the real environment still applies
    dotenvy::dotenv().ok();

    let app_config = config::AppConfig::init_from_env().context("failed to load app config")?;

    let shutdown_handler = logger::setup_logger(&app_config)?;

    // Initialize database connection pool
    let pg_repo = repo::postgres::SqlxPgRepo {
        db_pool: utils::setup_pg_db_pool(&app_config).await?,
    };
    let db_version = pg_repo.get_version().await?;
    log::info!("connected to database: {db_version}");

    let whatsapp_client = webhook::whatsapp::client::WhatsAppClient::new(&app_config);

    // Held until the server stops, dropping it closes the tunnel
    let tunnel = tunnel::start(&app_config).await?;
    if let Some(tunnel) = &tunnel {
        log::info!(
            "ngrok tunnel {} -> {}",
            tunnel.public_url,
            app_config.local_url()
        );
        log::info!(
            "API reference: {}",
            utils::build_url(&tunnel.public_url, "/reference")
        );
    }

    run_server(&app_config, whatsapp_client, pg_repo).await?;

    drop(tunnel);
    if let Some(shutdown_handler) = shutdown_handler {
        shutdown_handler.shutdown()?;
    }

    Ok(())
}

/// Configures and starts the web server, returns once it stopped
async fn run_server(
    app_config: &config::AppConfig,
    whatsapp_client: webhook::whatsapp::client::WhatsAppClient,
    pg_repo: repo::postgres::SqlxPgRepo,
) -> anyhow::Result<()> {
    let webhook_secret = app_config.whatsapp_webhook_secret.clone();
    log::info!("starting server at {}", app_config.local_url());

    web::server(move || {
        web::App::new()
            .wrap(web::middleware::Logger::default())
            .wrap(web::middleware::Compress::default())
            .state(api::AppState {
                whatsapp_api: Box::new(whatsapp_client.clone()),
                repo: Box::new(pg_repo.clone()),
                webhook_secret: webhook_secret.clone(),
            })
            .configure(webhook::routes::whatsapp)
            .service((
                api::health::health,
                api::health::dbinfo,
                api::reference::openapi_json,
                api::reference::reference,
            ))
    })
    .shutdown_timeout(Seconds(consts::SHUTDOWN_TIMEOUT_SECS))
    .bind(app_config.server_addr())?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
