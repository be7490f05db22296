//! Helper functions used across the app

use crate::config::AppConfig;
use anyhow::{Context, bail};
use sqlx::{PgPool, postgres::PgPoolOptions};

/// Creates the PostgreSQL connection pool and checks the database answers
pub async fn setup_pg_db_pool(app_config: &AppConfig) -> anyhow::Result<PgPool> {
    if app_config.database_url.is_empty() {
        bail!("database URL is required");
    }

    let db_pool = PgPoolOptions::new()
        .max_connections(app_config.database_max_connections)
        .connect(&app_config.database_url)
        .await
        .context("failed to create connection pool")?;

    sqlx::query("SELECT 1")
        .execute(&db_pool)
        .await
        .context("failed to ping database")?;

    Ok(db_pool)
}

/// Joins a base URL and a path with exactly one slash between them.
///
/// An empty base gives an empty string.
pub fn build_url(base_url: &str, path: &str) -> String {
    if base_url.is_empty() {
        return String::new();
    }

    let base_url = base_url.strip_suffix('/').unwrap_or(base_url);
    if path.starts_with('/') {
        return format!("{base_url}{path}");
    }

    format!("{base_url}/{path}")
}
