use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use super::DbRepo;

#[derive(Clone)]
pub struct SqlxPgRepo {
    pub db_pool: PgPool,
}

#[async_trait]
impl DbRepo for SqlxPgRepo {
    async fn get_version(&self) -> anyhow::Result<String> {
        sqlx::query_scalar::<_, String>("SELECT version()")
            .fetch_one(&self.db_pool)
            .await
            .context("failed to query database version")
    }
}
