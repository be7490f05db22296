pub mod postgres;

use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DbRepo: Send + Sync {
    /// Version string reported by the database server
    async fn get_version(&self) -> anyhow::Result<String>;
}

pub type ImplDbRepo = Box<dyn DbRepo>;
