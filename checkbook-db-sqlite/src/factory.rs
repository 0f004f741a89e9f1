use async_trait::async_trait;
use tracing::info;

use checkbook_core::db::factory::{DbConfig, RepositoryFactory};
use checkbook_core::{EntryRepository, RepositoryError};

use crate::repository::SqliteRepository;

/// Registers the `sqlite` backend with a repository registry.
///
/// `connection_string` is passed to sqlx unchanged, e.g.
/// `sqlite:checkbook.db?mode=rwc` or `sqlite::memory:`. Migrations run as
/// part of `create`.
pub struct SqliteRepositoryFactory;

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn EntryRepository>, RepositoryError> {
        let repo = SqliteRepository::new(&config.connection_string).await?;
        repo.run_migrations().await?;
        info!(database = %config.connection_string, "opened sqlite entry store");
        Ok(Box::new(repo))
    }
}
