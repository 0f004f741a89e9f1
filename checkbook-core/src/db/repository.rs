use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Entry, NewEntry};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Entry not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Storage for saved entries.
///
/// The engine only ever consumes entries for statement aggregation; saves
/// and deletes are triggered by the surrounding front end. Each save is
/// atomic and produces a unique id; a delete removes the entry together
/// with its income and expense rows.
#[async_trait]
pub trait EntryRepository: Send + Sync {
    async fn save_entry(&self, entry: NewEntry) -> Result<Entry, RepositoryError>;

    async fn get_entry(&self, id: i64) -> Result<Entry, RepositoryError>;

    /// All saved entries, newest first.
    async fn list_entries(&self) -> Result<Vec<Entry>, RepositoryError>;

    async fn delete_entry(&self, id: i64) -> Result<(), RepositoryError>;
}
