pub mod calculations;
pub mod db;
pub mod models;
pub mod report;

pub use db::repository::{EntryRepository, RepositoryError};
pub use models::*;
