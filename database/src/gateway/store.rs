use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    consts::consts::EntityIdError,
    model::person::{NewPerson, Person},
};

use super::{
    memory::MemoryStore,
    mongo::MongoStore,
    options::{StorageEngine, StorageOptions},
    query::QueryPersonData,
};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage is unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid identifier: {0}")]
    InvalidId(#[from] EntityIdError),

    #[error("Database error: {0}")]
    Driver(#[from] mongodb::error::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Record operations on the person collection. Every call maps to exactly one store operation.
#[async_trait]
pub trait PersonStore: Send + Sync {
    async fn create_person(&self, new_person: NewPerson) -> StorageResult<Person>;

    /// Full collection scan, no ordering guarantee
    async fn find_all_persons(&self) -> StorageResult<Vec<Person>>;

    /// Fails with [`StorageError::InvalidId`] before touching the store when `id` is malformed
    async fn find_person_by_id(&self, id: &str) -> StorageResult<Option<Person>>;

    async fn find_persons_by_first_name(
        &self,
        query: QueryPersonData,
    ) -> StorageResult<Vec<Person>>;
}

/// Builds the gateway selected by the options. Connection failures are logged and leave the
/// returned store degraded rather than failing.
pub async fn open_store(options: StorageOptions) -> Arc<dyn PersonStore> {
    match &options.storage_engine {
        StorageEngine::Mongo(uri) => Arc::new(MongoStore::connect(uri, &options).await),
        StorageEngine::Memory => {
            log::info!("Using in-memory person store");
            Arc::new(MemoryStore::new())
        }
    }
}
