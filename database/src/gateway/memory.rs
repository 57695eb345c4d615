use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    consts::consts::EntityId,
    model::person::{NewPerson, Person},
};

use super::{
    query::{filter, QueryPersonData},
    store::{PersonStore, StorageResult},
};

/// Person collection held in process memory
#[derive(Default)]
pub struct MemoryStore {
    person_rows: RwLock<HashMap<EntityId, Person>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersonStore for MemoryStore {
    #[tracing::instrument(skip(self))]
    async fn create_person(&self, new_person: NewPerson) -> StorageResult<Person> {
        let person = Person::from_new(new_person);

        self.person_rows
            .write()
            .await
            .insert(person.id, person.clone());

        Ok(person)
    }

    #[tracing::instrument(skip(self))]
    async fn find_all_persons(&self) -> StorageResult<Vec<Person>> {
        Ok(self.person_rows.read().await.values().cloned().collect())
    }

    #[tracing::instrument(skip(self))]
    async fn find_person_by_id(&self, id: &str) -> StorageResult<Option<Person>> {
        let id: EntityId = id.parse()?;

        Ok(self.person_rows.read().await.get(&id).cloned())
    }

    #[tracing::instrument(skip(self))]
    async fn find_persons_by_first_name(
        &self,
        query: QueryPersonData,
    ) -> StorageResult<Vec<Person>> {
        let people = self.find_all_persons().await?;

        Ok(filter(people, &query))
    }
}
