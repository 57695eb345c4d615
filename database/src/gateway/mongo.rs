use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::ClientOptions,
    Client, Collection, Database,
};

use crate::{
    consts::consts::EntityId,
    model::person::{NewPerson, Person},
};

use super::{
    options::StorageOptions,
    query::QueryPersonData,
    store::{PersonStore, StorageError, StorageResult},
};

/// Gateway backed by a MongoDB collection. The driver pools connections internally.
pub struct MongoStore {
    // None when the client could not be built at startup, every operation then fails
    collection: Option<Collection<Person>>,
}

impl MongoStore {
    /// Never fails: on error the store is returned in a degraded state and the error is logged.
    pub async fn connect(uri: &str, options: &StorageOptions) -> Self {
        let database = match build_database(uri, options).await {
            Ok(database) => database,
            Err(err) => {
                log::error!("Unable to connect to database at {}: {}", uri, err);
                return Self::disconnected();
            }
        };

        // The ping only reports reachability, the driver keeps retrying server selection per
        // operation so startup is not held up by an unreachable server
        let ping_database = database.clone();
        tokio::spawn(async move {
            match ping_database.run_command(doc! { "ping": 1 }, None).await {
                Ok(_) => log::info!("Connected to database..."),
                Err(err) => log::error!("Database ping failed: {}", err),
            }
        });

        Self {
            collection: Some(database.collection::<Person>(&options.collection)),
        }
    }

    pub fn disconnected() -> Self {
        Self { collection: None }
    }

    fn collection(&self) -> StorageResult<&Collection<Person>> {
        self.collection.as_ref().ok_or_else(|| {
            StorageError::Unavailable("no database connection was established".to_string())
        })
    }

    async fn find(&self, filter: Document) -> StorageResult<Vec<Person>> {
        let cursor = self.collection()?.find(filter, None).await?;

        let people: Vec<Person> = cursor.try_collect().await?;

        Ok(people)
    }
}

async fn build_database(uri: &str, options: &StorageOptions) -> StorageResult<Database> {
    let mut client_options = ClientOptions::parse(uri).await?;
    client_options.app_name = Some(options.app_name.clone());

    let client = Client::with_options(client_options)?;

    Ok(client
        .default_database()
        .unwrap_or_else(|| client.database(&options.database)))
}

#[async_trait]
impl PersonStore for MongoStore {
    #[tracing::instrument(skip(self))]
    async fn create_person(&self, new_person: NewPerson) -> StorageResult<Person> {
        let collection = self.collection()?;

        let person = Person::from_new(new_person);

        collection.insert_one(&person, None).await?;

        Ok(person)
    }

    #[tracing::instrument(skip(self))]
    async fn find_all_persons(&self) -> StorageResult<Vec<Person>> {
        self.find(doc! {}).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_person_by_id(&self, id: &str) -> StorageResult<Option<Person>> {
        let id: EntityId = id.parse()?;

        let person = self
            .collection()?
            .find_one(doc! { "_id": id.0 }, None)
            .await?;

        Ok(person)
    }

    #[tracing::instrument(skip(self))]
    async fn find_persons_by_first_name(
        &self,
        query: QueryPersonData,
    ) -> StorageResult<Vec<Person>> {
        self.find(query.to_document()).await
    }
}
