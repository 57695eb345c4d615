use database::{
    gateway::{
        query::{QueryMatch, QueryPersonData},
        store::{PersonStore, StorageError},
    },
    model::person::{NewPerson, Person},
};
use juniper::{
    graphql_value, EmptySubscription, FieldError, FieldResult, GraphQLObject, Nullable, RootNode,
    ID,
};
use std::sync::Arc;

pub struct GraphQLContext {
    pub store: Arc<dyn PersonStore>,
}

// https://graphql-rust.github.io/juniper/master/types/objects/using_contexts.html
impl juniper::Context for GraphQLContext {}

#[derive(GraphQLObject, Debug, PartialEq)]
#[graphql(name = "Person", description = "A person stored in the amigos database")]
pub struct PersonObject {
    pub id: ID,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl PersonObject {
    pub fn from_person(person: Person) -> PersonObject {
        PersonObject {
            id: ID::from(person.id.to_string()),
            first_name: person.first_name,
            last_name: person.last_name,
        }
    }
}

fn storage_field_error(err: StorageError) -> FieldError {
    match err {
        StorageError::InvalidId(_) => {
            FieldError::new(err, graphql_value!({ "code": "BAD_USER_INPUT" }))
        }
        StorageError::Unavailable(_) | StorageError::Driver(_) => {
            log::error!("Storage operation failed: {}", err);
            FieldError::new(err, graphql_value!({ "code": "STORAGE_ERROR" }))
        }
    }
}

fn first_name_match(first_name: Nullable<String>) -> QueryMatch {
    match first_name {
        Nullable::ImplicitNull => QueryMatch::Any,
        Nullable::ExplicitNull => QueryMatch::Null,
        Nullable::Some(first_name) => QueryMatch::Value(first_name),
    }
}

pub struct QueryRoot;

#[juniper::graphql_object(name = "Query", context = GraphQLContext)]
impl QueryRoot {
    async fn people(context: &GraphQLContext) -> FieldResult<Vec<PersonObject>> {
        let people = context
            .store
            .find_all_persons()
            .await
            .map_err(storage_field_error)?;

        Ok(people.into_iter().map(PersonObject::from_person).collect())
    }

    #[graphql(name = "peopleByID")]
    async fn people_by_id(id: ID, context: &GraphQLContext) -> FieldResult<Option<PersonObject>> {
        let person = context
            .store
            .find_person_by_id(&id)
            .await
            .map_err(storage_field_error)?;

        Ok(person.map(PersonObject::from_person))
    }

    async fn people_by_name(
        first_name: Nullable<String>,
        context: &GraphQLContext,
    ) -> FieldResult<Vec<PersonObject>> {
        let query = QueryPersonData::by_first_name(first_name_match(first_name));

        let people = context
            .store
            .find_persons_by_first_name(query)
            .await
            .map_err(storage_field_error)?;

        Ok(people.into_iter().map(PersonObject::from_person).collect())
    }
}

pub struct MutationRoot;

#[juniper::graphql_object(name = "Create", context = GraphQLContext)]
impl MutationRoot {
    async fn people(
        first_name: Option<String>,
        last_name: Option<String>,
        context: &GraphQLContext,
    ) -> FieldResult<PersonObject> {
        let person = context
            .store
            .create_person(NewPerson::new(first_name, last_name))
            .await
            .map_err(storage_field_error)?;

        Ok(PersonObject::from_person(person))
    }
}

pub type Schema = RootNode<'static, QueryRoot, MutationRoot, EmptySubscription<GraphQLContext>>;

pub fn create_schema() -> Schema {
    Schema::new(QueryRoot {}, MutationRoot {}, EmptySubscription::new())
}

#[cfg(test)]
pub mod test_utils {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use async_trait::async_trait;
    use database::{
        gateway::{
            memory::MemoryStore,
            mongo::MongoStore,
            query::QueryPersonData,
            store::{PersonStore, StorageResult},
        },
        model::person::{NewPerson, Person},
    };

    use super::GraphQLContext;

    /// Delegates to a backing store and counts every call that reaches it
    pub struct RecordingStore {
        inner: Box<dyn PersonStore>,
        calls: AtomicUsize,
    }

    impl RecordingStore {
        pub fn memory() -> Arc<Self> {
            Arc::new(Self {
                inner: Box::new(MemoryStore::new()),
                calls: AtomicUsize::new(0),
            })
        }

        pub fn disconnected() -> Arc<Self> {
            Arc::new(Self {
                inner: Box::new(MongoStore::disconnected()),
                calls: AtomicUsize::new(0),
            })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn record(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl PersonStore for RecordingStore {
        async fn create_person(&self, new_person: NewPerson) -> StorageResult<Person> {
            self.record();
            self.inner.create_person(new_person).await
        }

        async fn find_all_persons(&self) -> StorageResult<Vec<Person>> {
            self.record();
            self.inner.find_all_persons().await
        }

        async fn find_person_by_id(&self, id: &str) -> StorageResult<Option<Person>> {
            self.record();
            self.inner.find_person_by_id(id).await
        }

        async fn find_persons_by_first_name(
            &self,
            query: QueryPersonData,
        ) -> StorageResult<Vec<Person>> {
            self.record();
            self.inner.find_persons_by_first_name(query).await
        }
    }

    pub fn context(store: &Arc<RecordingStore>) -> GraphQLContext {
        GraphQLContext {
            store: store.clone(),
        }
    }
}
