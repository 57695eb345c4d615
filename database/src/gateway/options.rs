use crate::consts::consts::{APP_NAME, DEFAULT_DATABASE, DEFAULT_MONGO_URI, PERSON_COLLECTION};

#[derive(Debug, Clone, PartialEq)]
pub enum StorageEngine {
    Mongo(String),
    /// In-process store, contents are lost on shutdown
    Memory,
}

#[derive(Debug, Clone)]
pub struct StorageOptions {
    pub storage_engine: StorageEngine,
    /// Used when the connection string does not name a default database
    pub database: String,
    pub collection: String,
    pub app_name: String,
}

// Implements: https://rust-unofficial.github.io/patterns/patterns/creational/builder.html
impl StorageOptions {
    pub fn set_storage_engine(mut self, storage_engine: StorageEngine) -> Self {
        self.storage_engine = storage_engine;
        self
    }

    pub fn set_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn set_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn set_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self {
            storage_engine: StorageEngine::Mongo(DEFAULT_MONGO_URI.to_string()),
            database: DEFAULT_DATABASE.to_string(),
            collection: PERSON_COLLECTION.to_string(),
            app_name: APP_NAME.to_string(),
        }
    }
}

#[cfg(test)]
impl StorageOptions {
    pub fn new_test() -> Self {
        StorageOptions::default().set_storage_engine(StorageEngine::Memory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_amigos_database() {
        let options = StorageOptions::default();

        assert_eq!(
            options.storage_engine,
            StorageEngine::Mongo("mongodb://127.0.0.1:27017/amigos".to_string())
        );
        assert_eq!(options.database, "amigos");
        assert_eq!(options.collection, "people");
    }

    #[test]
    fn builder_overrides_fields() {
        let options = StorageOptions::default()
            .set_database("other")
            .set_collection("persons")
            .set_app_name("tests");

        assert_eq!(options.database, "other");
        assert_eq!(options.collection, "persons");
        assert_eq!(options.app_name, "tests");
    }
}
