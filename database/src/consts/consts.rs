use std::{fmt, str::FromStr};

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Values
pub const DEFAULT_MONGO_URI: &str = "mongodb://127.0.0.1:27017/amigos";
pub const DEFAULT_DATABASE: &str = "amigos";
/// Collection name derived from the `person` model (pluralised), shared with documents
/// written by other clients of the same database.
pub const PERSON_COLLECTION: &str = "people";
pub const APP_NAME: &str = "amigos";
/// Value of the `__v` key on freshly created documents
pub const START_AT_VERSION_KEY: i32 = 0;

#[derive(Error, Debug, PartialEq)]
pub enum EntityIdError {
    #[error("Cast to ObjectId failed for value \"{0}\"")]
    Malformed(String),
}

// New Type Pattern -- https://doc.rust-lang.org/rust-by-example/generics/new_types.html
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EntityId(pub ObjectId);

impl EntityId {
    pub fn new() -> EntityId {
        EntityId(ObjectId::new())
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for EntityId {
    type Err = EntityIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s)
            .map(EntityId)
            .map_err(|_| EntityIdError::Malformed(s.to_string()))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}
