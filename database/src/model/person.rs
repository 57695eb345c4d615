use serde::{Deserialize, Serialize};

use crate::consts::consts::{EntityId, START_AT_VERSION_KEY};

/// A person document as stored in the `people` collection
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(rename = "_id")]
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Document version key, never exposed to clients
    #[serde(rename = "__v", default)]
    pub version_key: i32,
}

/// Fields a caller may supply when creating a person, the id is always assigned by the gateway
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct NewPerson {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl NewPerson {
    pub fn new(first_name: Option<String>, last_name: Option<String>) -> Self {
        NewPerson {
            first_name,
            last_name,
        }
    }
}

impl Person {
    pub fn new(first_name: Option<String>, last_name: Option<String>) -> Self {
        Person {
            id: EntityId::new(),
            first_name,
            last_name,
            version_key: START_AT_VERSION_KEY,
        }
    }

    pub fn from_new(new_person: NewPerson) -> Self {
        Person::new(new_person.first_name, new_person.last_name)
    }

    pub fn new_test() -> Self {
        Person::new(Some("Juan".to_string()), Some("Perez".to_string()))
    }
}
