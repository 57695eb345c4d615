use mongodb::bson::{doc, Bson, Document};
use serde::{Deserialize, Serialize};

use crate::model::person::Person;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum QueryMatch {
    Value(String),
    /// Field is absent or explicitly null
    Null,
    Any,
}

impl QueryMatch {
    fn matches(&self, field: &Option<String>) -> bool {
        match self {
            QueryMatch::Value(value) => field.as_deref() == Some(value.as_str()),
            QueryMatch::Null => field.is_none(),
            QueryMatch::Any => true,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct QueryPersonData {
    pub first_name: QueryMatch,
}

impl QueryPersonData {
    pub fn by_first_name(first_name: QueryMatch) -> Self {
        QueryPersonData { first_name }
    }

    pub fn matches(&self, person: &Person) -> bool {
        self.first_name.matches(&person.first_name)
    }

    /// Mongo filter equivalent of [`QueryPersonData::matches`]
    pub fn to_document(&self) -> Document {
        match &self.first_name {
            QueryMatch::Value(first_name) => doc! { "firstName": first_name },
            // `null` matches both missing and null fields
            QueryMatch::Null => doc! { "firstName": Bson::Null },
            QueryMatch::Any => doc! {},
        }
    }
}

#[tracing::instrument(skip(people))]
pub fn filter(people: Vec<Person>, query: &QueryPersonData) -> Vec<Person> {
    people
        .into_iter()
        .filter(|person| query.matches(person))
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn people() -> Vec<Person> {
        vec![
            Person::new(Some("Ana".to_string()), Some("Lopez".to_string())),
            Person::new(Some("ana".to_string()), Some("Diaz".to_string())),
            Person::new(Some("Ana".to_string()), Some("Gomez".to_string())),
            Person::new(None, Some("Nadie".to_string())),
            Person::new(Some("".to_string()), None),
        ]
    }

    #[rstest]
    #[case(QueryMatch::Value("Ana".to_string()), 2)]
    #[case(QueryMatch::Value("ana".to_string()), 1)]
    #[case(QueryMatch::Value("".to_string()), 1)]
    #[case(QueryMatch::Value("Juan".to_string()), 0)]
    #[case(QueryMatch::Null, 1)]
    #[case(QueryMatch::Any, 5)]
    fn filters_by_first_name(#[case] first_name: QueryMatch, #[case] expected: usize) {
        let query = QueryPersonData::by_first_name(first_name);

        assert_eq!(filter(people(), &query).len(), expected);
    }

    #[test]
    fn exact_match_keeps_every_duplicate() {
        let query = QueryPersonData::by_first_name(QueryMatch::Value("Ana".to_string()));

        let mut last_names: Vec<_> = filter(people(), &query)
            .into_iter()
            .filter_map(|p| p.last_name)
            .collect();
        last_names.sort();

        assert_eq!(last_names, vec!["Gomez".to_string(), "Lopez".to_string()]);
    }

    #[test]
    fn builds_mongo_filters() {
        assert_eq!(
            QueryPersonData::by_first_name(QueryMatch::Value("Ana".to_string())).to_document(),
            doc! { "firstName": "Ana" }
        );
        assert_eq!(
            QueryPersonData::by_first_name(QueryMatch::Null).to_document(),
            doc! { "firstName": Bson::Null }
        );
        assert_eq!(
            QueryPersonData::by_first_name(QueryMatch::Any).to_document(),
            doc! {}
        );
    }
}
