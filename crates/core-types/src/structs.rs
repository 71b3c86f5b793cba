use crate::error::CoreError;
use bson::oid::ObjectId;
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A person document as it is stored in the `people` collection.
///
/// Field names follow the collection's camelCase layout (`favoriteFoods`) and the
/// identifier maps to MongoDB's `_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    #[serde(
        default,
        deserialize_with = "deserialize_age",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<i32>,
    #[serde(default)]
    pub favorite_foods: Vec<String>,
}

impl Person {
    /// Checks the schema constraints that must hold before a full-document save.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_name(&self.name)
    }
}

/// The payload for creating a person. The database identifier is not known yet.
///
/// `name` defaults to the empty string when absent from the input so that a
/// record without a name can be represented and then rejected by [`NewPerson::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPerson {
    #[serde(default)]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "deserialize_age",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<i32>,
    #[serde(default)]
    pub favorite_foods: Vec<String>,
}

impl NewPerson {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_favorite_foods<I, S>(mut self, foods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.favorite_foods = foods.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        validate_name(&self.name)
    }

    /// Builds the in-memory document that will be persisted under `id`.
    pub fn into_person(self, id: ObjectId) -> Person {
        Person {
            id,
            name: self.name,
            age: self.age,
            favorite_foods: self.favorite_foods,
        }
    }
}

/// A person with the `age` field projected away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonSummary {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub favorite_foods: Vec<String>,
}

/// The outcome of a bulk delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteReport {
    pub removed_count: u64,
}

/// Accepts any integral number for `age`. Other clients of the collection
/// (the mongo shell, JavaScript drivers) write plain numbers as doubles.
fn deserialize_age<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_option(AgeVisitor)
}

struct AgeVisitor;

impl<'de> Visitor<'de> for AgeVisitor {
    type Value = Option<i32>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integral age that fits in 32 bits")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        i32::try_from(v)
            .map(Some)
            .map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i32::try_from(v)
            .map(Some)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if v.fract() == 0.0 && v >= i32::MIN as f64 && v <= i32::MAX as f64 {
            Ok(Some(v as i32))
        } else {
            Err(E::invalid_value(Unexpected::Float(v), &self))
        }
    }
}

fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        tracing::debug!("Rejecting person without a name.");
        return Err(CoreError::required("name"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_name_is_rejected() {
        let draft: NewPerson = serde_json::from_str(r#"{"age": 40}"#).unwrap();
        let err = draft.validate().unwrap_err();
        assert_eq!(err, CoreError::required("name"));
        assert!(err.to_string().contains("Path `name` is required."));
    }

    #[test]
    fn favorite_foods_default_to_empty() {
        let draft: NewPerson = serde_json::from_str(r#"{"name": "Ana"}"#).unwrap();
        assert!(draft.favorite_foods.is_empty());
        assert_eq!(draft.age, None);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn into_person_keeps_fields() {
        let id = ObjectId::new();
        let person = NewPerson::new("Carlos")
            .with_age(32)
            .with_favorite_foods(["burrito"])
            .into_person(id);

        assert_eq!(person.id, id);
        assert_eq!(person.name, "Carlos");
        assert_eq!(person.age, Some(32));
        assert_eq!(person.favorite_foods, vec!["burrito".to_string()]);
    }

    #[test]
    fn person_uses_collection_field_names() {
        let person = NewPerson::new("Ana")
            .with_favorite_foods(["Sushi"])
            .into_person(ObjectId::new());
        let doc = bson::to_document(&person).unwrap();

        assert!(doc.contains_key("_id"));
        assert!(doc.contains_key("favoriteFoods"));
        assert!(!doc.contains_key("age"));
    }

    fn person_with_age(age: bson::Bson) -> Result<Person, bson::de::Error> {
        bson::from_document(bson::doc! {
            "_id": ObjectId::new(),
            "name": "Ana",
            "age": age,
        })
    }

    #[test]
    fn integral_double_age_is_read() {
        let person = person_with_age(bson::Bson::Double(30.0)).unwrap();
        assert_eq!(person.age, Some(30));
    }

    #[test]
    fn int32_and_int64_ages_are_read() {
        assert_eq!(person_with_age(bson::Bson::Int32(31)).unwrap().age, Some(31));
        assert_eq!(person_with_age(bson::Bson::Int64(32)).unwrap().age, Some(32));
    }

    #[test]
    fn null_or_missing_age_is_none() {
        assert_eq!(person_with_age(bson::Bson::Null).unwrap().age, None);

        let raw = bson::doc! { "_id": ObjectId::new(), "name": "Ana" };
        let person: Person = bson::from_document(raw).unwrap();
        assert_eq!(person.age, None);
    }

    #[test]
    fn fractional_or_out_of_range_age_is_rejected() {
        assert!(person_with_age(bson::Bson::Double(30.5)).is_err());
        assert!(person_with_age(bson::Bson::Double(f64::NAN)).is_err());
        assert!(person_with_age(bson::Bson::Int64(i64::from(i32::MAX) + 1)).is_err());
    }

    #[test]
    fn json_age_accepts_whole_floats() {
        let draft: NewPerson = serde_json::from_str(r#"{"name": "Ana", "age": 25.0}"#).unwrap();
        assert_eq!(draft.age, Some(25));
    }

    #[test]
    fn summary_never_carries_age() {
        let raw = bson::doc! {
            "_id": ObjectId::new(),
            "name": "Bea",
            "favoriteFoods": ["burrito"],
        };
        let summary: PersonSummary = bson::from_document(raw).unwrap();
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(summary.name, "Bea");
        assert!(json.get("age").is_none());
    }

    #[test]
    fn delete_report_serializes_removed_count() {
        let json = serde_json::to_value(DeleteReport { removed_count: 2 }).unwrap();
        assert_eq!(json, serde_json::json!({ "removedCount": 2 }));
    }
}
