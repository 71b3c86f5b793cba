//! Filter, update, sort and projection documents used by [`crate::PersonRepository`].

use crate::error::DbError;
use mongodb::bson::{doc, oid::ObjectId, Document};

pub fn by_name(name: &str) -> Document {
    doc! { "name": name }
}

/// Matches documents whose `favoriteFoods` array contains `food`.
pub fn by_food(food: &str) -> Document {
    doc! { "favoriteFoods": food }
}

pub fn by_id(id: ObjectId) -> Document {
    doc! { "_id": id }
}

pub fn set_age(age: i32) -> Document {
    doc! { "$set": { "age": age } }
}

pub fn sort_by_name() -> Document {
    doc! { "name": 1 }
}

pub fn exclude_age() -> Document {
    doc! { "age": 0 }
}

/// Parses a caller-supplied identifier.
pub fn parse_id(raw: &str) -> Result<ObjectId, DbError> {
    ObjectId::parse_str(raw).map_err(|_| DbError::InvalidId(raw.to_string()))
}
