use crate::queries;
use crate::DbError;
use configuration::DatabaseSettings;
use core_types::{DeleteReport, NewPerson, ObjectId, Person, PersonSummary};
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection};

/// Appended by [`PersonRepository::find_edit_then_save`].
pub const FOOD_TO_ADD: &str = "hamburger";
/// Written by [`PersonRepository::find_and_update_age`].
pub const AGE_TO_SET: i32 = 20;
/// Removed by [`PersonRepository::remove_many_people`].
pub const NAME_TO_REMOVE: &str = "Mary";
/// Searched by [`PersonRepository::query_chain_default`].
pub const FOOD_TO_SEARCH: &str = "burrito";
pub const QUERY_CHAIN_LIMIT: i64 = 2;

/// The `PersonRepository` provides a high-level, application-specific interface
/// to the people collection. It encapsulates all queries and data access logic.
#[derive(Debug, Clone)]
pub struct PersonRepository {
    collection: Collection<Person>,
}

impl PersonRepository {
    /// Creates a new `PersonRepository` around an already-typed collection handle.
    pub fn new(collection: Collection<Person>) -> Self {
        Self { collection }
    }

    /// Binds to the database and collection named in the settings.
    pub fn from_client(client: &Client, settings: &DatabaseSettings) -> Self {
        let collection = client
            .database(&settings.name)
            .collection::<Person>(&settings.collection);
        Self::new(collection)
    }

    /// The underlying driver collection, for callers that need an operation
    /// this repository does not wrap.
    pub fn collection(&self) -> &Collection<Person> {
        &self.collection
    }

    /// Validates and persists a single person.
    ///
    /// The identifier is assigned in memory before the write, so the returned
    /// document is exactly what was stored.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn create_one(&self, new_person: NewPerson) -> Result<Person, DbError> {
        new_person.validate()?;
        let person = new_person.into_person(ObjectId::new());
        self.collection.insert_one(&person).await?;
        tracing::debug!(id = %person.id, "Person created.");
        Ok(person)
    }

    /// Persists a batch of people in one ordered insert.
    ///
    /// Every record is validated first; one invalid record aborts the whole
    /// batch before anything is written.
    #[tracing::instrument(skip(self, people), fields(count = people.len()), err(level = "warn"))]
    pub async fn create_many(&self, people: Vec<NewPerson>) -> Result<Vec<Person>, DbError> {
        if people.is_empty() {
            return Ok(Vec::new());
        }
        for person in &people {
            person.validate()?;
        }

        let people: Vec<Person> = people
            .into_iter()
            .map(|p| p.into_person(ObjectId::new()))
            .collect();
        self.collection.insert_many(&people).await?;
        Ok(people)
    }

    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Person>, DbError> {
        let cursor = self.collection.find(queries::by_name(name)).await?;
        let people: Vec<Person> = cursor.try_collect().await?;
        Ok(people)
    }

    /// Returns the first person whose favorite foods include `food`.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn find_one_by_food(&self, food: &str) -> Result<Option<Person>, DbError> {
        Ok(self.collection.find_one(queries::by_food(food)).await?)
    }

    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Person>, DbError> {
        let id = queries::parse_id(id)?;
        Ok(self.collection.find_one(queries::by_id(id)).await?)
    }

    /// Loads a person, appends [`FOOD_TO_ADD`] to their favorite foods and saves
    /// the whole document back.
    pub async fn find_edit_then_save(&self, id: &str) -> Result<Person, DbError> {
        self.push_favorite_food(id, FOOD_TO_ADD).await
    }

    /// Read-modify-write: a write by someone else between the load and the
    /// replace is overwritten.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn push_favorite_food(&self, id: &str, food: &str) -> Result<Person, DbError> {
        let id = queries::parse_id(id)?;
        let mut person = self
            .collection
            .find_one(queries::by_id(id))
            .await?
            .ok_or(DbError::NotFound)?;

        person.favorite_foods.push(food.to_string());
        person.validate()?;

        let result = self.collection.replace_one(queries::by_id(id), &person).await?;
        if result.matched_count == 0 {
            // Deleted between the load and the save.
            return Err(DbError::NotFound);
        }
        Ok(person)
    }

    /// Atomically sets the first matching person's age to [`AGE_TO_SET`] and
    /// returns the document as it is after the update.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn find_and_update_age(&self, name: &str) -> Result<Option<Person>, DbError> {
        let updated = self
            .collection
            .find_one_and_update(queries::by_name(name), queries::set_age(AGE_TO_SET))
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated)
    }

    /// Deletes one person and returns the document as it was before deletion.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn remove_by_id(&self, id: &str) -> Result<Option<Person>, DbError> {
        let id = queries::parse_id(id)?;
        Ok(self.collection.find_one_and_delete(queries::by_id(id)).await?)
    }

    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn remove_many_by_name(&self, name: &str) -> Result<DeleteReport, DbError> {
        let result = self.collection.delete_many(queries::by_name(name)).await?;
        tracing::debug!(removed = result.deleted_count, "Bulk delete finished.");
        Ok(DeleteReport {
            removed_count: result.deleted_count,
        })
    }

    /// Removes everyone named [`NAME_TO_REMOVE`].
    pub async fn remove_many_people(&self) -> Result<DeleteReport, DbError> {
        self.remove_many_by_name(NAME_TO_REMOVE).await
    }

    /// People who like `food`, sorted by name, at most [`QUERY_CHAIN_LIMIT`]
    /// of them, with `age` projected away.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn query_chain(&self, food: &str) -> Result<Vec<PersonSummary>, DbError> {
        let cursor = self
            .collection
            .clone_with_type::<PersonSummary>()
            .find(queries::by_food(food))
            .sort(queries::sort_by_name())
            .limit(QUERY_CHAIN_LIMIT)
            .projection(queries::exclude_age())
            .await?;
        let people: Vec<PersonSummary> = cursor.try_collect().await?;
        Ok(people)
    }

    /// [`PersonRepository::query_chain`] for [`FOOD_TO_SEARCH`].
    pub async fn query_chain_default(&self) -> Result<Vec<PersonSummary>, DbError> {
        self.query_chain(FOOD_TO_SEARCH).await
    }
}
