pub mod error;
pub mod samples;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use bson::oid::ObjectId;
pub use error::CoreError;
pub use structs::{DeleteReport, NewPerson, Person, PersonSummary};
