//! # People Store Database Crate
//!
//! This crate is the application-specific interface to the MongoDB `people`
//! collection.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** All driver-specific logic lives here. Callers work with the
//!   domain types from `core-types` and never build BSON themselves.
//! - **Passthrough:** Every repository method is one driver call (two for the
//!   load-modify-save operation). Driver failures are returned unchanged inside
//!   `DbError::Driver`; nothing is retried.
//! - **Asynchronous & Shared:** All operations are asynchronous. The driver's
//!   client pools connections internally, and `PersonRepository` is a cheap
//!   clonable handle that can be shared across tasks.
//!
//! ## Public API
//!
//! - `connect` / `open_repository`: establish the client at startup.
//! - `PersonRepository`: the create, read, update and delete operations.
//! - `queries`: the filter and update documents those operations send.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod queries;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, open_repository};
pub use error::DbError;
pub use repository::{
    PersonRepository, AGE_TO_SET, FOOD_TO_ADD, FOOD_TO_SEARCH, NAME_TO_REMOVE, QUERY_CHAIN_LIMIT,
};
