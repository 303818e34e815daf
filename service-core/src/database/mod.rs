//! Generic document persistence shared by every service.
//!
//! A [`Repository`] pairs a [`DocumentStore`] (one collection) with a model
//! type implementing [`DocumentModel`]. Filters are plain BSON documents; a
//! string `_id` is converted to an `ObjectId` before any store call.

mod error;
mod filter;
mod memory;
mod mongo;
mod repository;
mod store;

pub use error::RepositoryError;
pub use filter::{ID_FIELD, normalize_filter, parse_object_id};
pub use memory::InMemoryStore;
pub use mongo::{MongoDb, MongoStore};
pub use repository::{DocumentModel, Repository};
pub use store::DocumentStore;
