//! Document store boundary.
//!
//! Handlers talk to collections only through [`DocumentStore`]: one call per
//! request, no transactions across calls. Two backends exist: Postgres
//! (JSONB rows, one table per collection) and in-memory (tests/dev).

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryDocumentStore;
pub use postgres::PostgresDocumentStore;
pub use r#trait::{
    DeleteResult, DocumentStore, Filter, FindOptions, InsertOneResult, SetField, StoreError,
    UpdateResult,
};
