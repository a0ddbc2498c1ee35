//! Infrastructure layer: document storage backends and bundled static content.

pub mod document_store;
pub mod static_content;

pub use document_store::{
    DeleteResult, DocumentStore, Filter, FindOptions, InMemoryDocumentStore, InsertOneResult,
    PostgresDocumentStore, SetField, StoreError, UpdateResult,
};
pub use static_content::{CatalogError, StaticBlogCatalog};
