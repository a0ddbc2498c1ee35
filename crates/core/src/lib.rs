//! `justice-core` — shared building blocks (no infrastructure concerns).
//!
//! Identifiers, the schema-less document model and the collection names every
//! other crate agrees on.

pub mod document;
pub mod error;
pub mod id;

pub use document::{document_from_value, stamp_id, Collection, Document, ID_FIELD};
pub use error::{DomainError, DomainResult};
pub use id::DocumentId;
