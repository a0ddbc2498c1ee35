//! Schema-less document model.

use serde_json::{Map, Value};

use crate::error::{DomainError, DomainResult};
use crate::id::DocumentId;

/// A stored document: an arbitrary JSON object.
pub type Document = Map<String, Value>;

/// Field every stored document carries its identifier in.
pub const ID_FIELD: &str = "_id";

/// The collections this API serves.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Collection {
    Services,
    Reviews,
    Blogs,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Services, Collection::Reviews, Collection::Blogs];

    /// Persisted collection (table) name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Services => "services",
            Collection::Reviews => "reviews",
            Collection::Blogs => "blogs",
        }
    }
}

impl core::fmt::Display for Collection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accept a request body as a document. Only JSON objects qualify.
pub fn document_from_value(body: Value) -> DomainResult<Document> {
    match body {
        Value::Object(doc) => Ok(doc),
        other => Err(DomainError::invalid_document(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Stamp `id` onto a document, replacing any client-supplied `_id`.
pub fn stamp_id(doc: &mut Document, id: DocumentId) {
    doc.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
