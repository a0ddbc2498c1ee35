use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use justice_core::{Collection, Document, DocumentId, ID_FIELD};

/// Which documents an operation applies to.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Every document in the collection.
    All,
    /// The document with this identifier.
    Id(DocumentId),
    /// Documents whose top-level `field` equals `value`.
    FieldEq { field: String, value: Value },
}

impl Filter {
    pub fn field_eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::FieldEq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Evaluate the filter against a document held in memory.
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Id(id) => {
                doc.get(ID_FIELD).and_then(Value::as_str) == Some(id.to_string().as_str())
            }
            Filter::FieldEq { field, value } => doc.get(field) == Some(value),
        }
    }
}

/// Listing options. Results are always newest first.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub limit: Option<usize>,
}

impl FindOptions {
    pub fn newest_first() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Replace a single top-level field, creating it when absent.
#[derive(Debug, Clone, PartialEq)]
pub struct SetField {
    pub field: String,
    pub value: Value,
}

impl SetField {
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: DocumentId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    /// Zero when the new value equals the stored one.
    pub modified_count: u64,
    pub upserted_id: Option<DocumentId>,
    pub upserted_count: u64,
}

impl UpdateResult {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_id: None,
            upserted_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

/// Document store operation error.
///
/// These are infrastructure failures only. "Not found" is never an error:
/// lookups return `None` and mutations report zero counts.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),

    #[error("stored document is not a JSON object ({0})")]
    CorruptDocument(String),

    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Schema-less, collection-scoped document store.
///
/// Every method is a single atomic call against the backend. Single-document
/// operations (`find_one`, `update_one`, `delete_one`) act on the oldest
/// matching document.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert one document. The store assigns and stamps its `_id`.
    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<InsertOneResult, StoreError>;

    /// List matching documents, newest first.
    async fn find(
        &self,
        collection: Collection,
        filter: Filter,
        options: FindOptions,
    ) -> Result<Vec<Document>, StoreError>;

    async fn find_one(
        &self,
        collection: Collection,
        filter: Filter,
    ) -> Result<Option<Document>, StoreError>;

    async fn update_one(
        &self,
        collection: Collection,
        filter: Filter,
        update: SetField,
    ) -> Result<UpdateResult, StoreError>;

    async fn delete_one(
        &self,
        collection: Collection,
        filter: Filter,
    ) -> Result<DeleteResult, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(v: Value) -> Document {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn filters_match_in_memory() {
        let id = DocumentId::new();
        let d = doc(json!({"_id": id.to_string(), "uid": "u1", "slug": "custody"}));

        assert!(Filter::All.matches(&d));
        assert!(Filter::Id(id).matches(&d));
        assert!(!Filter::Id(DocumentId::new()).matches(&d));
        assert!(Filter::field_eq("uid", "u1").matches(&d));
        assert!(!Filter::field_eq("uid", "u2").matches(&d));
        assert!(!Filter::field_eq("missing", Value::Null).matches(&d));
    }

    #[test]
    fn write_results_serialize_like_a_document_database() {
        let id = DocumentId::new();
        let insert = serde_json::to_value(InsertOneResult { acknowledged: true, inserted_id: id }).unwrap();
        assert_eq!(insert, json!({"acknowledged": true, "insertedId": id.to_string()}));

        let update = serde_json::to_value(UpdateResult::new(1, 0)).unwrap();
        assert_eq!(
            update,
            json!({
                "acknowledged": true,
                "matchedCount": 1,
                "modifiedCount": 0,
                "upsertedId": null,
                "upsertedCount": 0,
            })
        );

        let delete = serde_json::to_value(DeleteResult::new(1)).unwrap();
        assert_eq!(delete, json!({"acknowledged": true, "deletedCount": 1}));
    }
}
