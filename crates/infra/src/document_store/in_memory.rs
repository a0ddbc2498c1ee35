use std::collections::HashMap;
use std::sync::RwLock;

use justice_core::{stamp_id, Collection, Document, DocumentId};

use super::r#trait::{
    DeleteResult, DocumentStore, Filter, FindOptions, InsertOneResult, SetField, StoreError,
    UpdateResult,
};

/// In-memory document store.
///
/// Intended for tests/dev. Each collection is kept in insertion order, so
/// "newest first" is a reverse scan.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn len(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .map(|c| c.get(&collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert_one(
        &self,
        collection: Collection,
        mut document: Document,
    ) -> Result<InsertOneResult, StoreError> {
        let id = DocumentId::new();
        stamp_id(&mut document, id);

        let mut collections = self.collections.write().map_err(|_| StoreError::LockPoisoned)?;
        collections.entry(collection).or_default().push(document);

        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    async fn find(
        &self,
        collection: Collection,
        filter: Filter,
        options: FindOptions,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().map_err(|_| StoreError::LockPoisoned)?;
        let Some(docs) = collections.get(&collection) else {
            return Ok(vec![]);
        };

        let matching = docs.iter().rev().filter(|d| filter.matches(d)).cloned();
        Ok(match options.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        })
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: Filter,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| filter.matches(d)).cloned()))
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: Filter,
        update: SetField,
    ) -> Result<UpdateResult, StoreError> {
        let mut collections = self.collections.write().map_err(|_| StoreError::LockPoisoned)?;
        let Some(doc) = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| filter.matches(d)))
        else {
            return Ok(UpdateResult::new(0, 0));
        };

        if doc.get(&update.field) == Some(&update.value) {
            return Ok(UpdateResult::new(1, 0));
        }
        doc.insert(update.field, update.value);
        Ok(UpdateResult::new(1, 1))
    }

    async fn delete_one(
        &self,
        collection: Collection,
        filter: Filter,
    ) -> Result<DeleteResult, StoreError> {
        let mut collections = self.collections.write().map_err(|_| StoreError::LockPoisoned)?;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(DeleteResult::new(0));
        };

        match docs.iter().position(|d| filter.matches(d)) {
            Some(idx) => {
                docs.remove(idx);
                Ok(DeleteResult::new(1))
            }
            None => Ok(DeleteResult::new(0)),
        }
    }
}
