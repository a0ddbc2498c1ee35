//! Postgres-backed document store.
//!
//! Each collection is a table of JSONB documents:
//!
//! ```sql
//! CREATE TABLE services (
//!     seq        BIGSERIAL PRIMARY KEY,
//!     id         UUID NOT NULL UNIQUE,
//!     body       JSONB NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```
//!
//! `seq` carries insertion order, so "newest first" is `ORDER BY seq DESC`.
//! Single-document operations pick the oldest match (`ORDER BY seq ASC LIMIT 1`).
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError |
//! |------------|------------|
//! | Database (any code) | `Backend` with the operation and server message |
//! | PoolClosed | `Backend` |
//! | ColumnDecode / Decode | `CorruptDocument` |
//! | Other | `Backend` |

use std::time::Duration;

use serde_json::Value;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::instrument;

use justice_core::{stamp_id, Collection, Document, DocumentId};

use super::r#trait::{
    DeleteResult, DocumentStore, Filter, FindOptions, InsertOneResult, SetField, StoreError,
    UpdateResult,
};

/// Postgres-backed document store over a shared connection pool.
#[derive(Debug, Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the collection tables if they do not exist yet.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for collection in Collection::ALL {
            let ddl = format!(
                r#"
                CREATE TABLE IF NOT EXISTS {table} (
                    seq        BIGSERIAL PRIMARY KEY,
                    id         UUID NOT NULL UNIQUE,
                    body       JSONB NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
                "#,
                table = collection.as_str()
            );
            sqlx::query(&ddl)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        }
        Ok(())
    }
}

/// Append ` WHERE ...` for a filter. `All` appends nothing.
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: Filter) {
    match filter {
        Filter::All => {}
        Filter::Id(id) => {
            qb.push(" WHERE id = ").push_bind(uuid::Uuid::from(id));
        }
        Filter::FieldEq { field, value } => {
            qb.push(" WHERE body -> ")
                .push_bind(field)
                .push("::text = ")
                .push_bind(value)
                .push("::jsonb");
        }
    }
}

fn row_to_document(row: &PgRow) -> Result<Document, StoreError> {
    let body: Value = row
        .try_get("body")
        .map_err(|e| StoreError::CorruptDocument(e.to_string()))?;
    match body {
        Value::Object(doc) => Ok(doc),
        other => Err(StoreError::CorruptDocument(format!("found {other}"))),
    }
}

#[async_trait::async_trait]
impl DocumentStore for PostgresDocumentStore {
    #[instrument(skip(self, document), fields(collection = %collection), err)]
    async fn insert_one(
        &self,
        collection: Collection,
        mut document: Document,
    ) -> Result<InsertOneResult, StoreError> {
        let id = DocumentId::new();
        stamp_id(&mut document, id);

        let sql = format!("INSERT INTO {} (id, body) VALUES ($1, $2)", collection.as_str());
        sqlx::query(&sql)
            .bind(id.as_uuid())
            .bind(sqlx::types::Json(&document))
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_one", e))?;

        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    #[instrument(skip(self), fields(collection = %collection), err)]
    async fn find(
        &self,
        collection: Collection,
        filter: Filter,
        options: FindOptions,
    ) -> Result<Vec<Document>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT body FROM {}", collection.as_str()));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY seq DESC");
        if let Some(limit) = options.limit {
            qb.push(" LIMIT ").push_bind(limit as i64);
        }

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find", e))?;

        rows.iter().map(row_to_document).collect()
    }

    #[instrument(skip(self), fields(collection = %collection), err)]
    async fn find_one(
        &self,
        collection: Collection,
        filter: Filter,
    ) -> Result<Option<Document>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT body FROM {}", collection.as_str()));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY seq ASC LIMIT 1");

        let row = qb
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_one", e))?;

        row.as_ref().map(row_to_document).transpose()
    }

    #[instrument(skip(self, update), fields(collection = %collection, field = %update.field), err)]
    async fn update_one(
        &self,
        collection: Collection,
        filter: Filter,
        update: SetField,
    ) -> Result<UpdateResult, StoreError> {
        let table = collection.as_str();
        let mut qb = QueryBuilder::<Postgres>::new("WITH target AS (SELECT seq, body -> ");
        qb.push_bind(update.field.clone())
            .push("::text IS DISTINCT FROM ")
            .push_bind(update.value.clone())
            .push(format!("::jsonb AS changed FROM {table}"));
        push_filter(&mut qb, filter);
        qb.push(format!(
            " ORDER BY seq ASC LIMIT 1), updated AS (UPDATE {table} AS d SET body = jsonb_set(d.body, ARRAY["
        ))
        .push_bind(update.field)
        .push("::text], ")
        .push_bind(update.value)
        .push(
            "::jsonb, true) FROM target WHERE d.seq = target.seq AND target.changed RETURNING d.seq) \
             SELECT (SELECT COUNT(*) FROM target) AS matched, (SELECT COUNT(*) FROM updated) AS modified",
        );

        let row = qb
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("update_one", e))?;

        let matched: i64 = row.try_get("matched").map_err(|e| map_sqlx_error("update_one", e))?;
        let modified: i64 = row.try_get("modified").map_err(|e| map_sqlx_error("update_one", e))?;
        Ok(UpdateResult::new(matched as u64, modified as u64))
    }

    #[instrument(skip(self), fields(collection = %collection), err)]
    async fn delete_one(
        &self,
        collection: Collection,
        filter: Filter,
    ) -> Result<DeleteResult, StoreError> {
        let table = collection.as_str();
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "DELETE FROM {table} WHERE seq IN (SELECT seq FROM {table}"
        ));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY seq ASC LIMIT 1)");

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_one", e))?;

        Ok(DeleteResult::new(result.rows_affected()))
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => StoreError::Backend(format!(
            "database error in {}: {} (code {})",
            operation,
            db_err.message(),
            db_err.code().as_deref().unwrap_or("none")
        )),
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::CorruptDocument(format!("decode failed in {}: {}", operation, err))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_sql_shapes() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT body FROM reviews");
        push_filter(&mut qb, Filter::All);
        assert_eq!(qb.sql(), "SELECT body FROM reviews");

        let mut qb = QueryBuilder::<Postgres>::new("SELECT body FROM reviews");
        push_filter(&mut qb, Filter::Id(DocumentId::new()));
        assert_eq!(qb.sql(), "SELECT body FROM reviews WHERE id = $1");

        let mut qb = QueryBuilder::<Postgres>::new("SELECT body FROM reviews");
        push_filter(&mut qb, Filter::field_eq("uid", json!("u1")));
        assert_eq!(qb.sql(), "SELECT body FROM reviews WHERE body -> $1::text = $2::jsonb");
    }

    /// Runs against a live database: `DATABASE_URL=... cargo test -- --ignored`.
    #[tokio::test]
    #[ignore]
    async fn round_trip_against_postgres() {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            return;
        };
        let store = PostgresDocumentStore::connect(&url, 2).await.unwrap();
        store.ensure_schema().await.unwrap();

        // Unique owner so reruns and shared tables do not interfere.
        let uid = DocumentId::new().to_string();
        let by_owner = || Filter::field_eq("uid", uid.clone());

        let mut ids = Vec::new();
        for n in 1..=3 {
            let doc = json!({"uid": uid, "review": format!("r{n}")});
            let Value::Object(doc) = doc else { unreachable!() };
            ids.push(store.insert_one(Collection::Reviews, doc).await.unwrap().inserted_id);
        }

        let found = store
            .find(Collection::Reviews, by_owner(), FindOptions::newest_first())
            .await
            .unwrap();
        let reviews: Vec<_> = found.iter().map(|d| d["review"].clone()).collect();
        assert_eq!(reviews, vec![json!("r3"), json!("r2"), json!("r1")]);
        assert_eq!(found[2]["_id"], json!(ids[0].to_string()));

        let limited = store
            .find(Collection::Reviews, by_owner(), FindOptions::newest_first().limit(2))
            .await
            .unwrap();
        assert_eq!(limited.len(), 2);

        let set = |v: Value| SetField::new("review", v);
        let r = store.update_one(Collection::Reviews, Filter::Id(ids[0]), set(json!("ok"))).await.unwrap();
        assert_eq!((r.matched_count, r.modified_count), (1, 1));
        let r = store.update_one(Collection::Reviews, Filter::Id(ids[0]), set(json!("ok"))).await.unwrap();
        assert_eq!((r.matched_count, r.modified_count), (1, 0));
        let r = store.update_one(Collection::Reviews, Filter::Id(ids[0]), set(Value::Null)).await.unwrap();
        assert_eq!((r.matched_count, r.modified_count), (1, 1));
        let r = store
            .update_one(Collection::Reviews, Filter::Id(DocumentId::new()), set(json!("x")))
            .await
            .unwrap();
        assert_eq!((r.matched_count, r.modified_count), (0, 0));

        let one = store.find_one(Collection::Reviews, Filter::Id(ids[0])).await.unwrap().unwrap();
        assert_eq!(one["review"], Value::Null);

        for id in &ids {
            let deleted = store.delete_one(Collection::Reviews, Filter::Id(*id)).await.unwrap();
            assert_eq!(deleted.deleted_count, 1);
        }
        assert_eq!(store.find_one(Collection::Reviews, Filter::Id(ids[0])).await.unwrap(), None);
        assert_eq!(store.delete_one(Collection::Reviews, Filter::Id(ids[0])).await.unwrap().deleted_count, 0);
    }

    #[test]
    fn pool_closed_maps_to_backend_error() {
        let err = map_sqlx_error("find", sqlx::Error::PoolClosed);
        assert!(matches!(err, StoreError::Backend(msg) if msg.contains("find")));
    }
}
