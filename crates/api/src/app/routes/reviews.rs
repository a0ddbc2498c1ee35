use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use serde_json::Value;

use justice_auth::ensure_owner;
use justice_core::{document_from_value, Collection, Document};
use justice_infra::{DeleteResult, Filter, FindOptions, InsertOneResult, SetField, UpdateResult};

use crate::app::dto::{self, PatchReviewRequest, ReviewsQuery};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::CallerContext;

fn owner_filter(owner: Option<&str>) -> Filter {
    match owner {
        Some(uid) => Filter::field_eq("uid", uid),
        None => Filter::All,
    }
}

pub async fn list_reviews(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<ReviewsQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let docs = services
        .store
        .find(Collection::Reviews, owner_filter(query.owner()), FindOptions::newest_first())
        .await?;
    Ok(Json(docs))
}

/// The caller's own reviews. Asking for anyone else's is rejected outright.
pub async fn list_user_reviews(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Query(query): Query<ReviewsQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    ensure_owner(caller.token(), query.owner()).map_err(|e| {
        tracing::info!(reason = %e, "owner scope check failed");
        ApiError::NotOwner
    })?;

    let docs = services
        .store
        .find(Collection::Reviews, owner_filter(query.owner()), FindOptions::newest_first())
        .await?;
    Ok(Json(docs))
}

pub async fn create_review(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Json(body): Json<Value>,
) -> Result<Json<InsertOneResult>, ApiError> {
    let doc = document_from_value(body)?;
    let result = services.store.insert_one(Collection::Reviews, doc).await?;
    tracing::info!(id = %result.inserted_id, uid = caller.uid(), "review created");
    Ok(Json(result))
}

pub async fn get_review(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(_caller): Extension<CallerContext>,
    Path(id): Path<String>,
) -> Result<Json<Option<Document>>, ApiError> {
    let id = dto::parse_id(&id)?;
    let doc = services
        .store
        .find_one(Collection::Reviews, Filter::Id(id))
        .await?;
    Ok(Json(doc))
}

pub async fn patch_review(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<PatchReviewRequest>,
) -> Result<Json<UpdateResult>, ApiError> {
    let id = dto::parse_id(&id)?;
    let result = services
        .store
        .update_one(Collection::Reviews, Filter::Id(id), SetField::new("review", body.review))
        .await?;
    Ok(Json(result))
}

pub async fn delete_review(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, ApiError> {
    let id = dto::parse_id(&id)?;
    let result = services
        .store
        .delete_one(Collection::Reviews, Filter::Id(id))
        .await?;
    tracing::info!(%id, deleted = result.deleted_count, uid = caller.uid(), "review delete");
    Ok(Json(result))
}
