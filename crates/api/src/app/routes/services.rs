use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    Json,
};
use serde_json::Value;

use justice_core::{document_from_value, Collection, Document};
use justice_infra::{Filter, FindOptions, InsertOneResult};

use crate::app::dto::{self, LATEST_LIMIT};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::CallerContext;

pub async fn list_services(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let docs = services
        .store
        .find(Collection::Services, Filter::All, FindOptions::newest_first())
        .await?;
    Ok(Json(docs))
}

pub async fn list_latest_services(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let docs = services
        .store
        .find(
            Collection::Services,
            Filter::All,
            FindOptions::newest_first().limit(LATEST_LIMIT),
        )
        .await?;
    Ok(Json(docs))
}

pub async fn get_service(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<Option<Document>>, ApiError> {
    let id = dto::parse_id(&id)?;
    let doc = services
        .store
        .find_one(Collection::Services, Filter::Id(id))
        .await?;
    Ok(Json(doc))
}

pub async fn create_service(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Json(body): Json<Value>,
) -> Result<Json<InsertOneResult>, ApiError> {
    let doc = document_from_value(body)?;
    let result = services.store.insert_one(Collection::Services, doc).await?;
    tracing::info!(id = %result.inserted_id, uid = caller.uid(), "service created");
    Ok(Json(result))
}
