//! Blog routes. `/blogs*` read the `blogs` collection; `/blog*` read the
//! bundled static catalog.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    Json,
};

use justice_core::{Collection, Document};
use justice_infra::{Filter, FindOptions};

use crate::app::dto::LATEST_LIMIT;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub async fn list_blogs(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let docs = services
        .store
        .find(Collection::Blogs, Filter::All, FindOptions::newest_first())
        .await?;
    Ok(Json(docs))
}

pub async fn list_latest_blogs(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let docs = services
        .store
        .find(
            Collection::Blogs,
            Filter::All,
            FindOptions::newest_first().limit(LATEST_LIMIT),
        )
        .await?;
    Ok(Json(docs))
}

pub async fn get_blog(
    Extension(services): Extension<Arc<AppServices>>,
    Path(slug): Path<String>,
) -> Result<Json<Option<Document>>, ApiError> {
    let doc = services
        .store
        .find_one(Collection::Blogs, Filter::field_eq("slug", slug))
        .await?;
    Ok(Json(doc))
}

pub async fn list_static_blogs(
    Extension(services): Extension<Arc<AppServices>>,
) -> Json<Vec<Document>> {
    Json(services.blogs.list().to_vec())
}

pub async fn get_static_blog(
    Extension(services): Extension<Arc<AppServices>>,
    Path(slug): Path<String>,
) -> Json<Option<Document>> {
    Json(services.blogs.find_by_slug(&slug).cloned())
}
