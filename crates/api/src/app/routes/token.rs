use std::sync::Arc;

use axum::{extract::Extension, Json};
use serde_json::Value;

use crate::app::dto::TokenResponse;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

/// Sign whatever the caller sends. No credential check happens here.
pub async fn issue_token(
    Extension(services): Extension<Arc<AppServices>>,
    Json(payload): Json<Value>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = services.issuer.issue(payload)?;
    Ok(Json(TokenResponse { token }))
}
