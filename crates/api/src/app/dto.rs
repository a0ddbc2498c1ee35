use serde::{Deserialize, Serialize};
use serde_json::Value;

use justice_core::DocumentId;

use crate::app::errors::ApiError;

/// Size of the "latest" listings.
pub const LATEST_LIMIT: usize = 3;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ReviewsQuery {
    pub uid: Option<String>,
}

impl ReviewsQuery {
    /// The owner filter, ignoring an empty `uid=`.
    pub fn owner(&self) -> Option<&str> {
        self.uid.as_deref().filter(|uid| !uid.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct PatchReviewRequest {
    /// Absent in the body means the field is set to `null`.
    #[serde(default)]
    pub review: Value,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

pub fn parse_id(raw: &str) -> Result<DocumentId, ApiError> {
    Ok(raw.parse::<DocumentId>()?)
}
