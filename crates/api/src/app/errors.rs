use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use justice_auth::TokenError;
use justice_core::DomainError;
use justice_infra::{CatalogError, StoreError};

use crate::config::ConfigError;

/// Request-level failure, rendered as `{ "error": code, "message": text }`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No `Authorization` header at all.
    #[error("unauthorized access")]
    Unauthorized,

    /// A credential was presented but is not acceptable.
    #[error("Forbidden access")]
    Forbidden,

    /// Valid token, but for somebody else's data.
    #[error("unauthorized access")]
    NotOwner,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            ApiError::Unauthorized => json_error(StatusCode::UNAUTHORIZED, "unauthorized", message),
            ApiError::Forbidden | ApiError::NotOwner => {
                json_error(StatusCode::FORBIDDEN, "forbidden", message)
            }
            ApiError::Domain(DomainError::InvalidId(_)) => {
                json_error(StatusCode::BAD_REQUEST, "invalid_id", message)
            }
            ApiError::Domain(DomainError::InvalidDocument(_)) => {
                json_error(StatusCode::BAD_REQUEST, "invalid_document", message)
            }
            ApiError::Token(e) if e.is_bad_payload() => {
                json_error(StatusCode::BAD_REQUEST, "invalid_payload", message)
            }
            ApiError::Token(TokenError::Signing(_)) => {
                tracing::error!(error = %message, "token signing failed");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "token_error", message)
            }
            ApiError::Token(_) => json_error(StatusCode::FORBIDDEN, "forbidden", "Forbidden access"),
            ApiError::Store(_) => {
                tracing::error!(error = %message, "store operation failed");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", message)
            }
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Failure while wiring the application at startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("document store unavailable: {0}")]
    Store(#[from] StoreError),

    #[error("blog catalog unavailable: {0}")]
    Catalog(#[from] CatalogError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        let cases = [
            (ApiError::Unauthorized, StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden, StatusCode::FORBIDDEN),
            (ApiError::NotOwner, StatusCode::FORBIDDEN),
            (ApiError::Domain(DomainError::invalid_id("x")), StatusCode::BAD_REQUEST),
            (ApiError::Domain(DomainError::invalid_document("x")), StatusCode::BAD_REQUEST),
            (ApiError::Token(TokenError::InvalidPayload), StatusCode::BAD_REQUEST),
            (ApiError::Token(TokenError::Expired), StatusCode::FORBIDDEN),
            (ApiError::Token(TokenError::Signing("x".into())), StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::Store(StoreError::LockPoisoned), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
