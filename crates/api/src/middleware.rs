use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use justice_auth::JwtValidator;

use crate::app::errors::ApiError;
use crate::context::CallerContext;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

/// Gate for routes that need a caller identity.
///
/// No `Authorization` header is a 401; anything else that fails (wrong
/// scheme, empty, malformed, bad signature, expired) is a 403.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers())?;

    let verified = state.jwt.validate(token).map_err(|e| {
        tracing::debug!(error = %e, "bearer token rejected");
        ApiError::Forbidden
    })?;

    req.extensions_mut().insert(CallerContext::new(verified));

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(ApiError::Unauthorized)?;

    let header = header.to_str().map_err(|_| ApiError::Forbidden)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Forbidden)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(ApiError::Forbidden);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::AUTHORIZATION, HeaderValue};

    fn headers(value: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(v) = value {
            headers.insert(AUTHORIZATION, HeaderValue::from_static(v));
        }
        headers
    }

    #[test]
    fn missing_header_is_unauthorized() {
        assert!(matches!(extract_bearer(&headers(None)), Err(ApiError::Unauthorized)));
    }

    #[test]
    fn wrong_scheme_or_empty_token_is_forbidden() {
        assert!(matches!(extract_bearer(&headers(Some("Basic abc"))), Err(ApiError::Forbidden)));
        assert!(matches!(extract_bearer(&headers(Some("Bearer "))), Err(ApiError::Forbidden)));
        assert!(matches!(extract_bearer(&headers(Some("abc"))), Err(ApiError::Forbidden)));
    }

    #[test]
    fn bearer_token_is_extracted() {
        let h = headers(Some("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer(&h).unwrap(), "abc.def.ghi");
    }
}
