use axum::http::StatusCode;

pub async fn root() -> &'static str {
    "justice lawyer server is running"
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}
