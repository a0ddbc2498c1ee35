use axum::{
    routing::{get, post},
    Router,
};

pub mod blogs;
pub mod reviews;
pub mod services;
pub mod system;
pub mod token;

/// Routes anyone may call.
pub fn public_router() -> Router {
    Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .route("/jwt", post(token::issue_token))
        .route("/services", get(services::list_services))
        .route("/services-limit", get(services::list_latest_services))
        .route("/services/:id", get(services::get_service))
        .route("/reviews", get(reviews::list_reviews))
        .route("/reviews/:id", axum::routing::patch(reviews::patch_review))
        .route("/blogs", get(blogs::list_blogs))
        .route("/blogs-limit", get(blogs::list_latest_blogs))
        .route("/blogs/:slug", get(blogs::get_blog))
        .route("/blog", get(blogs::list_static_blogs))
        .route("/blog/:slug", get(blogs::get_static_blog))
}

/// Routes that need a verified caller. The auth layer is applied by the app.
pub fn protected_router() -> Router {
    Router::new()
        .route("/services", post(services::create_service))
        .route("/user-reviews", get(reviews::list_user_reviews))
        .route("/reviews", post(reviews::create_review))
        .route(
            "/reviews/:id",
            get(reviews::get_review).delete(reviews::delete_review),
        )
}
