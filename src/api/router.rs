//! Registry router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! CORS is permissive: the reporting client is served from a different
//! origin in the field deployment.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the registry API router.
pub fn api_router(ctx: ApiContext) -> Router {
    Router::new()
        .route(
            "/api/cases",
            post(endpoints::cases::create).get(endpoints::cases::fetch),
        )
        .route("/api/lab_results", post(endpoints::lab_results::create))
        .route(
            "/api/users",
            get(endpoints::users::lookup).post(endpoints::users::create),
        )
        .route("/health", get(endpoints::health::check))
        .with_state(ctx)
        .layer(CorsLayer::permissive())
}
