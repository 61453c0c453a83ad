use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

/// Build the axum router with all Folio endpoints.
///
/// API routes live under `/v0` on every host; `/` and `/:page` are routed
/// by the `Host` header.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v0/health", get(handler::health_handler))
        .route(
            "/v0/projects",
            get(handler::list_projects_handler).post(handler::create_project_handler),
        )
        .route(
            "/v0/projects/:name",
            get(handler::get_project_handler).patch(handler::update_project_handler),
        )
        .route("/v0/projects/:name/versions", get(handler::list_versions_handler))
        .route("/v0/raw/:hash", get(handler::raw_content_handler))
        .route("/", get(handler::site_index_handler))
        .route("/:page", get(handler::site_page_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
