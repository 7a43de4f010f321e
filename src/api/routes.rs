use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::credential_middleware;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(middleware::from_fn(credential_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/search", get(handlers::search))
        // Device-local lists
        .route("/lists", get(handlers::get_local_lists))
        .route("/lists/:list_id", get(handlers::get_local_list))
        // Editor sessions
        .route("/editors", post(handlers::open_editor))
        .route(
            "/editors/:session_id",
            get(handlers::get_editor)
                .patch(handlers::update_details)
                .delete(handlers::close_editor),
        )
        .route("/editors/:session_id/listings", post(handlers::add_listing))
        .route(
            "/editors/:session_id/listings/:id_within_list",
            delete(handlers::remove_listing),
        )
        .route("/editors/:session_id/swap", post(handlers::swap_listings))
        .route("/editors/:session_id/reorder", post(handlers::reorder_listing))
        .route("/editors/:session_id/save", post(handlers::save_list))
        .route("/editors/:session_id/revert", post(handlers::revert_list))
        .route("/editors/:session_id/list", delete(handlers::delete_list))
        .route(
            "/editors/:session_id/notifications",
            get(handlers::drain_notifications),
        )
}
