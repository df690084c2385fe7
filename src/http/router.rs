//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Branch configuration and day structure
        .route(
            "/branches/{branch_id}/settings",
            get(handlers::get_settings).put(handlers::update_settings),
        )
        .route("/branches/{branch_id}/day-slots", get(handlers::get_day_slots))
        // Timetable templates and slots
        .route("/branches/{branch_id}/timetables", get(handlers::list_templates))
        .route("/timetables", post(handlers::create_template))
        .route(
            "/timetables/{timetable_id}/slots",
            get(handlers::list_slots).post(handlers::create_slot),
        )
        .route(
            "/slots/{slot_id}",
            put(handlers::update_slot).delete(handlers::delete_slot),
        )
        // Lesson instances
        .route("/lessons", get(handlers::list_lessons).post(handlers::create_lesson))
        .route(
            "/lessons/{lesson_id}",
            put(handlers::update_lesson).delete(handlers::delete_lesson),
        )
        // Availability and bulk generation
        .route("/availability", get(handlers::check_availability))
        .route(
            "/timetables/{timetable_id}/generate",
            post(handlers::generate_lessons),
        );

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let repo =
            Arc::new(LocalRepository::new()) as Arc<dyn crate::db::repository::FullRepository>;
        let state = AppState::new(repo);
        let _router = create_router(state);
        // If we got here, router was created successfully
    }
}
