mod handlers;

pub use handlers::ErrorResponse;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::service::ProjectService;

/// Router with permissive CORS, as used for local development and tests.
pub fn create_router(service: ProjectService) -> Router {
    create_router_with_config(service, &ServerConfig::in_memory())
}

pub fn create_router_with_config(service: ProjectService, config: &ServerConfig) -> Router {
    let api = Router::new()
        // Projects
        .route("/projects", get(handlers::list_projects))
        .route("/projects", post(handlers::create_project))
        .route("/projects/{id}", get(handlers::get_project))
        // Estimation without persistence
        .route("/calculate-cost", post(handlers::calculate_cost))
        .route("/rates", get(handlers::get_rates))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(config.cors_layer())
        .with_state(service)
}
