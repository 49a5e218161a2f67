//! Web application router and middleware setup.

use crate::web::auth;
use crate::web::config::WebConfig;
use crate::web::handlers::{self, AppState};
use crate::web::store::ReadingStore;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Create the axum application with all routes and middleware.
pub fn create_app(config: &WebConfig, store: Arc<ReadingStore>) -> Router {
    let state = AppState::new(store, config.api_key.clone());

    if state.api_key.is_some() {
        info!("Reading routes require the {} header", auth::API_KEY_HEADER);
    }

    let readings = Router::new()
        .route(
            "/sensor-data",
            post(handlers::add_reading).get(handlers::list_readings),
        )
        .route("/sensor-data/stats", get(handlers::reading_stats))
        .route(
            "/sensor-data/:id",
            get(handlers::get_reading).delete(handlers::delete_reading),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    let mut app = Router::new()
        .route("/", get(handlers::root))
        .route("/api/health", get(handlers::health_check))
        .merge(readings)
        .with_state(state);

    // Add middleware layers
    let service_builder = ServiceBuilder::new().layer(TraceLayer::new_for_http());

    // Add CORS if enabled
    if config.enable_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app.layer(service_builder)
}
