use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::debug;

use crate::api::handlers::{abi, health, metadata};
use crate::config::AppConfig;
use crate::openapi::configure_swagger_routes;

/// Create the application router
pub fn create_app(config: &AppConfig) -> Router {
    debug!("Creating application router");

    // Create ABI handler state using factory function
    let abi_state = abi::create_state(config.calculation_delay);

    // Create health service using factory function
    let health_service = health::create_health_service();

    let api_routes = Router::new()
        .route("/abi/calculate", post(abi::calculate_abi))
        .route("/abi/classify", post(abi::classify_abi))
        .route("/abi/categories", get(abi::get_abi_categories))
        .route("/abi/fields", get(abi::get_measurement_fields))
        .with_state(abi_state);

    debug!("API routes configured");

    // Set up public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/metadata", get(metadata::get_metadata))
        .layer(Extension(health_service))
        .layer(Extension(health::Environment(config.environment.clone())));

    debug!("Public routes configured");

    let app = Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes);

    // Configure the Swagger UI using the helper function
    let app = add_swagger_ui(app);

    debug!("Swagger UI merged");

    // Initialize health check service startup time
    health::initialize_server_start_time();

    app.layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    // Get Swagger UI routes
    let swagger = configure_swagger_routes();

    // Merge Swagger UI with the app router
    app.merge(swagger)
}
