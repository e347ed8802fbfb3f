use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Metadata endpoints
        crate::api::handlers::metadata::get_metadata,

        // ABI endpoints
        crate::api::handlers::abi::calculate_abi,
        crate::api::handlers::abi::classify_abi,
        crate::api::handlers::abi::get_abi_categories,
        crate::api::handlers::abi::get_measurement_fields,
    ),
    components(
        schemas(
            // Entities
            crate::entities::abi::CalculateAbiRequest,
            crate::entities::abi::ClassifyAbiRequest,
            crate::entities::abi::AbiCalculationResponse,
            crate::entities::abi::AbiResultCard,
            crate::entities::abi::RiskInterpretation,
            crate::entities::abi::RiskBandResponse,
            crate::entities::abi::MeasurementFieldResponse,
            crate::entities::common::ErrorResponse,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "metadata", description = "Discovery metadata"),
        (name = "abi", description = "Ankle-Brachial Index calculation endpoints")
    ),
    info(
        title = "ABI Calculator API",
        version = "0.1.0",
        description = "API for calculating and classifying the Ankle-Brachial Index",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;
