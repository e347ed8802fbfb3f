use axum::{http::StatusCode, response::IntoResponse, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use std::time::{SystemTime, UNIX_EPOCH};
use std::sync::{Once, Arc};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use async_trait::async_trait;

use abi_calculator_domain::health::{
    self, ComponentStatus as DomainComponentStatus, HealthComponent as DomainHealthComponent,
    HealthServiceTrait, SystemHealth, SystemStatus,
};

/// Health check response model with system information
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Current service status ("ok", "degraded", or "error")
    pub status: String,
    /// Current application version from Cargo manifest
    pub version: String,
    /// Timestamp of when the response was generated
    pub timestamp: u64,
    /// Uptime of the service in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    /// Details about various components of the system
    pub components: ComponentStatus,
    /// Environment information
    pub environment: String,
}

/// Status of individual system components
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ComponentStatus {
    /// Classifier self-check status
    pub classifier: ComponentHealthStatus,
    /// API status
    pub api: ComponentHealthStatus,
}

/// Health status for an individual component
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ComponentHealthStatus {
    /// Status of the component ("ok", "degraded", or "error")
    pub status: String,
    /// Optional message with more details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Environment name reported by the health check
#[derive(Clone, Debug)]
pub struct Environment(pub String);

// Track the time when the server started using a thread-safe OnceCell
static SERVER_START_TIME: OnceCell<u64> = OnceCell::new();
static INIT: Once = Once::new();

// Initialize the server start time
pub fn initialize_server_start_time() {
    INIT.call_once(|| {
        let start_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let _ = SERVER_START_TIME.set(start_time);
    });
}

/// Health check endpoint to verify the API is running
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API is healthy", body = HealthResponse),
        (status = 500, description = "API is not healthy", body = HealthResponse),
        (status = 503, description = "API is degraded", body = HealthResponse)
    ),
    tag = "health"
)]
#[instrument(skip(health_service))]
pub async fn health_check(
    Extension(health_service): Extension<Arc<dyn HealthServiceTrait + Send + Sync>>,
    Extension(environment): Extension<Environment>,
) -> impl IntoResponse {
    info!("Health check requested");

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    // Calculate uptime if server start time is available
    let uptime = SERVER_START_TIME.get().map(|&start_time| now.saturating_sub(start_time));

    let system_health = health_service.get_system_health().await;

    let overall_status = match system_health.status {
        SystemStatus::Healthy => "ok",
        SystemStatus::Degraded => "degraded",
        SystemStatus::Unhealthy => "error",
    };

    let component = |name: &str| ComponentHealthStatus {
        status: map_component_status(
            &system_health
                .components
                .get(name)
                .map(|c| c.status.clone())
                .unwrap_or(DomainComponentStatus::Healthy),
        ),
        message: system_health.components.get(name).and_then(|c| c.details.clone()),
    };

    let response = HealthResponse {
        status: overall_status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: now,
        uptime,
        components: ComponentStatus {
            classifier: component("classifier"),
            api: component("api"),
        },
        environment: environment.0,
    };

    // Return appropriate status code based on overall status
    let status = match overall_status {
        "ok" => StatusCode::OK,
        "degraded" => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(response))
}

/// Map domain component status to API status string
fn map_component_status(status: &DomainComponentStatus) -> String {
    match status {
        DomainComponentStatus::Healthy => "ok",
        DomainComponentStatus::Degraded => "degraded",
        DomainComponentStatus::Unhealthy => "error",
    }.to_string()
}

/// Implementation of the health service
#[derive(Debug, Default)]
pub struct HealthService;

impl HealthService {
    /// Create a new health service
    pub fn new() -> Self {
        HealthService
    }
}

#[async_trait]
impl HealthServiceTrait for HealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let mut components = HashMap::new();

        let classifier = match self.check_classifier_status().await {
            Ok(()) => DomainHealthComponent {
                status: DomainComponentStatus::Healthy,
                details: None,
            },
            Err(e) => DomainHealthComponent {
                status: DomainComponentStatus::Unhealthy,
                details: Some(e),
            },
        };
        components.insert("classifier".to_string(), classifier);

        // Add API component (always healthy in this implementation)
        components.insert(
            "api".to_string(),
            DomainHealthComponent {
                status: DomainComponentStatus::Healthy,
                details: None,
            },
        );

        SystemHealth::from_components(components)
    }

    async fn check_classifier_status(&self) -> Result<(), String> {
        health::check_classifier_status().await
    }
}

/// Factory function to create a health service
pub fn create_health_service() -> Arc<dyn HealthServiceTrait + Send + Sync> {
    Arc::new(HealthService::new())
}
