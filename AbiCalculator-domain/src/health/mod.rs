//! Domain layer health check functionality
//! This module provides health check services for the application

use std::collections::HashMap;

use async_trait::async_trait;

use crate::entities::abi::AbiCategory;
use crate::services::classifier::classify_abi;

/// System health status
#[derive(Debug, Clone, PartialEq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentStatus {
    /// Component is functioning normally
    Healthy,
    /// Component is functioning but with reduced performance
    Degraded,
    /// Component is not functioning
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    /// Status of the component
    pub status: ComponentStatus,
    /// Optional details about the component status
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    /// Overall system status
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

impl SystemHealth {
    /// Build a system health report, deriving the overall status from the
    /// worst component
    pub fn from_components(components: HashMap<String, HealthComponent>) -> Self {
        let status = if components.values().any(|c| c.status == ComponentStatus::Unhealthy) {
            SystemStatus::Unhealthy
        } else if components.values().any(|c| c.status == ComponentStatus::Degraded) {
            SystemStatus::Degraded
        } else {
            SystemStatus::Healthy
        };

        Self { status, components }
    }
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync + std::fmt::Debug {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;

    /// Check that the classifier still returns the reference categories
    async fn check_classifier_status(&self) -> Result<(), String>;
}

/// Reference values with the category each must map to
pub const CLASSIFIER_REFERENCE_VALUES: [(f64, AbiCategory); 5] = [
    (1.45, AbiCategory::CalcifiedVessels),
    (1.2, AbiCategory::NormalCirculation),
    (0.95, AbiCategory::Borderline),
    (0.75, AbiCategory::MildPad),
    (0.50, AbiCategory::SeverePad),
];

/// Run the reference values through the classifier
///
/// Returns an error naming the first value that maps to the wrong category
/// or to none at all.
pub async fn check_classifier_status() -> Result<(), String> {
    for (value, expected) in CLASSIFIER_REFERENCE_VALUES {
        match classify_abi(value) {
            Ok(interpretation) if interpretation.category == expected => {}
            Ok(interpretation) => {
                return Err(format!(
                    "ABI {} classified as {} instead of {}",
                    value, interpretation.category, expected
                ));
            }
            Err(e) => return Err(e.to_string()),
        }
    }
    Ok(())
}

/// Get overall system health
pub async fn get_system_health() -> SystemHealth {
    let classifier = match check_classifier_status().await {
        Ok(()) => HealthComponent {
            status: ComponentStatus::Healthy,
            details: None,
        },
        Err(e) => HealthComponent {
            status: ComponentStatus::Unhealthy,
            details: Some(e),
        },
    };

    SystemHealth::from_components(
        vec![("classifier".to_string(), classifier)].into_iter().collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_system_health() {
        let health = get_system_health().await;
        assert_eq!(health.status, SystemStatus::Healthy);
        assert!(health.components.contains_key("classifier"));
    }

    #[tokio::test]
    async fn test_classifier_reference_values_pass() {
        assert!(check_classifier_status().await.is_ok());
    }

    #[test]
    fn test_worst_component_wins() {
        let mut components = HashMap::new();
        components.insert(
            "api".to_string(),
            HealthComponent {
                status: ComponentStatus::Healthy,
                details: None,
            },
        );
        components.insert(
            "classifier".to_string(),
            HealthComponent {
                status: ComponentStatus::Degraded,
                details: Some("slow".to_string()),
            },
        );
        assert_eq!(SystemHealth::from_components(components.clone()).status, SystemStatus::Degraded);

        components.insert(
            "other".to_string(),
            HealthComponent {
                status: ComponentStatus::Unhealthy,
                details: None,
            },
        );
        assert_eq!(SystemHealth::from_components(components).status, SystemStatus::Unhealthy);
    }
}
