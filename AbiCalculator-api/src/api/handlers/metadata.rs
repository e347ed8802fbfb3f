use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
};
use serde_json::{json, Value};
use tracing::{debug, instrument};

pub const JSON_LD_CONTENT_TYPE: &str = "application/ld+json";

/// Schema.org description of the calculator, used for discovery only
pub fn medical_web_page_schema() -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "MedicalWebPage",
        "name": "Comprehensive Ankle-Brachial Index (ABI) Calculator",
        "description": "Advanced medical tool for assessing peripheral circulation and cardiovascular health through Ankle-Brachial Index measurement",
        "keywords": [
            "ABI calculator",
            "Peripheral Artery Disease",
            "Cardiovascular Health",
            "Medical Diagnostic Tool"
        ]
    })
}

/// JSON-LD metadata describing the calculator
#[utoipa::path(
    get,
    path = "/metadata",
    responses(
        (status = 200, description = "JSON-LD MedicalWebPage document", body = String, content_type = "application/ld+json"),
    ),
    tag = "metadata"
)]
#[instrument]
pub async fn get_metadata() -> impl IntoResponse {
    debug!("Metadata requested");
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, JSON_LD_CONTENT_TYPE)],
        medical_web_page_schema().to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_describes_medical_web_page() {
        let schema = medical_web_page_schema();
        assert_eq!(schema["@type"], "MedicalWebPage");
        assert_eq!(schema["keywords"].as_array().map(Vec::len), Some(4));
    }

    #[tokio::test]
    async fn test_metadata_content_type() {
        let response = get_metadata().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            JSON_LD_CONTENT_TYPE
        );
    }
}
