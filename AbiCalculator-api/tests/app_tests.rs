use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use abi_calculator_api::{create_application, AppConfig};

// Initialize tracing once for all tests
static INIT: std::sync::Once = std::sync::Once::new();
fn initialize() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("info")
            .with_test_writer()
            .try_init();
    });
}

fn test_app() -> Router {
    initialize();
    create_application(&AppConfig::without_delay())
}

// Helper function to get the JSON body from a response
async fn get_body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_json(app: Router, uri: &str, body: Value) -> axum::response::Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let response = get(test_app(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let health = get_body_json(response).await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["components"]["classifier"]["status"], "ok");
    assert_eq!(health["environment"], "development");
    assert!(health["version"].is_string());
}

#[tokio::test]
async fn test_calculate_borderline_scenario() {
    let response = post_json(
        test_app(),
        "/api/v1/abi/calculate",
        json!({
            "right_ankle_systolic": "120",
            "left_ankle_systolic": "110",
            "right_arm_systolic": "130",
            "left_arm_systolic": "120"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = get_body_json(response).await;
    for card in ["right_abi", "left_abi", "average_abi"] {
        assert_eq!(body[card]["value"], "0.92", "{}", card);
        assert_eq!(body[card]["category"], "Borderline", "{}", card);
        assert_eq!(body[card]["risk_level"], "Moderate", "{}", card);
        assert_eq!(body[card]["severity"], 2, "{}", card);
    }
    assert_eq!(body["average_abi"]["label"], "Average ABI");
    assert_eq!(
        body["disclaimer"],
        "This tool provides general health information. Always consult healthcare professionals for personalized medical advice."
    );
    assert!(body["id"].is_string());
    assert!(body["calculated_at"].is_string());

    let ratio = body["right_abi"]["ratio"].as_f64().unwrap();
    assert!((ratio - 120.0 / 130.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_calculate_accepts_numeric_json() {
    let response = post_json(
        test_app(),
        "/api/v1/abi/calculate",
        json!({
            "right_ankle_systolic": 150,
            "left_ankle_systolic": 60,
            "right_arm_systolic": 100,
            "left_arm_systolic": 100
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = get_body_json(response).await;
    assert_eq!(body["right_abi"]["category"], "Calcified Vessels");
    assert_eq!(body["left_abi"]["category"], "Severe PAD");
    assert_eq!(body["average_abi"]["value"], "1.05");
    assert_eq!(body["average_abi"]["category"], "Normal Circulation");
}

#[tokio::test]
async fn test_calculate_rejects_invalid_inputs() {
    let cases = [
        json!({ "right_ankle_systolic": "120", "left_ankle_systolic": "110", "right_arm_systolic": "0", "left_arm_systolic": "120" }),
        json!({ "right_ankle_systolic": "", "left_ankle_systolic": "110", "right_arm_systolic": "130", "left_arm_systolic": "120" }),
        json!({ "right_ankle_systolic": "120", "left_ankle_systolic": "-110", "right_arm_systolic": "130", "left_arm_systolic": "120" }),
        json!({ "right_ankle_systolic": "120", "left_ankle_systolic": "110", "right_arm_systolic": "abc", "left_arm_systolic": "120" }),
        json!({ "right_ankle_systolic": "120", "left_ankle_systolic": "110", "right_arm_systolic": "130" }),
    ];

    for case in cases {
        let response = post_json(test_app(), "/api/v1/abi/calculate", case.clone()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", case);

        let body = get_body_json(response).await;
        assert_eq!(body["error"], "validation_error");
        assert_eq!(
            body["message"],
            "Please enter valid positive numeric values for all measurements."
        );
        assert!(body.get("right_abi").is_none());
    }
}

#[tokio::test]
async fn test_calculate_gap_ratio_is_internal_error() {
    let response = post_json(
        test_app(),
        "/api/v1/abi/calculate",
        json!({
            "right_ankle_systolic": "181",
            "left_ankle_systolic": "100",
            "right_arm_systolic": "200",
            "left_arm_systolic": "100"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = get_body_json(response).await;
    assert_eq!(body["error"], "internal_error");
}

#[tokio::test]
async fn test_classify_reference_values() {
    let expected = [
        (1.45, "Calcified Vessels", 4),
        (1.2, "Normal Circulation", 1),
        (0.95, "Borderline", 2),
        (0.75, "Mild PAD", 3),
        (0.50, "Severe PAD", 5),
    ];

    for (value, category, severity) in expected {
        let response = post_json(test_app(), "/api/v1/abi/classify", json!({ "value": value })).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = get_body_json(response).await;
        assert_eq!(body["category"], category);
        assert_eq!(body["severity"], severity);
    }
}

#[tokio::test]
async fn test_classify_gap_value_is_unprocessable() {
    let response = post_json(test_app(), "/api/v1/abi/classify", json!({ "value": 0.905 })).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = get_body_json(response).await;
    assert_eq!(body["error"], "unclassified");
    assert_eq!(body["details"]["value"], 0.905);
}

#[tokio::test]
async fn test_categories_list_all_bands_in_order() {
    let response = get(test_app(), "/api/v1/abi/categories").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = get_body_json(response).await;
    let categories: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|band| band["category"].as_str().unwrap())
        .collect();
    assert_eq!(
        categories,
        vec!["Calcified Vessels", "Normal Circulation", "Borderline", "Mild PAD", "Severe PAD"]
    );
    assert_eq!(body[0]["min"], 1.4);
    assert_eq!(body[0]["min_inclusive"], false);
    assert!(body[0].get("max").is_none());
}

#[tokio::test]
async fn test_measurement_fields_describe_the_form() {
    let response = get(test_app(), "/api/v1/abi/fields").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = get_body_json(response).await;
    let fields = body.as_array().unwrap();
    let keys: Vec<&str> = fields.iter().map(|f| f["field"].as_str().unwrap()).collect();
    assert_eq!(
        keys,
        vec!["right_ankle_systolic", "left_ankle_systolic", "right_arm_systolic", "left_arm_systolic"]
    );

    assert_eq!(fields[0]["label"], "Right Ankle Systolic Pressure");
    assert_eq!(fields[0]["icon"], "🦵");
    assert_eq!(fields[0]["placeholder"], "Enter right ankle systolic pressure");
    assert_eq!(fields[3]["icon"], "💪");
    assert!(fields.iter().all(|f| f["unit"] == "mmHg"));
}

#[tokio::test]
async fn test_display_rounds_scaled_ties_up() {
    let response = post_json(
        test_app(),
        "/api/v1/abi/calculate",
        json!({
            "right_ankle_systolic": "223",
            "left_ankle_systolic": "223",
            "right_arm_systolic": "200",
            "left_arm_systolic": "200"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = get_body_json(response).await;
    assert_eq!(body["left_abi"]["value"], "1.12");
    assert_eq!(body["left_abi"]["category"], "Normal Circulation");
}

#[tokio::test]
async fn test_metadata_is_json_ld() {
    let response = get(test_app(), "/metadata").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/ld+json"
    );

    let body = get_body_json(response).await;
    assert_eq!(body["@context"], "https://schema.org");
    assert_eq!(body["@type"], "MedicalWebPage");
}

#[tokio::test]
async fn test_openapi_documentation_available() {
    let response = get(test_app(), "/api-docs/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);

    let openapi = get_body_json(response).await;
    assert!(openapi["openapi"].is_string());
    assert!(openapi["paths"]["/api/v1/abi/calculate"].is_object());
}
