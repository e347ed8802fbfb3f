use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use abi_calculator_domain::entities::abi::{
    AbiReading, AbiResults, AbiSide, MeasurementField, RawMeasurements,
    RiskInterpretation as DomainRiskInterpretation, MEASUREMENT_UNIT, MEDICAL_DISCLAIMER,
};
use abi_calculator_domain::orchestrator::{
    CalculationOrchestrator, CalculationOutcome, SharedAbiService,
};
use abi_calculator_domain::services::{
    create_default_abi_service, risk_bands, AbiServiceError, AbiServiceTrait,
    ClassificationError, RiskBandSummary,
};

use crate::entities::abi::{
    AbiCalculationResponse, AbiResultCard, CalculateAbiRequest, ClassifyAbiRequest,
    MeasurementFieldResponse, RiskBandResponse, RiskInterpretation,
};
use crate::entities::common::ErrorResponse;

/// Shared state for the ABI handlers
#[derive(Clone)]
pub struct AbiState {
    pub service: SharedAbiService,
    pub calculation_delay: Duration,
}

impl AbiState {
    pub fn new(service: SharedAbiService, calculation_delay: Duration) -> Self {
        Self {
            service,
            calculation_delay,
        }
    }
}

/// Create the default handler state
pub fn create_state(calculation_delay: Duration) -> AbiState {
    AbiState::new(Arc::new(create_default_abi_service()), calculation_delay)
}

/// Calculate right, left and average ABI from four systolic pressures
#[utoipa::path(
    post,
    path = "/api/v1/abi/calculate",
    request_body = CalculateAbiRequest,
    responses(
        (status = 200, description = "ABI calculated", body = AbiCalculationResponse),
        (status = 400, description = "Invalid measurements", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "abi"
)]
#[instrument(skip(state, request))]
pub async fn calculate_abi(
    State(state): State<AbiState>,
    Json(request): Json<CalculateAbiRequest>,
) -> Result<impl IntoResponse, Response> {
    info!("Calculating ABI");

    // Each request runs on its own orchestrator so nothing is shared between callers
    let orchestrator = CalculationOrchestrator::new(state.service.clone(), state.calculation_delay)
        .with_measurements(convert_to_domain_measurements(request));

    let outcome = orchestrator.calculate().await;
    let final_state = orchestrator.state();

    match (outcome, final_state.result) {
        (CalculationOutcome::Completed, Some(results)) => {
            let response = convert_to_public_response(results);
            info!(id = %response.id, average = %response.average_abi.value, "ABI calculated");
            Ok((StatusCode::OK, Json(response)))
        }
        (CalculationOutcome::Rejected, _) => {
            let message = final_state.error.unwrap_or_default();
            warn!("Invalid ABI measurements: {}", message);
            Err(ErrorResponse::validation_error(&message).into_response())
        }
        (outcome, _) => {
            error!(
                ?outcome,
                error = final_state.error.as_deref().unwrap_or("none"),
                "ABI calculation did not complete"
            );
            Err(ErrorResponse::internal_error().into_response())
        }
    }
}

/// Classify a single ABI value
#[utoipa::path(
    post,
    path = "/api/v1/abi/classify",
    request_body = ClassifyAbiRequest,
    responses(
        (status = 200, description = "Value classified", body = RiskInterpretation),
        (status = 422, description = "Value falls outside every band", body = ErrorResponse),
    ),
    tag = "abi"
)]
#[instrument(skip(state))]
pub async fn classify_abi(
    State(state): State<AbiState>,
    Json(request): Json<ClassifyAbiRequest>,
) -> Result<impl IntoResponse, Response> {
    match state.service.classify(request.value) {
        Ok(interpretation) => Ok((
            StatusCode::OK,
            Json(convert_to_public_interpretation(&interpretation)),
        )),
        Err(AbiServiceError::Classification(ClassificationError::Unclassified(value))) => {
            info!("ABI value {} is outside every risk band", value);
            Err(ErrorResponse::unclassified(value).into_response())
        }
        Err(e) => {
            error!("Error classifying ABI value: {}", e);
            Err(ErrorResponse::internal_error().into_response())
        }
    }
}

/// List the ABI risk bands in precedence order
#[utoipa::path(
    get,
    path = "/api/v1/abi/categories",
    responses(
        (status = 200, description = "Risk bands", body = [RiskBandResponse]),
    ),
    tag = "abi"
)]
#[instrument]
pub async fn get_abi_categories() -> impl IntoResponse {
    let bands: Vec<RiskBandResponse> = risk_bands().iter().map(convert_to_public_band).collect();
    (StatusCode::OK, Json(bands))
}

/// Describe the four pressure inputs in form order
#[utoipa::path(
    get,
    path = "/api/v1/abi/fields",
    responses(
        (status = 200, description = "Measurement input descriptors", body = [MeasurementFieldResponse]),
    ),
    tag = "abi"
)]
#[instrument]
pub async fn get_measurement_fields() -> impl IntoResponse {
    let fields: Vec<MeasurementFieldResponse> =
        MeasurementField::ALL.iter().map(convert_to_public_field).collect();
    (StatusCode::OK, Json(fields))
}

// Convert public request to domain measurements
fn convert_to_domain_measurements(request: CalculateAbiRequest) -> RawMeasurements {
    RawMeasurements::new(
        request.right_ankle_systolic,
        request.left_ankle_systolic,
        request.right_arm_systolic,
        request.left_arm_systolic,
    )
}

fn convert_to_public_interpretation(interpretation: &DomainRiskInterpretation) -> RiskInterpretation {
    RiskInterpretation {
        category: interpretation.category.label().to_string(),
        description: interpretation.description.clone(),
        risk_level: interpretation.risk_level.to_string(),
        severity: interpretation.severity,
        color: interpretation.color.clone(),
        gradient: interpretation.gradient.clone(),
        icon: interpretation.icon.clone(),
    }
}

fn convert_to_public_card(side: AbiSide, reading: &AbiReading) -> AbiResultCard {
    AbiResultCard {
        label: side.label().to_string(),
        value: reading.display_value.clone(),
        ratio: reading.value,
        interpretation: convert_to_public_interpretation(&reading.interpretation),
    }
}

// Convert domain results to the public response
fn convert_to_public_response(results: AbiResults) -> AbiCalculationResponse {
    AbiCalculationResponse {
        id: Uuid::new_v4(),
        calculated_at: results.calculated_at,
        right_abi: convert_to_public_card(AbiSide::Right, &results.right),
        left_abi: convert_to_public_card(AbiSide::Left, &results.left),
        average_abi: convert_to_public_card(AbiSide::Average, &results.average),
        disclaimer: MEDICAL_DISCLAIMER.to_string(),
    }
}

fn convert_to_public_field(field: &MeasurementField) -> MeasurementFieldResponse {
    MeasurementFieldResponse {
        field: field.key().to_string(),
        label: field.label().to_string(),
        icon: field.icon().to_string(),
        unit: MEASUREMENT_UNIT.to_string(),
        placeholder: field.placeholder(),
    }
}

fn convert_to_public_band(band: &RiskBandSummary) -> RiskBandResponse {
    RiskBandResponse {
        min: band.min,
        min_inclusive: band.min_inclusive,
        max: band.max,
        max_inclusive: band.max_inclusive,
        interpretation: convert_to_public_interpretation(&band.interpretation),
    }
}
