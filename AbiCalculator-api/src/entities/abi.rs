use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Request payload for an ABI calculation
///
/// Each pressure may be sent as a JSON string or number. A missing or
/// null field is treated as an empty input.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CalculateAbiRequest {
    /// Right ankle systolic pressure in mmHg
    #[serde(default, deserialize_with = "raw_input")]
    #[schema(example = "120")]
    pub right_ankle_systolic: String,

    /// Left ankle systolic pressure in mmHg
    #[serde(default, deserialize_with = "raw_input")]
    #[schema(example = "110")]
    pub left_ankle_systolic: String,

    /// Right arm systolic pressure in mmHg
    #[serde(default, deserialize_with = "raw_input")]
    #[schema(example = "130")]
    pub right_arm_systolic: String,

    /// Left arm systolic pressure in mmHg
    #[serde(default, deserialize_with = "raw_input")]
    #[schema(example = "120")]
    pub left_arm_systolic: String,
}

/// Request payload for classifying a single ABI value
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClassifyAbiRequest {
    /// Ankle-Brachial Index ratio
    #[schema(example = 0.95)]
    pub value: f64,
}

/// Public representation of a risk interpretation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RiskInterpretation {
    /// Category label, e.g. "Borderline"
    pub category: String,

    /// One-sentence explanation of the category
    pub description: String,

    /// Risk level label, e.g. "Moderate to High"
    pub risk_level: String,

    /// Display emphasis from 1 (normal) to 5 (critical)
    pub severity: u8,

    /// Card color
    pub color: String,

    /// Card background gradient
    pub gradient: String,

    /// Icon shown next to the category
    pub icon: String,
}

/// One labeled result card
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AbiResultCard {
    /// "Right ABI", "Left ABI" or "Average ABI"
    pub label: String,

    /// Ratio rounded to two decimals
    #[schema(example = "0.92")]
    pub value: String,

    /// Unrounded ratio used for classification
    pub ratio: f64,

    #[serde(flatten)]
    pub interpretation: RiskInterpretation,
}

/// Response for a completed ABI calculation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AbiCalculationResponse {
    /// Identifier of this calculation, for correlating logs
    pub id: Uuid,

    /// When the calculation finished
    pub calculated_at: DateTime<Utc>,

    pub right_abi: AbiResultCard,
    pub left_abi: AbiResultCard,
    pub average_abi: AbiResultCard,

    /// Medical disclaimer to show with the results
    pub disclaimer: String,
}

/// Form descriptor for one pressure input
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MeasurementFieldResponse {
    /// Request body key, e.g. "right_ankle_systolic"
    pub field: String,
    pub label: String,
    /// Body-site icon
    pub icon: String,
    #[schema(example = "mmHg")]
    pub unit: String,
    pub placeholder: String,
}

/// One row of the classification legend
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RiskBandResponse {
    /// Lower edge of the band, absent when unbounded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    pub min_inclusive: bool,

    /// Upper edge of the band, absent when unbounded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub max_inclusive: bool,

    #[serde(flatten)]
    pub interpretation: RiskInterpretation,
}

fn raw_input<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(text)) => text,
        Some(serde_json::Value::Number(number)) => number.to_string(),
        Some(other) => other.to_string(),
    })
}
