use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use crate::services::validation::validate_positive_measurement;

/// Unit every pressure is entered in
pub const MEASUREMENT_UNIT: &str = "mmHg";

/// Shown alongside every set of results
pub const MEDICAL_DISCLAIMER: &str = "This tool provides general health information. \
Always consult healthcare professionals for personalized medical advice.";

/// One of the four systolic pressure inputs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum MeasurementField {
    RightAnkleSystolic,
    LeftAnkleSystolic,
    RightArmSystolic,
    LeftArmSystolic,
}

impl MeasurementField {
    /// All fields in form order
    pub const ALL: [MeasurementField; 4] = [
        MeasurementField::RightAnkleSystolic,
        MeasurementField::LeftAnkleSystolic,
        MeasurementField::RightArmSystolic,
        MeasurementField::LeftArmSystolic,
    ];

    /// Wire name of the field, matching the request body
    pub fn key(&self) -> &'static str {
        match self {
            MeasurementField::RightAnkleSystolic => "right_ankle_systolic",
            MeasurementField::LeftAnkleSystolic => "left_ankle_systolic",
            MeasurementField::RightArmSystolic => "right_arm_systolic",
            MeasurementField::LeftArmSystolic => "left_arm_systolic",
        }
    }

    /// Human readable label shown next to the input
    pub fn label(&self) -> &'static str {
        match self {
            MeasurementField::RightAnkleSystolic => "Right Ankle Systolic Pressure",
            MeasurementField::LeftAnkleSystolic => "Left Ankle Systolic Pressure",
            MeasurementField::RightArmSystolic => "Right Arm Systolic Pressure",
            MeasurementField::LeftArmSystolic => "Left Arm Systolic Pressure",
        }
    }

    /// Icon for the body site being measured
    pub fn icon(&self) -> &'static str {
        match self {
            MeasurementField::RightAnkleSystolic | MeasurementField::LeftAnkleSystolic => "🦵",
            MeasurementField::RightArmSystolic | MeasurementField::LeftArmSystolic => "💪",
        }
    }

    pub fn placeholder(&self) -> String {
        format!("Enter {}", self.label().to_lowercase())
    }
}

impl fmt::Display for MeasurementField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.icon(), self.label(), MEASUREMENT_UNIT)
    }
}

/// The four measurements exactly as they were typed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct RawMeasurements {
    /// Right ankle systolic pressure in mmHg
    #[validate(custom = "validate_positive_measurement")]
    pub right_ankle_systolic: String,

    /// Left ankle systolic pressure in mmHg
    #[validate(custom = "validate_positive_measurement")]
    pub left_ankle_systolic: String,

    /// Right arm systolic pressure in mmHg
    #[validate(custom = "validate_positive_measurement")]
    pub right_arm_systolic: String,

    /// Left arm systolic pressure in mmHg
    #[validate(custom = "validate_positive_measurement")]
    pub left_arm_systolic: String,
}

impl RawMeasurements {
    pub fn new(
        right_ankle_systolic: impl Into<String>,
        left_ankle_systolic: impl Into<String>,
        right_arm_systolic: impl Into<String>,
        left_arm_systolic: impl Into<String>,
    ) -> Self {
        Self {
            right_ankle_systolic: right_ankle_systolic.into(),
            left_ankle_systolic: left_ankle_systolic.into(),
            right_arm_systolic: right_arm_systolic.into(),
            left_arm_systolic: left_arm_systolic.into(),
        }
    }

    pub fn get(&self, field: MeasurementField) -> &str {
        match field {
            MeasurementField::RightAnkleSystolic => &self.right_ankle_systolic,
            MeasurementField::LeftAnkleSystolic => &self.left_ankle_systolic,
            MeasurementField::RightArmSystolic => &self.right_arm_systolic,
            MeasurementField::LeftArmSystolic => &self.left_arm_systolic,
        }
    }

    /// Return a copy with one field replaced
    pub fn with_field(&self, field: MeasurementField, value: impl Into<String>) -> Self {
        let mut updated = self.clone();
        let slot = match field {
            MeasurementField::RightAnkleSystolic => &mut updated.right_ankle_systolic,
            MeasurementField::LeftAnkleSystolic => &mut updated.left_ankle_systolic,
            MeasurementField::RightArmSystolic => &mut updated.right_arm_systolic,
            MeasurementField::LeftArmSystolic => &mut updated.left_arm_systolic,
        };
        *slot = value.into();
        updated
    }
}

/// Validated systolic pressures, all finite and strictly positive
///
/// Only the validator constructs this type, so every division by an arm
/// pressure is safe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct MeasurementSet {
    right_ankle_systolic: f64,
    left_ankle_systolic: f64,
    right_arm_systolic: f64,
    left_arm_systolic: f64,
}

impl MeasurementSet {
    pub(crate) fn from_validated(
        right_ankle_systolic: f64,
        left_ankle_systolic: f64,
        right_arm_systolic: f64,
        left_arm_systolic: f64,
    ) -> Self {
        Self {
            right_ankle_systolic,
            left_ankle_systolic,
            right_arm_systolic,
            left_arm_systolic,
        }
    }

    pub fn right_ankle_systolic(&self) -> f64 {
        self.right_ankle_systolic
    }

    pub fn left_ankle_systolic(&self) -> f64 {
        self.left_ankle_systolic
    }

    pub fn right_arm_systolic(&self) -> f64 {
        self.right_arm_systolic
    }

    pub fn left_arm_systolic(&self) -> f64 {
        self.left_arm_systolic
    }
}

/// Unrounded ankle/arm ratios for one calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct AbiRatios {
    pub right: f64,
    pub left: f64,
    /// Mean of the unrounded right and left ratios
    pub average: f64,
}

/// Which of the three results a reading belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum AbiSide {
    Right,
    Left,
    Average,
}

impl AbiSide {
    pub fn label(&self) -> &'static str {
        match self {
            AbiSide::Right => "Right ABI",
            AbiSide::Left => "Left ABI",
            AbiSide::Average => "Average ABI",
        }
    }
}

/// Clinical risk level attached to an ABI category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum RiskLevel {
    Low,
    Moderate,
    #[serde(rename = "Moderate to High")]
    ModerateToHigh,
    High,
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::ModerateToHigh => "Moderate to High",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        };
        f.write_str(label)
    }
}

/// ABI category based on the ankle/arm ratio
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum AbiCategory {
    /// Ratio above 1.4, vessels too stiff to compress
    #[serde(rename = "Calcified Vessels")]
    CalcifiedVessels,

    /// Ratio between 1.0 and 1.4 inclusive
    #[serde(rename = "Normal Circulation")]
    NormalCirculation,

    /// Ratio from 0.91 up to but excluding 1.0
    Borderline,

    /// Ratio between 0.61 and 0.90 inclusive
    #[serde(rename = "Mild PAD")]
    MildPad,

    /// Ratio of 0.60 or below
    #[serde(rename = "Severe PAD")]
    SeverePad,
}

impl AbiCategory {
    pub fn label(&self) -> &'static str {
        match self {
            AbiCategory::CalcifiedVessels => "Calcified Vessels",
            AbiCategory::NormalCirculation => "Normal Circulation",
            AbiCategory::Borderline => "Borderline",
            AbiCategory::MildPad => "Mild PAD",
            AbiCategory::SeverePad => "Severe PAD",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AbiCategory::CalcifiedVessels => {
                "Potential arterial calcification. Requires immediate medical attention."
            }
            AbiCategory::NormalCirculation => "Ankle-Brachial Index indicates healthy blood flow.",
            AbiCategory::Borderline => {
                "Mild reduction in blood flow. Monitor and consult healthcare provider."
            }
            AbiCategory::MildPad => {
                "Early signs of Peripheral Artery Disease. Recommend medical evaluation."
            }
            AbiCategory::SeverePad => {
                "Significant arterial blockage. Urgent medical intervention required."
            }
        }
    }

    pub fn risk_level(&self) -> RiskLevel {
        match self {
            AbiCategory::CalcifiedVessels => RiskLevel::High,
            AbiCategory::NormalCirculation => RiskLevel::Low,
            AbiCategory::Borderline => RiskLevel::Moderate,
            AbiCategory::MildPad => RiskLevel::ModerateToHigh,
            AbiCategory::SeverePad => RiskLevel::Critical,
        }
    }

    /// Display emphasis from 1 (normal) to 5 (critical)
    pub fn severity(&self) -> u8 {
        match self {
            AbiCategory::NormalCirculation => 1,
            AbiCategory::Borderline => 2,
            AbiCategory::MildPad => 3,
            AbiCategory::CalcifiedVessels => 4,
            AbiCategory::SeverePad => 5,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            AbiCategory::CalcifiedVessels => "#ff4757",
            AbiCategory::NormalCirculation => "#2ecc71",
            AbiCategory::Borderline => "#f39c12",
            AbiCategory::MildPad => "#e67e22",
            AbiCategory::SeverePad => "#c0392b",
        }
    }

    pub fn gradient(&self) -> &'static str {
        match self {
            AbiCategory::CalcifiedVessels => "linear-gradient(135deg, #ff4757, #ff6b6b)",
            AbiCategory::NormalCirculation => "linear-gradient(135deg, #2ecc71, #27ae60)",
            AbiCategory::Borderline => "linear-gradient(135deg, #f39c12, #d35400)",
            AbiCategory::MildPad => "linear-gradient(135deg, #e67e22, #d35400)",
            AbiCategory::SeverePad => "linear-gradient(135deg, #c0392b, #e74c3c)",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            AbiCategory::CalcifiedVessels | AbiCategory::SeverePad => "🚨",
            AbiCategory::NormalCirculation => "💚",
            AbiCategory::Borderline => "🟠",
            AbiCategory::MildPad => "🔶",
        }
    }
}

impl fmt::Display for AbiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything the UI needs to present one classified ABI value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct RiskInterpretation {
    pub category: AbiCategory,
    pub description: String,
    pub risk_level: RiskLevel,
    pub severity: u8,
    pub color: String,
    pub gradient: String,
    pub icon: String,
}

impl From<AbiCategory> for RiskInterpretation {
    fn from(category: AbiCategory) -> Self {
        Self {
            category,
            description: category.description().to_string(),
            risk_level: category.risk_level(),
            severity: category.severity(),
            color: category.color().to_string(),
            gradient: category.gradient().to_string(),
            icon: category.icon().to_string(),
        }
    }
}

/// A single ABI value with its display form and interpretation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct AbiReading {
    /// Unrounded ratio, the value that was classified
    pub value: f64,

    /// Ratio rounded to two decimals
    pub display_value: String,

    pub interpretation: RiskInterpretation,
}

/// Right, left and average readings from one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct AbiResults {
    pub right: AbiReading,
    pub left: AbiReading,
    pub average: AbiReading,

    /// When the calculation finished
    pub calculated_at: DateTime<Utc>,
}

impl AbiResults {
    pub fn reading(&self, side: AbiSide) -> &AbiReading {
        match side {
            AbiSide::Right => &self.right,
            AbiSide::Left => &self.left,
            AbiSide::Average => &self.average,
        }
    }
}

/// Format a ratio with exactly two decimals, rounding half away from zero
pub fn format_abi(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{:.2}", rounded)
}
