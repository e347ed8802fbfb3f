use chrono::Utc;
use thiserror::Error;
use tracing::{debug, error};

use crate::entities::abi::{
    format_abi, AbiRatios, AbiReading, AbiResults, MeasurementSet, RawMeasurements,
    RiskInterpretation,
};
use crate::services::classifier::{classify_abi, ClassificationError};
use crate::services::validation::{validate_measurements, ValidationError};

/// ABI service errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AbiServiceError {
    /// One or more inputs were missing, non-numeric or not positive
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A ratio fell outside every risk band
    #[error("Internal error: {0}")]
    Classification(#[from] ClassificationError),
}

impl AbiServiceError {
    pub fn is_validation(&self) -> bool {
        matches!(self, AbiServiceError::Validation(_))
    }
}

/// Trait for ABI service operations
#[cfg_attr(test, mockall::automock)]
pub trait AbiServiceTrait {
    /// Validate the raw inputs and convert them to numbers
    fn validate_measurements(
        &self,
        raw: &RawMeasurements,
    ) -> Result<MeasurementSet, AbiServiceError>;

    /// Compute the unrounded right, left and average ratios
    fn compute_ratios(&self, measurements: &MeasurementSet) -> AbiRatios;

    /// Map a single unrounded ratio to its risk interpretation
    fn classify(&self, value: f64) -> Result<RiskInterpretation, AbiServiceError>;

    /// Compute and classify all three ratios
    fn calculate(&self, measurements: &MeasurementSet) -> Result<AbiResults, AbiServiceError>;
}

/// Default ABI service
#[derive(Debug, Clone, Copy, Default)]
pub struct AbiService;

impl AbiService {
    pub fn new() -> Self {
        Self
    }

    fn reading(&self, value: f64) -> Result<AbiReading, AbiServiceError> {
        // Classify the unrounded value; rounding is for display only
        let interpretation = self.classify(value)?;
        Ok(AbiReading {
            value,
            display_value: format_abi(value),
            interpretation,
        })
    }
}

impl AbiServiceTrait for AbiService {
    fn validate_measurements(
        &self,
        raw: &RawMeasurements,
    ) -> Result<MeasurementSet, AbiServiceError> {
        Ok(validate_measurements(raw)?)
    }

    fn compute_ratios(&self, measurements: &MeasurementSet) -> AbiRatios {
        let right = measurements.right_ankle_systolic() / measurements.right_arm_systolic();
        let left = measurements.left_ankle_systolic() / measurements.left_arm_systolic();

        AbiRatios {
            right,
            left,
            average: (right + left) / 2.0,
        }
    }

    fn classify(&self, value: f64) -> Result<RiskInterpretation, AbiServiceError> {
        classify_abi(value).map_err(|e| {
            error!("ABI classification failed: {}", e);
            AbiServiceError::from(e)
        })
    }

    fn calculate(&self, measurements: &MeasurementSet) -> Result<AbiResults, AbiServiceError> {
        let ratios = self.compute_ratios(measurements);
        debug!(
            right = ratios.right,
            left = ratios.left,
            average = ratios.average,
            "Computed ABI ratios"
        );

        Ok(AbiResults {
            right: self.reading(ratios.right)?,
            left: self.reading(ratios.left)?,
            average: self.reading(ratios.average)?,
            calculated_at: Utc::now(),
        })
    }
}

/// Create the default ABI service
pub fn create_default_abi_service() -> impl AbiServiceTrait + Send + Sync {
    AbiService::new()
}
