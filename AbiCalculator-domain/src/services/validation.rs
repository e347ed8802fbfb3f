use thiserror::Error;
use tracing::debug;
use validator::Validate;

use crate::entities::abi::{MeasurementField, MeasurementSet, RawMeasurements};

/// The only message a user ever sees for bad input
pub const INVALID_MEASUREMENTS_MESSAGE: &str =
    "Please enter valid positive numeric values for all measurements.";

/// Input validation failure
///
/// Carries no per-field detail: any missing, non-numeric or non-positive
/// input produces the same message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", INVALID_MEASUREMENTS_MESSAGE)]
pub struct ValidationError;

/// Parse one raw input as a finite, strictly positive number
pub fn parse_measurement(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Some(value),
        _ => None,
    }
}

/// Field-level check used by the `RawMeasurements` derive
pub fn validate_positive_measurement(raw: &str) -> Result<(), validator::ValidationError> {
    match parse_measurement(raw) {
        Some(_) => Ok(()),
        None => {
            let mut error = validator::ValidationError::new("positive_number");
            error.message = Some(INVALID_MEASUREMENTS_MESSAGE.into());
            Err(error)
        }
    }
}

/// Validate all four inputs and convert them to numbers
pub fn validate_measurements(raw: &RawMeasurements) -> Result<MeasurementSet, ValidationError> {
    if let Err(errors) = raw.validate() {
        let fields: Vec<&str> = errors.field_errors().keys().copied().collect();
        debug!(?fields, "Rejected ABI measurements");
        return Err(ValidationError);
    }

    let value = |field: MeasurementField| parse_measurement(raw.get(field)).ok_or(ValidationError);

    Ok(MeasurementSet::from_validated(
        value(MeasurementField::RightAnkleSystolic)?,
        value(MeasurementField::LeftAnkleSystolic)?,
        value(MeasurementField::RightArmSystolic)?,
        value(MeasurementField::LeftArmSystolic)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> RawMeasurements {
        RawMeasurements::new("120", "110", "130", "120")
    }

    #[test]
    fn test_valid_measurements_are_parsed() {
        let set = validate_measurements(&valid()).unwrap();
        assert_eq!(set.right_ankle_systolic(), 120.0);
        assert_eq!(set.left_ankle_systolic(), 110.0);
        assert_eq!(set.right_arm_systolic(), 130.0);
        assert_eq!(set.left_arm_systolic(), 120.0);
    }

    #[test]
    fn test_whitespace_and_decimal_forms_are_accepted() {
        let raw = RawMeasurements::new(" 120.5 ", "1.1e2", "130", "120\n");
        let set = validate_measurements(&raw).unwrap();
        assert_eq!(set.right_ankle_systolic(), 120.5);
        assert_eq!(set.left_ankle_systolic(), 110.0);
        assert_eq!(set.left_arm_systolic(), 120.0);
    }

    #[test]
    fn test_each_field_rejects_bad_values() {
        for field in MeasurementField::ALL {
            for bad in ["", "   ", "abc", "0", "-5", "0.0", "inf", "NaN", "12mmHg"] {
                let raw = valid().with_field(field, bad);
                let result = validate_measurements(&raw);
                assert_eq!(result, Err(ValidationError), "{} = {:?} should be rejected", field, bad);
            }
        }
    }

    #[test]
    fn test_error_message_is_fixed() {
        let raw = RawMeasurements::new("", "x", "0", "-1");
        let error = validate_measurements(&raw).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Please enter valid positive numeric values for all measurements."
        );
    }

    #[test]
    fn test_zero_arm_pressure_is_rejected() {
        let raw = valid().with_field(MeasurementField::RightArmSystolic, "0");
        assert!(validate_measurements(&raw).is_err());
    }

    #[test]
    fn test_field_validator_sets_message() {
        let error = validate_positive_measurement("zero").unwrap_err();
        assert_eq!(error.code, "positive_number");
        assert_eq!(error.message.as_deref(), Some(INVALID_MEASUREMENTS_MESSAGE));
        assert!(validate_positive_measurement("0.5").is_ok());
    }
}
