//! Calculator state and the pure transition function that drives it.

use serde::Serialize;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use crate::entities::abi::{AbiResults, MeasurementField, RawMeasurements};

/// Where the calculator is in its request cycle
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum CalculationStatus {
    #[default]
    Idle,
    Validating,
    Computing,
    Done,
}

/// Immutable snapshot of everything the calculator shows
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CalculatorState {
    pub measurements: RawMeasurements,
    pub status: CalculationStatus,
    pub error: Option<String>,
    pub result: Option<AbiResults>,

    /// Incremented on every submit; completions for older generations are dropped
    pub generation: u64,
}

impl CalculatorState {
    pub fn new(measurements: RawMeasurements) -> Self {
        Self {
            measurements,
            ..Self::default()
        }
    }

    /// True while a submitted request has not finished
    pub fn is_busy(&self) -> bool {
        matches!(
            self.status,
            CalculationStatus::Validating | CalculationStatus::Computing
        )
    }
}

/// Events that move the calculator between states
#[derive(Debug, Clone, PartialEq)]
pub enum CalculatorAction {
    UpdateMeasurement {
        field: MeasurementField,
        value: String,
    },
    /// Start a new request, superseding any in-flight one
    Submit,
    ValidationFailed {
        generation: u64,
        message: String,
    },
    ValidationPassed {
        generation: u64,
    },
    Completed {
        generation: u64,
        result: AbiResults,
    },
    Failed {
        generation: u64,
        message: String,
    },
    Reset,
}

/// Apply an action to a state, producing the next state
///
/// Actions tagged with a generation other than the current one belong to a
/// superseded request and leave the state untouched.
pub fn reduce(state: &CalculatorState, action: CalculatorAction) -> CalculatorState {
    match action {
        CalculatorAction::UpdateMeasurement { field, value } => CalculatorState {
            measurements: state.measurements.with_field(field, value),
            ..state.clone()
        },
        CalculatorAction::Submit => CalculatorState {
            status: CalculationStatus::Validating,
            error: None,
            result: None,
            generation: state.generation + 1,
            ..state.clone()
        },
        CalculatorAction::ValidationFailed {
            generation,
            message,
        } if generation == state.generation => CalculatorState {
            status: CalculationStatus::Idle,
            error: Some(message),
            ..state.clone()
        },
        CalculatorAction::ValidationPassed { generation } if generation == state.generation => {
            CalculatorState {
                status: CalculationStatus::Computing,
                ..state.clone()
            }
        }
        CalculatorAction::Completed { generation, result } if generation == state.generation => {
            CalculatorState {
                status: CalculationStatus::Done,
                result: Some(result),
                ..state.clone()
            }
        }
        CalculatorAction::Failed {
            generation,
            message,
        } if generation == state.generation => CalculatorState {
            status: CalculationStatus::Idle,
            error: Some(message),
            ..state.clone()
        },
        CalculatorAction::Reset => CalculatorState {
            generation: state.generation + 1,
            ..CalculatorState::default()
        },
        // Stale completion from a superseded request
        _ => state.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::abi::{AbiService, AbiServiceTrait};

    fn sample_result() -> AbiResults {
        let service = AbiService::new();
        let set = service
            .validate_measurements(&RawMeasurements::new("120", "110", "130", "120"))
            .unwrap();
        service.calculate(&set).unwrap()
    }

    #[test]
    fn test_update_measurement_changes_one_field() {
        let state = CalculatorState::default();
        let next = reduce(
            &state,
            CalculatorAction::UpdateMeasurement {
                field: MeasurementField::RightArmSystolic,
                value: "130".to_string(),
            },
        );

        assert_eq!(next.measurements.right_arm_systolic, "130");
        assert_eq!(next.measurements.left_arm_systolic, "");
        assert_eq!(next.status, CalculationStatus::Idle);
        assert_eq!(state.measurements.right_arm_systolic, "");
    }

    #[test]
    fn test_submit_clears_previous_error_and_result() {
        let state = CalculatorState {
            error: Some("old error".to_string()),
            result: Some(sample_result()),
            status: CalculationStatus::Done,
            generation: 3,
            ..CalculatorState::default()
        };

        let next = reduce(&state, CalculatorAction::Submit);
        assert_eq!(next.status, CalculationStatus::Validating);
        assert!(next.error.is_none());
        assert!(next.result.is_none());
        assert_eq!(next.generation, 4);
        assert!(next.is_busy());
    }

    #[test]
    fn test_happy_path_transitions() {
        let state = reduce(&CalculatorState::default(), CalculatorAction::Submit);
        let generation = state.generation;

        let state = reduce(&state, CalculatorAction::ValidationPassed { generation });
        assert_eq!(state.status, CalculationStatus::Computing);

        let state = reduce(
            &state,
            CalculatorAction::Completed {
                generation,
                result: sample_result(),
            },
        );
        assert_eq!(state.status, CalculationStatus::Done);
        assert!(!state.is_busy());
        assert_eq!(state.result.as_ref().unwrap().average.display_value, "0.92");
    }

    #[test]
    fn test_validation_failure_sets_error_without_result() {
        let state = reduce(&CalculatorState::default(), CalculatorAction::Submit);
        let state = reduce(
            &state,
            CalculatorAction::ValidationFailed {
                generation: state.generation,
                message: "bad input".to_string(),
            },
        );

        assert_eq!(state.status, CalculationStatus::Idle);
        assert_eq!(state.error.as_deref(), Some("bad input"));
        assert!(state.result.is_none());
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let first = reduce(&CalculatorState::default(), CalculatorAction::Submit);
        let stale_generation = first.generation;
        let second = reduce(&first, CalculatorAction::Submit);

        let after = reduce(
            &second,
            CalculatorAction::Completed {
                generation: stale_generation,
                result: sample_result(),
            },
        );

        assert_eq!(after, second);
        assert!(after.result.is_none());
        assert_eq!(after.status, CalculationStatus::Validating);
    }

    #[test]
    fn test_reset_invalidates_in_flight_request() {
        let state = reduce(&CalculatorState::default(), CalculatorAction::Submit);
        let in_flight = state.generation;
        let state = reduce(&state, CalculatorAction::Reset);

        assert_eq!(state.status, CalculationStatus::Idle);
        assert_eq!(state.measurements, RawMeasurements::default());

        let state = reduce(&state, CalculatorAction::ValidationPassed { generation: in_flight });
        assert_eq!(state.status, CalculationStatus::Idle);
    }
}
