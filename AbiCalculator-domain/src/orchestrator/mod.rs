//! Drives a calculation request through validation, the processing pause
//! and classification, publishing each state transition.
//!
//! A newer request supersedes an older one: the older request's token is
//! cancelled and anything it still reports is discarded by the reducer.

pub mod state;

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::entities::abi::{MeasurementField, RawMeasurements};
use crate::services::abi::AbiServiceTrait;

pub use state::{reduce, CalculationStatus, CalculatorAction, CalculatorState};

/// Pause before results are shown
pub const DEFAULT_CALCULATION_DELAY: Duration = Duration::from_millis(1000);

/// Shared service handle used by the orchestrator
pub type SharedAbiService = Arc<dyn AbiServiceTrait + Send + Sync>;

/// How a `calculate` call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculationOutcome {
    Completed,
    Rejected,
    Failed,
    /// A newer request took over before this one finished
    Superseded,
}

/// Owns the calculator state and runs calculation requests
pub struct CalculationOrchestrator {
    service: SharedAbiService,
    delay: Duration,
    state: watch::Sender<CalculatorState>,
    in_flight: Mutex<Option<(u64, CancellationToken)>>,
}

impl CalculationOrchestrator {
    pub fn new(service: SharedAbiService, delay: Duration) -> Self {
        let (state, _) = watch::channel(CalculatorState::default());
        Self {
            service,
            delay,
            state,
            in_flight: Mutex::new(None),
        }
    }

    /// Start from a set of raw measurements
    pub fn with_measurements(mut self, measurements: RawMeasurements) -> Self {
        let (state, _) = watch::channel(CalculatorState::new(measurements));
        self.state = state;
        self
    }

    /// Current state snapshot
    pub fn state(&self) -> CalculatorState {
        self.state.borrow().clone()
    }

    /// Receive every state transition
    pub fn subscribe(&self) -> watch::Receiver<CalculatorState> {
        self.state.subscribe()
    }

    /// Apply an action through the reducer and publish the new state
    pub fn dispatch(&self, action: CalculatorAction) {
        self.state.send_modify(|current| *current = reduce(current, action));
    }

    pub fn update_measurement(&self, field: MeasurementField, value: impl Into<String>) {
        self.dispatch(CalculatorAction::UpdateMeasurement {
            field,
            value: value.into(),
        });
    }

    /// Clear the form and drop any in-flight request
    pub fn reset(&self) {
        self.cancel_in_flight();
        self.dispatch(CalculatorAction::Reset);
    }

    fn cancel_in_flight(&self) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((_, token)) = in_flight.take() {
            token.cancel();
        }
    }

    /// Submit a new request, cancelling whichever one was in flight
    fn begin_request(&self) -> (u64, RawMeasurements, CancellationToken) {
        let token = CancellationToken::new();
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);

        self.dispatch(CalculatorAction::Submit);
        let (generation, measurements) = {
            let current = self.state.borrow();
            (current.generation, current.measurements.clone())
        };

        if let Some((previous_generation, previous)) = in_flight.replace((generation, token.clone())) {
            debug!(previous_generation, generation, "Superseding in-flight ABI calculation");
            previous.cancel();
        }
        (generation, measurements, token)
    }

    fn finish_request(&self, generation: u64) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(in_flight.as_ref(), Some((current, _)) if *current == generation) {
            in_flight.take();
        }
    }

    /// Run one calculation over the current measurements
    pub async fn calculate(&self) -> CalculationOutcome {
        let (generation, measurements, token) = self.begin_request();

        let validated = match self.service.validate_measurements(&measurements) {
            Ok(validated) => validated,
            Err(e) => {
                info!("ABI measurements rejected");
                self.dispatch(CalculatorAction::ValidationFailed {
                    generation,
                    message: e.to_string(),
                });
                self.finish_request(generation);
                return CalculationOutcome::Rejected;
            }
        };
        self.dispatch(CalculatorAction::ValidationPassed { generation });

        tokio::select! {
            _ = token.cancelled() => {
                debug!(generation, "ABI calculation superseded during processing pause");
                return CalculationOutcome::Superseded;
            }
            _ = tokio::time::sleep(self.delay) => {}
        }

        let outcome = match self.service.calculate(&validated) {
            Ok(result) => {
                self.dispatch(CalculatorAction::Completed { generation, result });
                CalculationOutcome::Completed
            }
            Err(e) => {
                warn!("ABI calculation failed: {}", e);
                self.dispatch(CalculatorAction::Failed {
                    generation,
                    message: e.to_string(),
                });
                CalculationOutcome::Failed
            }
        };

        self.finish_request(generation);
        if self.state.borrow().generation != generation {
            return CalculationOutcome::Superseded;
        }
        outcome
    }
}
