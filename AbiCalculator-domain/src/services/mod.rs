pub mod abi;
pub mod classifier;
pub mod validation;

// Domain services
// This module contains business logic implementations.

// Re-export service traits and factory functions
pub use abi::{create_default_abi_service, AbiService, AbiServiceError, AbiServiceTrait};
pub use classifier::{classify_abi, risk_bands, ClassificationError, RiskBandSummary};
pub use validation::{validate_measurements, ValidationError, INVALID_MEASUREMENTS_MESSAGE};
