pub mod abi;
pub mod health;
pub mod metadata;

// Re-export handlers for easier imports
pub use abi::{calculate_abi, classify_abi, get_abi_categories, get_measurement_fields};
pub use health::health_check;
pub use metadata::get_metadata;
