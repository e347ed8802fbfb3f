// Public entities for the ABI calculator API
// This module contains data structures that are shared across the application boundary

// Calculation requests and result cards
pub mod abi;

// Common entities for error handling
pub mod common;
