// ABI Calculator Domain
// This crate contains the business logic for the Ankle-Brachial Index calculator

// Services that implement business logic
pub mod services;

// Domain entities
pub mod entities;

// Calculation state machine and request runner
pub mod orchestrator;

// Health checks and system status
pub mod health;
