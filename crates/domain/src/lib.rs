//! # Frontdesk Domain
//!
//! Business domain types and models for Frontdesk.
//!
//! This crate contains:
//! - Domain data types (TimeSlot, AppointmentRequest, CallRecord, ...)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other Frontdesk crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
