//! # Frontdesk Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The slot-search engine and the call session controller
//! - Port/adapter interfaces (traits) for the calendar, call history, and
//!   call transport boundaries
//!
//! ## Architecture Principles
//! - Only depends on `frontdesk-domain`
//! - No database, HTTP, or telephony code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod scheduling;
pub mod session;

// Re-export the main service surface
pub use scheduling::{CalendarGateway, SlotEngine, SlotVerdict};
pub use session::{CallHistorySink, CallSessionController, CallTransport, JoinSignal};
