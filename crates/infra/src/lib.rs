//! # Frontdesk Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - Calendar provider adapters (Google Calendar v3)
//! - Call-history persistence (SQLite, hosted REST table)
//! - Telephony helpers (caller identification)
//! - Configuration loading (environment and files)
//!
//! ## Architecture
//! - Implements traits defined in `frontdesk-core`
//! - Depends on `frontdesk-domain` and `frontdesk-core`
//! - Contains all "impure" code (I/O, external services)

pub mod calendar;
pub mod config;
pub mod errors;
pub mod history;
pub mod telephony;

// Re-export commonly used items
pub use calendar::{AccessTokenProvider, GoogleCalendarGateway, StaticTokenProvider};
pub use errors::InfraError;
pub use history::{RestCallHistory, SqliteCallHistory};
pub use telephony::extract_caller;
