//! Calendar provider adapters.

pub mod google;
pub mod token;

pub use google::GoogleCalendarGateway;
pub use token::{AccessTokenProvider, StaticTokenProvider};
