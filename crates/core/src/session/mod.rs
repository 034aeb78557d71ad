//! Call lifecycle orchestration.

pub mod controller;
mod messages;
pub mod ports;

pub use controller::CallSessionController;
pub use ports::{CallHistorySink, CallTransport, JoinSignal};
