//! Calendar availability and slot search.

pub mod ports;
pub mod slots;

pub use ports::CalendarGateway;
pub use slots::{SlotEngine, SlotVerdict};
