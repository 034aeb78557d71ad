//! Call-history persistence adapters.

pub mod rest;
pub mod sqlite;

pub use rest::RestCallHistory;
pub use sqlite::{SqliteCallHistory, StoredCall};
