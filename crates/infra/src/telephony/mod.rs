//! Telephony-side helpers that sit outside the call session itself.

pub mod caller_id;

pub use caller_id::extract_caller;
