//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Call-history recording
pub const NOTES_SEPARATOR: &str = "; ";
pub const EMPTY_NOTES_PLACEHOLDER: &str = "No specific notes";

// Fixed reminder policy applied to every created calendar event. Design
// constant, not configurable.
pub const REMINDER_EMAIL_MINUTES: i64 = 24 * 60;
pub const REMINDER_POPUP_MINUTES: i64 = 30;

// Call lifecycle timeout defaults (seconds)
pub const DEFAULT_DIAL_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_PARTICIPANT_JOIN_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_VOICEMAIL_GRACE_SECS: u64 = 2;

// Scheduling defaults
pub const DEFAULT_MEETING_DURATION_MINS: i64 = 60;
pub const DEFAULT_SEARCH_HORIZON_DAYS: u32 = 14;
pub const DEFAULT_SUGGESTION_COUNT: usize = 3;

// Display format for offering slots to a caller ("Monday, June 2 at 10:00 AM")
pub const SLOT_DISPLAY_FORMAT: &str = "%A, %B %-d at %-I:%M %p";
