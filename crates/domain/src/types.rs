//! Core data types for call scheduling and call-history recording.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{EMPTY_NOTES_PLACEHOLDER, NOTES_SEPARATOR, SLOT_DISPLAY_FORMAT};
use crate::errors::{FrontdeskError, Result};

/// Identifier of an event created on the remote calendar.
///
/// The calendar service owns the event once created; we only hold the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventId(pub String);

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A half-open time interval `[start, end)` in absolute time.
///
/// The timezone label is used only for display formatting; all arithmetic and
/// comparisons happen on the UTC instants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub tz: Tz,
}

impl TimeSlot {
    /// Create a slot, validating that the interval is non-empty.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, tz: Tz) -> Result<Self> {
        if start >= end {
            return Err(FrontdeskError::InvalidRange(format!(
                "slot start {start} must be before end {end}"
            )));
        }
        Ok(Self { start, end, tz })
    }

    /// Create a slot from a start instant and a duration.
    pub fn with_duration(start: DateTime<Utc>, duration: Duration, tz: Tz) -> Result<Self> {
        if duration <= Duration::zero() {
            return Err(FrontdeskError::InvalidInput(format!(
                "slot duration must be positive, got {duration}"
            )));
        }
        Ok(Self { start, end: start + duration, tz })
    }

    /// Half-open overlap test: two slots conflict iff
    /// `start1 < end2 && start2 < end1`. A meeting ending exactly when
    /// another starts is not a conflict.
    pub fn conflicts_with(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Human-presentable start time in the slot's display timezone, e.g.
    /// "Monday, June 2 at 10:00 AM".
    pub fn display_start(&self) -> String {
        self.start.with_timezone(&self.tz).format(SLOT_DISPLAY_FORMAT).to_string()
    }
}

/// Who is on the other end of the call. Resolved by the telephony edge
/// (room-name / SIP metadata extraction) before the session starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    pub phone: Option<String>,
    pub name: Option<String>,
}

/// A single scheduling request produced by the conversation layer.
///
/// Consumed once; if the slot is rejected a new request with an adjusted time
/// must be issued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentRequest {
    pub caller_name: String,
    /// Contact phone; may be absent if caller-ID detection failed.
    pub phone: Option<String>,
    pub start: DateTime<Utc>,
    pub purpose: String,
    /// Explicit duration in minutes; the policy default applies when absent.
    pub duration_mins: Option<i64>,
}

/// Why a call session failed before reaching the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    /// Nobody picked up within the dial timeout.
    NoAnswer,
    /// The enclosing call was abandoned while dialing.
    Abandoned,
    /// The dialer reported a transport-level failure.
    Transport(String),
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoAnswer => f.write_str("no answer"),
            Self::Abandoned => f.write_str("call abandoned"),
            Self::Transport(reason) => write!(f, "transport failure: {reason}"),
        }
    }
}

/// Terminal outcome of a call session. A session reaches exactly one of
/// these, exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallOutcome {
    /// Customer confirmed attendance of the original appointment.
    Confirmed,
    /// A new meeting time was booked during this call.
    Rescheduled,
    /// An answering machine picked up; we hung up without leaving a message.
    VoicemailDetected,
    /// Call completed without a booking.
    Declined,
    Failed(FailureReason),
}

/// Whether this session is answering an inbound call or placing an outbound
/// reminder for a missed appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CallDirection {
    Inbound,
    OutboundReminder {
        /// The originally scheduled (missed) meeting.
        original: TimeSlot,
        purpose: String,
    },
}

impl CallDirection {
    pub fn is_outbound(&self) -> bool {
        matches!(self, Self::OutboundReminder { .. })
    }
}

/// Final snapshot of a call, written at-least-once to the history store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRecord {
    pub phone: Option<String>,
    pub name: Option<String>,
    /// Resulting meeting time: the rescheduled time, the confirmed original,
    /// or `None` for voicemail / declined / failed calls.
    pub meeting_time: Option<DateTime<Utc>>,
    /// Accumulated call notes joined with `"; "`.
    pub notes: String,
}

impl CallRecord {
    /// Build a record from the session's accumulated notes, applying the
    /// fixed separator and the empty-notes placeholder.
    pub fn new(
        phone: Option<String>,
        name: Option<String>,
        meeting_time: Option<DateTime<Utc>>,
        notes: &[String],
    ) -> Self {
        let notes = if notes.is_empty() {
            EMPTY_NOTES_PLACEHOLDER.to_string()
        } else {
            notes.join(NOTES_SEPARATOR)
        };
        Self { phone, name, meeting_time, notes }
    }
}
