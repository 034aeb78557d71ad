//! Port interfaces for calendar access
//!
//! These traits define the boundary between the slot-search logic and the
//! remote calendar service. Implementations live in the infra crate; tests
//! use in-memory stubs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use frontdesk_domain::{EventId, Result, TimeSlot};

/// Transport shim to the remote calendar service.
///
/// No caching: every call is a live query. The gateway does not interpret
/// business hours or conflicts.
#[async_trait]
pub trait CalendarGateway: Send + Sync {
    /// Busy intervals intersecting `[start, end)`, ascending by start. An
    /// empty result means the range is free.
    ///
    /// # Errors
    /// `InvalidRange` if `start >= end` (checked before any transport),
    /// `CalendarUnavailable` on transport or auth failure.
    async fn list_busy(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TimeSlot>>;

    /// Create an event and return its id. The fixed reminder policy (email
    /// 24h prior, popup 30m prior) is applied by the implementation.
    ///
    /// # Errors
    /// `CalendarUnavailable` or `CalendarWriteRejected`. No implicit retry;
    /// the caller decides.
    async fn create_event(
        &self,
        calendar_id: &str,
        slot: &TimeSlot,
        summary: &str,
        description: &str,
    ) -> Result<EventId>;
}
