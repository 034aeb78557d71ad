use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use frontdesk_core::CalendarGateway;
use frontdesk_domain::{EventId, FrontdeskError, Result as DomainResult, TimeSlot};

/// In-memory stub for `CalendarGateway`.
///
/// Holds a fixed set of busy slots, counts every remote call, and can be
/// mutated mid-test to simulate another booking racing ours.
#[derive(Default)]
pub struct StubCalendarGateway {
    busy: Mutex<Vec<TimeSlot>>,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
    fail_writes: Mutex<bool>,
}

impl StubCalendarGateway {
    pub fn new(busy: Vec<TimeSlot>) -> Arc<Self> {
        Arc::new(Self { busy: Mutex::new(busy), ..Self::default() })
    }

    pub fn free() -> Arc<Self> {
        Self::new(Vec::new())
    }

    /// Simulate a concurrent booking landing on the calendar.
    pub fn add_busy(&self, slot: TimeSlot) {
        self.busy.lock().unwrap().push(slot);
    }

    pub fn reject_writes(&self) {
        *self.fail_writes.lock().unwrap() = true;
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CalendarGateway for StubCalendarGateway {
    async fn list_busy(
        &self,
        _calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<TimeSlot>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if start >= end {
            return Err(FrontdeskError::InvalidRange(format!("{start} >= {end}")));
        }
        let mut intersecting: Vec<TimeSlot> = self
            .busy
            .lock()
            .unwrap()
            .iter()
            .filter(|slot| slot.start < end && start < slot.end)
            .cloned()
            .collect();
        intersecting.sort_by_key(|slot| slot.start);
        Ok(intersecting)
    }

    async fn create_event(
        &self,
        _calendar_id: &str,
        slot: &TimeSlot,
        _summary: &str,
        _description: &str,
    ) -> DomainResult<EventId> {
        if *self.fail_writes.lock().unwrap() {
            return Err(FrontdeskError::CalendarWriteRejected("permission denied".into()));
        }
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.busy.lock().unwrap().push(slot.clone());
        Ok(EventId(format!("evt-{n}")))
    }
}
