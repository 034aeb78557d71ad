//! Slot-search engine
//!
//! Pure scheduling logic over a [`CalendarGateway`]: availability checks
//! under the business-hours policy and a deterministic forward scan for the
//! next open slots. Remote calls are batched one per scanned day so the scan
//! costs at most `search_horizon_days` calendar queries.

use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc, Weekday};
use frontdesk_domain::{BusinessHoursPolicy, Result, SchedulingConfig, TimeSlot};
use tracing::debug;

use super::ports::CalendarGateway;

/// Why a candidate slot is or is not offerable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotVerdict {
    /// The business is closed that weekday; decided without a calendar query.
    ClosedDay(Weekday),
    /// Start or end falls outside the open hours; decided without a query.
    OutsideHours,
    /// An existing booking overlaps the candidate interval.
    Busy,
    Free,
}

/// Conflict-free slot search under a business-hours policy.
pub struct SlotEngine {
    gateway: Arc<dyn CalendarGateway>,
    policy: BusinessHoursPolicy,
    scheduling: SchedulingConfig,
}

impl SlotEngine {
    pub fn new(
        gateway: Arc<dyn CalendarGateway>,
        policy: BusinessHoursPolicy,
        scheduling: SchedulingConfig,
    ) -> Self {
        Self { gateway, policy, scheduling }
    }

    pub fn policy(&self) -> &BusinessHoursPolicy {
        &self.policy
    }

    /// Classify a candidate slot. Closed days and out-of-hours candidates
    /// are rejected locally; only in-hours candidates cost a calendar query.
    ///
    /// Overlap uses the half-open interval rule: a booking ending exactly at
    /// the candidate's start does not conflict.
    pub async fn check(&self, candidate: &TimeSlot) -> Result<SlotVerdict> {
        let tz = self.scheduling.timezone;
        let local_start = candidate.start.with_timezone(&tz);
        let day = local_start.date_naive();

        if !self.policy.is_open_day(local_start.weekday()) {
            return Ok(SlotVerdict::ClosedDay(local_start.weekday()));
        }

        let (Some(day_open), Some(day_close)) = (
            self.local_instant(day, self.policy.open_hour),
            self.local_instant(day, self.policy.close_hour),
        ) else {
            // DST gap swallowed the boundary hour; nothing offerable that day.
            return Ok(SlotVerdict::OutsideHours);
        };

        if candidate.start < day_open || candidate.start >= day_close || candidate.end > day_close
        {
            return Ok(SlotVerdict::OutsideHours);
        }

        let busy = self
            .gateway
            .list_busy(&self.scheduling.calendar_id, candidate.start, candidate.end)
            .await?;

        if busy.iter().any(|slot| slot.conflicts_with(candidate)) {
            Ok(SlotVerdict::Busy)
        } else {
            Ok(SlotVerdict::Free)
        }
    }

    /// True iff the candidate is inside business hours and conflict-free.
    pub async fn is_free(&self, candidate: &TimeSlot) -> Result<bool> {
        Ok(matches!(self.check(candidate).await?, SlotVerdict::Free))
    }

    /// Find up to `count` whole-hour slots of the policy's default duration,
    /// strictly after `from`, scanning day by day within the configured
    /// horizon. One `list_busy` call per open day; candidates are
    /// intersected locally against that day's busy list.
    ///
    /// A short or empty result means the horizon was exhausted first; that
    /// is not an error.
    pub async fn find_next_slots(
        &self,
        from: DateTime<Utc>,
        count: usize,
    ) -> Result<Vec<TimeSlot>> {
        let mut slots = Vec::with_capacity(count);
        if count == 0 {
            return Ok(slots);
        }

        let tz = self.scheduling.timezone;
        let duration = self.policy.default_duration();
        let mut day = from.with_timezone(&tz).date_naive();

        for _ in 0..self.scheduling.search_horizon_days {
            if slots.len() >= count {
                break;
            }
            if self.policy.is_open_day(day.weekday()) {
                let bounds = (
                    self.local_instant(day, self.policy.open_hour),
                    self.local_instant(day, self.policy.close_hour),
                );
                if let (Some(day_open), Some(day_close)) = bounds {
                    let busy = self
                        .gateway
                        .list_busy(&self.scheduling.calendar_id, day_open, day_close)
                        .await?;
                    debug!(
                        day = %day,
                        busy = busy.len(),
                        collected = slots.len(),
                        "scanned day for open slots"
                    );

                    for hour in self.policy.open_hour..self.policy.close_hour {
                        let Some(start) = self.local_instant(day, hour) else {
                            continue;
                        };
                        // Never offer a past or equal-to-now slot.
                        if start <= from {
                            continue;
                        }
                        let end = start + duration;
                        if end > day_close {
                            break;
                        }
                        let candidate = TimeSlot { start, end, tz };
                        if !busy.iter().any(|slot| slot.conflicts_with(&candidate)) {
                            slots.push(candidate);
                            if slots.len() >= count {
                                break;
                            }
                        }
                    }
                }
            }
            let Some(next) = day.succ_opt() else {
                break;
            };
            day = next;
        }

        Ok(slots)
    }

    /// Resolve a local wall-clock hour on `day` to a UTC instant. `hour` may
    /// be 24 to mean midnight of the following day (an exclusive close).
    /// Returns `None` when a DST gap removes the hour.
    fn local_instant(&self, day: NaiveDate, hour: u32) -> Option<DateTime<Utc>> {
        let (day, hour) = if hour >= 24 { (day.succ_opt()?, hour - 24) } else { (day, hour) };
        let naive = day.and_hms_opt(hour, 0, 0)?;
        self.scheduling
            .timezone
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
    }
}
