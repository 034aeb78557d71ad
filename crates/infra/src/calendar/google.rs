//! Google Calendar gateway implementation
//!
//! Pure transport shim over the Calendar v3 REST API: list busy intervals in
//! a range, insert an event. Business hours and conflict interpretation stay
//! in the core crate. No caching; every call is a live query.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use frontdesk_core::CalendarGateway;
use frontdesk_domain::constants::{REMINDER_EMAIL_MINUTES, REMINDER_POPUP_MINUTES};
use frontdesk_domain::{EventId, FrontdeskError, Result, TimeSlot};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::token::AccessTokenProvider;

const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Google Calendar implementation of the calendar gateway port.
pub struct GoogleCalendarGateway {
    client: Client,
    base_url: String,
    tokens: Arc<dyn AccessTokenProvider>,
    /// Display timezone attached to returned slots and used for event bodies.
    tz: Tz,
}

impl GoogleCalendarGateway {
    pub fn new(tokens: Arc<dyn AccessTokenProvider>, tz: Tz) -> Self {
        Self::with_base_url(tokens, tz, GOOGLE_CALENDAR_API_BASE)
    }

    /// Point the gateway at a different API root (tests, proxies).
    pub fn with_base_url(
        tokens: Arc<dyn AccessTokenProvider>,
        tz: Tz,
        base_url: impl Into<String>,
    ) -> Self {
        Self { client: Client::new(), base_url: base_url.into(), tokens, tz }
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!("{}/calendars/{}/events", self.base_url, calendar_id)
    }

    /// Resolve one API-side event time (timed or all-day) to a UTC instant.
    /// All-day dates are day boundaries in the configured timezone.
    fn resolve_time(&self, when: &EventDateTime) -> Option<DateTime<Utc>> {
        if let Some(date_time) = &when.date_time {
            return DateTime::parse_from_rfc3339(date_time)
                .ok()
                .map(|parsed| parsed.with_timezone(&Utc));
        }
        let date: NaiveDate = when.date.as_deref()?.parse().ok()?;
        self.tz
            .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
    }
}

#[async_trait]
impl CalendarGateway for GoogleCalendarGateway {
    #[instrument(skip(self), fields(calendar_id))]
    async fn list_busy(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TimeSlot>> {
        if start >= end {
            return Err(FrontdeskError::InvalidRange(format!(
                "query start {start} must be before end {end}"
            )));
        }

        let access_token = self.tokens.access_token().await?;
        let response = self
            .client
            .get(self.events_url(calendar_id))
            .bearer_auth(access_token)
            .query(&[
                ("timeMin", start.to_rfc3339()),
                ("timeMax", end.to_rfc3339()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                FrontdeskError::CalendarUnavailable(format!("calendar request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| "unknown error".into());
            return Err(FrontdeskError::CalendarUnavailable(format!(
                "calendar API error ({status}): {error_text}"
            )));
        }

        let events: GoogleEventsResponse = response.json().await.map_err(|e| {
            FrontdeskError::CalendarUnavailable(format!("failed to parse calendar response: {e}"))
        })?;

        let mut busy = Vec::with_capacity(events.items.len());
        for event in &events.items {
            // Transparent events don't block time.
            if event.transparency.as_deref() == Some("transparent") {
                continue;
            }
            let (Some(start), Some(end)) =
                (self.resolve_time(&event.start), self.resolve_time(&event.end))
            else {
                warn!(event = %event.id, "skipping event with unparseable times");
                continue;
            };
            if start < end {
                busy.push(TimeSlot { start, end, tz: self.tz });
            }
        }
        busy.sort_by_key(|slot| slot.start);

        debug!(calendar_id, busy = busy.len(), "listed busy intervals");
        Ok(busy)
    }

    #[instrument(skip(self, summary, description), fields(calendar_id))]
    async fn create_event(
        &self,
        calendar_id: &str,
        slot: &TimeSlot,
        summary: &str,
        description: &str,
    ) -> Result<EventId> {
        let access_token = self.tokens.access_token().await?;
        let body = InsertEventRequest {
            summary,
            description,
            start: EventTime {
                date_time: slot.start.with_timezone(&self.tz).to_rfc3339(),
                time_zone: self.tz.name().to_string(),
            },
            end: EventTime {
                date_time: slot.end.with_timezone(&self.tz).to_rfc3339(),
                time_zone: self.tz.name().to_string(),
            },
            reminders: Reminders {
                use_default: false,
                overrides: vec![
                    ReminderOverride { method: "email", minutes: REMINDER_EMAIL_MINUTES },
                    ReminderOverride { method: "popup", minutes: REMINDER_POPUP_MINUTES },
                ],
            },
        };

        let response = self
            .client
            .post(self.events_url(calendar_id))
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                FrontdeskError::CalendarUnavailable(format!("calendar request failed: {e}"))
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let error_text = response.text().await.unwrap_or_else(|_| "unknown error".into());
            return Err(FrontdeskError::CalendarWriteRejected(format!(
                "calendar rejected the event ({status}): {error_text}"
            )));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "unknown error".into());
            return Err(FrontdeskError::CalendarUnavailable(format!(
                "calendar API error ({status}): {error_text}"
            )));
        }

        let created: InsertEventResponse = response.json().await.map_err(|e| {
            FrontdeskError::CalendarUnavailable(format!("failed to parse insert response: {e}"))
        })?;
        debug!(calendar_id, event = %created.id, "calendar event created");
        Ok(EventId(created.id))
    }
}

#[derive(Debug, Serialize)]
struct InsertEventRequest<'a> {
    summary: &'a str,
    description: &'a str,
    start: EventTime,
    end: EventTime,
    reminders: Reminders,
}

#[derive(Debug, Serialize)]
struct EventTime {
    #[serde(rename = "dateTime")]
    date_time: String,
    #[serde(rename = "timeZone")]
    time_zone: String,
}

#[derive(Debug, Serialize)]
struct Reminders {
    #[serde(rename = "useDefault")]
    use_default: bool,
    overrides: Vec<ReminderOverride>,
}

#[derive(Debug, Serialize)]
struct ReminderOverride {
    method: &'static str,
    minutes: i64,
}

#[derive(Debug, Deserialize)]
struct InsertEventResponse {
    id: String,
}

#[derive(Debug, Deserialize, Default)]
struct GoogleEventsResponse {
    #[serde(default)]
    items: Vec<GoogleCalendarEvent>,
}

#[derive(Debug, Deserialize)]
struct GoogleCalendarEvent {
    #[serde(default)]
    id: String,
    start: EventDateTime,
    end: EventDateTime,
    transparency: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventDateTime {
    #[serde(rename = "dateTime")]
    date_time: Option<String>,
    date: Option<String>,
}
