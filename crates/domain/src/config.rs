//! Configuration structures
//!
//! All configuration is explicit and passed into services at construction;
//! there is no ambient global state. Loading (environment/file) lives in the
//! infra crate.

use chrono::{Duration, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DIAL_TIMEOUT_SECS, DEFAULT_MEETING_DURATION_MINS,
    DEFAULT_PARTICIPANT_JOIN_TIMEOUT_SECS, DEFAULT_SEARCH_HORIZON_DAYS, DEFAULT_SUGGESTION_COUNT,
    DEFAULT_VOICEMAIL_GRACE_SECS,
};
use crate::errors::{FrontdeskError, Result};

/// Public-facing business identity, used in conversational responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessInfo {
    pub name: String,
    /// Human-readable hours string, e.g. "Mon-Fri 9AM-5PM".
    pub hours_display: String,
    pub phone: String,
}

/// Which weekdays and hours slots may be offered in, local to the single
/// configured business timezone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessHoursPolicy {
    pub open_days: Vec<Weekday>,
    /// First offerable hour (24h, inclusive).
    pub open_hour: u32,
    /// Closing hour (24h, exclusive).
    pub close_hour: u32,
    pub default_duration_mins: i64,
}

impl BusinessHoursPolicy {
    /// Create a policy, validating `open_hour < close_hour` and a positive
    /// default duration.
    pub fn new(
        open_days: Vec<Weekday>,
        open_hour: u32,
        close_hour: u32,
        default_duration_mins: i64,
    ) -> Result<Self> {
        if open_hour >= close_hour || close_hour > 24 {
            return Err(FrontdeskError::InvalidInput(format!(
                "open hour {open_hour} must be before close hour {close_hour} (max 24)"
            )));
        }
        if default_duration_mins <= 0 {
            return Err(FrontdeskError::InvalidInput(format!(
                "default meeting duration must be positive, got {default_duration_mins} minutes"
            )));
        }
        Ok(Self { open_days, open_hour, close_hour, default_duration_mins })
    }

    /// Monday-to-Friday, 9-17, 60 minute meetings.
    pub fn weekdays_nine_to_five() -> Self {
        Self {
            open_days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            open_hour: 9,
            close_hour: 17,
            default_duration_mins: DEFAULT_MEETING_DURATION_MINS,
        }
    }

    pub fn is_open_day(&self, day: Weekday) -> bool {
        self.open_days.contains(&day)
    }

    pub fn default_duration(&self) -> Duration {
        Duration::minutes(self.default_duration_mins)
    }
}

/// Slot-search and calendar parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingConfig {
    pub calendar_id: String,
    pub timezone: Tz,
    /// How many days forward `find_next_slots` scans.
    pub search_horizon_days: u32,
    /// How many alternative slots to offer a caller.
    pub suggestion_count: usize,
}

impl SchedulingConfig {
    pub fn new(calendar_id: impl Into<String>, timezone: Tz) -> Self {
        Self {
            calendar_id: calendar_id.into(),
            timezone,
            search_horizon_days: DEFAULT_SEARCH_HORIZON_DAYS,
            suggestion_count: DEFAULT_SUGGESTION_COUNT,
        }
    }
}

/// Bounded waits in the call lifecycle. All values in seconds; defaults are
/// design constants documented in `constants`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallTimeouts {
    /// How long to wait for the line to be picked up.
    pub dial_secs: u64,
    /// How long to wait for the answered participant to appear in the room.
    pub participant_join_secs: u64,
    /// Pause after pickup so an automated greeting has time to start. Does
    /// not itself decide voicemail; it only delays the first agent action.
    pub voicemail_grace_secs: u64,
}

impl Default for CallTimeouts {
    fn default() -> Self {
        Self {
            dial_secs: DEFAULT_DIAL_TIMEOUT_SECS,
            participant_join_secs: DEFAULT_PARTICIPANT_JOIN_TIMEOUT_SECS,
            voicemail_grace_secs: DEFAULT_VOICEMAIL_GRACE_SECS,
        }
    }
}

impl CallTimeouts {
    pub fn dial(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.dial_secs)
    }

    pub fn participant_join(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.participant_join_secs)
    }

    pub fn voicemail_grace(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.voicemail_grace_secs)
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub business: BusinessInfo,
    pub hours: BusinessHoursPolicy,
    pub scheduling: SchedulingConfig,
    #[serde(default)]
    pub timeouts: CallTimeouts,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_hours() {
        let result = BusinessHoursPolicy::new(vec![Weekday::Mon], 17, 9, 60);
        assert!(matches!(result, Err(FrontdeskError::InvalidInput(_))));
    }

    #[test]
    fn rejects_non_positive_duration() {
        let result = BusinessHoursPolicy::new(vec![Weekday::Mon], 9, 17, 0);
        assert!(matches!(result, Err(FrontdeskError::InvalidInput(_))));
    }

    #[test]
    fn default_policy_is_weekdays() {
        let policy = BusinessHoursPolicy::weekdays_nine_to_five();
        assert!(policy.is_open_day(Weekday::Wed));
        assert!(!policy.is_open_day(Weekday::Sat));
        assert_eq!(policy.default_duration(), Duration::minutes(60));
    }
}
