//! Shared test helpers for `frontdesk-core` integration tests.
//!
//! In-memory, call-counting stubs for the calendar, history, and transport
//! ports, plus a standard test configuration (Mon-Fri 9-17, Eastern time).

#![allow(dead_code)]

pub mod calendar;
pub mod session;

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::America::New_York;
use frontdesk_domain::{
    BusinessHoursPolicy, BusinessInfo, CallTimeouts, Config, SchedulingConfig,
};

/// Mon-Fri 9-17 Eastern, 60 minute meetings, 14 day horizon, instant
/// timeouts so tests never sleep.
pub fn test_config() -> Config {
    Config {
        business: BusinessInfo {
            name: "Acme Legal".to_string(),
            hours_display: "Mon-Fri 9AM-5PM".to_string(),
            phone: "+12125550100".to_string(),
        },
        hours: BusinessHoursPolicy::weekdays_nine_to_five(),
        scheduling: SchedulingConfig::new("primary", New_York),
        timeouts: CallTimeouts { dial_secs: 1, participant_join_secs: 1, voicemail_grace_secs: 0 },
    }
}

/// An instant at local Eastern wall-clock time on the given date.
pub fn eastern(y: i32, m: u32, d: u32, hour: u32, min: u32) -> DateTime<Utc> {
    New_York.with_ymd_and_hms(y, m, d, hour, min, 0).unwrap().with_timezone(&Utc)
}
