//! Caller-facing response strings.
//!
//! Every controller action answers the conversation layer with one of
//! these. Kept in one place so wording stays consistent across actions.

use frontdesk_domain::{BusinessInfo, FrontdeskError, TimeSlot};

pub(crate) const ALREADY_ENDED: &str = "This call has already ended.";
pub(crate) const NOT_CONNECTED: &str =
    "One moment please, we're still connecting your call.";
pub(crate) const CONNECTED: &str = "Connected.";
pub(crate) const VOICEMAIL_HANGUP: &str = "Voicemail detected - hung up immediately";
pub(crate) const CONFIRMED_GOODBYE: &str = "Great! We look forward to seeing you. Thank you!";
pub(crate) const END_CALL_GOODBYE: &str = "Thank you! Have a great day!";
pub(crate) const NO_PRIOR_MEETING: &str = "I don't have a prior appointment on file for this call.";
pub(crate) const SLOT_JUST_BOOKED: &str =
    "I apologize, but that time slot was just booked. Let me find another available time for you.";

pub(crate) fn greeting(business: &BusinessInfo) -> String {
    format!("Thank you for calling {}, how may I help you today?", business.name)
}

pub(crate) fn business_hours(business: &BusinessInfo) -> String {
    format!(
        "Our business hours are {}. We're happy to schedule a meeting during these times.",
        business.hours_display
    )
}

pub(crate) fn no_answer(dial_secs: u64) -> String {
    format!("The call was not answered within {dial_secs} seconds.")
}

pub(crate) fn closed_day(weekday: chrono::Weekday, business: &BusinessInfo) -> String {
    let day = match weekday {
        chrono::Weekday::Mon => "Monday",
        chrono::Weekday::Tue => "Tuesday",
        chrono::Weekday::Wed => "Wednesday",
        chrono::Weekday::Thu => "Thursday",
        chrono::Weekday::Fri => "Friday",
        chrono::Weekday::Sat => "Saturday",
        chrono::Weekday::Sun => "Sunday",
    };
    format!("Sorry, we're closed on {day}s. We're open {}.", business.hours_display)
}

pub(crate) fn outside_hours(business: &BusinessInfo) -> String {
    format!(
        "Sorry, that time is outside our business hours ({}).",
        business.hours_display
    )
}

pub(crate) fn slot_available(slot: &TimeSlot) -> String {
    format!("Great news! {} is available.", slot.display_start())
}

pub(crate) fn slot_booked(slot: &TimeSlot) -> String {
    format!("I'm sorry, {} is already booked.", slot.display_start())
}

pub(crate) fn alternatives(slots: &[TimeSlot]) -> String {
    let mut reply = String::from("Here are the next available times:\n");
    for (index, slot) in slots.iter().enumerate() {
        reply.push_str(&format!("{}. {}\n", index + 1, slot.display_start()));
    }
    reply.push_str("\nWhich of these times works best for you?");
    reply
}

pub(crate) fn no_alternatives(horizon_days: u32) -> String {
    format!(
        "I'm sorry, I couldn't find any available slots in the next {horizon_days} days. \
         Let me take your information and someone will call you back to find a suitable time."
    )
}

pub(crate) fn scheduled(slot: &TimeSlot, caller_name: &str) -> String {
    format!(
        "Perfect! I've scheduled your appointment for {}. You'll receive a confirmation, \
         and we look forward to meeting with you, {caller_name}!",
        slot.display_start()
    )
}

pub(crate) fn rescheduled(slot: &TimeSlot) -> String {
    format!(
        "Perfect! I've rescheduled your appointment for {}. \
         You should receive a confirmation shortly.",
        slot.display_start()
    )
}

pub(crate) fn meeting_details(original: &TimeSlot, purpose: &str) -> String {
    format!(
        "Your original meeting was scheduled for {} regarding {purpose}.",
        original.display_start()
    )
}

pub(crate) fn message_taken(caller_name: &str) -> String {
    format!(
        "Thank you, {caller_name}. I've recorded your message. \
         Someone from our team will call you back shortly."
    )
}

/// Map an action failure to an apologetic, recoverable reply. The call stays
/// active; the caller may simply try again.
pub(crate) fn apology_for(error: &FrontdeskError) -> String {
    match error {
        FrontdeskError::InvalidRange(_) | FrontdeskError::InvalidInput(_) => {
            "I'm having trouble with that date and time. Could you please repeat it?".to_string()
        }
        _ => "I'm having trouble accessing the calendar right now. \
              Could we try that again in a moment?"
            .to_string(),
    }
}
