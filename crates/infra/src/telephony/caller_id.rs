//! Caller identity extraction from telephony metadata.
//!
//! Inbound rooms carry the caller number in several places depending on the
//! trunk configuration: embedded in the room name, as the participant
//! identity, or inside the SIP metadata blob. Extraction tries them in that
//! order and returns whatever it finds; a missing number is not an error.

use frontdesk_domain::CallerIdentity;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// E.164 number delimited by underscores, the trunk's room-name convention.
static ROOM_DELIMITED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_(\+\d{11,15})_").expect("valid regex"));

/// Any E.164 number appearing in the room name.
static ROOM_LOOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\+\d{11,15})").expect("valid regex"));

/// Digit runs in a participant identity, optional plus and country prefix.
static IDENTITY_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\+?1?\d{10,15})").expect("valid regex"));

/// Best-effort caller identification for an inbound call.
pub fn extract_caller(
    room_name: &str,
    participant_identity: Option<&str>,
    metadata: Option<&str>,
) -> CallerIdentity {
    let mut identity = CallerIdentity { phone: None, name: None };

    if let Some(captures) = ROOM_DELIMITED.captures(room_name) {
        identity.phone = Some(captures[1].to_string());
    } else if let Some(captures) = ROOM_LOOSE.captures(room_name) {
        identity.phone = Some(captures[1].to_string());
    }

    if identity.phone.is_none() {
        if let Some(participant) = participant_identity {
            if let Some(captures) = IDENTITY_NUMBER.captures(participant) {
                identity.phone = Some(captures[1].to_string());
            }
        }
    }

    if let Some(raw) = metadata {
        apply_metadata(&mut identity, raw);
    }

    debug!(phone = ?identity.phone, name = ?identity.name, "caller identity resolved");
    identity
}

/// Fill gaps from the SIP metadata blob. Only JSON objects carrying a
/// from-style key are consulted; anything else is ignored.
fn apply_metadata(identity: &mut CallerIdentity, raw: &str) {
    if !(raw.contains("X-From") || raw.contains("from")) {
        return;
    }
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(raw) else {
        return;
    };

    if identity.phone.is_none() {
        let from = map
            .get("X-From")
            .or_else(|| map.get("from"))
            .and_then(Value::as_str);
        if let Some(from) = from {
            if let Some(captures) = IDENTITY_NUMBER.captures(from) {
                identity.phone = Some(captures[1].to_string());
            }
        }
    }

    if identity.name.is_none() {
        identity.name = map.get("name").and_then(Value::as_str).map(str::to_string);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimited_room_number_wins() {
        let id = extract_caller("call-_+15551234567_-abc", Some("sip_+19998887777"), None);
        assert_eq!(id.phone.as_deref(), Some("+15551234567"));
    }

    #[test]
    fn loose_room_number_is_second_choice() {
        let id = extract_caller("inbound-+15551234567", None, None);
        assert_eq!(id.phone.as_deref(), Some("+15551234567"));
    }

    #[test]
    fn participant_identity_fallback_accepts_bare_digits() {
        let id = extract_caller("room-42", Some("sip_5551234567"), None);
        assert_eq!(id.phone.as_deref(), Some("5551234567"));
    }

    #[test]
    fn metadata_supplies_phone_and_name() {
        let meta = r#"{"X-From": "sip:+15551234567@trunk", "name": "Ada"}"#;
        let id = extract_caller("room", None, Some(meta));
        assert_eq!(id.phone.as_deref(), Some("+15551234567"));
        assert_eq!(id.name.as_deref(), Some("Ada"));
    }

    #[test]
    fn metadata_without_from_key_is_ignored() {
        let id = extract_caller("room", None, Some(r#"{"name": "Ada"}"#));
        assert_eq!(id.phone, None);
        assert_eq!(id.name, None);
    }

    #[test]
    fn nothing_found_yields_empty_identity() {
        let id = extract_caller("room-one", Some("agent"), None);
        assert_eq!(id, CallerIdentity { phone: None, name: None });
    }
}
