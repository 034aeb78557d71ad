//! Slot engine behaviour: business-hours gating, half-open overlap, and the
//! day-batched forward scan.

mod support;

use chrono_tz::America::New_York;
use frontdesk_core::{SlotEngine, SlotVerdict};
use frontdesk_domain::TimeSlot;
use support::calendar::StubCalendarGateway;
use support::{eastern, test_config};

fn engine(gateway: std::sync::Arc<StubCalendarGateway>) -> SlotEngine {
    let config = test_config();
    SlotEngine::new(gateway, config.hours, config.scheduling)
}

fn slot(y: i32, m: u32, d: u32, start_hour: u32, end_hour: u32) -> TimeSlot {
    TimeSlot::new(eastern(y, m, d, start_hour, 0), eastern(y, m, d, end_hour, 0), New_York)
        .unwrap()
}

#[tokio::test]
async fn closed_day_rejected_without_gateway_call() {
    let gateway = StubCalendarGateway::free();
    let engine = engine(gateway.clone());

    // 2025-06-07 is a Saturday.
    let saturday = slot(2025, 6, 7, 10, 11);
    assert!(!engine.is_free(&saturday).await.unwrap());
    assert_eq!(gateway.list_calls(), 0);
}

#[tokio::test]
async fn out_of_hours_rejected_without_gateway_call() {
    let gateway = StubCalendarGateway::free();
    let engine = engine(gateway.clone());

    // Before opening.
    assert!(!engine.is_free(&slot(2025, 6, 2, 7, 8)).await.unwrap());
    // Starting at closing time.
    assert!(!engine.is_free(&slot(2025, 6, 2, 17, 18)).await.unwrap());
    // Running past closing time.
    assert!(!engine.is_free(&slot(2025, 6, 2, 16, 18)).await.unwrap());
    assert_eq!(gateway.list_calls(), 0);
}

#[tokio::test]
async fn last_slot_of_the_day_is_offerable() {
    // 16:00-17:00 ends exactly at close; close is exclusive for starts only.
    let gateway = StubCalendarGateway::free();
    let engine = engine(gateway.clone());

    assert!(engine.is_free(&slot(2025, 6, 2, 16, 17)).await.unwrap());
    assert_eq!(gateway.list_calls(), 1);
}

#[tokio::test]
async fn overlapping_booking_blocks_candidate() {
    let gateway = StubCalendarGateway::new(vec![slot(2025, 6, 2, 10, 11)]);
    let engine = engine(gateway);

    assert!(!engine.is_free(&slot(2025, 6, 2, 10, 11)).await.unwrap());
    assert_eq!(
        engine.check(&slot(2025, 6, 2, 10, 11)).await.unwrap(),
        SlotVerdict::Busy
    );
}

#[tokio::test]
async fn touching_booking_does_not_block_candidate() {
    // Busy [10:00, 11:00), candidate [11:00, 12:00): free per the half-open
    // interval rule.
    let gateway = StubCalendarGateway::new(vec![slot(2025, 6, 2, 10, 11)]);
    let engine = engine(gateway);

    assert!(engine.is_free(&slot(2025, 6, 2, 11, 12)).await.unwrap());
}

#[tokio::test]
async fn scan_skips_busy_hours() {
    // Monday 2025-06-02 with 09:00-10:00 and 13:00-14:00 booked; searching
    // from 08:00 for two slots must yield 10:00 and 11:00.
    let gateway =
        StubCalendarGateway::new(vec![slot(2025, 6, 2, 9, 10), slot(2025, 6, 2, 13, 14)]);
    let engine = engine(gateway);

    let found = engine.find_next_slots(eastern(2025, 6, 2, 8, 0), 2).await.unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].start, eastern(2025, 6, 2, 10, 0));
    assert_eq!(found[1].start, eastern(2025, 6, 2, 11, 0));
}

#[tokio::test]
async fn scan_never_offers_past_or_equal_slots() {
    let gateway = StubCalendarGateway::free();
    let engine = engine(gateway);

    let from = eastern(2025, 6, 2, 10, 30);
    let found = engine.find_next_slots(from, 5).await.unwrap();
    assert!(!found.is_empty());
    for slot in &found {
        assert!(slot.start > from, "offered slot at {} not after {from}", slot.start);
    }
    assert_eq!(found[0].start, eastern(2025, 6, 2, 11, 0));
}

#[tokio::test]
async fn fully_free_horizon_yields_exactly_count_ascending() {
    let gateway = StubCalendarGateway::free();
    let engine = engine(gateway.clone());

    let from = eastern(2025, 6, 2, 8, 0);
    let found = engine.find_next_slots(from, 3).await.unwrap();
    assert_eq!(found.len(), 3);
    // First open hour after `from` on an open day.
    assert_eq!(found[0].start, eastern(2025, 6, 2, 9, 0));
    for pair in found.windows(2) {
        assert!(pair[0].start < pair[1].start);
    }
    // Day batching: everything came from one remote query.
    assert_eq!(gateway.list_calls(), 1);
}

#[tokio::test]
async fn scan_clamps_closed_day_start_to_next_open_day() {
    let gateway = StubCalendarGateway::free();
    let engine = engine(gateway);

    // Saturday afternoon; first offer must be Monday at opening.
    let found = engine.find_next_slots(eastern(2025, 6, 7, 15, 0), 1).await.unwrap();
    assert_eq!(found[0].start, eastern(2025, 6, 9, 9, 0));
}

#[tokio::test]
async fn exhausted_horizon_returns_short_result() {
    // Every business hour of the horizon is booked.
    let mut busy = Vec::new();
    for day in 2..=30 {
        busy.push(
            TimeSlot::new(eastern(2025, 6, day, 9, 0), eastern(2025, 6, day, 17, 0), New_York)
                .unwrap(),
        );
    }
    let gateway = StubCalendarGateway::new(busy);
    let engine = engine(gateway);

    let found = engine.find_next_slots(eastern(2025, 6, 2, 8, 0), 3).await.unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn remote_queries_bounded_by_horizon_days() {
    let gateway = StubCalendarGateway::free();
    let engine = engine(gateway.clone());

    // Ask for more slots than the horizon can hold so every day is scanned.
    let found = engine.find_next_slots(eastern(2025, 6, 2, 8, 0), 1000).await.unwrap();
    assert!(found.len() < 1000);
    // One query per open day at most, never one per hour-slot.
    assert!(gateway.list_calls() <= 14, "took {} queries", gateway.list_calls());
}

#[tokio::test]
async fn zero_count_returns_empty_without_queries() {
    let gateway = StubCalendarGateway::free();
    let engine = engine(gateway.clone());

    let found = engine.find_next_slots(eastern(2025, 6, 2, 8, 0), 0).await.unwrap();
    assert!(found.is_empty());
    assert_eq!(gateway.list_calls(), 0);
}
