//! Tests for the message reconciler: idempotent append, watermark
//! monotonicity, and the empty-state placeholder.

use proptest::prelude::*;
use roomlink::{Applied, ChatMessage, Reconciler};

fn msg(id: i64, sender_id: i64, timestamp: Option<&str>) -> ChatMessage {
    ChatMessage {
        id,
        sender_id,
        sender_name: format!("user-{}", sender_id),
        body: Some(format!("message {}", id)),
        attachment: None,
        timestamp: timestamp.map(str::to_string),
        is_mine: sender_id == 1,
        seen_by_peer: false,
    }
}

#[test]
fn test_append_then_duplicate() {
    let mut reconciler = Reconciler::new();

    let first = reconciler.apply(msg(5, 2, Some("2024-01-01T00:00:05Z")));
    assert_eq!(
        first,
        Applied::Appended {
            cleared_empty_state: true
        }
    );

    // Same identifier through "the other transport": discarded
    let second = reconciler.apply(msg(5, 2, Some("2024-01-01T00:00:05Z")));
    assert_eq!(second, Applied::Duplicate);
    assert_eq!(reconciler.len(), 1);
}

#[test]
fn test_empty_state_cleared_exactly_once() {
    let mut reconciler = Reconciler::new();

    match reconciler.apply(msg(1, 2, None)) {
        Applied::Appended {
            cleared_empty_state,
        } => assert!(cleared_empty_state),
        Applied::Duplicate => panic!("first apply must append"),
    }
    match reconciler.apply(msg(2, 2, None)) {
        Applied::Appended {
            cleared_empty_state,
        } => assert!(!cleared_empty_state),
        Applied::Duplicate => panic!("second apply must append"),
    }
}

#[test]
fn test_watermark_advances() {
    let mut reconciler = Reconciler::new();
    assert_eq!(reconciler.watermark(), None);

    reconciler.apply(msg(5, 2, Some("2024-01-01T00:00:05Z")));
    assert_eq!(reconciler.watermark(), Some("2024-01-01T00:00:05Z"));

    reconciler.apply(msg(6, 2, Some("2024-01-01T00:00:06Z")));
    assert_eq!(reconciler.watermark(), Some("2024-01-01T00:00:06Z"));
}

#[test]
fn test_watermark_never_regresses() {
    let mut reconciler = Reconciler::new();
    reconciler.apply(msg(6, 2, Some("2024-01-01T00:00:06Z")));

    // Late arrival of an older message renders but keeps the watermark
    reconciler.apply(msg(5, 2, Some("2024-01-01T00:00:05Z")));
    assert_eq!(reconciler.len(), 2);
    assert_eq!(reconciler.watermark(), Some("2024-01-01T00:00:06Z"));
}

#[test]
fn test_missing_timestamp_renders_without_watermark() {
    let mut reconciler = Reconciler::new();
    reconciler.apply(msg(3, 2, None));

    assert_eq!(reconciler.len(), 1);
    assert_eq!(reconciler.watermark(), None);

    reconciler.apply(msg(4, 2, Some("2024-01-01T00:00:04Z")));
    assert_eq!(reconciler.watermark(), Some("2024-01-01T00:00:04Z"));
}

#[test]
fn test_arrival_order_preserved() {
    let mut reconciler = Reconciler::new();
    reconciler.apply(msg(6, 2, Some("2024-01-01T00:00:06Z")));
    reconciler.apply(msg(5, 2, Some("2024-01-01T00:00:05Z")));

    let ids: Vec<i64> = reconciler.messages().iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![6, 5]);
}

#[test]
fn test_mark_read_by_peer_flags_own_messages_only() {
    let mut reconciler = Reconciler::new();
    reconciler.apply(msg(1, 1, Some("2024-01-01T00:00:01Z"))); // mine
    reconciler.apply(msg(2, 2, Some("2024-01-01T00:00:02Z"))); // theirs
    reconciler.apply(msg(3, 1, Some("2024-01-01T00:00:03Z"))); // mine

    let changed = reconciler.mark_read_by_peer();
    assert_eq!(changed, 2);

    let flags: Vec<bool> = reconciler
        .messages()
        .iter()
        .map(|m| m.seen_by_peer)
        .collect();
    assert_eq!(flags, vec![true, false, true]);

    // Idempotent: a second receipt changes nothing
    assert_eq!(reconciler.mark_read_by_peer(), 0);
}

#[test]
fn test_contains() {
    let mut reconciler = Reconciler::new();
    reconciler.apply(msg(5, 2, None));
    assert!(reconciler.contains(5));
    assert!(!reconciler.contains(6));
}

proptest! {
    /// No two rendered messages ever share an identifier, for any
    /// interleaving of deliveries.
    #[test]
    fn prop_rendered_ids_unique(ids in proptest::collection::vec(0i64..50, 0..200)) {
        let mut reconciler = Reconciler::new();
        for id in ids {
            reconciler.apply(msg(id, 2, None));
        }

        let mut rendered: Vec<i64> = reconciler.messages().iter().map(|m| m.id).collect();
        rendered.sort_unstable();
        rendered.dedup();
        prop_assert_eq!(rendered.len(), reconciler.len());
    }

    /// The watermark is monotonically non-decreasing over any delivery
    /// sequence, including repeats and missing timestamps.
    #[test]
    fn prop_watermark_monotone(stamps in proptest::collection::vec(
        proptest::option::of(0u32..100), 0..200,
    )) {
        let mut reconciler = Reconciler::new();
        let mut previous: Option<String> = None;

        for (i, stamp) in stamps.into_iter().enumerate() {
            let ts = stamp.map(|s| format!("2024-01-01T00:00:{:02}Z", s % 60));
            reconciler.apply(msg(i as i64, 2, ts.as_deref()));

            let current = reconciler.watermark().map(str::to_string);
            if let Some(prev) = &previous {
                let cur = current.as_deref().expect("watermark vanished");
                prop_assert!(cur >= prev.as_str());
            }
            previous = current;
        }
    }
}
