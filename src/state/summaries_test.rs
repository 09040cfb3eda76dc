use super::*;
use crate::net::types::ChatMessage;

fn class(class_id: i64, code: &str, subject: &str) -> ClassInfo {
    ClassInfo {
        class_id,
        class_code: code.to_owned(),
        subject_name: subject.to_owned(),
    }
}

fn msg(id: i64, timestamp: &str) -> ChatMessage {
    ChatMessage {
        id,
        sender_username: "mwara".to_owned(),
        sender_role: "TEACHER".to_owned(),
        content: "hello".to_owned(),
        timestamp: timestamp.to_owned(),
    }
}

// =============================================================
// Projection
// =============================================================

#[test]
fn roster_without_activity_gets_zeroed_summaries() {
    let roster = vec![class(1, "CS101-A", "Programming")];
    let windows = WindowsState::default();
    let summaries = build_summaries(&roster, &windows);
    assert_eq!(summaries.len(), 1);
    let row = &summaries[0];
    assert_eq!(row.mode, WindowMode::Closed);
    assert_eq!(row.unread_count, 0);
    assert!(!row.has_new_messages);
    assert!(row.last_message.is_none());
}

#[test]
fn summaries_pick_up_window_fields() {
    let roster = vec![class(1, "CS101-A", "Programming")];
    let mut windows = WindowsState::default();
    windows.record_inbound(1, &msg(10, "2026-03-02T10:00:00Z"), true);
    let summaries = build_summaries(&roster, &windows);
    let row = &summaries[0];
    assert_eq!(row.unread_count, 1);
    assert!(row.has_new_messages);
    assert_eq!(row.last_message_sender.as_deref(), Some("mwara"));
    assert_eq!(row.last_message_time.as_deref(), Some("2026-03-02T10:00:00Z"));
}

#[test]
fn classes_outside_roster_are_not_projected() {
    let roster = vec![class(1, "CS101-A", "Programming")];
    let mut windows = WindowsState::default();
    windows.record_inbound(99, &msg(1, "t"), true);
    let summaries = build_summaries(&roster, &windows);
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].class_id, 1);
}

// =============================================================
// Sort order
// =============================================================

#[test]
fn unread_classes_sort_before_read_classes() {
    let roster = vec![
        class(1, "A", "s"),
        class(2, "B", "s"),
        class(3, "C", "s"),
        class(4, "D", "s"),
    ];
    let mut windows = WindowsState::default();
    windows.set_baseline(1, 0);
    windows.set_baseline(2, 3);
    windows.set_baseline(3, 0);
    windows.set_baseline(4, 1);
    let summaries = build_summaries(&roster, &windows);
    let codes: Vec<&str> = summaries.iter().map(|s| s.class_code.as_str()).collect();
    // Unread group (B, D) first, each group code-ordered (no recency data).
    assert_eq!(codes, vec!["B", "D", "A", "C"]);
}

#[test]
fn recency_orders_within_the_unread_group() {
    let roster = vec![class(1, "A", "s"), class(2, "B", "s")];
    let mut windows = WindowsState::default();
    windows.record_inbound(1, &msg(10, "2026-03-02T09:00:00Z"), true);
    windows.record_inbound(2, &msg(11, "2026-03-02T11:00:00Z"), true);
    let summaries = build_summaries(&roster, &windows);
    let codes: Vec<&str> = summaries.iter().map(|s| s.class_code.as_str()).collect();
    assert_eq!(codes, vec!["B", "A"]);
}

#[test]
fn recency_orders_within_the_read_group_and_idle_sorts_last() {
    let roster = vec![class(1, "A", "s"), class(2, "B", "s"), class(3, "C", "s")];
    let mut windows = WindowsState::default();
    // Open windows: recency recorded, nothing counted.
    windows.open(1);
    windows.open(2);
    windows.record_inbound(1, &msg(10, "2026-03-02T09:00:00Z"), true);
    windows.record_inbound(2, &msg(11, "2026-03-02T11:00:00Z"), true);
    let summaries = build_summaries(&roster, &windows);
    let codes: Vec<&str> = summaries.iter().map(|s| s.class_code.as_str()).collect();
    assert_eq!(codes, vec!["B", "A", "C"]);
}

#[test]
fn class_code_breaks_exact_ties() {
    let roster = vec![class(2, "B", "s"), class(1, "A", "s")];
    let mut windows = WindowsState::default();
    windows.record_inbound(1, &msg(10, "2026-03-02T10:00:00Z"), true);
    windows.record_inbound(2, &msg(11, "2026-03-02T10:00:00Z"), true);
    let summaries = build_summaries(&roster, &windows);
    let codes: Vec<&str> = summaries.iter().map(|s| s.class_code.as_str()).collect();
    assert_eq!(codes, vec!["A", "B"]);
}

// =============================================================
// Badge arithmetic
// =============================================================

#[test]
fn total_badge_sums_roster_unread() {
    let roster = vec![class(1, "A", "s"), class(2, "B", "s"), class(3, "C", "s")];
    let mut windows = WindowsState::default();
    windows.set_baseline(1, 2);
    windows.set_baseline(2, 0);
    windows.set_baseline(3, 5);
    assert_eq!(total_badge(&build_summaries(&roster, &windows)), 7);

    windows.open(1);
    assert_eq!(total_badge(&build_summaries(&roster, &windows)), 5);
}
