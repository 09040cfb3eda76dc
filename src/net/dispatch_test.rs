use super::*;

const ME: &str = "kpatel";

fn msg(id: i64, sender: &str, timestamp: &str) -> ChatMessage {
    ChatMessage {
        id,
        sender_username: sender.to_owned(),
        sender_role: "STUDENT".to_owned(),
        content: format!("message {id}"),
        timestamp: timestamp.to_owned(),
    }
}

fn fresh() -> (MessagesState, WindowsState) {
    (MessagesState::default(), WindowsState::default())
}

// =============================================================
// De-dup shields counters and notifications
// =============================================================

#[test]
fn duplicate_delivery_is_fully_inert() {
    let (mut messages, mut windows) = fresh();
    windows.open(1);
    windows.minimize(1);

    let m = msg(10, "mwara", "t10");
    let first = apply_inbound(&mut messages, &mut windows, ME, 1, &m);
    assert!(first.appended);
    assert!(first.counted);
    assert!(first.notify);

    let second = apply_inbound(&mut messages, &mut windows, ME, 1, &m);
    assert_eq!(second, InboundOutcome::default());

    assert_eq!(messages.messages(1).len(), 1);
    assert_eq!(windows.unread_count(1), 1);
}

#[test]
fn redelivered_sequence_applies_each_unique_message_once() {
    let (mut messages, mut windows) = fresh();
    let sequence = [
        msg(1, "mwara", "t1"),
        msg(2, "mwara", "t2"),
        msg(1, "mwara", "t1"),
        msg(3, "mwara", "t3"),
        msg(2, "mwara", "t2"),
        msg(1, "mwara", "t1"),
    ];
    for m in &sequence {
        apply_inbound(&mut messages, &mut windows, ME, 7, m);
    }
    assert_eq!(messages.messages(7).len(), 3);
    assert_eq!(windows.unread_count(7), 3);
}

// =============================================================
// Unread and notification gating
// =============================================================

#[test]
fn open_window_appends_without_counting_or_notifying() {
    let (mut messages, mut windows) = fresh();
    windows.open(1);
    let out = apply_inbound(&mut messages, &mut windows, ME, 1, &msg(10, "mwara", "t10"));
    assert!(out.appended);
    assert!(!out.counted);
    assert!(!out.notify);
    assert_eq!(windows.unread_count(1), 0);
}

#[test]
fn minimized_window_counts_and_notifies() {
    let (mut messages, mut windows) = fresh();
    windows.open(1);
    windows.minimize(1);
    let out = apply_inbound(&mut messages, &mut windows, ME, 1, &msg(10, "mwara", "t10"));
    assert!(out.counted);
    assert!(out.notify);
}

#[test]
fn closed_class_counts_and_notifies() {
    let (mut messages, mut windows) = fresh();
    let out = apply_inbound(&mut messages, &mut windows, ME, 1, &msg(10, "mwara", "t10"));
    assert!(out.appended);
    assert!(out.counted);
    assert!(out.notify);
}

#[test]
fn self_authored_messages_append_silently() {
    let (mut messages, mut windows) = fresh();
    windows.open(1);
    windows.minimize(1);
    let out = apply_inbound(&mut messages, &mut windows, ME, 1, &msg(10, ME, "t10"));
    assert!(out.appended);
    assert!(!out.counted);
    assert!(!out.notify);
    assert_eq!(windows.unread_count(1), 0);
}

#[test]
fn one_notification_per_unique_qualifying_message() {
    let (mut messages, mut windows) = fresh();
    let inputs = [
        msg(1, "mwara", "t1"),
        msg(1, "mwara", "t1"), // redelivery
        msg(2, ME, "t2"),      // self
        msg(3, "mwara", "t3"),
    ];
    let fired = inputs
        .iter()
        .filter(|m| apply_inbound(&mut messages, &mut windows, ME, 1, m).notify)
        .count();
    assert_eq!(fired, 2);
}
