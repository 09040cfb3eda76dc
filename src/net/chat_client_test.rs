use super::*;

// ============================================================================
// DESTINATION HELPERS
// ============================================================================

#[test]
fn class_topic_includes_class_id() {
    assert_eq!(class_topic(42), "/topic/class/42");
}

#[test]
fn send_destination_targets_application_prefix() {
    assert_eq!(send_destination(7), "/app/chat.sendMessage/7");
}

#[test]
fn subscription_id_is_stable_per_class() {
    assert_eq!(subscription_id(3), "sub-3");
    assert_eq!(subscription_id(3), subscription_id(3));
}

// ============================================================================
// BACKOFF
// ============================================================================

#[test]
fn backoff_doubles_from_one_second() {
    assert_eq!(backoff_delay_ms(1), 1000);
    assert_eq!(backoff_delay_ms(2), 2000);
    assert_eq!(backoff_delay_ms(3), 4000);
    assert_eq!(backoff_delay_ms(4), 8000);
}

#[test]
fn backoff_caps_at_ten_seconds() {
    assert_eq!(backoff_delay_ms(5), 10_000);
    assert_eq!(backoff_delay_ms(12), 10_000);
    assert_eq!(backoff_delay_ms(u32::MAX), 10_000);
}

#[test]
fn attempt_budget_is_bounded() {
    assert!(MAX_CONNECT_ATTEMPTS >= 1);
    assert!(MAX_CONNECT_ATTEMPTS <= 10);
}

// ============================================================================
// STATUS REGISTRY
// ============================================================================

#[test]
fn unknown_class_is_disconnected() {
    let conns = ConnectionManager::default();
    assert_eq!(conns.status(1), ConnectionStatus::Disconnected);
    assert!(!conns.is_connected(1));
    assert!(!conns.session_live(1));
}

#[test]
fn begin_session_claims_the_class() {
    let mut conns = ConnectionManager::default();
    let epoch = conns.begin_session(1);
    assert_eq!(epoch, Some(0));
    assert_eq!(conns.status(1), ConnectionStatus::Connecting);
    assert!(conns.session_live(1));
}

#[test]
fn begin_session_is_idempotent_while_live() {
    let mut conns = ConnectionManager::default();
    assert!(conns.begin_session(1).is_some());
    assert!(conns.begin_session(1).is_none());

    let epoch = conns.epoch(1);
    conns.set_status_if_current(1, epoch, ConnectionStatus::Connected);
    assert!(conns.begin_session(1).is_none());
}

#[test]
fn begin_session_reclaims_after_teardown() {
    let mut conns = ConnectionManager::default();
    assert_eq!(conns.begin_session(1), Some(0));
    conns.end_session(1);
    assert_eq!(conns.begin_session(1), Some(1));
}

#[test]
fn status_writes_track_the_current_epoch() {
    let mut conns = ConnectionManager::default();
    let epoch = conns.begin_session(5).unwrap();
    assert!(conns.set_status_if_current(5, epoch, ConnectionStatus::Connected));
    assert!(conns.is_connected(5));
    assert!(conns.set_status_if_current(5, epoch, ConnectionStatus::Reconnecting));
    assert_eq!(conns.status(5), ConnectionStatus::Reconnecting);
}

#[test]
fn stale_epoch_writes_are_ignored() {
    let mut conns = ConnectionManager::default();
    let stale = conns.begin_session(5).unwrap();
    conns.end_session(5);

    // The old session task must not resurrect the status.
    assert!(!conns.set_status_if_current(5, stale, ConnectionStatus::Connected));
    assert_eq!(conns.status(5), ConnectionStatus::Disconnected);

    // The reopened session writes with the fresh epoch.
    let fresh = conns.begin_session(5).unwrap();
    assert!(conns.set_status_if_current(5, fresh, ConnectionStatus::Connected));
    assert!(conns.is_connected(5));
}

#[test]
fn end_session_is_safe_when_nothing_was_live() {
    let mut conns = ConnectionManager::default();
    conns.end_session(9);
    assert_eq!(conns.status(9), ConnectionStatus::Disconnected);
    assert_eq!(conns.epoch(9), 1);
}

#[test]
fn epochs_are_per_class() {
    let mut conns = ConnectionManager::default();
    conns.begin_session(1);
    conns.end_session(1);
    conns.end_session(1);
    assert_eq!(conns.epoch(1), 2);
    assert_eq!(conns.epoch(2), 0);
}
