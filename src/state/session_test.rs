use super::*;

// =============================================================
// SessionState defaults
// =============================================================

#[test]
fn session_state_default_no_session() {
    let state = SessionState::default();
    assert!(state.session.is_none());
    assert!(!state.loading);
}

#[test]
fn current_username_empty_before_login() {
    let state = SessionState::default();
    assert_eq!(state.current_username(), "");
    assert!(state.token().is_none());
}

#[test]
fn current_username_and_token_read_from_session() {
    let state = SessionState {
        session: Some(SessionInfo {
            username: "kpatel".to_owned(),
            token: "tok".to_owned(),
        }),
        loading: false,
    };
    assert_eq!(state.current_username(), "kpatel");
    assert_eq!(state.token(), Some("tok"));
}
