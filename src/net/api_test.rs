use super::*;

#[test]
fn chat_history_endpoint_formats_expected_path() {
    assert_eq!(chat_history_endpoint(12), "/api/chat/12");
}

#[test]
fn mark_read_endpoint_formats_expected_path() {
    assert_eq!(mark_read_endpoint(12), "/api/chat/12/mark-read");
}

#[test]
fn bearer_prefixes_the_token() {
    assert_eq!(bearer("abc.def"), "Bearer abc.def");
}

#[test]
fn mark_read_failed_message_formats_status() {
    assert_eq!(mark_read_failed_message(503), "mark-read failed: 503");
}
