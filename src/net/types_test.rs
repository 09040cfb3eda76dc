use super::*;

// =============================================================
// ChatMessage parsing
// =============================================================

#[test]
fn parse_chat_message_accepts_wire_shape() {
    let body = r#"{
        "id": 17,
        "senderUsername": "mwara",
        "senderRole": "TEACHER",
        "content": "homework is posted",
        "timestamp": "2026-03-02T10:15:00Z"
    }"#;
    let msg = parse_chat_message(body).expect("message should parse");
    assert_eq!(msg.id, 17);
    assert_eq!(msg.sender_username, "mwara");
    assert_eq!(msg.sender_role, "TEACHER");
    assert_eq!(msg.content, "homework is posted");
    assert_eq!(msg.timestamp, "2026-03-02T10:15:00Z");
}

#[test]
fn parse_chat_message_rejects_missing_fields() {
    let err = parse_chat_message(r#"{"id": 1, "content": "hi"}"#)
        .expect_err("shape mismatch should be rejected");
    assert!(err.starts_with("malformed chat message frame:"));
}

#[test]
fn parse_chat_message_rejects_non_json() {
    assert!(parse_chat_message("not json at all").is_err());
}

#[test]
fn dedup_key_pairs_id_with_timestamp() {
    let msg = ChatMessage {
        id: 5,
        sender_username: "a".to_owned(),
        sender_role: "STUDENT".to_owned(),
        content: "x".to_owned(),
        timestamp: "2026-03-02T10:15:00Z".to_owned(),
    };
    assert_eq!(msg.dedup_key(), (5, "2026-03-02T10:15:00Z"));
}

#[test]
fn outgoing_chat_message_serializes_content_only() {
    let out = OutgoingChatMessage {
        content: "see you monday".to_owned(),
    };
    let json = serde_json::to_string(&out).expect("serialize");
    assert_eq!(json, r#"{"content":"see you monday"}"#);
}

// =============================================================
// UnreadCounts
// =============================================================

#[test]
fn unread_counts_parses_string_keys_into_class_ids() {
    let body = r#"{"unreadByClass": {"3": 2, "11": 0, "27": 5}}"#;
    let counts: UnreadCounts = serde_json::from_str(body).expect("counts should parse");
    assert_eq!(counts.unread_by_class.get(&3), Some(&2));
    assert_eq!(counts.unread_by_class.get(&11), Some(&0));
    assert_eq!(counts.unread_by_class.get(&27), Some(&5));
}

#[test]
fn unread_counts_rejects_non_integer_class_keys() {
    let body = r#"{"unreadByClass": {"algebra": 2}}"#;
    assert!(serde_json::from_str::<UnreadCounts>(body).is_err());
}

#[test]
fn unread_counts_accepts_empty_map() {
    let counts: UnreadCounts =
        serde_json::from_str(r#"{"unreadByClass": {}}"#).expect("counts should parse");
    assert!(counts.unread_by_class.is_empty());
}

// =============================================================
// Roster and session DTOs
// =============================================================

#[test]
fn class_info_parses_camel_case_fields() {
    let body = r#"{"classId": 4, "classCode": "MTH202-B", "subjectName": "Calculus"}"#;
    let info: ClassInfo = serde_json::from_str(body).expect("class should parse");
    assert_eq!(info.class_id, 4);
    assert_eq!(info.class_code, "MTH202-B");
    assert_eq!(info.subject_name, "Calculus");
}

#[test]
fn session_info_parses_username_and_token() {
    let body = r#"{"username": "kpatel", "token": "abc.def.ghi"}"#;
    let session: SessionInfo = serde_json::from_str(body).expect("session should parse");
    assert_eq!(session.username, "kpatel");
    assert_eq!(session.token, "abc.def.ghi");
}
