//! Chat-list projection: roster joined with live window state.
//!
//! DESIGN
//! ======
//! The list view and the open-window stacking share one ordering:
//! unread-first, then most-recent activity, then class code. Timestamps are
//! ISO-8601 strings from one server clock, so lexicographic comparison is
//! chronological comparison.

#[cfg(test)]
#[path = "summaries_test.rs"]
mod summaries_test;

use std::cmp::Ordering;

use crate::net::types::ClassInfo;
use crate::state::windows::{WindowMode, WindowsState};

/// One row of the chat list: class metadata plus its live chat state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassChatSummary {
    pub class_id: i64,
    pub class_code: String,
    pub subject_name: String,
    pub mode: WindowMode,
    pub unread_count: u32,
    pub has_new_messages: bool,
    pub last_message: Option<String>,
    pub last_message_time: Option<String>,
    pub last_message_sender: Option<String>,
}

/// Join the roster with window state and sort for display.
///
/// Classes without any chat activity yet get a zeroed summary.
#[must_use]
pub fn build_summaries(roster: &[ClassInfo], windows: &WindowsState) -> Vec<ClassChatSummary> {
    let mut summaries: Vec<ClassChatSummary> = roster
        .iter()
        .map(|class| {
            let window = windows.window(class.class_id);
            ClassChatSummary {
                class_id: class.class_id,
                class_code: class.class_code.clone(),
                subject_name: class.subject_name.clone(),
                mode: window.map_or(WindowMode::Closed, |w| w.mode),
                unread_count: window.map_or(0, |w| w.unread_count),
                has_new_messages: window.is_some_and(|w| w.has_new_messages),
                last_message: window.and_then(|w| w.last_message.clone()),
                last_message_time: window.and_then(|w| w.last_message_time.clone()),
                last_message_sender: window.and_then(|w| w.last_message_sender.clone()),
            }
        })
        .collect();
    summaries.sort_by(compare_summaries);
    summaries
}

/// Total badge across the roster: the sum of per-class unread counts.
#[must_use]
pub fn total_badge(summaries: &[ClassChatSummary]) -> u32 {
    summaries.iter().map(|s| s.unread_count).sum()
}

/// Unread group first; within a group most-recent activity first; class
/// code breaks remaining ties.
fn compare_summaries(a: &ClassChatSummary, b: &ClassChatSummary) -> Ordering {
    let a_unread = a.unread_count > 0;
    let b_unread = b.unread_count > 0;
    b_unread
        .cmp(&a_unread)
        .then_with(|| compare_recency(a.last_message_time.as_deref(), b.last_message_time.as_deref()))
        .then_with(|| a.class_code.cmp(&b.class_code))
}

/// Descending by timestamp; classes with no activity sort last.
fn compare_recency(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
