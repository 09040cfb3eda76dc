//! Per-class message log with at-least-once delivery tolerance.
//!
//! DESIGN
//! ======
//! The transport redelivers; the log applies each unique `(id, timestamp)`
//! pair exactly once. Display order is client-observed arrival order; no
//! resequencing is applied beyond the one-time history seed.

#[cfg(test)]
#[path = "messages_test.rs"]
mod messages_test;

use std::collections::{HashMap, HashSet};

use crate::net::types::ChatMessage;

/// Ordered, de-duplicated message logs keyed by class id.
#[derive(Clone, Debug, Default)]
pub struct MessagesState {
    logs: HashMap<i64, Vec<ChatMessage>>,
    history_loaded: HashSet<i64>,
}

impl MessagesState {
    /// Append a live message, dropping duplicates silently.
    ///
    /// Returns `true` when the message was actually appended.
    pub fn append(&mut self, class_id: i64, msg: ChatMessage) -> bool {
        let log = self.logs.entry(class_id).or_default();
        if log.iter().any(|m| m.dedup_key() == msg.dedup_key()) {
            return false;
        }
        log.push(msg);
        true
    }

    /// Seed the log from the REST history fetch (oldest first).
    ///
    /// Live messages can land between subscribe and the history response;
    /// history entries already present in the live tail are skipped, and the
    /// class is marked so history is fetched only once.
    pub fn seed_history(&mut self, class_id: i64, history: Vec<ChatMessage>) {
        self.history_loaded.insert(class_id);
        let live = self.logs.remove(&class_id).unwrap_or_default();
        let mut log = Vec::with_capacity(history.len() + live.len());
        for msg in history {
            if !live.iter().any(|m| m.dedup_key() == msg.dedup_key()) {
                log.push(msg);
            }
        }
        log.extend(live);
        self.logs.insert(class_id, log);
    }

    /// Whether the one-time history fetch is still pending for this class.
    #[must_use]
    pub fn needs_history(&self, class_id: i64) -> bool {
        !self.history_loaded.contains(&class_id)
    }

    /// Messages for a class in display order; empty when none were seen.
    #[must_use]
    pub fn messages(&self, class_id: i64) -> &[ChatMessage] {
        self.logs.get(&class_id).map_or(&[], Vec::as_slice)
    }
}
