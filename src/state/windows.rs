//! Per-class chat window lifecycle and unread reconciliation.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each class chat has a window moving through Closed → Open → Minimized
//! transitions, plus the unread counters reconciled between the server
//! baseline and live optimistic increments. The record survives `close()`
//! so the chat list keeps recency and badge data; only the live
//! subscription and the transient new-message flag are torn down.

#[cfg(test)]
#[path = "windows_test.rs"]
mod windows_test;

use std::collections::HashMap;

use crate::net::types::ChatMessage;

/// UI lifecycle state of one class chat window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WindowMode {
    #[default]
    Closed,
    Open,
    Minimized,
}

/// Live state of one class chat: window mode, unread counters, and the
/// most recent message fields used for list sorting and previews.
#[derive(Clone, Debug)]
pub struct ChatWindow {
    pub class_id: i64,
    pub mode: WindowMode,
    pub unread_count: u32,
    pub has_new_messages: bool,
    pub last_message: Option<String>,
    pub last_message_time: Option<String>,
    pub last_message_sender: Option<String>,
    /// Bumped on every counted unread increment; lets the mark-read
    /// completion handler detect a message that raced the optimistic reset.
    pub unread_rev: u64,
}

impl ChatWindow {
    fn new(class_id: i64) -> Self {
        Self {
            class_id,
            mode: WindowMode::Closed,
            unread_count: 0,
            has_new_messages: false,
            last_message: None,
            last_message_time: None,
            last_message_sender: None,
            unread_rev: 0,
        }
    }
}

/// All per-class window records, keyed by class id.
#[derive(Clone, Debug, Default)]
pub struct WindowsState {
    windows: HashMap<i64, ChatWindow>,
}

impl WindowsState {
    fn entry(&mut self, class_id: i64) -> &mut ChatWindow {
        self.windows
            .entry(class_id)
            .or_insert_with(|| ChatWindow::new(class_id))
    }

    /// Current mode; a class with no record is Closed.
    #[must_use]
    pub fn mode(&self, class_id: i64) -> WindowMode {
        self.windows.get(&class_id).map_or_else(WindowMode::default, |w| w.mode)
    }

    #[must_use]
    pub fn window(&self, class_id: i64) -> Option<&ChatWindow> {
        self.windows.get(&class_id)
    }

    /// Open (or unminimize) a window, optimistically zeroing its unread
    /// counters before any network round trip resolves.
    ///
    /// Returns `true` when a Closed/Minimized → Open transition happened,
    /// which is the caller's cue to connect and issue mark-read. Calling
    /// `open` on an already-open window is a no-op.
    pub fn open(&mut self, class_id: i64) -> bool {
        let window = self.entry(class_id);
        if window.mode == WindowMode::Open {
            return false;
        }
        window.mode = WindowMode::Open;
        window.unread_count = 0;
        window.has_new_messages = false;
        true
    }

    /// Open → Minimized; guarded no-op from any other mode.
    pub fn minimize(&mut self, class_id: i64) -> bool {
        match self.windows.get_mut(&class_id) {
            Some(window) if window.mode == WindowMode::Open => {
                window.mode = WindowMode::Minimized;
                true
            }
            _ => false,
        }
    }

    /// Any mode → Closed. The record is retained; the transient
    /// new-message flag is cleared. Returns `true` when the window was
    /// actually active (Open or Minimized).
    pub fn close(&mut self, class_id: i64) -> bool {
        match self.windows.get_mut(&class_id) {
            Some(window) if window.mode != WindowMode::Closed => {
                window.mode = WindowMode::Closed;
                window.has_new_messages = false;
                true
            }
            _ => false,
        }
    }

    /// Merge a server-persisted unread count. An Open window keeps its
    /// zero; the open implies zero invariant wins over a stale baseline.
    pub fn set_baseline(&mut self, class_id: i64, count: u32) {
        let window = self.entry(class_id);
        if window.mode != WindowMode::Open {
            window.unread_count = count;
        }
    }

    /// Record an accepted (de-duplicated) inbound message.
    ///
    /// Recency fields update unconditionally so list sorting tracks every
    /// conversation. The unread increment applies only to qualifying
    /// messages on non-Open windows; returns `true` when it counted.
    pub fn record_inbound(&mut self, class_id: i64, msg: &ChatMessage, qualifying: bool) -> bool {
        let window = self.entry(class_id);
        window.last_message = Some(msg.content.clone());
        window.last_message_time = Some(msg.timestamp.clone());
        window.last_message_sender = Some(msg.sender_username.clone());

        if qualifying && window.mode != WindowMode::Open {
            window.unread_count += 1;
            window.has_new_messages = true;
            window.unread_rev += 1;
            return true;
        }
        false
    }

    #[must_use]
    pub fn unread_count(&self, class_id: i64) -> u32 {
        self.windows.get(&class_id).map_or(0, |w| w.unread_count)
    }

    /// Revision captured when issuing mark-read; compared on completion.
    #[must_use]
    pub fn unread_rev(&self, class_id: i64) -> u64 {
        self.windows.get(&class_id).map_or(0, |w| w.unread_rev)
    }

    /// Sum of unread counts across every known class.
    #[must_use]
    pub fn total_badge(&self) -> u32 {
        self.windows.values().map(|w| w.unread_count).sum()
    }

    /// Windows currently in the active set (Open or Minimized), unsorted;
    /// stacking order is the caller's concern.
    #[must_use]
    pub fn active(&self) -> Vec<&ChatWindow> {
        self.windows
            .values()
            .filter(|w| w.mode != WindowMode::Closed)
            .collect()
    }
}
