//! Application of inbound transport messages to client state.
//!
//! DESIGN
//! ======
//! One pure function decides everything that happens for an inbound frame:
//! whether the message enters the log, whether it counts as unread, and
//! whether the notification fan-out fires. The session task performs the
//! side effects the outcome asks for, so the decision logic stays testable
//! outside the browser.

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod dispatch_test;

use crate::net::types::ChatMessage;
use crate::state::messages::MessagesState;
use crate::state::windows::WindowsState;
use crate::util::notify::{is_qualifying, should_notify};

/// What an inbound message did to local state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InboundOutcome {
    /// Message entered the log (not a duplicate delivery).
    pub appended: bool,
    /// Unread counter was incremented.
    pub counted: bool,
    /// Notification fan-out (tone + OS notification) should fire.
    pub notify: bool,
}

/// Apply one inbound message for a class.
///
/// Duplicate deliveries are dropped before any counter or notification
/// logic runs, so redelivery can never double-count or double-fire.
pub fn apply_inbound(
    messages: &mut MessagesState,
    windows: &mut WindowsState,
    current_username: &str,
    class_id: i64,
    msg: &ChatMessage,
) -> InboundOutcome {
    if !messages.append(class_id, msg.clone()) {
        return InboundOutcome::default();
    }

    let qualifying = is_qualifying(&msg.sender_username, current_username);
    let mode = windows.mode(class_id);
    let counted = windows.record_inbound(class_id, msg, qualifying);

    InboundOutcome {
        appended: true,
        counted,
        notify: should_notify(mode, qualifying),
    }
}
