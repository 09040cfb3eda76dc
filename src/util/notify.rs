//! Notification fan-out for inbound chat messages.
//!
//! SYSTEM CONTEXT
//! ==============
//! A message from someone else while its window is minimized or closed gets
//! a tone plus (permission allowing) an OS notification. The decision logic
//! is pure; the browser calls are gated behind `hydrate`.

#[cfg(test)]
#[path = "notify_test.rs"]
mod notify_test;

use crate::state::windows::WindowMode;

/// A message qualifies for unread counting and notification only when it
/// was authored by someone other than the current user.
#[must_use]
pub fn is_qualifying(sender_username: &str, current_username: &str) -> bool {
    sender_username != current_username
}

/// Notify when the message qualifies and its window is not in the
/// foreground, meaning minimized or no active window at all.
#[must_use]
pub fn should_notify(mode: WindowMode, qualifying: bool) -> bool {
    qualifying && matches!(mode, WindowMode::Closed | WindowMode::Minimized)
}

/// Notification title: subject plus class code.
#[must_use]
pub fn notification_title(subject_name: &str, class_code: &str) -> String {
    format!("{subject_name} ({class_code})")
}

/// Notification body: sender-attributed message text.
#[must_use]
pub fn notification_body(sender_username: &str, content: &str) -> String {
    format!("{sender_username}: {content}")
}

/// Ask for notification permission once per page if it was never answered.
/// A prior denial is respected and never re-prompted.
#[cfg(feature = "hydrate")]
pub fn request_permission_once() {
    use std::cell::Cell;

    thread_local! {
        static REQUESTED: Cell<bool> = const { Cell::new(false) };
    }

    if REQUESTED.with(Cell::get) {
        return;
    }
    REQUESTED.with(|flag| flag.set(true));

    if web_sys::Notification::permission() == web_sys::NotificationPermission::Default {
        if let Err(e) = web_sys::Notification::request_permission() {
            leptos::logging::warn!("notification permission request failed: {e:?}");
        }
    }
}

/// Fire both notification effects for one qualifying message: the short
/// tone always, the OS notification only when permission is granted.
#[cfg(feature = "hydrate")]
pub fn dispatch(title: &str, body: &str) {
    crate::util::audio::play_message_tone();

    if web_sys::Notification::permission() != web_sys::NotificationPermission::Granted {
        return;
    }
    let options = web_sys::NotificationOptions::new();
    options.set_body(body);
    if let Err(e) = web_sys::Notification::new_with_options(title, &options) {
        leptos::logging::warn!("failed to show notification: {e:?}");
    }
}
