//! Per-class STOMP connection manager and session lifecycle.
//!
//! The manager owns one transport session per opened class, keyed by class
//! id and scoped to the authenticated session via Leptos context, with no
//! window-global socket handles. Each session task connects, performs the
//! CONNECT handshake carrying the bearer token, subscribes to the class
//! topic, and pumps frames until the window closes or the bounded
//! reconnect budget runs out.
//!
//! All WebSocket logic is gated behind `#[cfg(feature = "hydrate")]` since
//! it requires a browser environment; the bookkeeping that decides when a
//! session starts, which writes are stale, and how backoff grows is plain
//! code with native tests.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures are logged and surfaced as connection status only.
//! Teardown is best-effort: UNSUBSCRIBE/DISCONNECT are queued and errors
//! swallowed, and `close` is safe on an already-disconnected class.

#[cfg(test)]
#[path = "chat_client_test.rs"]
mod chat_client_test;

use std::collections::HashMap;

#[cfg(feature = "hydrate")]
use crate::net::dispatch::apply_inbound;
#[cfg(feature = "hydrate")]
use crate::net::types::OutgoingChatMessage;
#[cfg(feature = "hydrate")]
use crate::net::types::parse_chat_message;
#[cfg(feature = "hydrate")]
use crate::state::messages::MessagesState;
#[cfg(feature = "hydrate")]
use crate::state::roster::RosterState;
#[cfg(feature = "hydrate")]
use crate::state::session::SessionState;
#[cfg(feature = "hydrate")]
use crate::state::windows::WindowsState;
#[cfg(feature = "hydrate")]
use crate::util::notify;
#[cfg(feature = "hydrate")]
use leptos::prelude::GetUntracked;
#[cfg(feature = "hydrate")]
use leptos::prelude::RwSignal;
#[cfg(feature = "hydrate")]
use leptos::prelude::Update;

/// Transport lifecycle of one class connection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
}

/// Connect attempts per window lifecycle before giving up; recovery after
/// exhaustion is manual (the user reopens the window).
pub const MAX_CONNECT_ATTEMPTS: u32 = 5;

/// Exponential backoff before reconnect attempt `attempt` (1-based),
/// doubling from one second and capped at ten.
#[must_use]
pub fn backoff_delay_ms(attempt: u32) -> u64 {
    let exp = attempt.saturating_sub(1).min(16);
    (1000_u64 << exp).min(10_000)
}

/// Broadcast topic for a class.
#[must_use]
pub fn class_topic(class_id: i64) -> String {
    format!("/topic/class/{class_id}")
}

/// Application destination for outbound chat messages.
#[must_use]
pub fn send_destination(class_id: i64) -> String {
    format!("/app/chat.sendMessage/{class_id}")
}

/// Deterministic subscription id, one per class.
#[must_use]
pub fn subscription_id(class_id: i64) -> String {
    format!("sub-{class_id}")
}

/// Connection registry: status, teardown epoch, and outgoing sender per
/// class. Stored in an `RwSignal` context so components can react to
/// status changes.
#[derive(Clone, Debug, Default)]
pub struct ConnectionManager {
    status: HashMap<i64, ConnectionStatus>,
    /// Bumped on every teardown; a session task whose epoch is stale may
    /// no longer write state (rapid close/open tolerance).
    epochs: HashMap<i64, u64>,
    #[cfg(feature = "hydrate")]
    senders: HashMap<i64, futures::channel::mpsc::UnboundedSender<String>>,
}

impl ConnectionManager {
    #[must_use]
    pub fn status(&self, class_id: i64) -> ConnectionStatus {
        self.status
            .get(&class_id)
            .copied()
            .unwrap_or(ConnectionStatus::Disconnected)
    }

    #[must_use]
    pub fn is_connected(&self, class_id: i64) -> bool {
        self.status(class_id) == ConnectionStatus::Connected
    }

    /// Whether a session task currently owns this class (any non-idle
    /// status). `open` is a no-op while this holds.
    #[must_use]
    pub fn session_live(&self, class_id: i64) -> bool {
        self.status(class_id) != ConnectionStatus::Disconnected
    }

    /// Current teardown epoch for a class.
    #[must_use]
    pub fn epoch(&self, class_id: i64) -> u64 {
        self.epochs.get(&class_id).copied().unwrap_or(0)
    }

    /// Claim the class for a new session task.
    ///
    /// Returns the epoch the task must present on every status write, or
    /// `None` when a live session already owns the class (idempotent
    /// open).
    pub fn begin_session(&mut self, class_id: i64) -> Option<u64> {
        if self.session_live(class_id) {
            return None;
        }
        self.status.insert(class_id, ConnectionStatus::Connecting);
        Some(self.epoch(class_id))
    }

    /// Status write guarded by the teardown epoch; stale writers are
    /// ignored so a reopened class never sees a dead task's status.
    pub fn set_status_if_current(
        &mut self,
        class_id: i64,
        epoch: u64,
        status: ConnectionStatus,
    ) -> bool {
        if self.epoch(class_id) != epoch {
            return false;
        }
        self.status.insert(class_id, status);
        true
    }

    /// Tear down a class session: bump the epoch, drop the sender, and
    /// mark the class disconnected. Safe when nothing was live.
    pub fn end_session(&mut self, class_id: i64) {
        *self.epochs.entry(class_id).or_insert(0) += 1;
        self.status.insert(class_id, ConnectionStatus::Disconnected);
        #[cfg(feature = "hydrate")]
        self.senders.remove(&class_id);
    }

    #[cfg(feature = "hydrate")]
    fn sender(&self, class_id: i64) -> Option<futures::channel::mpsc::UnboundedSender<String>> {
        self.senders.get(&class_id).cloned()
    }

    #[cfg(feature = "hydrate")]
    fn take_sender(
        &mut self,
        class_id: i64,
    ) -> Option<futures::channel::mpsc::UnboundedSender<String>> {
        self.senders.remove(&class_id)
    }
}

/// Open the transport session for a class. Idempotent: a class with a live
/// session keeps it untouched.
#[cfg(feature = "hydrate")]
pub fn open_class_connection(
    class_id: i64,
    token: String,
    conns: RwSignal<ConnectionManager>,
    session: RwSignal<SessionState>,
    messages: RwSignal<MessagesState>,
    windows: RwSignal<WindowsState>,
    roster: RwSignal<RosterState>,
) {
    let mut claim = None;
    conns.update(|c| claim = c.begin_session(class_id));
    let Some(epoch) = claim else {
        return;
    };

    let (tx, rx) = futures::channel::mpsc::unbounded::<String>();
    conns.update(|c| {
        c.senders.insert(class_id, tx);
    });

    leptos::task::spawn_local(class_session_loop(
        class_id, token, epoch, conns, session, messages, windows, roster, rx,
    ));
}

/// Close the transport session for a class: queue UNSUBSCRIBE and
/// DISCONNECT, then drop the sender so the session task drains and exits.
/// Best-effort; safe on an already-disconnected class.
#[cfg(feature = "hydrate")]
pub fn close_class_connection(conns: RwSignal<ConnectionManager>, class_id: i64) {
    let mut tx = None;
    conns.update(|c| {
        tx = c.take_sender(class_id);
        c.end_session(class_id);
    });
    let Some(tx) = tx else {
        return;
    };
    let _ = tx.unbounded_send(stomp::encode_frame(&stomp::Frame::unsubscribe(
        &subscription_id(class_id),
    )));
    let _ = tx.unbounded_send(stomp::encode_frame(&stomp::Frame::disconnect()));
}

/// Send a chat message over a class's live connection.
///
/// Returns `false` when no connection exists or the channel is closed; the
/// composer keeps its text in that case.
#[cfg(feature = "hydrate")]
pub fn send_chat(conns: RwSignal<ConnectionManager>, class_id: i64, content: &str) -> bool {
    let Some(tx) = conns.get_untracked().sender(class_id) else {
        return false;
    };
    let Ok(body) = serde_json::to_string(&OutgoingChatMessage {
        content: content.to_owned(),
    }) else {
        return false;
    };
    let frame = stomp::Frame::send_json(&send_destination(class_id), body);
    tx.unbounded_send(stomp::encode_frame(&frame)).is_ok()
}

/// How one connection attempt ended.
#[cfg(feature = "hydrate")]
enum SessionEnd {
    /// The outgoing channel drained to completion; the window closed.
    LocalClose,
    /// The server or network dropped the connection.
    RemoteDrop,
}

/// Connection loop for one class session: connect, run, and retry with
/// bounded backoff until closed locally or the attempt budget is spent.
#[cfg(feature = "hydrate")]
#[allow(clippy::too_many_arguments)]
async fn class_session_loop(
    class_id: i64,
    token: String,
    epoch: u64,
    conns: RwSignal<ConnectionManager>,
    session: RwSignal<SessionState>,
    messages: RwSignal<MessagesState>,
    windows: RwSignal<WindowsState>,
    roster: RwSignal<RosterState>,
    rx: futures::channel::mpsc::UnboundedReceiver<String>,
) {
    use std::cell::RefCell;
    use std::rc::Rc;

    let rx = Rc::new(RefCell::new(rx));
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        let result = connect_and_run(
            class_id, &token, epoch, conns, session, messages, windows, roster, &rx,
        )
        .await;

        match result {
            Ok(SessionEnd::LocalClose) => {
                set_status(conns, class_id, epoch, ConnectionStatus::Disconnected);
                return;
            }
            Ok(SessionEnd::RemoteDrop) => {
                leptos::logging::warn!("chat transport dropped for class {class_id}");
            }
            Err(e) => {
                leptos::logging::warn!("chat connect failed for class {class_id}: {e}");
            }
        }

        if attempt >= MAX_CONNECT_ATTEMPTS {
            leptos::logging::warn!(
                "giving up on class {class_id} after {attempt} attempts; reopen to reconnect"
            );
            set_status(conns, class_id, epoch, ConnectionStatus::Disconnected);
            conns.update(|c| {
                if c.epoch(class_id) == epoch {
                    c.senders.remove(&class_id);
                }
            });
            return;
        }

        if !set_status(conns, class_id, epoch, ConnectionStatus::Reconnecting) {
            // Torn down while we were connecting or waiting.
            return;
        }
        gloo_timers::future::sleep(std::time::Duration::from_millis(backoff_delay_ms(attempt)))
            .await;
    }
}

/// Guarded status write; `false` means this session was torn down.
#[cfg(feature = "hydrate")]
fn set_status(
    conns: RwSignal<ConnectionManager>,
    class_id: i64,
    epoch: u64,
    status: ConnectionStatus,
) -> bool {
    let mut applied = false;
    conns.update(|c| applied = c.set_status_if_current(class_id, epoch, status));
    applied
}

/// WebSocket endpoint derived from the page location.
#[cfg(feature = "hydrate")]
fn chat_ws_url() -> String {
    let location = web_sys::window()
        .and_then(|w| w.location().href().ok())
        .unwrap_or_default();
    let ws_proto = if location.starts_with("https") { "wss" } else { "ws" };
    let host = web_sys::window()
        .and_then(|w| w.location().host().ok())
        .unwrap_or_else(|| "localhost:3000".to_owned());
    format!("{ws_proto}://{host}/ws/chat")
}

/// One connection attempt: open the socket, STOMP handshake, subscribe,
/// then pump frames until either side ends the session.
#[cfg(feature = "hydrate")]
#[allow(clippy::too_many_arguments)]
async fn connect_and_run(
    class_id: i64,
    token: &str,
    epoch: u64,
    conns: RwSignal<ConnectionManager>,
    session: RwSignal<SessionState>,
    messages: RwSignal<MessagesState>,
    windows: RwSignal<WindowsState>,
    roster: RwSignal<RosterState>,
    rx: &std::rc::Rc<std::cell::RefCell<futures::channel::mpsc::UnboundedReceiver<String>>>,
) -> Result<SessionEnd, String> {
    use futures::{SinkExt, StreamExt};
    use gloo_net::websocket::Message;
    use gloo_net::websocket::futures::WebSocket;

    let ws = WebSocket::open(&chat_ws_url()).map_err(|e| e.to_string())?;
    let (mut ws_write, mut ws_read) = ws.split();

    // CONNECT handshake carrying the bearer token.
    let connect = stomp::encode_frame(&stomp::Frame::connect(token));
    ws_write
        .send(Message::Text(connect))
        .await
        .map_err(|e| e.to_string())?;

    loop {
        let Some(msg) = ws_read.next().await else {
            return Err("socket closed during handshake".to_owned());
        };
        let text = match msg {
            Ok(Message::Text(text)) => text,
            Ok(Message::Bytes(_)) => continue,
            Err(e) => return Err(e.to_string()),
        };
        if stomp::is_heartbeat(&text) {
            continue;
        }
        match stomp::decode_frame(&text) {
            Ok(frame) if frame.command == stomp::Command::Connected => break,
            Ok(frame) if frame.command == stomp::Command::Error => {
                return Err(format!(
                    "broker rejected connect: {}",
                    frame.header("message").unwrap_or("unknown")
                ));
            }
            Ok(_) | Err(stomp::CodecError::Empty) => {}
            Err(e) => return Err(format!("handshake frame undecodable: {e}")),
        }
    }

    let subscribe = stomp::encode_frame(&stomp::Frame::subscribe(
        &subscription_id(class_id),
        &class_topic(class_id),
    ));
    ws_write
        .send(Message::Text(subscribe))
        .await
        .map_err(|e| e.to_string())?;

    if !set_status(conns, class_id, epoch, ConnectionStatus::Connected) {
        // Closed while the handshake was in flight.
        return Ok(SessionEnd::LocalClose);
    }

    let local_close = std::cell::Cell::new(false);

    // Forward queued outgoing frames; channel end means the window closed.
    let mut rx_borrow = rx.borrow_mut();
    let send_task = async {
        while let Some(text) = rx_borrow.next().await {
            if ws_write.send(Message::Text(text)).await.is_err() {
                return;
            }
        }
        local_close.set(true);
    };

    // Receive loop: decode frames and apply chat messages.
    let recv_task = async {
        while let Some(msg) = ws_read.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    handle_transport_text(&text, class_id, session, messages, windows, roster);
                }
                Ok(Message::Bytes(_)) => {}
                Err(e) => {
                    leptos::logging::warn!("chat recv error for class {class_id}: {e}");
                    break;
                }
            }
        }
    };

    futures::future::select(Box::pin(send_task), Box::pin(recv_task)).await;

    if local_close.get() {
        Ok(SessionEnd::LocalClose)
    } else {
        Ok(SessionEnd::RemoteDrop)
    }
}

/// Apply one inbound transport frame: validate, de-dup, update unread
/// state, and fan out notifications for qualifying messages.
#[cfg(feature = "hydrate")]
fn handle_transport_text(
    text: &str,
    class_id: i64,
    session: RwSignal<SessionState>,
    messages: RwSignal<MessagesState>,
    windows: RwSignal<WindowsState>,
    roster: RwSignal<RosterState>,
) {
    if stomp::is_heartbeat(text) {
        return;
    }
    let frame = match stomp::decode_frame(text) {
        Ok(frame) => frame,
        Err(stomp::CodecError::Empty) => return,
        Err(e) => {
            leptos::logging::warn!("dropping undecodable transport frame: {e}");
            return;
        }
    };

    match frame.command {
        stomp::Command::Message => {}
        stomp::Command::Error => {
            leptos::logging::warn!(
                "broker error frame: {}",
                frame.header("message").unwrap_or("unknown")
            );
            return;
        }
        _ => return,
    }

    let msg = match parse_chat_message(&frame.body) {
        Ok(msg) => msg,
        Err(e) => {
            leptos::logging::warn!("rejecting frame for class {class_id}: {e}");
            return;
        }
    };

    let current_username = session.get_untracked().current_username().to_owned();
    let mut outcome = crate::net::dispatch::InboundOutcome::default();
    messages.update(|m| {
        windows.update(|w| {
            outcome = apply_inbound(m, w, &current_username, class_id, &msg);
        });
    });

    if outcome.notify {
        let (title, body) = roster.get_untracked().class(class_id).map_or_else(
            || {
                (
                    format!("Class {class_id}"),
                    notify::notification_body(&msg.sender_username, &msg.content),
                )
            },
            |class| {
                (
                    notify::notification_title(&class.subject_name, &class.class_code),
                    notify::notification_body(&msg.sender_username, &msg.content),
                )
            },
        );
        notify::dispatch(&title, &body);
    }
}
