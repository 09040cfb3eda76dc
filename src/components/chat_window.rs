//! Floating chat window for one class: message history, connection status,
//! and the message composer.

use leptos::prelude::*;

use crate::net::chat_client::{ConnectionManager, ConnectionStatus};
use crate::state::messages::MessagesState;
use crate::state::roster::RosterState;
use crate::state::session::SessionState;
use crate::state::windows::WindowsState;

/// One open chat window. Rendered by the dock for every class whose window
/// is in the open state.
#[component]
pub fn ChatWindow(class_id: i64) -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let messages = expect_context::<RwSignal<MessagesState>>();
    let windows = expect_context::<RwSignal<WindowsState>>();
    let roster = expect_context::<RwSignal<RosterState>>();
    let conns = expect_context::<RwSignal<ConnectionManager>>();

    let input = RwSignal::new(String::new());
    let messages_ref = NodeRef::<leptos::html::Div>::new();

    // Pin the scroll position to the newest message.
    Effect::new(move || {
        let _ = messages.get().messages(class_id).len();

        #[cfg(feature = "hydrate")]
        {
            if let Some(el) = messages_ref.get() {
                let scroll_height = el.scroll_height();
                el.set_scroll_top(scroll_height);
            }
        }
    });

    let title = move || {
        roster.get().class(class_id).map_or_else(
            || format!("Class {class_id}"),
            |class| format!("{} ({})", class.subject_name, class.class_code),
        )
    };

    let status = move || conns.get().status(class_id);

    let status_label = move || match status() {
        ConnectionStatus::Disconnected => "offline",
        ConnectionStatus::Connecting => "connecting",
        ConnectionStatus::Connected => "live",
        ConnectionStatus::Reconnecting => "reconnecting",
    };

    let can_send =
        move || status() == ConnectionStatus::Connected && !input.get().trim().is_empty();

    // Send keeps the composer text when delivery is not possible, so a
    // drop mid-typing loses nothing.
    let do_send = move || {
        if !can_send() {
            return;
        }

        #[cfg(feature = "hydrate")]
        {
            let text = input.get();
            if crate::net::chat_client::send_chat(conns, class_id, text.trim()) {
                input.set(String::new());
            } else {
                leptos::logging::warn!("send failed for class {class_id}; keeping draft");
            }
        }
    };

    let on_click_send = move |_| do_send();

    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            do_send();
        }
    };

    let on_minimize = move |_| {
        windows.update(|w| {
            w.minimize(class_id);
        });
    };

    let on_close = move |_| {
        windows.update(|w| {
            w.close(class_id);
        });

        #[cfg(feature = "hydrate")]
        crate::net::chat_client::close_class_connection(conns, class_id);
    };

    view! {
        <div class="chat-window">
            <div class="chat-window__header">
                <span class="chat-window__title">{title}</span>
                <span class="chat-window__status" data-status=status_label>
                    {status_label}
                </span>
                <button class="chat-window__minimize" on:click=on_minimize>
                    "\u{2013}"
                </button>
                <button class="chat-window__close" on:click=on_close>
                    "\u{00d7}"
                </button>
            </div>

            {move || {
                (status() == ConnectionStatus::Reconnecting)
                    .then(|| {
                        view! {
                            <div class="chat-window__banner">"Connection lost, retrying..."</div>
                        }
                    })
            }}

            <div class="chat-window__messages" node_ref=messages_ref>
                {move || {
                    let current = session.get().current_username().to_owned();
                    let log = messages.get();
                    let log = log.messages(class_id);
                    if log.is_empty() {
                        return view! {
                            <div class="chat-window__empty">"No messages yet"</div>
                        }
                            .into_any();
                    }

                    log.iter()
                        .map(|msg| {
                            let own = msg.sender_username == current;
                            let sender = msg.sender_username.clone();
                            let role = msg.sender_role.clone();
                            let content = msg.content.clone();
                            view! {
                                <div
                                    class="chat-window__message"
                                    class=("chat-window__message--own", own)
                                >
                                    <span class="chat-window__sender" data-role=role>
                                        {sender}
                                    </span>
                                    <span class="chat-window__text">{content}</span>
                                </div>
                            }
                        })
                        .collect::<Vec<_>>()
                        .into_any()
                }}
            </div>

            <div class="chat-window__composer">
                <input
                    class="chat-window__input"
                    type="text"
                    placeholder="Type a message..."
                    prop:value=move || input.get()
                    disabled=move || status() != ConnectionStatus::Connected
                    on:input=move |ev| input.set(event_target_value(&ev))
                    on:keydown=on_keydown
                />
                <button
                    class="btn btn--primary chat-window__send"
                    on:click=on_click_send
                    disabled=move || !can_send()
                >
                    "Send"
                </button>
            </div>
        </div>
    }
}
