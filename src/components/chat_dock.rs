//! Chat dock: the entry point for class chat across the portal.
//!
//! Shows one launcher button with the total unread badge, a sorted class
//! list when expanded, chips for minimized windows, and the open chat
//! windows themselves. On mount it loads the class roster and the unread
//! baseline, then seeds window state from the server counts.

use leptos::prelude::*;

use crate::components::chat_window::ChatWindow;
use crate::net::api;
use crate::net::chat_client::ConnectionManager;
use crate::state::messages::MessagesState;
use crate::state::roster::RosterState;
use crate::state::session::SessionState;
use crate::state::summaries::{build_summaries, total_badge};
use crate::state::windows::{WindowMode, WindowsState};

/// Dock component. Mount once per page, after the session context loads.
#[component]
pub fn ChatDock() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let messages = expect_context::<RwSignal<MessagesState>>();
    let windows = expect_context::<RwSignal<WindowsState>>();
    let roster = expect_context::<RwSignal<RosterState>>();
    let conns = expect_context::<RwSignal<ConnectionManager>>();

    let expanded = RwSignal::new(false);
    let baseline_requested = RwSignal::new(false);

    // Load the roster and the unread baseline once the session is known.
    Effect::new(move || {
        let state = session.get();
        if state.loading || state.session.is_none() || baseline_requested.get() {
            return;
        }
        baseline_requested.set(true);

        #[cfg(feature = "hydrate")]
        crate::util::notify::request_permission_once();

        let token = state.token().unwrap_or_default().to_owned();
        leptos::task::spawn_local(async move {
            if let Some(classes) = api::fetch_class_roster(&token).await {
                roster.update(|r| {
                    r.classes = classes;
                    r.loading = false;
                });
            } else {
                leptos::logging::warn!("class roster fetch failed");
                roster.update(|r| r.loading = false);
            }

            // Baseline counts merge under local state: windows opened in
            // the meantime keep their zeroed counters.
            if let Some(counts) = api::fetch_unread_counts(&token).await {
                windows.update(|w| {
                    for (class_id, count) in counts {
                        w.set_baseline(class_id, count);
                    }
                });
            } else {
                leptos::logging::warn!("unread baseline fetch failed");
            }
        });
    });

    // Open a class window: flip window state, reconcile unread with the
    // server, seed history once, and bring up the live connection.
    let open_class = move |class_id: i64| {
        let mut newly_opened = false;
        let mut rev_at_open = 0;
        windows.update(|w| {
            newly_opened = w.open(class_id);
            rev_at_open = w.unread_rev(class_id);
        });
        expanded.set(false);
        if !newly_opened {
            return;
        }

        let Some(token) = session.get_untracked().token().map(str::to_owned) else {
            return;
        };

        if messages.get_untracked().needs_history(class_id) {
            let history_token = token.clone();
            leptos::task::spawn_local(async move {
                if let Some(history) = api::fetch_chat_history(&history_token, class_id).await {
                    messages.update(|m| m.seed_history(class_id, history));
                } else {
                    leptos::logging::warn!("history fetch failed for class {class_id}");
                }
            });
        }

        // The local counter is already zero; tell the server so other
        // devices agree. Failures leave only server-side drift.
        let mark_token = token.clone();
        leptos::task::spawn_local(async move {
            match api::mark_read(&mark_token, class_id).await {
                Ok(()) => {
                    let rev_now = windows.get_untracked().unread_rev(class_id);
                    if rev_now != rev_at_open {
                        leptos::logging::log!(
                            "unread moved during mark-read for class {class_id}"
                        );
                    }
                }
                Err(e) => leptos::logging::warn!("class {class_id}: {e}"),
            }
        });

        #[cfg(feature = "hydrate")]
        crate::net::chat_client::open_class_connection(
            class_id, token, conns, session, messages, windows, roster,
        );
        #[cfg(not(feature = "hydrate"))]
        let _ = conns;
    };

    let badge_total = move || {
        let summaries = build_summaries(&roster.get().classes, &windows.get());
        total_badge(&summaries)
    };

    view! {
        <div class="chat-dock">
            <div class="chat-dock__windows">
                {move || {
                    // Stacking follows the same order as the chat list.
                    build_summaries(&roster.get().classes, &windows.get())
                        .into_iter()
                        .filter(|s| s.mode == WindowMode::Open)
                        .map(|s| view! { <ChatWindow class_id=s.class_id/> })
                        .collect::<Vec<_>>()
                }}
            </div>

            <div class="chat-dock__chips">
                {move || {
                    build_summaries(&roster.get().classes, &windows.get())
                        .into_iter()
                        .filter(|s| s.mode == WindowMode::Minimized)
                        .map(|s| (s.class_id, s.unread_count, s.class_code))
                        .map(|(class_id, unread, label)| {
                            view! {
                                <button
                                    class="chat-dock__chip"
                                    on:click=move |_| open_class(class_id)
                                >
                                    {label}
                                    {(unread > 0)
                                        .then(|| {
                                            view! {
                                                <span class="chat-dock__chip-badge">{unread}</span>
                                            }
                                        })}
                                </button>
                            }
                        })
                        .collect::<Vec<_>>()
                }}
            </div>

            <button
                class="chat-dock__launcher"
                on:click=move |_| expanded.update(|open| *open = !*open)
            >
                "Chats"
                {move || {
                    let total = badge_total();
                    (total > 0)
                        .then(|| view! { <span class="chat-dock__badge">{total}</span> })
                }}
            </button>

            {move || {
                expanded
                    .get()
                    .then(|| {
                        let summaries = build_summaries(&roster.get().classes, &windows.get());
                        if summaries.is_empty() {
                            return view! {
                                <div class="chat-dock__empty">"No classes"</div>
                            }
                                .into_any();
                        }

                        view! {
                            <div class="chat-dock__list">
                                {summaries
                                    .into_iter()
                                    .map(|summary| {
                                        let class_id = summary.class_id;
                                        let preview = summary
                                            .last_message_sender
                                            .as_deref()
                                            .zip(summary.last_message.as_deref())
                                            .map(|(sender, text)| format!("{sender}: {text}"));
                                        view! {
                                            <button
                                                class="chat-dock__row"
                                                on:click=move |_| open_class(class_id)
                                            >
                                                <span class="chat-dock__row-code">
                                                    {summary.class_code.clone()}
                                                </span>
                                                <span class="chat-dock__row-subject">
                                                    {summary.subject_name.clone()}
                                                </span>
                                                {preview
                                                    .map(|text| {
                                                        view! {
                                                            <span class="chat-dock__row-preview">{text}</span>
                                                        }
                                                    })}
                                                {(summary.unread_count > 0)
                                                    .then(|| {
                                                        view! {
                                                            <span class="chat-dock__row-badge">
                                                                {summary.unread_count}
                                                            </span>
                                                        }
                                                    })}
                                            </button>
                                        }
                                    })
                                    .collect::<Vec<_>>()}
                            </div>
                        }
                            .into_any()
                    })
            }}
        </div>
    }
}
