//! Root application component with context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};

use crate::components::chat_dock::ChatDock;
use crate::net::api;
use crate::net::chat_client::ConnectionManager;
use crate::state::messages::MessagesState;
use crate::state::roster::RosterState;
use crate::state::session::SessionState;
use crate::state::windows::WindowsState;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides all shared state contexts and bootstraps the session before
/// mounting the chat dock.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    // Provide reactive state contexts for all child components.
    let session = RwSignal::new(SessionState {
        session: None,
        loading: true,
    });
    let messages = RwSignal::new(MessagesState::default());
    let windows = RwSignal::new(WindowsState::default());
    let roster = RwSignal::new(RosterState::default());
    let conns = RwSignal::new(ConnectionManager::default());

    provide_context(session);
    provide_context(messages);
    provide_context(windows);
    provide_context(roster);
    provide_context(conns);

    // Session bootstrap: everything downstream waits on this.
    Effect::new(move || {
        leptos::task::spawn_local(async move {
            let info = api::fetch_session().await;
            if info.is_none() {
                leptos::logging::warn!("no authenticated session; chat stays offline");
            }
            session.update(|s| {
                s.session = info;
                s.loading = false;
            });
        });
    });

    view! {
        <Stylesheet id="leptos" href="/pkg/classchat.css"/>
        <Title text="Class Chat"/>

        <main class="portal-shell">
            <ChatDock/>
        </main>
    }
}
