//! REST helpers for the session, roster, chat-history, and unread endpoints.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning `None`/error since these endpoints
//! are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Callers get `Option`/`Result` outputs instead of panics. A failed
//! history fetch renders an empty message list; a failed mark-read is
//! logged by the caller and never rolled back.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::collections::HashMap;

use super::types::{ChatMessage, ClassInfo, SessionInfo};
#[cfg(feature = "hydrate")]
use super::types::UnreadCounts;

#[cfg(any(test, feature = "hydrate"))]
fn chat_history_endpoint(class_id: i64) -> String {
    format!("/api/chat/{class_id}")
}

#[cfg(any(test, feature = "hydrate"))]
fn mark_read_endpoint(class_id: i64) -> String {
    format!("/api/chat/{class_id}/mark-read")
}

#[cfg(any(test, feature = "hydrate"))]
fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

#[cfg(any(test, feature = "hydrate"))]
fn mark_read_failed_message(status: u16) -> String {
    format!("mark-read failed: {status}")
}

/// Fetch the authenticated session from `/api/auth/session`.
/// Returns `None` if not authenticated or on the server.
pub async fn fetch_session() -> Option<SessionInfo> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get("/api/auth/session")
            .send()
            .await
            .ok()?;
        if !resp.ok() {
            return None;
        }
        resp.json::<SessionInfo>().await.ok()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

/// Fetch the enrolled-class roster from `/api/classes`.
pub async fn fetch_class_roster(token: &str) -> Option<Vec<ClassInfo>> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get("/api/classes")
            .header("Authorization", &bearer(token))
            .send()
            .await
            .ok()?;
        if !resp.ok() {
            return None;
        }
        resp.json::<Vec<ClassInfo>>().await.ok()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = token;
        None
    }
}

/// Fetch a class's chat history (oldest first) from `/api/chat/{classId}`.
/// `None` means the list renders empty; there is no retry affordance.
pub async fn fetch_chat_history(token: &str, class_id: i64) -> Option<Vec<ChatMessage>> {
    #[cfg(feature = "hydrate")]
    {
        let url = chat_history_endpoint(class_id);
        let resp = gloo_net::http::Request::get(&url)
            .header("Authorization", &bearer(token))
            .send()
            .await
            .ok()?;
        if !resp.ok() {
            return None;
        }
        resp.json::<Vec<ChatMessage>>().await.ok()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (token, class_id);
        None
    }
}

/// Fetch the persisted unread baseline from `/api/chat/unread-counts`.
pub async fn fetch_unread_counts(token: &str) -> Option<HashMap<i64, u32>> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get("/api/chat/unread-counts")
            .header("Authorization", &bearer(token))
            .send()
            .await
            .ok()?;
        if !resp.ok() {
            return None;
        }
        let counts = resp.json::<UnreadCounts>().await.ok()?;
        Some(counts.unread_by_class)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = token;
        None
    }
}

/// Zero the server-side unread counter via `POST /api/chat/{classId}/mark-read`.
///
/// Idempotent on the server. Fire-and-forget at the call sites: the local
/// optimistic reset has already happened and is never rolled back.
///
/// # Errors
///
/// Returns an error string when the request fails or the server responds
/// with a non-OK status; callers log it and move on.
pub async fn mark_read(token: &str, class_id: i64) -> Result<(), String> {
    #[cfg(feature = "hydrate")]
    {
        let url = mark_read_endpoint(class_id);
        let resp = gloo_net::http::Request::post(&url)
            .header("Authorization", &bearer(token))
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(mark_read_failed_message(resp.status()));
        }
        Ok(())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (token, class_id);
        Err("not available on server".to_owned())
    }
}
