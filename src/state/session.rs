#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::net::types::SessionInfo;

/// Authenticated-session state: who the current user is and the bearer
/// token handed to REST calls and the transport CONNECT handshake.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    pub session: Option<SessionInfo>,
    pub loading: bool,
}

impl SessionState {
    /// Username used for self-message filtering; empty before login.
    #[must_use]
    pub fn current_username(&self) -> &str {
        self.session.as_ref().map_or("", |s| s.username.as_str())
    }

    /// Bearer token, if a session is established.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }
}
