//! Network layer: REST calls, the STOMP connection manager, and the wire
//! types shared between them.
//!
//! DESIGN
//! ======
//! REST (`api`) covers history, unread baselines, and mark-read; live
//! traffic flows through `chat_client` over STOMP. `dispatch` holds the
//! pure inbound pipeline so the de-dup and unread rules are testable
//! without a socket.

pub mod api;
pub mod chat_client;
pub mod dispatch;
pub mod types;
