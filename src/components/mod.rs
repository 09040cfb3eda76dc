//! UI components for the chat dock and per-class chat windows.

pub mod chat_dock;
pub mod chat_window;
