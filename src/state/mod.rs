//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by domain (`session`, `messages`, `windows`, etc.) so
//! individual components can depend on small focused models. Each model is
//! a plain struct; components wrap them in `RwSignal` contexts.

pub mod messages;
pub mod roster;
pub mod session;
pub mod summaries;
pub mod windows;
