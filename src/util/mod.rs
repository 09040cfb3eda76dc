//! Small shared helpers outside the state/net split.

pub mod audio;
pub mod notify;
