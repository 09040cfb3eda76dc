#[cfg(test)]
#[path = "roster_test.rs"]
mod roster_test;

use crate::net::types::ClassInfo;

/// Enrolled-class roster fetched from the portal.
///
/// In the full Leptos wiring this lives behind an `RwSignal` provided via
/// context; the model itself is a plain struct.
#[derive(Clone, Debug, Default)]
pub struct RosterState {
    pub classes: Vec<ClassInfo>,
    pub loading: bool,
}

impl RosterState {
    /// Class metadata by id, if enrolled.
    #[must_use]
    pub fn class(&self, class_id: i64) -> Option<&ClassInfo> {
        self.classes.iter().find(|c| c.class_id == class_id)
    }
}
