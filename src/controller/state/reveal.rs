use crate::dom::ElementId;
use std::collections::HashSet;

/// Scroll-reveal records. Membership in `revealed` is permanent.
#[derive(Debug, Default)]
pub struct RevealState {
    pub(in crate::controller) observed: HashSet<ElementId>,
    pub(in crate::controller) revealed: HashSet<ElementId>,
}

impl RevealState {
    pub(in crate::controller) fn is_revealed(&self, element: ElementId) -> bool {
        self.revealed.contains(&element)
    }

    /// Marks `element` revealed; false if it was not observed or already revealed.
    pub(in crate::controller) fn mark_revealed(&mut self, element: ElementId) -> bool {
        if !self.observed.remove(&element) {
            return false;
        }
        self.revealed.insert(element)
    }
}
