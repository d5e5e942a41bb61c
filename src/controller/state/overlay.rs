use crate::dom::ElementId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub enum OverlayPhase {
    #[default]
    Closed,
    Open,
}

/// Logical overlay state as the stylesheet sees it.
///
/// Opening has no exit animation of its own, so `Opening` collapses into
/// `Open` the moment the markers are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum OverlayView {
    Closed,
    Open,
    Closing,
}

/// Navigation overlay model. `saved_scroll` lives for one open/close cycle.
#[derive(Debug, Clone, Default)]
pub struct OverlayState {
    pub(in crate::controller) trigger: Option<ElementId>,
    pub(in crate::controller) phase: OverlayPhase,
    pub(in crate::controller) locked: bool,
    pub(in crate::controller) closing: bool,
    pub(in crate::controller) saved_scroll: f64,
    pub(in crate::controller) load_settle_scheduled: bool,
}

impl OverlayState {
    /// False when no trigger was found; the controller then ignores input.
    pub fn is_armed(&self) -> bool {
        self.trigger.is_some()
    }

    pub fn phase(&self) -> OverlayPhase {
        self.phase
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_closing(&self) -> bool {
        self.closing
    }

    pub fn saved_scroll(&self) -> f64 {
        self.saved_scroll
    }

    pub fn view(&self) -> OverlayView {
        match (self.phase, self.closing) {
            (OverlayPhase::Open, _) => OverlayView::Open,
            (OverlayPhase::Closed, true) => OverlayView::Closing,
            (OverlayPhase::Closed, false) => OverlayView::Closed,
        }
    }

    pub(in crate::controller) fn enter_open(&mut self, scroll_y: f64) {
        self.saved_scroll = scroll_y;
        self.phase = OverlayPhase::Open;
        self.locked = true;
    }

    /// Returns the offset to restore.
    pub(in crate::controller) fn enter_closing(&mut self) -> f64 {
        self.phase = OverlayPhase::Closed;
        self.locked = false;
        self.closing = true;
        let restore = self.saved_scroll;
        self.saved_scroll = 0.0;
        restore
    }

    /// Aligns `phase` with the open marker on the body; true when they had drifted.
    pub(in crate::controller) fn sync_open_marker(&mut self, open: bool) -> bool {
        match (self.phase, open) {
            (OverlayPhase::Open, false) => {
                self.force_closed();
                true
            }
            (OverlayPhase::Closed, true) => {
                self.phase = OverlayPhase::Open;
                true
            }
            _ => false,
        }
    }

    pub(in crate::controller) fn force_closed(&mut self) {
        self.phase = OverlayPhase::Closed;
        self.locked = false;
    }
}
