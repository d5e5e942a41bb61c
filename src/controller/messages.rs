use super::update::{ObserverKind, PlayIntent, Timer};
use crate::dom::{ElementId, PageInventory};
use serde::{Deserialize, Serialize};

/// How the current document was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavigationType {
    #[default]
    Fresh,
    BackForward,
}

impl NavigationType {
    /// Classify a `PerformanceNavigationTiming.type` string.
    pub fn from_entry_type(entry_type: Option<&str>) -> Self {
        match entry_type {
            Some("back_forward") => NavigationType::BackForward,
            _ => NavigationType::Fresh,
        }
    }
}

/// Overlay markers as currently present on the body, read by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BodyMarkers {
    pub open: bool,
    pub locked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub ratio: f64,
    pub is_intersecting: bool,
    /// Largest ratio the target can reach in the current viewport; below 1.0
    /// only for targets taller than the viewport.
    pub reachable_ratio: f64,
}

impl IntersectionEntry {
    /// True when the entry counts as "in view" for an observer with `threshold`.
    ///
    /// A target that can never reach `threshold` is in view as soon as it
    /// intersects at all.
    pub fn in_view(&self, threshold: f64) -> bool {
        self.is_intersecting && (self.ratio >= threshold || self.reachable_ratio < threshold)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The play promise resolved; `ready_state` is `HTMLMediaElement.readyState` at that moment.
    Started { ready_state: u16 },
    /// The play promise rejected (autoplay policy, power saving, ...).
    Rejected { reason: String },
}

/// Typed browser signals fed to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    DomReady {
        inventory: PageInventory,
        navigation: NavigationType,
    },
    OverlayInit {
        trigger: Option<ElementId>,
    },
    /// Carries the body markers as they were when the trigger was clicked.
    TriggerActivated {
        scroll_y: f64,
        markers: BodyMarkers,
    },
    Resized {
        width: f64,
    },
    Loaded,
    LoadSettled {
        markers: BodyMarkers,
    },
    PageShow {
        persisted: bool,
    },
    Intersection {
        observer: ObserverKind,
        entry: IntersectionEntry,
    },
    PlaybackSettled {
        video: ElementId,
        intent: PlayIntent,
        outcome: PlayOutcome,
    },
    VideoPlaying {
        video: ElementId,
    },
    PlayAffordanceActivated {
        video: ElementId,
    },
    TimerElapsed(Timer),
}
