use crate::dom::{ElementId, Target};
use serde::Serialize;
use std::time::Duration;

mod media;
mod overlay;
mod reducer;
mod reveal;
mod typography;
mod visibility;

/// Fixed-delay timers. Elapsed timers come back as `Message::TimerElapsed`,
/// except `LoadSettle`, which the runtime turns into `Message::LoadSettled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Timer {
    RevealDocument,
    ClearClosing,
    LoadSettle,
    DetachFallback(ElementId),
}

/// Viewport observers; each host keeps one per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ObserverKind {
    Autoplay,
    PlayWhileVisible,
    Reveal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PlayIntent {
    Autoplay,
    Manual,
}

/// Event sources the host binds on request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Listener {
    TriggerClick(ElementId),
    WindowResize,
    /// One-time `playing` event on a video.
    VideoPlayingOnce(ElementId),
    /// One-time activation of a play button, reported for `video`.
    PlayAffordanceOnce { button: ElementId, video: ElementId },
}

/// Describes work that must be performed outside the pure reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    AddClass {
        target: Target,
        class: String,
    },
    RemoveClass {
        target: Target,
        class: String,
    },
    SetStyle {
        target: Target,
        property: String,
        value: String,
    },
    RemoveStyle {
        target: Target,
        property: String,
    },
    ScrollTo {
        y: f64,
    },
    SetAttribute {
        element: ElementId,
        name: String,
        value: String,
    },
    RemoveAttribute {
        element: ElementId,
        name: String,
    },
    SetMuted {
        video: ElementId,
        muted: bool,
    },
    SetControls {
        video: ElementId,
        enabled: bool,
    },
    /// Start playback; the outcome returns as `Message::PlaybackSettled`.
    Play {
        video: ElementId,
        intent: PlayIntent,
    },
    /// Play if paused; a rejection is swallowed and never reported.
    ResumeIfPaused {
        video: ElementId,
    },
    Pause {
        video: ElementId,
    },
    Seek {
        video: ElementId,
        seconds: f64,
    },
    SetInnerHtml {
        element: ElementId,
        html: String,
    },
    Detach {
        element: ElementId,
    },
    Observe {
        observer: ObserverKind,
        threshold: f64,
        target: ElementId,
    },
    Unobserve {
        observer: ObserverKind,
        target: ElementId,
    },
    Listen(Listener),
    Schedule {
        timer: Timer,
        delay: Duration,
    },
}

impl Effect {
    /// Variant name, for log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Effect::AddClass { .. } => "add-class",
            Effect::RemoveClass { .. } => "remove-class",
            Effect::SetStyle { .. } => "set-style",
            Effect::RemoveStyle { .. } => "remove-style",
            Effect::ScrollTo { .. } => "scroll-to",
            Effect::SetAttribute { .. } => "set-attribute",
            Effect::RemoveAttribute { .. } => "remove-attribute",
            Effect::SetMuted { .. } => "set-muted",
            Effect::SetControls { .. } => "set-controls",
            Effect::Play { .. } => "play",
            Effect::ResumeIfPaused { .. } => "resume-if-paused",
            Effect::Pause { .. } => "pause",
            Effect::Seek { .. } => "seek",
            Effect::SetInnerHtml { .. } => "set-inner-html",
            Effect::Detach { .. } => "detach",
            Effect::Observe { .. } => "observe",
            Effect::Unobserve { .. } => "unobserve",
            Effect::Listen(_) => "listen",
            Effect::Schedule { .. } => "schedule",
        }
    }

    pub(super) fn show(element: ElementId) -> Self {
        Effect::SetStyle {
            target: Target::Element(element),
            property: "display".to_string(),
            value: "block".to_string(),
        }
    }

    pub(super) fn hide(element: ElementId) -> Self {
        Effect::SetStyle {
            target: Target::Element(element),
            property: "display".to_string(),
            value: "none".to_string(),
        }
    }
}
