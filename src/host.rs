//! Seam between the controller and a concrete page.
//!
//! Every sink may fail (a detached node, a missing property on an odd
//! browser); the runtime logs the failure and moves on.

use crate::config::Markers;
use crate::controller::{BodyMarkers, Listener, NavigationType, ObserverKind, PlayIntent, Timer};
use crate::dom::{DomQuery, ElementId, Target};
use anyhow::Result;
use std::time::Duration;

pub trait Host: DomQuery {
    fn scroll_y(&self) -> f64;
    fn viewport_width(&self) -> f64;
    fn navigation_type(&self) -> NavigationType;
    fn has_target_class(&self, target: Target, class: &str) -> bool;

    fn body_markers(&self, markers: &Markers) -> BodyMarkers {
        BodyMarkers {
            open: self.has_target_class(Target::Body, &markers.menu_open),
            locked: self.has_target_class(Target::Body, &markers.menu_locked),
        }
    }

    fn add_class(&mut self, target: Target, class: &str) -> Result<()>;
    fn remove_class(&mut self, target: Target, class: &str) -> Result<()>;
    fn set_style(&mut self, target: Target, property: &str, value: &str) -> Result<()>;
    fn remove_style(&mut self, target: Target, property: &str) -> Result<()>;
    fn scroll_to(&mut self, y: f64) -> Result<()>;
    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) -> Result<()>;
    fn remove_attribute(&mut self, element: ElementId, name: &str) -> Result<()>;
    fn set_muted(&mut self, video: ElementId, muted: bool) -> Result<()>;
    fn set_controls(&mut self, video: ElementId, enabled: bool) -> Result<()>;
    /// Starts playback; the outcome is delivered later as `Message::PlaybackSettled`.
    fn play(&mut self, video: ElementId, intent: PlayIntent) -> Result<()>;
    fn resume_if_paused(&mut self, video: ElementId) -> Result<()>;
    fn pause(&mut self, video: ElementId) -> Result<()>;
    fn seek(&mut self, video: ElementId, seconds: f64) -> Result<()>;
    fn set_inner_html(&mut self, element: ElementId, html: &str) -> Result<()>;
    fn detach(&mut self, element: ElementId) -> Result<()>;
    fn observe(&mut self, observer: ObserverKind, threshold: f64, target: ElementId)
    -> Result<()>;
    fn unobserve(&mut self, observer: ObserverKind, target: ElementId) -> Result<()>;
    fn listen(&mut self, listener: Listener) -> Result<()>;
    fn schedule(&mut self, timer: Timer, delay: Duration) -> Result<()>;
}
