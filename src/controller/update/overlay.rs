use super::super::messages::BodyMarkers;
use super::super::state::{Controller, OverlayPhase, STYLE_TOP};
use super::{Effect, Listener, Timer};
use crate::dom::{ElementId, Target};
use tracing::{debug, info};

impl Controller {
    pub(super) fn handle_overlay_init(
        &mut self,
        trigger: Option<ElementId>,
        effects: &mut Vec<Effect>,
    ) {
        if self.overlay.is_armed() {
            debug!("Overlay already initialized");
            return;
        }
        let Some(trigger) = trigger else {
            info!(
                id = %self.config.markers.menu_trigger_id,
                "Menu trigger not found; overlay controller stays inert"
            );
            return;
        };
        self.overlay.trigger = Some(trigger);
        effects.push(Effect::Listen(Listener::TriggerClick(trigger)));
        effects.push(Effect::Listen(Listener::WindowResize));
    }

    /// Toggles from the open marker actually on the body, so a marker stripped
    /// by another script is honored before the load-settle repair runs.
    pub(super) fn handle_trigger_activated(
        &mut self,
        scroll_y: f64,
        markers: BodyMarkers,
        effects: &mut Vec<Effect>,
    ) {
        if !self.overlay.is_armed() {
            return;
        }
        if self.overlay.sync_open_marker(markers.open) {
            debug!(open = markers.open, "Overlay phase resynced from body markers");
        }
        match self.overlay.phase {
            OverlayPhase::Closed => self.open_overlay(scroll_y, effects),
            OverlayPhase::Open => self.close_overlay(effects),
        }
    }

    pub(super) fn handle_resized(&mut self, width: f64, effects: &mut Vec<Effect>) {
        if !self.overlay.is_armed() {
            return;
        }
        if width >= self.config.desktop_breakpoint_px && self.overlay.phase == OverlayPhase::Open
        {
            info!(width, "Viewport reached desktop width; closing overlay");
            self.close_overlay(effects);
        }
    }

    fn open_overlay(&mut self, scroll_y: f64, effects: &mut Vec<Effect>) {
        self.overlay.enter_open(scroll_y);
        let markers = &self.config.markers;
        effects.push(Effect::SetStyle {
            target: Target::Body,
            property: STYLE_TOP.to_string(),
            value: format!("-{scroll_y}px"),
        });
        effects.push(Effect::AddClass {
            target: Target::Body,
            class: markers.menu_open.clone(),
        });
        effects.push(Effect::AddClass {
            target: Target::Body,
            class: markers.menu_locked.clone(),
        });
        info!(scroll_y, "Overlay opened");
    }

    fn close_overlay(&mut self, effects: &mut Vec<Effect>) {
        if self.overlay.phase != OverlayPhase::Open {
            debug!("Close requested while overlay is closed");
            return;
        }
        let restore = self.overlay.enter_closing();
        let markers = &self.config.markers;
        effects.push(Effect::AddClass {
            target: Target::Body,
            class: markers.menu_closing.clone(),
        });
        effects.push(Effect::RemoveClass {
            target: Target::Body,
            class: markers.menu_open.clone(),
        });
        effects.push(Effect::RemoveClass {
            target: Target::Body,
            class: markers.menu_locked.clone(),
        });
        effects.push(Effect::RemoveStyle {
            target: Target::Body,
            property: STYLE_TOP.to_string(),
        });
        effects.push(Effect::ScrollTo { y: restore });
        // Not cancelled by a later open; clearing the closing marker is cosmetic.
        effects.push(Effect::Schedule {
            timer: Timer::ClearClosing,
            delay: self.config.closing_delay(),
        });
        info!(restore, "Overlay closed");
    }

    pub(super) fn handle_closing_elapsed(&mut self, effects: &mut Vec<Effect>) {
        self.overlay.closing = false;
        effects.push(Effect::RemoveClass {
            target: Target::Body,
            class: self.config.markers.menu_closing.clone(),
        });
    }

    pub(super) fn handle_loaded(&mut self, effects: &mut Vec<Effect>) {
        if self.overlay.load_settle_scheduled {
            return;
        }
        self.overlay.load_settle_scheduled = true;
        effects.push(Effect::Schedule {
            timer: Timer::LoadSettle,
            delay: self.config.load_settle_delay(),
        });
    }

    /// Repairs a lock left behind when a loader animation stripped the open marker.
    pub(super) fn handle_load_settled(&mut self, markers: BodyMarkers, effects: &mut Vec<Effect>) {
        if markers.locked && !markers.open {
            info!("Clearing stuck scroll lock after page load");
            effects.push(Effect::RemoveClass {
                target: Target::Body,
                class: self.config.markers.menu_locked.clone(),
            });
            effects.push(Effect::RemoveStyle {
                target: Target::Body,
                property: STYLE_TOP.to_string(),
            });
        }
        if !markers.open && self.overlay.phase == OverlayPhase::Open {
            debug!("Open marker was removed externally; syncing overlay to closed");
        }
        if !markers.open {
            self.overlay.force_closed();
        }
    }

    pub(super) fn handle_page_show(&mut self, persisted: bool, effects: &mut Vec<Effect>) {
        let was_locked = self.overlay.locked;
        if self.overlay.phase == OverlayPhase::Open || was_locked {
            info!(persisted, "Resetting overlay restored from history");
        } else {
            debug!(persisted, "Page shown with overlay closed");
        }
        let markers = &self.config.markers;
        effects.push(Effect::RemoveClass {
            target: Target::Body,
            class: markers.menu_open.clone(),
        });
        effects.push(Effect::RemoveClass {
            target: Target::Root,
            class: markers.no_scroll.clone(),
        });
        if was_locked {
            effects.push(Effect::RemoveClass {
                target: Target::Body,
                class: markers.menu_locked.clone(),
            });
            effects.push(Effect::RemoveStyle {
                target: Target::Body,
                property: STYLE_TOP.to_string(),
            });
        }
        self.overlay.force_closed();
    }
}
