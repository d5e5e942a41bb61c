use super::page::SimPage;
use crate::controller::{IntersectionEntry, Listener, Message, ObserverKind};
use crate::dom::ElementId;
use crate::runtime::Runtime;
use tracing::debug;

const OBSERVER_KINDS: [ObserverKind; 3] = [
    ObserverKind::Autoplay,
    ObserverKind::PlayWhileVisible,
    ObserverKind::Reveal,
];

/// Browser-side stimuli for a simulated page.
impl Runtime<SimPage> {
    /// Moves the virtual clock forward, firing due timers in order.
    pub fn advance(&mut self, ms: u64) {
        let until = self.host().clock_ms() + ms;
        while let Some(pending) = self.host_mut().pop_due_timer(until) {
            debug!(timer = ?pending.timer, at_ms = pending.due_ms, "Timer fired");
            self.fire_timer(pending.timer);
        }
        self.host_mut().set_clock(until);
    }

    /// Resolves every outstanding `play()` promise.
    pub fn settle_plays(&mut self) {
        loop {
            let plays = self.host_mut().take_pending_plays();
            if plays.is_empty() {
                return;
            }
            for (video, intent) in plays {
                match self.host_mut().resolve_play(video, intent) {
                    Ok(outcome) => self.dispatch(Message::PlaybackSettled {
                        video,
                        intent,
                        outcome,
                    }),
                    Err(err) => debug!(video = video.0, "Dropping play for {err:#}"),
                }
            }
        }
    }

    /// A user click, routed to whichever listeners are bound on `element`.
    pub fn click(&mut self, element: ElementId) {
        if self
            .host()
            .listeners()
            .contains(&Listener::TriggerClick(element))
        {
            self.trigger_activated();
        }
        let affordance = self.host().listeners().iter().find_map(|listener| match listener {
            Listener::PlayAffordanceOnce { button, video } if *button == element => {
                Some((*listener, *video))
            }
            _ => None,
        });
        if let Some((listener, video)) = affordance {
            self.host_mut().remove_listener(&listener);
            self.dispatch(Message::PlayAffordanceActivated { video });
        }
    }

    /// The media element's `playing` event.
    pub fn emit_playing(&mut self, video: ElementId) {
        if self
            .host_mut()
            .remove_listener(&Listener::VideoPlayingOnce(video))
        {
            self.dispatch(Message::VideoPlaying { video });
        }
    }

    /// Reports a new intersection ratio to every observer watching `target`.
    pub fn intersect(&mut self, target: ElementId, ratio: f64) {
        let reachable_ratio = self.host().reachable_ratio(target);
        for observer in OBSERVER_KINDS {
            if !self.host().is_observed(observer, target) {
                continue;
            }
            self.dispatch(Message::Intersection {
                observer,
                entry: IntersectionEntry {
                    target,
                    ratio,
                    is_intersecting: ratio > 0.0,
                    reachable_ratio,
                },
            });
        }
    }

    pub fn resize(&mut self, width: f64) {
        self.host_mut().set_viewport_width(width);
        if self.host().listeners().contains(&Listener::WindowResize) {
            self.resized();
        }
    }

    pub fn scroll(&mut self, y: f64) {
        self.host_mut().set_scroll_y(y);
    }
}
