use crate::config::InteractionConfig;
use crate::controller::{Controller, Effect, Message, Timer};
use crate::dom::{PageInventory, Selector};
use crate::host::Host;
use anyhow::Result;
use tracing::{debug, warn};

/// Drives a [`Controller`] against a [`Host`]: reads the page into
/// messages and performs the effects that come back.
pub struct Runtime<H: Host> {
    controller: Controller,
    host: H,
}

impl<H: Host> Runtime<H> {
    pub fn new(config: InteractionConfig, host: H) -> Self {
        Self {
            controller: Controller::new(config),
            host,
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn dispatch(&mut self, message: Message) {
        let effects = self.controller.reduce(message);
        for effect in effects {
            let name = effect.name();
            if let Err(err) = self.run_effect(effect) {
                warn!(effect = name, "Host effect failed: {err:#}");
            }
        }
    }

    pub fn dom_ready(&mut self) {
        let inventory = PageInventory::collect(&self.host, self.controller.config());
        let navigation = self.host.navigation_type();
        debug!(
            wrappers = inventory.video_wrappers.len(),
            reveal_targets = inventory.reveal_targets.len(),
            headings = inventory.headings.len(),
            ?navigation,
            "Collected page inventory"
        );
        self.dispatch(Message::DomReady {
            inventory,
            navigation,
        });
    }

    pub fn overlay_init(&mut self) {
        let id = self.controller.config().markers.menu_trigger_id.clone();
        let trigger = self.host.query_all(&Selector::Id(id)).first().copied();
        self.dispatch(Message::OverlayInit { trigger });
    }

    pub fn trigger_activated(&mut self) {
        let scroll_y = self.host.scroll_y();
        let markers = self.host.body_markers(&self.controller.config().markers);
        self.dispatch(Message::TriggerActivated { scroll_y, markers });
    }

    pub fn resized(&mut self) {
        let width = self.host.viewport_width();
        self.dispatch(Message::Resized { width });
    }

    pub fn page_loaded(&mut self) {
        self.dispatch(Message::Loaded);
    }

    pub fn page_shown(&mut self, persisted: bool) {
        self.dispatch(Message::PageShow { persisted });
    }

    /// Delivers an elapsed timer. The load-settle timer reads the body
    /// markers at firing time, not at scheduling time.
    pub fn fire_timer(&mut self, timer: Timer) {
        let message = match timer {
            Timer::LoadSettle => Message::LoadSettled {
                markers: self.host.body_markers(&self.controller.config().markers),
            },
            other => Message::TimerElapsed(other),
        };
        self.dispatch(message);
    }

    fn run_effect(&mut self, effect: Effect) -> Result<()> {
        let host = &mut self.host;
        match effect {
            Effect::AddClass { target, class } => host.add_class(target, &class),
            Effect::RemoveClass { target, class } => host.remove_class(target, &class),
            Effect::SetStyle {
                target,
                property,
                value,
            } => host.set_style(target, &property, &value),
            Effect::RemoveStyle { target, property } => host.remove_style(target, &property),
            Effect::ScrollTo { y } => host.scroll_to(y),
            Effect::SetAttribute {
                element,
                name,
                value,
            } => host.set_attribute(element, &name, &value),
            Effect::RemoveAttribute { element, name } => host.remove_attribute(element, &name),
            Effect::SetMuted { video, muted } => host.set_muted(video, muted),
            Effect::SetControls { video, enabled } => host.set_controls(video, enabled),
            Effect::Play { video, intent } => host.play(video, intent),
            Effect::ResumeIfPaused { video } => host.resume_if_paused(video),
            Effect::Pause { video } => host.pause(video),
            Effect::Seek { video, seconds } => host.seek(video, seconds),
            Effect::SetInnerHtml { element, html } => host.set_inner_html(element, &html),
            Effect::Detach { element } => host.detach(element),
            Effect::Observe {
                observer,
                threshold,
                target,
            } => host.observe(observer, threshold, target),
            Effect::Unobserve { observer, target } => host.unobserve(observer, target),
            Effect::Listen(listener) => host.listen(listener),
            Effect::Schedule { timer, delay } => host.schedule(timer, delay),
        }
    }
}
