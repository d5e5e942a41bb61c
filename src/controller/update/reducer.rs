use super::super::messages::{IntersectionEntry, Message};
use super::super::state::Controller;
use super::{Effect, ObserverKind, Timer};
use tracing::debug;

impl Controller {
    /// Reduce one signal into the effects the host must perform.
    pub fn reduce(&mut self, message: Message) -> Vec<Effect> {
        let mut effects = Vec::new();

        match message {
            Message::DomReady {
                inventory,
                navigation,
            } => {
                if self.setup_done {
                    debug!("Ignoring repeated page-ready signal");
                    return effects;
                }
                self.setup_done = true;
                self.handle_gate_setup(&mut effects);
                self.handle_typography_setup(&inventory, &mut effects);
                self.handle_media_setup(&inventory, navigation, &mut effects);
                self.handle_reveal_setup(&inventory, &mut effects);
            }
            Message::OverlayInit { trigger } => self.handle_overlay_init(trigger, &mut effects),
            Message::TriggerActivated { scroll_y, markers } => {
                self.handle_trigger_activated(scroll_y, markers, &mut effects)
            }
            Message::Resized { width } => self.handle_resized(width, &mut effects),
            Message::Loaded => self.handle_loaded(&mut effects),
            Message::LoadSettled { markers } => self.handle_load_settled(markers, &mut effects),
            Message::PageShow { persisted } => self.handle_page_show(persisted, &mut effects),
            Message::Intersection { observer, entry } => {
                self.handle_intersection(observer, entry, &mut effects)
            }
            Message::PlaybackSettled {
                video,
                intent,
                outcome,
            } => self.handle_playback_settled(video, intent, outcome, &mut effects),
            Message::VideoPlaying { video } => self.handle_video_playing(video, &mut effects),
            Message::PlayAffordanceActivated { video } => {
                self.handle_affordance_activated(video, &mut effects)
            }
            Message::TimerElapsed(timer) => self.handle_timer_elapsed(timer, &mut effects),
        }

        effects
    }

    fn handle_timer_elapsed(&mut self, timer: Timer, effects: &mut Vec<Effect>) {
        match timer {
            Timer::RevealDocument => self.handle_gate_elapsed(effects),
            Timer::ClearClosing => self.handle_closing_elapsed(effects),
            Timer::DetachFallback(video) => self.handle_fade_elapsed(video, effects),
            Timer::LoadSettle => {
                debug!("LoadSettle must arrive as LoadSettled; ignoring bare timer");
            }
        }
    }

    fn handle_intersection(
        &mut self,
        observer: ObserverKind,
        entry: IntersectionEntry,
        effects: &mut Vec<Effect>,
    ) {
        match observer {
            ObserverKind::Autoplay => self.handle_autoplay_intersection(entry, effects),
            ObserverKind::PlayWhileVisible => self.handle_visibility_playback(entry, effects),
            ObserverKind::Reveal => self.handle_reveal_intersection(entry, effects),
        }
    }
}
