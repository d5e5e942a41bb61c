use super::super::messages::{IntersectionEntry, NavigationType, PlayOutcome};
use super::super::state::{
    ATTR_CONTROLS, ATTR_PLAYSINLINE, ATTR_PRELOAD, Controller, STYLE_OPACITY, VideoRecord,
};
use super::{Effect, Listener, ObserverKind, PlayIntent, Timer};
use crate::config::InteractionConfig;
use crate::dom::{ElementId, PageInventory, Target, VideoRole};
use tracing::{debug, info};

mod transitions;

use transitions::{PlaybackAction, PlaybackEvent, transition};

impl Controller {
    pub(super) fn handle_media_setup(
        &mut self,
        inventory: &PageInventory,
        navigation: NavigationType,
        effects: &mut Vec<Effect>,
    ) {
        for wrapper in &inventory.video_wrappers {
            if wrapper.role == VideoRole::Other {
                debug!(video = wrapper.video.0, "Video has no autoplay role");
                continue;
            }
            if !self.media.register(wrapper) {
                debug!(video = wrapper.video.0, "Video already registered");
                continue;
            }
            match wrapper.role {
                VideoRole::Hero => self.apply_playback(
                    wrapper.video,
                    PlaybackEvent::AttemptRequested {
                        hero_hints: self.config.hero_hints,
                    },
                    effects,
                ),
                VideoRole::ScrollTriggered => effects.push(Effect::Observe {
                    observer: ObserverKind::Autoplay,
                    threshold: self.config.autoplay_threshold,
                    target: wrapper.wrapper,
                }),
                VideoRole::Other => {}
            }
        }

        for video in &inventory.play_on_scroll {
            if self.media.play_while_visible.insert(*video) {
                effects.push(Effect::Observe {
                    observer: ObserverKind::PlayWhileVisible,
                    threshold: self.config.play_while_visible_threshold,
                    target: *video,
                });
            }
        }

        self.reset_videos_on_load(inventory, navigation, effects);

        info!(
            videos = self.media.records().count(),
            play_while_visible = self.media.play_while_visible.len(),
            "Media controller ready"
        );
    }

    fn reset_videos_on_load(
        &mut self,
        inventory: &PageInventory,
        navigation: NavigationType,
        effects: &mut Vec<Effect>,
    ) {
        if self.media.reset_done {
            return;
        }
        self.media.reset_done = true;
        if navigation == NavigationType::BackForward {
            debug!("Restored from history; keeping playback positions");
            return;
        }
        for video in &inventory.reset_on_load {
            effects.push(Effect::Pause { video: *video });
            effects.push(Effect::Seek {
                video: *video,
                seconds: 0.0,
            });
        }
    }

    pub(super) fn handle_autoplay_intersection(
        &mut self,
        entry: IntersectionEntry,
        effects: &mut Vec<Effect>,
    ) {
        if !entry.in_view(self.config.autoplay_threshold) {
            return;
        }
        let Some(video) = self.media.video_for_wrapper(entry.target) else {
            debug!(wrapper = entry.target.0, "Intersection for unknown wrapper");
            return;
        };
        self.apply_playback(
            video,
            PlaybackEvent::AttemptRequested {
                hero_hints: self.config.hero_hints,
            },
            effects,
        );
    }

    pub(super) fn handle_visibility_playback(
        &mut self,
        entry: IntersectionEntry,
        effects: &mut Vec<Effect>,
    ) {
        let video = entry.target;
        if !self.media.play_while_visible.contains(&video) {
            return;
        }
        if entry.in_view(self.config.play_while_visible_threshold) {
            effects.push(Effect::ResumeIfPaused { video });
        } else {
            effects.push(Effect::Pause { video });
        }
    }

    pub(super) fn handle_playback_settled(
        &mut self,
        video: ElementId,
        intent: PlayIntent,
        outcome: PlayOutcome,
        effects: &mut Vec<Effect>,
    ) {
        self.apply_playback(video, PlaybackEvent::Settled { intent, outcome }, effects);
    }

    pub(super) fn handle_video_playing(&mut self, video: ElementId, effects: &mut Vec<Effect>) {
        self.apply_playback(video, PlaybackEvent::PlayingSignal, effects);
    }

    pub(super) fn handle_affordance_activated(
        &mut self,
        video: ElementId,
        effects: &mut Vec<Effect>,
    ) {
        self.apply_playback(video, PlaybackEvent::AffordanceActivated, effects);
    }

    pub(super) fn handle_fade_elapsed(&mut self, video: ElementId, effects: &mut Vec<Effect>) {
        self.apply_playback(video, PlaybackEvent::FadeElapsed, effects);
    }

    fn apply_playback(
        &mut self,
        video: ElementId,
        event: PlaybackEvent,
        effects: &mut Vec<Effect>,
    ) {
        let Some(record) = self.media.record_mut(video) else {
            debug!(video = video.0, ?event, "Playback event for unregistered video");
            return;
        };
        let actions = transition(record, event);
        for action in actions {
            lower_action(record, action, &self.config, effects);
        }
    }
}

fn lower_action(
    record: &VideoRecord,
    action: PlaybackAction,
    config: &InteractionConfig,
    effects: &mut Vec<Effect>,
) {
    let video = record.video;
    match action {
        PlaybackAction::Mute => effects.push(Effect::SetMuted { video, muted: true }),
        PlaybackAction::ApplyHeroHints => {
            effects.push(Effect::SetAttribute {
                element: video,
                name: ATTR_PLAYSINLINE.to_string(),
                value: "true".to_string(),
            });
            effects.push(Effect::SetAttribute {
                element: video,
                name: ATTR_PRELOAD.to_string(),
                value: "auto".to_string(),
            });
        }
        PlaybackAction::Play(intent) => effects.push(Effect::Play { video, intent }),
        PlaybackAction::ShowVideo => effects.push(Effect::show(video)),
        PlaybackAction::HideVideo => effects.push(Effect::hide(video)),
        PlaybackAction::ShowFallback => effects.extend(record.fallback_element.map(Effect::show)),
        PlaybackAction::HideFallback => effects.extend(record.fallback_element.map(Effect::hide)),
        PlaybackAction::ShowAffordance => effects.extend(record.button_element.map(Effect::show)),
        PlaybackAction::HideAffordance => effects.extend(record.button_element.map(Effect::hide)),
        PlaybackAction::StartFallbackFade => {
            if let Some(fallback) = record.fallback_element {
                effects.push(Effect::SetStyle {
                    target: Target::Element(fallback),
                    property: STYLE_OPACITY.to_string(),
                    value: "0".to_string(),
                });
                effects.push(Effect::Schedule {
                    timer: Timer::DetachFallback(video),
                    delay: config.fallback_fade(),
                });
            }
        }
        PlaybackAction::ArmPlayingSignal => {
            effects.push(Effect::Listen(Listener::VideoPlayingOnce(video)))
        }
        PlaybackAction::ExposeControls => {
            effects.push(Effect::SetAttribute {
                element: video,
                name: ATTR_CONTROLS.to_string(),
                value: "true".to_string(),
            });
            effects.push(Effect::AddClass {
                target: Target::Element(video),
                class: config.markers.needs_play_button.clone(),
            });
        }
        PlaybackAction::StripControls => {
            effects.push(Effect::RemoveAttribute {
                element: video,
                name: ATTR_CONTROLS.to_string(),
            });
            effects.push(Effect::SetControls {
                video,
                enabled: false,
            });
        }
        PlaybackAction::ArmAffordance => {
            if let Some(button) = record.button_element {
                effects.push(Effect::Listen(Listener::PlayAffordanceOnce { button, video }));
            }
        }
        PlaybackAction::DetachFallback => {
            if let Some(fallback) = record.fallback_element {
                effects.push(Effect::Detach { element: fallback });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::messages::Message;
    use super::super::super::state::{Affordance, AutoplayState, FallbackImage};
    use super::*;
    use crate::dom::VideoWrapper;
    use std::time::Duration;

    const WRAPPER: ElementId = ElementId(10);
    const VIDEO: ElementId = ElementId(11);
    const FALLBACK: ElementId = ElementId(12);
    const BUTTON: ElementId = ElementId(13);

    fn build_test_inventory(role: VideoRole) -> PageInventory {
        PageInventory {
            video_wrappers: vec![VideoWrapper {
                wrapper: WRAPPER,
                video: VIDEO,
                fallback: Some(FALLBACK),
                play_button: Some(BUTTON),
                role,
            }],
            ..PageInventory::default()
        }
    }

    fn build_test_controller(role: VideoRole) -> (Controller, Vec<Effect>) {
        let mut controller = Controller::new(InteractionConfig::default());
        let mut effects = Vec::new();
        controller.handle_media_setup(
            &build_test_inventory(role),
            NavigationType::Fresh,
            &mut effects,
        );
        (controller, effects)
    }

    fn plays(effects: &[Effect]) -> usize {
        effects
            .iter()
            .filter(|effect| matches!(effect, Effect::Play { .. }))
            .count()
    }

    fn wrapper_entry(ratio: f64) -> Message {
        Message::Intersection {
            observer: ObserverKind::Autoplay,
            entry: IntersectionEntry {
                target: WRAPPER,
                ratio,
                is_intersecting: ratio > 0.0,
                reachable_ratio: 1.0,
            },
        }
    }

    fn settled(outcome: PlayOutcome) -> Message {
        Message::PlaybackSettled {
            video: VIDEO,
            intent: PlayIntent::Autoplay,
            outcome,
        }
    }

    #[test]
    fn hero_attempts_immediately_with_hints() {
        let (controller, effects) = build_test_controller(VideoRole::Hero);
        assert_eq!(
            effects,
            vec![
                Effect::SetMuted {
                    video: VIDEO,
                    muted: true
                },
                Effect::SetAttribute {
                    element: VIDEO,
                    name: "playsinline".to_string(),
                    value: "true".to_string(),
                },
                Effect::SetAttribute {
                    element: VIDEO,
                    name: "preload".to_string(),
                    value: "auto".to_string(),
                },
                Effect::Play {
                    video: VIDEO,
                    intent: PlayIntent::Autoplay
                },
            ]
        );
        assert!(controller.video(VIDEO).unwrap().is_handled());
    }

    #[test]
    fn hero_hints_can_be_disabled() {
        let mut controller = Controller::new(InteractionConfig {
            hero_hints: false,
            ..InteractionConfig::default()
        });
        let mut effects = Vec::new();
        controller.handle_media_setup(
            &build_test_inventory(VideoRole::Hero),
            NavigationType::Fresh,
            &mut effects,
        );
        assert!(
            !effects
                .iter()
                .any(|effect| matches!(effect, Effect::SetAttribute { .. }))
        );
        assert_eq!(plays(&effects), 1);
    }

    #[test]
    fn scroll_triggered_video_waits_for_observer() {
        let (controller, effects) = build_test_controller(VideoRole::ScrollTriggered);
        assert_eq!(
            effects,
            vec![Effect::Observe {
                observer: ObserverKind::Autoplay,
                threshold: 0.6,
                target: WRAPPER,
            }]
        );
        assert!(!controller.video(VIDEO).unwrap().is_handled());
    }

    #[test]
    fn scroll_triggered_attempt_happens_once() {
        let (mut controller, _) = build_test_controller(VideoRole::ScrollTriggered);
        assert_eq!(plays(&controller.reduce(wrapper_entry(0.4))), 0);
        assert_eq!(plays(&controller.reduce(wrapper_entry(0.61))), 1);
        assert_eq!(plays(&controller.reduce(wrapper_entry(0.0))), 0);
        assert_eq!(plays(&controller.reduce(wrapper_entry(0.9))), 0);
        assert_eq!(controller.video(VIDEO).unwrap().attempts(), 1);
    }

    #[test]
    fn videos_without_role_are_not_tracked() {
        let (controller, effects) = build_test_controller(VideoRole::Other);
        assert!(effects.is_empty());
        assert!(controller.video(VIDEO).is_none());
    }

    #[test]
    fn rejection_reveals_fallback_and_binds_button() {
        let (mut controller, _) = build_test_controller(VideoRole::Hero);
        let effects = controller.reduce(settled(PlayOutcome::Rejected {
            reason: "NotAllowedError".to_string(),
        }));
        assert_eq!(
            effects,
            vec![
                Effect::SetAttribute {
                    element: VIDEO,
                    name: "controls".to_string(),
                    value: "true".to_string(),
                },
                Effect::AddClass {
                    target: Target::Element(VIDEO),
                    class: "needs-play-button".to_string(),
                },
                Effect::show(FALLBACK),
                Effect::show(BUTTON),
                Effect::hide(VIDEO),
                Effect::Listen(Listener::PlayAffordanceOnce {
                    button: BUTTON,
                    video: VIDEO
                }),
            ]
        );
        let record = controller.video(VIDEO).unwrap();
        assert_eq!(record.autoplay(), AutoplayState::Fallback);
        assert_eq!(record.affordance(), Affordance::Armed);
    }

    #[test]
    fn manual_play_swaps_fallback_for_video() {
        let (mut controller, _) = build_test_controller(VideoRole::Hero);
        controller.reduce(settled(PlayOutcome::Rejected {
            reason: "NotAllowedError".to_string(),
        }));
        let effects = controller.reduce(Message::PlayAffordanceActivated { video: VIDEO });
        assert_eq!(
            effects,
            vec![
                Effect::show(VIDEO),
                Effect::hide(FALLBACK),
                Effect::hide(BUTTON),
                Effect::RemoveAttribute {
                    element: VIDEO,
                    name: "controls".to_string(),
                },
                Effect::SetControls {
                    video: VIDEO,
                    enabled: false
                },
                Effect::Play {
                    video: VIDEO,
                    intent: PlayIntent::Manual
                },
            ]
        );
        assert!(
            controller
                .reduce(Message::PlayAffordanceActivated { video: VIDEO })
                .is_empty()
        );
    }

    #[test]
    fn buffered_start_fades_and_detaches_fallback() {
        let (mut controller, _) = build_test_controller(VideoRole::Hero);
        let effects = controller.reduce(settled(PlayOutcome::Started { ready_state: 4 }));
        assert!(effects.contains(&Effect::SetStyle {
            target: Target::Element(FALLBACK),
            property: "opacity".to_string(),
            value: "0".to_string(),
        }));
        assert!(effects.contains(&Effect::Schedule {
            timer: Timer::DetachFallback(VIDEO),
            delay: Duration::from_millis(600),
        }));
        let effects = controller.reduce(Message::TimerElapsed(Timer::DetachFallback(VIDEO)));
        assert_eq!(effects, vec![Effect::Detach { element: FALLBACK }]);
        assert_eq!(
            controller.video(VIDEO).unwrap().fallback(),
            FallbackImage::Detached
        );
    }

    #[test]
    fn unbuffered_start_defers_fade_to_playing_signal() {
        let (mut controller, _) = build_test_controller(VideoRole::Hero);
        let effects = controller.reduce(settled(PlayOutcome::Started { ready_state: 2 }));
        assert!(effects.contains(&Effect::Listen(Listener::VideoPlayingOnce(VIDEO))));
        assert!(
            !effects
                .iter()
                .any(|effect| matches!(effect, Effect::Schedule { .. }))
        );
        let effects = controller.reduce(Message::VideoPlaying { video: VIDEO });
        assert!(effects.contains(&Effect::Schedule {
            timer: Timer::DetachFallback(VIDEO),
            delay: Duration::from_millis(600),
        }));
        assert!(
            controller
                .reduce(Message::VideoPlaying { video: VIDEO })
                .is_empty()
        );
    }

    #[test]
    fn second_outcome_is_ignored() {
        let (mut controller, _) = build_test_controller(VideoRole::Hero);
        controller.reduce(settled(PlayOutcome::Started { ready_state: 4 }));
        assert!(
            controller
                .reduce(settled(PlayOutcome::Rejected {
                    reason: "AbortError".to_string()
                }))
                .is_empty()
        );
        assert_eq!(
            controller.video(VIDEO).unwrap().autoplay(),
            AutoplayState::Playing
        );
    }

    #[test]
    fn play_while_visible_toggles_with_view() {
        let mut controller = Controller::new(InteractionConfig::default());
        let mut effects = Vec::new();
        let video = ElementId(40);
        let inventory = PageInventory {
            play_on_scroll: vec![video],
            ..PageInventory::default()
        };
        controller.handle_media_setup(&inventory, NavigationType::Fresh, &mut effects);
        assert_eq!(
            effects,
            vec![Effect::Observe {
                observer: ObserverKind::PlayWhileVisible,
                threshold: 0.5,
                target: video,
            }]
        );
        let entry = |ratio: f64| Message::Intersection {
            observer: ObserverKind::PlayWhileVisible,
            entry: IntersectionEntry {
                target: video,
                ratio,
                is_intersecting: ratio > 0.0,
                reachable_ratio: 1.0,
            },
        };
        assert_eq!(
            controller.reduce(entry(0.7)),
            vec![Effect::ResumeIfPaused { video }]
        );
        assert_eq!(controller.reduce(entry(0.3)), vec![Effect::Pause { video }]);
        assert_eq!(
            controller.reduce(entry(0.5)),
            vec![Effect::ResumeIfPaused { video }]
        );
        assert_eq!(controller.reduce(entry(0.0)), vec![Effect::Pause { video }]);
    }

    #[test]
    fn fresh_navigation_rewinds_reset_videos() {
        let mut controller = Controller::new(InteractionConfig::default());
        let mut effects = Vec::new();
        let inventory = PageInventory {
            reset_on_load: vec![ElementId(50)],
            ..PageInventory::default()
        };
        controller.handle_media_setup(&inventory, NavigationType::Fresh, &mut effects);
        assert_eq!(
            effects,
            vec![
                Effect::Pause {
                    video: ElementId(50)
                },
                Effect::Seek {
                    video: ElementId(50),
                    seconds: 0.0
                },
            ]
        );
    }

    #[test]
    fn back_forward_navigation_keeps_positions() {
        let mut controller = Controller::new(InteractionConfig::default());
        let mut effects = Vec::new();
        let inventory = PageInventory {
            reset_on_load: vec![ElementId(50)],
            ..PageInventory::default()
        };
        controller.handle_media_setup(&inventory, NavigationType::BackForward, &mut effects);
        assert!(effects.is_empty());
    }
}
