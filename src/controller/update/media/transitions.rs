use super::super::super::messages::PlayOutcome;
use super::super::super::state::{
    Affordance, AutoplayState, FallbackImage, HAVE_FUTURE_DATA, VideoRecord,
};
use super::super::PlayIntent;
use crate::dom::VideoRole;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub(super) enum PlaybackEvent {
    AttemptRequested { hero_hints: bool },
    Settled { intent: PlayIntent, outcome: PlayOutcome },
    PlayingSignal,
    AffordanceActivated,
    FadeElapsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PlaybackAction {
    Mute,
    ApplyHeroHints,
    Play(PlayIntent),
    ShowVideo,
    HideVideo,
    ShowFallback,
    HideFallback,
    ShowAffordance,
    HideAffordance,
    StartFallbackFade,
    ArmPlayingSignal,
    ExposeControls,
    StripControls,
    ArmAffordance,
    DetachFallback,
}

pub(super) fn transition(record: &mut VideoRecord, event: PlaybackEvent) -> Vec<PlaybackAction> {
    match event {
        PlaybackEvent::AttemptRequested { hero_hints } => on_attempt_requested(record, hero_hints),
        PlaybackEvent::Settled { intent, outcome } => match intent {
            PlayIntent::Autoplay => on_autoplay_settled(record, outcome),
            PlayIntent::Manual => on_manual_settled(record, outcome),
        },
        PlaybackEvent::PlayingSignal => on_playing_signal(record),
        PlaybackEvent::AffordanceActivated => on_affordance_activated(record),
        PlaybackEvent::FadeElapsed => on_fade_elapsed(record),
    }
}

fn on_attempt_requested(record: &mut VideoRecord, hero_hints: bool) -> Vec<PlaybackAction> {
    if record.handled {
        debug!(video = record.video.0, "Autoplay already handled");
        return Vec::new();
    }
    // Set before the attempt resolves; never cleared.
    record.handled = true;
    record.attempts += 1;

    let mut actions = vec![PlaybackAction::Mute];
    if hero_hints && record.role == VideoRole::Hero {
        actions.push(PlaybackAction::ApplyHeroHints);
    }
    actions.push(PlaybackAction::Play(PlayIntent::Autoplay));
    debug!(video = record.video.0, role = ?record.role, "Attempting autoplay");
    actions
}

fn on_autoplay_settled(record: &mut VideoRecord, outcome: PlayOutcome) -> Vec<PlaybackAction> {
    if record.autoplay != AutoplayState::Pending {
        debug!(
            video = record.video.0,
            state = ?record.autoplay,
            "Ignoring duplicate autoplay outcome"
        );
        return Vec::new();
    }

    match outcome {
        PlayOutcome::Started { ready_state } => {
            record.autoplay = AutoplayState::Playing;
            let mut actions = Vec::new();
            if record.fallback_element.is_some() {
                actions.push(PlaybackAction::HideFallback);
            }
            if record.button_element.is_some() {
                record.affordance = Affordance::Hidden;
                actions.push(PlaybackAction::HideAffordance);
            }
            actions.push(PlaybackAction::ShowVideo);
            if ready_state >= HAVE_FUTURE_DATA {
                actions.extend(begin_fade(record));
            } else if record.fallback == FallbackImage::Attached {
                record.fade_armed = true;
                actions.push(PlaybackAction::ArmPlayingSignal);
            }
            info!(video = record.video.0, ready_state, "Autoplay started");
            actions
        }
        PlayOutcome::Rejected { reason } => {
            record.autoplay = AutoplayState::Fallback;
            let mut actions = vec![PlaybackAction::ExposeControls];
            if record.fallback_element.is_some() {
                actions.push(PlaybackAction::ShowFallback);
            }
            if record.button_element.is_some() {
                actions.push(PlaybackAction::ShowAffordance);
            }
            actions.push(PlaybackAction::HideVideo);
            if record.button_element.is_some() {
                record.affordance = Affordance::Armed;
                actions.push(PlaybackAction::ArmAffordance);
            }
            info!(
                video = record.video.0,
                %reason,
                "Autoplay blocked; showing fallback"
            );
            actions
        }
    }
}

fn on_manual_settled(record: &mut VideoRecord, outcome: PlayOutcome) -> Vec<PlaybackAction> {
    match outcome {
        PlayOutcome::Started { .. } => {
            debug!(video = record.video.0, "Manual playback started");
        }
        PlayOutcome::Rejected { reason } => {
            warn!(video = record.video.0, %reason, "Manual playback was rejected");
        }
    }
    Vec::new()
}

fn on_playing_signal(record: &mut VideoRecord) -> Vec<PlaybackAction> {
    if !record.fade_armed {
        return Vec::new();
    }
    record.fade_armed = false;
    begin_fade(record)
}

fn begin_fade(record: &mut VideoRecord) -> Vec<PlaybackAction> {
    if record.fallback != FallbackImage::Attached {
        return Vec::new();
    }
    record.fallback = FallbackImage::Fading;
    vec![PlaybackAction::StartFallbackFade]
}

fn on_fade_elapsed(record: &mut VideoRecord) -> Vec<PlaybackAction> {
    if record.fallback != FallbackImage::Fading {
        return Vec::new();
    }
    record.fallback = FallbackImage::Detached;
    vec![PlaybackAction::DetachFallback]
}

fn on_affordance_activated(record: &mut VideoRecord) -> Vec<PlaybackAction> {
    if record.affordance != Affordance::Armed {
        debug!(video = record.video.0, "Play button is not armed");
        return Vec::new();
    }
    record.affordance = Affordance::Retired;
    record.manual_activated = true;
    let mut actions = vec![PlaybackAction::ShowVideo];
    if record.fallback_element.is_some() {
        actions.push(PlaybackAction::HideFallback);
    }
    actions.extend([
        PlaybackAction::HideAffordance,
        PlaybackAction::StripControls,
        PlaybackAction::Play(PlayIntent::Manual),
    ]);
    info!(video = record.video.0, "Manual playback requested");
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementId, VideoWrapper};

    fn build_test_record(role: VideoRole) -> VideoRecord {
        VideoRecord::from_wrapper(&VideoWrapper {
            wrapper: ElementId(1),
            video: ElementId(2),
            fallback: Some(ElementId(3)),
            play_button: Some(ElementId(4)),
            role,
        })
    }

    fn attempt(record: &mut VideoRecord) -> Vec<PlaybackAction> {
        transition(record, PlaybackEvent::AttemptRequested { hero_hints: true })
    }

    fn settle(record: &mut VideoRecord, outcome: PlayOutcome) -> Vec<PlaybackAction> {
        transition(
            record,
            PlaybackEvent::Settled {
                intent: PlayIntent::Autoplay,
                outcome,
            },
        )
    }

    fn rejected() -> PlayOutcome {
        PlayOutcome::Rejected {
            reason: "NotAllowedError".to_string(),
        }
    }

    #[test]
    fn hero_attempt_mutes_and_applies_hints() {
        let mut record = build_test_record(VideoRole::Hero);
        assert_eq!(
            attempt(&mut record),
            vec![
                PlaybackAction::Mute,
                PlaybackAction::ApplyHeroHints,
                PlaybackAction::Play(PlayIntent::Autoplay),
            ]
        );
        assert!(record.is_handled());
    }

    #[test]
    fn scroll_triggered_attempt_skips_hints() {
        let mut record = build_test_record(VideoRole::ScrollTriggered);
        assert_eq!(
            attempt(&mut record),
            vec![
                PlaybackAction::Mute,
                PlaybackAction::Play(PlayIntent::Autoplay)
            ]
        );
    }

    #[test]
    fn second_attempt_is_dropped() {
        let mut record = build_test_record(VideoRole::Hero);
        attempt(&mut record);
        assert!(attempt(&mut record).is_empty());
        assert_eq!(record.attempts(), 1);
    }

    #[test]
    fn buffered_start_fades_fallback_immediately() {
        let mut record = build_test_record(VideoRole::Hero);
        attempt(&mut record);
        let actions = settle(&mut record, PlayOutcome::Started { ready_state: 4 });
        assert_eq!(
            actions,
            vec![
                PlaybackAction::HideFallback,
                PlaybackAction::HideAffordance,
                PlaybackAction::ShowVideo,
                PlaybackAction::StartFallbackFade,
            ]
        );
        assert_eq!(record.autoplay(), AutoplayState::Playing);
        assert_eq!(record.fallback(), FallbackImage::Fading);
        assert_eq!(
            transition(&mut record, PlaybackEvent::FadeElapsed),
            vec![PlaybackAction::DetachFallback]
        );
        assert_eq!(record.fallback(), FallbackImage::Detached);
    }

    #[test]
    fn unbuffered_start_waits_for_single_playing_signal() {
        let mut record = build_test_record(VideoRole::Hero);
        attempt(&mut record);
        let actions = settle(&mut record, PlayOutcome::Started { ready_state: 1 });
        assert!(actions.contains(&PlaybackAction::ArmPlayingSignal));
        assert_eq!(record.fallback(), FallbackImage::Attached);
        assert_eq!(
            transition(&mut record, PlaybackEvent::PlayingSignal),
            vec![PlaybackAction::StartFallbackFade]
        );
        assert!(transition(&mut record, PlaybackEvent::PlayingSignal).is_empty());
    }

    #[test]
    fn rejection_shows_fallback_and_arms_button() {
        let mut record = build_test_record(VideoRole::Hero);
        attempt(&mut record);
        let actions = settle(&mut record, rejected());
        assert_eq!(
            actions,
            vec![
                PlaybackAction::ExposeControls,
                PlaybackAction::ShowFallback,
                PlaybackAction::ShowAffordance,
                PlaybackAction::HideVideo,
                PlaybackAction::ArmAffordance,
            ]
        );
        assert_eq!(record.autoplay(), AutoplayState::Fallback);
        assert!(record.fallback_visible());
    }

    #[test]
    fn outcome_after_terminal_state_is_ignored() {
        let mut record = build_test_record(VideoRole::Hero);
        attempt(&mut record);
        settle(&mut record, rejected());
        assert!(settle(&mut record, PlayOutcome::Started { ready_state: 4 }).is_empty());
        assert_eq!(record.autoplay(), AutoplayState::Fallback);
    }

    #[test]
    fn affordance_activates_once() {
        let mut record = build_test_record(VideoRole::Hero);
        attempt(&mut record);
        settle(&mut record, rejected());
        let actions = transition(&mut record, PlaybackEvent::AffordanceActivated);
        assert_eq!(
            actions,
            vec![
                PlaybackAction::ShowVideo,
                PlaybackAction::HideFallback,
                PlaybackAction::HideAffordance,
                PlaybackAction::StripControls,
                PlaybackAction::Play(PlayIntent::Manual),
            ]
        );
        assert_eq!(record.affordance(), Affordance::Retired);
        assert!(!record.fallback_visible());
        assert!(transition(&mut record, PlaybackEvent::AffordanceActivated).is_empty());
    }

    #[test]
    fn manual_outcomes_do_not_touch_autoplay_state() {
        let mut record = build_test_record(VideoRole::Hero);
        attempt(&mut record);
        settle(&mut record, rejected());
        transition(&mut record, PlaybackEvent::AffordanceActivated);
        let actions = transition(
            &mut record,
            PlaybackEvent::Settled {
                intent: PlayIntent::Manual,
                outcome: PlayOutcome::Started { ready_state: 4 },
            },
        );
        assert!(actions.is_empty());
        assert_eq!(record.autoplay(), AutoplayState::Fallback);
    }
}
