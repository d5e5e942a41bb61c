use super::super::state::{Controller, GateState, STYLE_OPACITY, STYLE_VISIBILITY};
use super::{Effect, Timer};
use crate::dom::Target;
use tracing::{debug, info};

impl Controller {
    pub(super) fn handle_gate_setup(&mut self, effects: &mut Vec<Effect>) {
        if self.gate != GateState::Hidden {
            debug!(gate = ?self.gate, "Document reveal already scheduled");
            return;
        }
        self.gate = GateState::Scheduled;
        effects.push(Effect::Schedule {
            timer: Timer::RevealDocument,
            delay: self.config.document_reveal_delay(),
        });
    }

    pub(super) fn handle_gate_elapsed(&mut self, effects: &mut Vec<Effect>) {
        if self.gate != GateState::Scheduled {
            debug!(gate = ?self.gate, "Ignoring document reveal timer");
            return;
        }
        self.gate = GateState::Visible;
        effects.push(Effect::SetStyle {
            target: Target::Root,
            property: STYLE_OPACITY.to_string(),
            value: "1".to_string(),
        });
        effects.push(Effect::SetStyle {
            target: Target::Root,
            property: STYLE_VISIBILITY.to_string(),
            value: "visible".to_string(),
        });
        effects.push(Effect::RemoveClass {
            target: Target::Root,
            class: self.config.markers.loading.clone(),
        });
        info!("Document revealed");
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::messages::{Message, NavigationType};
    use super::*;
    use crate::config::InteractionConfig;
    use crate::dom::PageInventory;
    use std::time::Duration;

    fn build_test_controller() -> Controller {
        let mut controller = Controller::new(InteractionConfig::default());
        controller.reduce(Message::DomReady {
            inventory: PageInventory::default(),
            navigation: NavigationType::Fresh,
        });
        controller
    }

    #[test]
    fn page_ready_schedules_reveal() {
        let mut controller = Controller::new(InteractionConfig::default());
        let effects = controller.reduce(Message::DomReady {
            inventory: PageInventory::default(),
            navigation: NavigationType::Fresh,
        });
        assert_eq!(
            effects,
            vec![Effect::Schedule {
                timer: Timer::RevealDocument,
                delay: Duration::from_millis(50),
            }]
        );
        assert_eq!(controller.gate(), GateState::Scheduled);
    }

    #[test]
    fn elapsed_timer_makes_document_visible() {
        let mut controller = build_test_controller();
        let effects = controller.reduce(Message::TimerElapsed(Timer::RevealDocument));
        assert_eq!(
            effects,
            vec![
                Effect::SetStyle {
                    target: Target::Root,
                    property: "opacity".to_string(),
                    value: "1".to_string(),
                },
                Effect::SetStyle {
                    target: Target::Root,
                    property: "visibility".to_string(),
                    value: "visible".to_string(),
                },
                Effect::RemoveClass {
                    target: Target::Root,
                    class: "wf-loading".to_string(),
                },
            ]
        );
        assert_eq!(controller.gate(), GateState::Visible);
    }

    #[test]
    fn gate_never_moves_backwards() {
        let mut controller = build_test_controller();
        controller.reduce(Message::TimerElapsed(Timer::RevealDocument));
        assert!(
            controller
                .reduce(Message::TimerElapsed(Timer::RevealDocument))
                .is_empty()
        );
        let mut effects = Vec::new();
        controller.handle_gate_setup(&mut effects);
        assert!(effects.is_empty());
        assert_eq!(controller.gate(), GateState::Visible);
    }

    #[test]
    fn stray_timer_before_setup_is_ignored() {
        let mut controller = Controller::new(InteractionConfig::default());
        assert!(
            controller
                .reduce(Message::TimerElapsed(Timer::RevealDocument))
                .is_empty()
        );
        assert_eq!(controller.gate(), GateState::Hidden);
    }
}
