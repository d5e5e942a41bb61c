use super::super::messages::IntersectionEntry;
use super::super::state::{
    Controller, REVEAL_RESTING_TRANSFORM, STYLE_OPACITY, STYLE_TRANSFORM, STYLE_TRANSITION,
};
use super::{Effect, ObserverKind};
use crate::dom::{PageInventory, Target};
use tracing::{debug, info};

impl Controller {
    pub(super) fn handle_reveal_setup(
        &mut self,
        inventory: &PageInventory,
        effects: &mut Vec<Effect>,
    ) {
        for target in &inventory.reveal_targets {
            if self.reveal.is_revealed(*target) || !self.reveal.observed.insert(*target) {
                continue;
            }
            effects.push(Effect::Observe {
                observer: ObserverKind::Reveal,
                threshold: self.config.reveal_threshold,
                target: *target,
            });
        }
        debug!(observed = self.reveal.observed.len(), "Reveal observer armed");
    }

    pub(super) fn handle_reveal_intersection(
        &mut self,
        entry: IntersectionEntry,
        effects: &mut Vec<Effect>,
    ) {
        if !entry.in_view(self.config.reveal_threshold) {
            return;
        }
        let element = entry.target;
        if !self.reveal.mark_revealed(element) {
            debug!(element = element.0, "Reveal already applied");
            return;
        }
        let target = Target::Element(element);
        effects.push(Effect::SetStyle {
            target,
            property: STYLE_TRANSITION.to_string(),
            value: self.config.reveal_transition.clone(),
        });
        effects.push(Effect::SetStyle {
            target,
            property: STYLE_OPACITY.to_string(),
            value: "1".to_string(),
        });
        effects.push(Effect::SetStyle {
            target,
            property: STYLE_TRANSFORM.to_string(),
            value: REVEAL_RESTING_TRANSFORM.to_string(),
        });
        effects.push(Effect::Unobserve {
            observer: ObserverKind::Reveal,
            target: element,
        });
        info!(element = element.0, "Revealed block");
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::messages::Message;
    use super::*;
    use crate::config::InteractionConfig;
    use crate::dom::ElementId;

    const BLOCK: ElementId = ElementId(21);

    fn build_test_controller() -> Controller {
        let mut controller = Controller::new(InteractionConfig::default());
        let mut effects = Vec::new();
        controller.handle_reveal_setup(
            &PageInventory {
                reveal_targets: vec![BLOCK],
                ..PageInventory::default()
            },
            &mut effects,
        );
        controller
    }

    fn entry(ratio: f64) -> Message {
        Message::Intersection {
            observer: ObserverKind::Reveal,
            entry: IntersectionEntry {
                target: BLOCK,
                ratio,
                is_intersecting: ratio > 0.0,
                reachable_ratio: 1.0,
            },
        }
    }

    #[test]
    fn setup_observes_each_target_once() {
        let mut controller = Controller::new(InteractionConfig::default());
        let mut effects = Vec::new();
        controller.handle_reveal_setup(
            &PageInventory {
                reveal_targets: vec![BLOCK, BLOCK],
                ..PageInventory::default()
            },
            &mut effects,
        );
        assert_eq!(
            effects,
            vec![Effect::Observe {
                observer: ObserverKind::Reveal,
                threshold: 0.15,
                target: BLOCK,
            }]
        );
    }

    #[test]
    fn entering_view_applies_resting_style_and_stops_observing() {
        let mut controller = build_test_controller();
        assert!(controller.reduce(entry(0.1)).is_empty());
        let effects = controller.reduce(entry(0.2));
        let transition = concat!(
            "opacity 0.9s cubic-bezier(0.4, 0, 0.2, 1), ",
            "transform 0.9s cubic-bezier(0.4, 0, 0.2, 1)"
        );
        assert_eq!(
            effects,
            vec![
                Effect::SetStyle {
                    target: Target::Element(BLOCK),
                    property: "transition".to_string(),
                    value: transition.to_string(),
                },
                Effect::SetStyle {
                    target: Target::Element(BLOCK),
                    property: "opacity".to_string(),
                    value: "1".to_string(),
                },
                Effect::SetStyle {
                    target: Target::Element(BLOCK),
                    property: "transform".to_string(),
                    value: "translateY(0)".to_string(),
                },
                Effect::Unobserve {
                    observer: ObserverKind::Reveal,
                    target: BLOCK,
                },
            ]
        );
        assert!(controller.is_revealed(BLOCK));
    }

    #[test]
    fn reveal_never_reverts() {
        let mut controller = build_test_controller();
        controller.reduce(entry(1.0));
        assert!(controller.reduce(entry(0.0)).is_empty());
        assert!(controller.reduce(entry(1.0)).is_empty());
        assert!(controller.is_revealed(BLOCK));
    }
}
