mod constants;
mod gate;
mod media;
mod overlay;
mod reveal;

use crate::config::InteractionConfig;
use crate::dom::ElementId;
use std::collections::HashSet;

pub(crate) use constants::*;
pub use gate::GateState;
pub(in crate::controller) use media::MediaState;
pub use media::{Affordance, AutoplayState, FallbackImage, VideoRecord};
pub use overlay::{OverlayPhase, OverlayState, OverlayView};
pub(in crate::controller) use reveal::RevealState;

/// Controller state composed of one sub-model per concern.
pub struct Controller {
    pub(in crate::controller) config: InteractionConfig,
    pub(in crate::controller) overlay: OverlayState,
    pub(in crate::controller) media: MediaState,
    pub(in crate::controller) reveal: RevealState,
    pub(in crate::controller) gate: GateState,
    pub(in crate::controller) normalized_text: HashSet<ElementId>,
    pub(in crate::controller) setup_done: bool,
}

impl Controller {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            overlay: OverlayState::default(),
            media: MediaState::default(),
            reveal: RevealState::default(),
            gate: GateState::Hidden,
            normalized_text: HashSet::new(),
            setup_done: false,
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn overlay(&self) -> &OverlayState {
        &self.overlay
    }

    pub fn video(&self, video: ElementId) -> Option<&VideoRecord> {
        self.media.record(video)
    }

    pub fn videos(&self) -> impl Iterator<Item = &VideoRecord> {
        self.media.records()
    }

    pub fn is_revealed(&self, element: ElementId) -> bool {
        self.reveal.is_revealed(element)
    }

    pub fn gate(&self) -> GateState {
        self.gate
    }

    pub fn is_normalized(&self, element: ElementId) -> bool {
        self.normalized_text.contains(&element)
    }
}
