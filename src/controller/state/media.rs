use crate::dom::{ElementId, VideoRole, VideoWrapper};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum AutoplayState {
    Pending,
    Playing,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum FallbackImage {
    Absent,
    Attached,
    /// Opacity is heading to zero; detach is scheduled.
    Fading,
    Detached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Affordance {
    Absent,
    /// As authored; nothing has touched it yet.
    Idle,
    Hidden,
    /// Visible with a one-time activation handler bound.
    Armed,
    /// Activated once; never shown again.
    Retired,
}

/// Per-video playback record.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct VideoRecord {
    pub(in crate::controller) video: ElementId,
    pub(in crate::controller) wrapper: ElementId,
    pub(in crate::controller) role: VideoRole,
    pub(in crate::controller) fallback_element: Option<ElementId>,
    pub(in crate::controller) button_element: Option<ElementId>,
    pub(in crate::controller) handled: bool,
    pub(in crate::controller) autoplay: AutoplayState,
    pub(in crate::controller) fallback: FallbackImage,
    pub(in crate::controller) affordance: Affordance,
    pub(in crate::controller) fade_armed: bool,
    pub(in crate::controller) manual_activated: bool,
    pub(in crate::controller) attempts: u32,
}

impl VideoRecord {
    pub(in crate::controller) fn from_wrapper(wrapper: &VideoWrapper) -> Self {
        Self {
            video: wrapper.video,
            wrapper: wrapper.wrapper,
            role: wrapper.role,
            fallback_element: wrapper.fallback,
            button_element: wrapper.play_button,
            handled: false,
            autoplay: AutoplayState::Pending,
            fallback: if wrapper.fallback.is_some() {
                FallbackImage::Attached
            } else {
                FallbackImage::Absent
            },
            affordance: if wrapper.play_button.is_some() {
                Affordance::Idle
            } else {
                Affordance::Absent
            },
            fade_armed: false,
            manual_activated: false,
            attempts: 0,
        }
    }

    pub fn video(&self) -> ElementId {
        self.video
    }

    pub fn role(&self) -> VideoRole {
        self.role
    }

    pub fn is_handled(&self) -> bool {
        self.handled
    }

    pub fn autoplay(&self) -> AutoplayState {
        self.autoplay
    }

    pub fn fallback(&self) -> FallbackImage {
        self.fallback
    }

    pub fn affordance(&self) -> Affordance {
        self.affordance
    }

    /// Number of autoplay attempts issued; at most one.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn fallback_visible(&self) -> bool {
        matches!(self.fallback, FallbackImage::Attached)
            && self.autoplay == AutoplayState::Fallback
            && !self.manual_activated
    }
}

#[derive(Debug, Default)]
pub struct MediaState {
    records: Vec<VideoRecord>,
    by_video: HashMap<ElementId, usize>,
    by_wrapper: HashMap<ElementId, usize>,
    pub(in crate::controller) play_while_visible: HashSet<ElementId>,
    pub(in crate::controller) reset_done: bool,
}

impl MediaState {
    /// Registers a record; a video already known keeps its first record.
    pub(in crate::controller) fn register(&mut self, wrapper: &VideoWrapper) -> bool {
        if self.by_video.contains_key(&wrapper.video) {
            return false;
        }
        let idx = self.records.len();
        self.records.push(VideoRecord::from_wrapper(wrapper));
        self.by_video.insert(wrapper.video, idx);
        self.by_wrapper.insert(wrapper.wrapper, idx);
        true
    }

    pub(in crate::controller) fn record(&self, video: ElementId) -> Option<&VideoRecord> {
        self.by_video.get(&video).map(|idx| &self.records[*idx])
    }

    pub(in crate::controller) fn record_mut(
        &mut self,
        video: ElementId,
    ) -> Option<&mut VideoRecord> {
        let idx = *self.by_video.get(&video)?;
        self.records.get_mut(idx)
    }

    pub(in crate::controller) fn video_for_wrapper(&self, wrapper: ElementId) -> Option<ElementId> {
        self.by_wrapper
            .get(&wrapper)
            .map(|idx| self.records[*idx].video)
    }

    pub(in crate::controller) fn records(&self) -> impl Iterator<Item = &VideoRecord> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrapper(video: u32, fallback: Option<u32>, button: Option<u32>) -> VideoWrapper {
        VideoWrapper {
            wrapper: ElementId(video + 100),
            video: ElementId(video),
            fallback: fallback.map(ElementId),
            play_button: button.map(ElementId),
            role: VideoRole::Hero,
        }
    }

    #[test]
    fn record_starts_pending_with_children_attached() {
        let record = VideoRecord::from_wrapper(&wrapper(1, Some(2), Some(3)));
        assert_eq!(record.autoplay(), AutoplayState::Pending);
        assert_eq!(record.fallback(), FallbackImage::Attached);
        assert_eq!(record.affordance(), Affordance::Idle);
        assert!(!record.is_handled());
        assert!(!record.fallback_visible());
    }

    #[test]
    fn missing_children_are_absent() {
        let record = VideoRecord::from_wrapper(&wrapper(1, None, None));
        assert_eq!(record.fallback(), FallbackImage::Absent);
        assert_eq!(record.affordance(), Affordance::Absent);
    }

    #[test]
    fn duplicate_registration_keeps_first_record() {
        let mut media = MediaState::default();
        assert!(media.register(&wrapper(1, None, None)));
        media.record_mut(ElementId(1)).unwrap().handled = true;
        assert!(!media.register(&wrapper(1, Some(5), None)));
        assert!(media.record(ElementId(1)).unwrap().is_handled());
        assert_eq!(media.video_for_wrapper(ElementId(101)), Some(ElementId(1)));
    }
}
