use crate::controller::{Listener, NavigationType, ObserverKind, PlayIntent, PlayOutcome, Timer};
use crate::dom::{DomQuery, ElementId, Selector, Target};
use crate::host::Host;
use anyhow::{Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;
use tracing::trace;

/// `HTMLMediaElement.HAVE_ENOUGH_DATA`.
const HAVE_ENOUGH_DATA: u16 = 4;

/// How the simulated browser answers an unattended `play()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutoplayPolicy {
    Allowed,
    /// Autoplay succeeds only for muted media.
    #[default]
    MutedOnly,
    /// Low-power mode and similar: unattended playback always rejects.
    Blocked,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimMedia {
    pub muted: bool,
    pub paused: bool,
    pub current_time: f64,
    pub ready_state: u16,
    /// `play()` invocations that reached the element.
    pub play_calls: u32,
}

impl Default for SimMedia {
    fn default() -> Self {
        Self {
            muted: false,
            paused: true,
            current_time: 0.0,
            ready_state: HAVE_ENOUGH_DATA,
            play_calls: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub(super) struct SimNode {
    pub(super) tag: String,
    pub(super) dom_id: Option<String>,
    pub(super) classes: Vec<String>,
    pub(super) attrs: BTreeMap<String, String>,
    pub(super) style: BTreeMap<String, String>,
    pub(super) html: String,
    pub(super) parent: Option<usize>,
    pub(super) children: Vec<usize>,
    pub(super) detached: bool,
    pub(super) media: Option<SimMedia>,
    /// Layout height in pixels; unset means the element fits the viewport.
    pub(super) height: Option<f64>,
}

impl SimNode {
    fn new(tag: &str, parent: Option<usize>) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            dom_id: None,
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            style: BTreeMap::new(),
            html: String::new(),
            parent,
            children: Vec::new(),
            detached: false,
            media: tag.eq_ignore_ascii_case("video").then(SimMedia::default),
            height: None,
        }
    }

    fn matches(&self, selector: &Selector) -> bool {
        let classes: Vec<&str> = self.classes.iter().map(String::as_str).collect();
        selector.matches(self.dom_id.as_deref(), &self.tag, &classes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct PendingTimer {
    pub(super) due_ms: u64,
    pub(super) seq: u64,
    pub(super) timer: Timer,
}

/// In-memory page: an element arena plus the browser facilities the
/// controllers use (media, observers, listeners, a virtual clock).
#[derive(Debug, Clone)]
pub struct SimPage {
    pub(super) nodes: Vec<SimNode>,
    pub(super) viewport_width: f64,
    pub(super) viewport_height: f64,
    pub(super) scroll_y: f64,
    pub(super) scroll_history: Vec<f64>,
    pub(super) navigation: NavigationType,
    pub(super) autoplay: AutoplayPolicy,
    pub(super) pending_plays: VecDeque<(ElementId, PlayIntent)>,
    pub(super) observers: BTreeMap<(ObserverKind, ElementId), f64>,
    pub(super) listeners: Vec<Listener>,
    pub(super) clock_ms: u64,
    pub(super) timers: Vec<PendingTimer>,
    next_timer_seq: u64,
}

impl Default for SimPage {
    fn default() -> Self {
        Self::new()
    }
}

impl SimPage {
    pub const ROOT: ElementId = ElementId(0);
    pub const BODY: ElementId = ElementId(1);

    pub fn new() -> Self {
        let mut root = SimNode::new("html", None);
        root.children.push(1);
        let body = SimNode::new("body", Some(0));
        Self {
            nodes: vec![root, body],
            viewport_width: 390.0,
            viewport_height: 844.0,
            scroll_y: 0.0,
            scroll_history: Vec::new(),
            navigation: NavigationType::Fresh,
            autoplay: AutoplayPolicy::default(),
            pending_plays: VecDeque::new(),
            observers: BTreeMap::new(),
            listeners: Vec::new(),
            clock_ms: 0,
            timers: Vec::new(),
            next_timer_seq: 0,
        }
    }

    pub fn add_element(
        &mut self,
        parent: ElementId,
        tag: &str,
        dom_id: Option<&str>,
        classes: &[&str],
        html: &str,
    ) -> Result<ElementId> {
        let parent_idx = self.index(parent)?;
        let idx = self.nodes.len();
        let mut node = SimNode::new(tag, Some(parent_idx));
        node.dom_id = dom_id.map(str::to_string);
        node.classes = classes.iter().map(|c| c.to_string()).collect();
        node.html = html.to_string();
        self.nodes.push(node);
        self.nodes[parent_idx].children.push(idx);
        Ok(ElementId(idx as u32))
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height;
    }

    pub fn set_height(&mut self, element: ElementId, height: f64) -> Result<()> {
        let idx = self.index(element)?;
        self.nodes[idx].height = Some(height);
        Ok(())
    }

    /// Largest intersection ratio `element` can reach at the current viewport height.
    pub fn reachable_ratio(&self, element: ElementId) -> f64 {
        let height = self
            .index(element)
            .ok()
            .and_then(|idx| self.nodes[idx].height)
            .filter(|height| *height > 0.0);
        match height {
            Some(height) => (self.viewport_height / height).min(1.0),
            None => 1.0,
        }
    }

    pub fn set_scroll_y(&mut self, y: f64) {
        self.scroll_y = y;
    }

    pub fn set_navigation(&mut self, navigation: NavigationType) {
        self.navigation = navigation;
    }

    pub fn set_autoplay_policy(&mut self, policy: AutoplayPolicy) {
        self.autoplay = policy;
    }

    pub fn set_ready_state(&mut self, video: ElementId, ready_state: u16) -> Result<()> {
        self.media_mut(video)?.ready_state = ready_state;
        Ok(())
    }

    /// Seek a video as a user would, leaving it mid-playback.
    pub fn set_current_time(&mut self, video: ElementId, seconds: f64) -> Result<()> {
        self.media_mut(video)?.current_time = seconds;
        Ok(())
    }

    pub fn classes(&self, target: Target) -> Vec<&str> {
        self.target_index(target)
            .map(|idx| self.nodes[idx].classes.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn style(&self, target: Target, property: &str) -> Option<&str> {
        let idx = self.target_index(target).ok()?;
        self.nodes[idx].style.get(property).map(String::as_str)
    }

    pub fn attribute(&self, element: ElementId, name: &str) -> Option<&str> {
        let idx = self.index(element).ok()?;
        self.nodes[idx].attrs.get(name).map(String::as_str)
    }

    pub fn is_detached(&self, element: ElementId) -> bool {
        self.index(element)
            .map(|idx| self.nodes[idx].detached)
            .unwrap_or(false)
    }

    pub fn media(&self, video: ElementId) -> Option<&SimMedia> {
        let idx = self.index(video).ok()?;
        self.nodes[idx].media.as_ref()
    }

    pub fn scroll_history(&self) -> &[f64] {
        &self.scroll_history
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn is_observed(&self, observer: ObserverKind, target: ElementId) -> bool {
        self.observers.contains_key(&(observer, target))
    }

    pub fn listeners(&self) -> &[Listener] {
        &self.listeners
    }

    pub fn pending_play_count(&self) -> usize {
        self.pending_plays.len()
    }

    pub fn pending_timers(&self) -> impl Iterator<Item = (Timer, u64)> + '_ {
        self.timers.iter().map(|pending| (pending.timer, pending.due_ms))
    }

    /// Class removal by a third-party script, outside the controller's knowledge.
    pub fn strip_class(&mut self, target: Target, class: &str) -> Result<()> {
        let idx = self.target_index(target)?;
        self.nodes[idx].classes.retain(|c| c != class);
        Ok(())
    }

    pub(super) fn take_pending_plays(&mut self) -> Vec<(ElementId, PlayIntent)> {
        self.pending_plays.drain(..).collect()
    }

    /// Resolves one deferred `play()` against the autoplay policy.
    pub(super) fn resolve_play(
        &mut self,
        video: ElementId,
        intent: PlayIntent,
    ) -> Result<PlayOutcome> {
        let policy = self.autoplay;
        let media = self.media_mut(video)?;
        let allowed = intent == PlayIntent::Manual || policy_allows(policy, media.muted);
        if allowed {
            media.paused = false;
            Ok(PlayOutcome::Started {
                ready_state: media.ready_state,
            })
        } else {
            Ok(PlayOutcome::Rejected {
                reason: "NotAllowedError".to_string(),
            })
        }
    }

    pub(super) fn remove_listener(&mut self, listener: &Listener) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l != listener);
        before != self.listeners.len()
    }

    /// Removes and returns the earliest timer due at or before `until_ms`.
    pub(super) fn pop_due_timer(&mut self, until_ms: u64) -> Option<PendingTimer> {
        let (pos, _) = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, pending)| pending.due_ms <= until_ms)
            .min_by_key(|(_, pending)| (pending.due_ms, pending.seq))?;
        let pending = self.timers.remove(pos);
        self.clock_ms = self.clock_ms.max(pending.due_ms);
        Some(pending)
    }

    pub(super) fn set_clock(&mut self, ms: u64) {
        self.clock_ms = self.clock_ms.max(ms);
    }

    fn index(&self, element: ElementId) -> Result<usize> {
        let idx = element.0 as usize;
        if idx < self.nodes.len() {
            Ok(idx)
        } else {
            Err(anyhow!("unknown element {}", element.0))
        }
    }

    fn target_index(&self, target: Target) -> Result<usize> {
        match target {
            Target::Root => Ok(0),
            Target::Body => Ok(1),
            Target::Element(element) => self.index(element),
        }
    }

    fn node_mut(&mut self, target: Target) -> Result<&mut SimNode> {
        let idx = self.target_index(target)?;
        Ok(&mut self.nodes[idx])
    }

    fn media_mut(&mut self, video: ElementId) -> Result<&mut SimMedia> {
        let idx = self.index(video)?;
        let node = &mut self.nodes[idx];
        let tag = node.tag.clone();
        node.media
            .as_mut()
            .ok_or_else(|| anyhow!("element {} is a <{tag}>, not a media element", video.0))
    }

    fn descendants(&self, scope: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.nodes[scope].children.iter().rev().copied().collect();
        while let Some(idx) = stack.pop() {
            out.push(idx);
            stack.extend(self.nodes[idx].children.iter().rev().copied());
        }
        out
    }
}

fn policy_allows(policy: AutoplayPolicy, muted: bool) -> bool {
    match policy {
        AutoplayPolicy::Allowed => true,
        AutoplayPolicy::MutedOnly => muted,
        AutoplayPolicy::Blocked => false,
    }
}

impl DomQuery for SimPage {
    fn query_all(&self, selector: &Selector) -> Vec<ElementId> {
        self.descendants(0)
            .into_iter()
            .filter(|idx| self.nodes[*idx].matches(selector))
            .map(|idx| ElementId(idx as u32))
            .collect()
    }

    fn query_within(&self, scope: ElementId, selector: &Selector) -> Option<ElementId> {
        let scope = self.index(scope).ok()?;
        self.descendants(scope)
            .into_iter()
            .find(|idx| self.nodes[*idx].matches(selector))
            .map(|idx| ElementId(idx as u32))
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.has_target_class(Target::Element(element), class)
    }

    fn inner_html(&self, element: ElementId) -> Option<String> {
        let idx = self.index(element).ok()?;
        Some(self.nodes[idx].html.clone())
    }
}

impl Host for SimPage {
    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn navigation_type(&self) -> NavigationType {
        self.navigation
    }

    fn has_target_class(&self, target: Target, class: &str) -> bool {
        self.target_index(target)
            .map(|idx| self.nodes[idx].classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    fn add_class(&mut self, target: Target, class: &str) -> Result<()> {
        let node = self.node_mut(target)?;
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_string());
        }
        Ok(())
    }

    fn remove_class(&mut self, target: Target, class: &str) -> Result<()> {
        self.node_mut(target)?.classes.retain(|c| c != class);
        Ok(())
    }

    fn set_style(&mut self, target: Target, property: &str, value: &str) -> Result<()> {
        self.node_mut(target)?
            .style
            .insert(property.to_string(), value.to_string());
        Ok(())
    }

    fn remove_style(&mut self, target: Target, property: &str) -> Result<()> {
        self.node_mut(target)?.style.remove(property);
        Ok(())
    }

    fn scroll_to(&mut self, y: f64) -> Result<()> {
        self.scroll_y = y;
        self.scroll_history.push(y);
        Ok(())
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) -> Result<()> {
        self.node_mut(Target::Element(element))?
            .attrs
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove_attribute(&mut self, element: ElementId, name: &str) -> Result<()> {
        self.node_mut(Target::Element(element))?.attrs.remove(name);
        Ok(())
    }

    fn set_muted(&mut self, video: ElementId, muted: bool) -> Result<()> {
        self.media_mut(video)?.muted = muted;
        Ok(())
    }

    fn set_controls(&mut self, video: ElementId, enabled: bool) -> Result<()> {
        self.media_mut(video)?;
        let attrs = &mut self.node_mut(Target::Element(video))?.attrs;
        if enabled {
            attrs.insert("controls".to_string(), String::new());
        } else {
            attrs.remove("controls");
        }
        Ok(())
    }

    fn play(&mut self, video: ElementId, intent: PlayIntent) -> Result<()> {
        self.media_mut(video)?.play_calls += 1;
        self.pending_plays.push_back((video, intent));
        Ok(())
    }

    fn resume_if_paused(&mut self, video: ElementId) -> Result<()> {
        let policy = self.autoplay;
        let media = self.media_mut(video)?;
        if !media.paused {
            return Ok(());
        }
        media.play_calls += 1;
        if policy_allows(policy, media.muted) {
            media.paused = false;
        } else {
            trace!(video = video.0, "Resume rejected; ignoring");
        }
        Ok(())
    }

    fn pause(&mut self, video: ElementId) -> Result<()> {
        self.media_mut(video)?.paused = true;
        Ok(())
    }

    fn seek(&mut self, video: ElementId, seconds: f64) -> Result<()> {
        self.media_mut(video)?.current_time = seconds;
        Ok(())
    }

    fn set_inner_html(&mut self, element: ElementId, html: &str) -> Result<()> {
        self.node_mut(Target::Element(element))?.html = html.to_string();
        Ok(())
    }

    fn detach(&mut self, element: ElementId) -> Result<()> {
        let idx = self.index(element)?;
        if idx <= 1 {
            bail!("refusing to detach the document root or body");
        }
        if let Some(parent) = self.nodes[idx].parent.take() {
            self.nodes[parent].children.retain(|child| *child != idx);
        }
        self.nodes[idx].detached = true;
        Ok(())
    }

    fn observe(&mut self, observer: ObserverKind, threshold: f64, target: ElementId) -> Result<()> {
        self.index(target)?;
        self.observers.insert((observer, target), threshold);
        Ok(())
    }

    fn unobserve(&mut self, observer: ObserverKind, target: ElementId) -> Result<()> {
        self.observers.remove(&(observer, target));
        Ok(())
    }

    fn listen(&mut self, listener: Listener) -> Result<()> {
        if !self.listeners.contains(&listener) {
            self.listeners.push(listener);
        }
        Ok(())
    }

    fn schedule(&mut self, timer: Timer, delay: Duration) -> Result<()> {
        let due_ms = self.clock_ms + delay.as_millis() as u64;
        self.timers.push(PendingTimer {
            due_ms,
            seq: self.next_timer_seq,
            timer,
        });
        self.next_timer_seq += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_test_page() -> (SimPage, ElementId, ElementId) {
        let mut page = SimPage::new();
        let wrapper = page
            .add_element(SimPage::BODY, "div", None, &["video-wrapper"], "")
            .unwrap();
        let video = page
            .add_element(wrapper, "video", None, &["video-hero"], "")
            .unwrap();
        (page, wrapper, video)
    }

    #[test]
    fn queries_follow_document_order() {
        let mut page = SimPage::new();
        let first = page
            .add_element(SimPage::BODY, "section", None, &[], "")
            .unwrap();
        let late = page.add_element(SimPage::BODY, "h2", None, &[], "b").unwrap();
        let nested = page.add_element(first, "h2", None, &[], "a").unwrap();
        assert_eq!(
            page.query_all(&Selector::Tag("h2".to_string())),
            vec![nested, late]
        );
    }

    #[test]
    fn query_within_stays_inside_scope() {
        let (mut page, wrapper, video) = build_test_page();
        page.add_element(SimPage::BODY, "video", None, &[], "").unwrap();
        assert_eq!(
            page.query_within(wrapper, &Selector::Tag("video".to_string())),
            Some(video)
        );
    }

    #[test]
    fn detached_elements_drop_out_of_queries() {
        let (mut page, wrapper, _) = build_test_page();
        let img = page
            .add_element(wrapper, "img", None, &["video-fallback-img"], "")
            .unwrap();
        page.detach(img).unwrap();
        assert!(page.is_detached(img));
        assert!(
            page.query_all(&Selector::Class("video-fallback-img".to_string()))
                .is_empty()
        );
    }

    #[test]
    fn muted_only_policy_requires_mute() {
        let (mut page, _, video) = build_test_page();
        page.play(video, PlayIntent::Autoplay).unwrap();
        assert!(matches!(
            page.resolve_play(video, PlayIntent::Autoplay).unwrap(),
            PlayOutcome::Rejected { .. }
        ));
        page.set_muted(video, true).unwrap();
        assert_eq!(
            page.resolve_play(video, PlayIntent::Autoplay).unwrap(),
            PlayOutcome::Started { ready_state: 4 }
        );
        assert!(!page.media(video).unwrap().paused);
    }

    #[test]
    fn manual_play_bypasses_blocked_policy() {
        let (mut page, _, video) = build_test_page();
        page.set_autoplay_policy(AutoplayPolicy::Blocked);
        assert!(matches!(
            page.resolve_play(video, PlayIntent::Manual).unwrap(),
            PlayOutcome::Started { .. }
        ));
    }

    #[test]
    fn media_sinks_reject_non_media_elements() {
        let (mut page, wrapper, _) = build_test_page();
        assert!(page.set_muted(wrapper, true).is_err());
        assert!(page.add_class(Target::Element(ElementId(99)), "x").is_err());
    }

    #[test]
    fn timers_pop_in_due_order() {
        let mut page = SimPage::new();
        page.schedule(Timer::ClearClosing, Duration::from_millis(400))
            .unwrap();
        page.schedule(Timer::RevealDocument, Duration::from_millis(50))
            .unwrap();
        assert_eq!(page.pop_due_timer(30), None);
        assert_eq!(
            page.pop_due_timer(500).map(|pending| pending.timer),
            Some(Timer::RevealDocument)
        );
        assert_eq!(page.clock_ms(), 50);
        assert_eq!(
            page.pop_due_timer(500).map(|pending| pending.timer),
            Some(Timer::ClearClosing)
        );
    }
}
