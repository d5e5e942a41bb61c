use super::page::{SimMedia, SimPage};
use crate::controller::{GateState, Listener, ObserverKind, OverlayView, Timer, VideoRecord};
use crate::dom::ElementId;
use crate::runtime::Runtime;
use serde::Serialize;
use std::collections::BTreeMap;

/// Final state of a simulated page, suitable for JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSnapshot {
    pub clock_ms: u64,
    pub viewport_width: f64,
    pub scroll_y: f64,
    pub scroll_history: Vec<f64>,
    pub overlay: OverlayView,
    pub gate: GateState,
    pub elements: Vec<ElementSnapshot>,
    pub videos: Vec<VideoRecord>,
    pub observed: Vec<ObservedTarget>,
    pub listeners: Vec<Listener>,
    pub pending_timers: Vec<PendingTimerSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementSnapshot {
    pub element: ElementId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dom_id: Option<String>,
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub html: String,
    pub detached: bool,
    pub revealed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<SimMedia>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservedTarget {
    pub observer: ObserverKind,
    pub target: ElementId,
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingTimerSnapshot {
    pub timer: Timer,
    pub due_ms: u64,
}

impl PageSnapshot {
    pub fn element(&self, element: ElementId) -> Option<&ElementSnapshot> {
        self.elements.iter().find(|snapshot| snapshot.element == element)
    }

    pub fn element_by_key(&self, key: &str) -> Option<&ElementSnapshot> {
        self.elements
            .iter()
            .find(|snapshot| snapshot.key.as_deref() == Some(key))
    }

    pub(super) fn attach_keys(&mut self, keys: &BTreeMap<ElementId, String>) {
        for snapshot in &mut self.elements {
            snapshot.key = keys.get(&snapshot.element).cloned();
        }
    }
}

impl Runtime<SimPage> {
    pub fn snapshot(&self) -> PageSnapshot {
        let page = self.host();
        let controller = self.controller();
        let elements = page
            .nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| {
                let element = ElementId(idx as u32);
                ElementSnapshot {
                    element,
                    key: None,
                    tag: node.tag.clone(),
                    dom_id: node.dom_id.clone(),
                    classes: node.classes.clone(),
                    attrs: node.attrs.clone(),
                    style: node.style.clone(),
                    html: node.html.clone(),
                    detached: node.detached,
                    revealed: controller.is_revealed(element),
                    media: node.media.clone(),
                }
            })
            .collect();
        let mut pending_timers: Vec<PendingTimerSnapshot> = page
            .pending_timers()
            .map(|(timer, due_ms)| PendingTimerSnapshot { timer, due_ms })
            .collect();
        pending_timers.sort_by_key(|pending| pending.due_ms);

        PageSnapshot {
            clock_ms: page.clock_ms(),
            viewport_width: page.viewport_width,
            scroll_y: page.scroll_y,
            scroll_history: page.scroll_history().to_vec(),
            overlay: controller.overlay().view(),
            gate: controller.gate(),
            elements,
            videos: controller.videos().cloned().collect(),
            observed: page
                .observers
                .iter()
                .map(|((observer, target), threshold)| ObservedTarget {
                    observer: *observer,
                    target: *target,
                    threshold: *threshold,
                })
                .collect(),
            listeners: page.listeners().to_vec(),
            pending_timers,
        }
    }
}
