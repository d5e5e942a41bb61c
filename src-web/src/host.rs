use crate::{Poster, Signal};
use anyhow::{Context, Result, anyhow};
use js_sys::{Array, Object, Reflect};
use site_interactions::controller::{
    IntersectionEntry, Listener, Message, NavigationType, ObserverKind, PlayIntent, PlayOutcome,
    Timer,
};
use site_interactions::dom::{DomQuery, ElementId, Selector, Target};
use site_interactions::host::Host;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use tracing::{trace, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement, HtmlMediaElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Window,
};

fn js_error(err: JsValue) -> anyhow::Error {
    anyhow!(describe(&err))
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Largest ratio a target of `target_height` can reach inside `root_height`.
fn reachable_ratio(target_height: f64, root_height: f64) -> f64 {
    if target_height > 0.0 && root_height > 0.0 {
        (root_height / target_height).min(1.0)
    } else {
        1.0
    }
}

/// `setTimeout` takes a signed 32-bit millisecond count.
fn timeout_millis(delay: Duration) -> i32 {
    i32::try_from(delay.as_millis()).unwrap_or(i32::MAX)
}

/// Issues stable [`ElementId`]s for live DOM elements.
#[derive(Default)]
pub(crate) struct ElementRegistry {
    elements: RefCell<Vec<Element>>,
}

impl ElementRegistry {
    fn intern(&self, element: Element) -> ElementId {
        let mut elements = self.elements.borrow_mut();
        if let Some(idx) = elements.iter().position(|known| Object::is(known, &element)) {
            return ElementId(idx as u32);
        }
        elements.push(element);
        ElementId((elements.len() - 1) as u32)
    }

    fn get(&self, id: ElementId) -> Result<Element> {
        self.elements
            .borrow()
            .get(id.0 as usize)
            .cloned()
            .ok_or_else(|| anyhow!("unknown element handle {}", id.0))
    }
}

/// [`Host`] over the browser's DOM, media and observer APIs.
pub(crate) struct WebHost {
    window: Window,
    document: Document,
    registry: Rc<ElementRegistry>,
    observers: HashMap<ObserverKind, IntersectionObserver>,
    poster: Poster,
}

impl WebHost {
    pub(crate) fn new(window: Window, document: Document, poster: Poster) -> Self {
        Self {
            window,
            document,
            registry: Rc::new(ElementRegistry::default()),
            observers: HashMap::new(),
            poster,
        }
    }

    fn resolve(&self, target: Target) -> Result<Element> {
        match target {
            Target::Root => self
                .document
                .document_element()
                .context("document has no root element"),
            Target::Body => self
                .document
                .body()
                .map(Element::from)
                .context("document has no body"),
            Target::Element(id) => self.registry.get(id),
        }
    }

    fn styled(&self, target: Target) -> Result<HtmlElement> {
        self.resolve(target)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| anyhow!("{target:?} has no inline style"))
    }

    fn media(&self, video: ElementId) -> Result<HtmlMediaElement> {
        self.registry
            .get(video)?
            .dyn_into::<HtmlMediaElement>()
            .map_err(|_| anyhow!("element {} is not a media element", video.0))
    }

    fn observer(&mut self, kind: ObserverKind, threshold: f64) -> Result<IntersectionObserver> {
        if let Some(existing) = self.observers.get(&kind) {
            return Ok(existing.clone());
        }
        let poster = self.poster.clone();
        let registry = Rc::clone(&self.registry);
        let window = self.window.clone();
        let callback = Closure::wrap(Box::new(move |entries: Array, _: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                let root_height = entry.root_bounds().map_or_else(
                    || {
                        window
                            .inner_height()
                            .ok()
                            .and_then(|height| height.as_f64())
                            .unwrap_or(0.0)
                    },
                    |bounds| bounds.height(),
                );
                let reachable_ratio =
                    reachable_ratio(entry.bounding_client_rect().height(), root_height);
                let target = registry.intern(entry.target());
                poster.post(Signal::Dispatch(Message::Intersection {
                    observer: kind,
                    entry: IntersectionEntry {
                        target,
                        ratio: entry.intersection_ratio(),
                        is_intersecting: entry.is_intersecting(),
                        reachable_ratio,
                    },
                }));
            }
        })
            as Box<dyn FnMut(Array, IntersectionObserver)>);

        // The zero crossing reports targets too tall to ever reach `threshold`.
        let init = IntersectionObserverInit::new();
        init.set_threshold(&Array::of2(&JsValue::from_f64(0.0), &JsValue::from_f64(threshold)));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(js_error)
                .with_context(|| format!("Failed to create {kind:?} observer"))?;
        callback.forget();
        self.observers.insert(kind, observer.clone());
        Ok(observer)
    }

    fn bind(
        target: &EventTarget,
        event: &str,
        once: bool,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<()> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let bound = if once {
            let options = AddEventListenerOptions::new();
            options.set_once(true);
            target.add_event_listener_with_callback_and_add_event_listener_options(
                event,
                callback.as_ref().unchecked_ref(),
                &options,
            )
        } else {
            target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        };
        bound.map_err(js_error)?;
        callback.forget();
        Ok(())
    }
}

impl DomQuery for WebHost {
    fn query_all(&self, selector: &Selector) -> Vec<ElementId> {
        let css = selector.to_css();
        let nodes = match self.document.query_selector_all(&css) {
            Ok(nodes) => nodes,
            Err(err) => {
                warn!(%css, "Selector query failed: {}", describe(&err));
                return Vec::new();
            }
        };
        (0..nodes.length())
            .filter_map(|idx| nodes.get(idx))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| self.registry.intern(element))
            .collect()
    }

    fn query_within(&self, scope: ElementId, selector: &Selector) -> Option<ElementId> {
        let scope = self.registry.get(scope).ok()?;
        let found = scope.query_selector(&selector.to_css()).ok()??;
        Some(self.registry.intern(found))
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.registry
            .get(element)
            .is_ok_and(|element| element.class_list().contains(class))
    }

    fn inner_html(&self, element: ElementId) -> Option<String> {
        self.registry.get(element).ok().map(|element| element.inner_html())
    }
}

impl Host for WebHost {
    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .unwrap_or(0.0)
    }

    fn navigation_type(&self) -> NavigationType {
        let entry_type = self.window.performance().and_then(|performance| {
            let entry = performance.get_entries_by_type("navigation").get(0);
            Reflect::get(&entry, &JsValue::from_str("type"))
                .ok()?
                .as_string()
        });
        NavigationType::from_entry_type(entry_type.as_deref())
    }

    fn has_target_class(&self, target: Target, class: &str) -> bool {
        self.resolve(target)
            .is_ok_and(|element| element.class_list().contains(class))
    }

    fn add_class(&mut self, target: Target, class: &str) -> Result<()> {
        self.resolve(target)?
            .class_list()
            .add_1(class)
            .map_err(js_error)
    }

    fn remove_class(&mut self, target: Target, class: &str) -> Result<()> {
        self.resolve(target)?
            .class_list()
            .remove_1(class)
            .map_err(js_error)
    }

    fn set_style(&mut self, target: Target, property: &str, value: &str) -> Result<()> {
        self.styled(target)?
            .style()
            .set_property(property, value)
            .map_err(js_error)
    }

    fn remove_style(&mut self, target: Target, property: &str) -> Result<()> {
        self.styled(target)?
            .style()
            .remove_property(property)
            .map(drop)
            .map_err(js_error)
    }

    fn scroll_to(&mut self, y: f64) -> Result<()> {
        self.window.scroll_to_with_x_and_y(0.0, y);
        Ok(())
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) -> Result<()> {
        self.registry
            .get(element)?
            .set_attribute(name, value)
            .map_err(js_error)
    }

    fn remove_attribute(&mut self, element: ElementId, name: &str) -> Result<()> {
        self.registry
            .get(element)?
            .remove_attribute(name)
            .map_err(js_error)
    }

    fn set_muted(&mut self, video: ElementId, muted: bool) -> Result<()> {
        self.media(video)?.set_muted(muted);
        Ok(())
    }

    fn set_controls(&mut self, video: ElementId, enabled: bool) -> Result<()> {
        self.media(video)?.set_controls(enabled);
        Ok(())
    }

    fn play(&mut self, video: ElementId, intent: PlayIntent) -> Result<()> {
        let media = self.media(video)?;
        let poster = self.poster.clone();
        let settle = move |outcome: PlayOutcome| {
            poster.post(Signal::Dispatch(Message::PlaybackSettled {
                video,
                intent,
                outcome,
            }))
        };
        match media.play() {
            Ok(promise) => spawn_local(async move {
                let outcome = match JsFuture::from(promise).await {
                    Ok(_) => PlayOutcome::Started {
                        ready_state: media.ready_state(),
                    },
                    Err(err) => PlayOutcome::Rejected {
                        reason: describe(&err),
                    },
                };
                settle(outcome);
            }),
            Err(err) => settle(PlayOutcome::Rejected {
                reason: describe(&err),
            }),
        }
        Ok(())
    }

    fn resume_if_paused(&mut self, video: ElementId) -> Result<()> {
        let media = self.media(video)?;
        if !media.paused() {
            return Ok(());
        }
        let promise = media.play().map_err(js_error)?;
        spawn_local(async move {
            if let Err(err) = JsFuture::from(promise).await {
                trace!(video = video.0, "Resume rejected: {}", describe(&err));
            }
        });
        Ok(())
    }

    fn pause(&mut self, video: ElementId) -> Result<()> {
        self.media(video)?.pause().map_err(js_error)
    }

    fn seek(&mut self, video: ElementId, seconds: f64) -> Result<()> {
        self.media(video)?.set_current_time(seconds);
        Ok(())
    }

    fn set_inner_html(&mut self, element: ElementId, html: &str) -> Result<()> {
        self.registry.get(element)?.set_inner_html(html);
        Ok(())
    }

    fn detach(&mut self, element: ElementId) -> Result<()> {
        self.registry.get(element)?.remove();
        Ok(())
    }

    fn observe(&mut self, observer: ObserverKind, threshold: f64, target: ElementId) -> Result<()> {
        let element = self.registry.get(target)?;
        self.observer(observer, threshold)?.observe(&element);
        Ok(())
    }

    fn unobserve(&mut self, observer: ObserverKind, target: ElementId) -> Result<()> {
        let element = self.registry.get(target)?;
        if let Some(observer) = self.observers.get(&observer) {
            observer.unobserve(&element);
        }
        Ok(())
    }

    fn listen(&mut self, listener: Listener) -> Result<()> {
        let poster = self.poster.clone();
        match listener {
            Listener::TriggerClick(trigger) => {
                let element = self.registry.get(trigger)?;
                Self::bind(&element, "click", false, move |_| {
                    poster.post(Signal::TriggerActivated)
                })
            }
            Listener::WindowResize => Self::bind(&self.window, "resize", false, move |_| {
                poster.post(Signal::Resized)
            }),
            Listener::VideoPlayingOnce(video) => {
                let element = self.registry.get(video)?;
                Self::bind(&element, "playing", true, move |_| {
                    poster.post(Signal::Dispatch(Message::VideoPlaying { video }))
                })
            }
            Listener::PlayAffordanceOnce { button, video } => {
                let element = self.registry.get(button)?;
                Self::bind(&element, "click", true, move |_| {
                    poster.post(Signal::Dispatch(Message::PlayAffordanceActivated { video }))
                })
            }
        }
    }

    fn schedule(&mut self, timer: Timer, delay: Duration) -> Result<()> {
        let poster = self.poster.clone();
        let callback = Closure::once_into_js(move || poster.post(Signal::Timer(timer)));
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                timeout_millis(delay),
            )
            .map(drop)
            .map_err(js_error)
    }
}
