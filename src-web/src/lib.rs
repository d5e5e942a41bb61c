//! Browser entry point: binds page lifecycle events and hands them to the
//! interaction runtime, backed by the live DOM through [`host::WebHost`].

mod host;
mod logging;

use host::WebHost;
use js_sys::{Function, Reflect};
use site_interactions::config::{InteractionConfig, parse_config};
use site_interactions::controller::{Message, Timer};
use site_interactions::runtime::Runtime;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use tracing::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, PageTransitionEvent, Window};

const CONFIG_ELEMENT_ID: &str = "site-interactions-config";

/// Work queued for the runtime from browser callbacks.
#[derive(Debug)]
pub(crate) enum Signal {
    Dispatch(Message),
    Timer(Timer),
    DomReady,
    OverlayInit,
    TriggerActivated,
    Resized,
    Loaded,
    PageShown(bool),
}

pub(crate) struct Shell {
    runtime: RefCell<Runtime<WebHost>>,
    mailbox: RefCell<VecDeque<Signal>>,
}

impl Shell {
    fn install(config: InteractionConfig, window: Window, document: Document) -> Rc<Self> {
        Rc::new_cyclic(|weak| {
            let host = WebHost::new(window, document, Poster(weak.clone()));
            Shell {
                runtime: RefCell::new(Runtime::new(config, host)),
                mailbox: RefCell::new(VecDeque::new()),
            }
        })
    }

    fn poster(self: &Rc<Self>) -> Poster {
        Poster(Rc::downgrade(self))
    }

    pub(crate) fn post(&self, signal: Signal) {
        self.mailbox.borrow_mut().push_back(signal);
        self.pump();
    }

    fn pump(&self) {
        // A signal posted from inside a host sink is drained by the outer pump.
        let Ok(mut runtime) = self.runtime.try_borrow_mut() else {
            return;
        };
        loop {
            let next = self.mailbox.borrow_mut().pop_front();
            let Some(signal) = next else {
                break;
            };
            debug!(?signal, "Delivering signal");
            match signal {
                Signal::Dispatch(message) => runtime.dispatch(message),
                Signal::Timer(timer) => runtime.fire_timer(timer),
                Signal::DomReady => runtime.dom_ready(),
                Signal::OverlayInit => runtime.overlay_init(),
                Signal::TriggerActivated => runtime.trigger_activated(),
                Signal::Resized => runtime.resized(),
                Signal::Loaded => runtime.page_loaded(),
                Signal::PageShown(persisted) => runtime.page_shown(persisted),
            }
        }
    }
}

/// Weak handle the host gives to callbacks it registers.
#[derive(Clone)]
pub(crate) struct Poster(Weak<Shell>);

impl Poster {
    pub(crate) fn post(&self, signal: Signal) {
        match self.0.upgrade() {
            Some(shell) => shell.post(signal),
            None => debug!(?signal, "Shell is gone; dropping signal"),
        }
    }
}

#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn start() -> Result<(), JsValue> {
    let reload = logging::init_tracing();
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let config = read_config(&document);
    if let Some(handle) = &reload {
        logging::set_log_level(handle, config.log_level);
    }

    let shell = Shell::install(config, window.clone(), document.clone());
    wire_lifecycle(&shell, &window, &document)?;
    info!("Site interactions started");
    Ok(())
}

fn read_config(document: &Document) -> InteractionConfig {
    let Some(text) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content())
    else {
        debug!("No inline config; using defaults");
        return InteractionConfig::default();
    };
    match parse_config(&text) {
        Ok(config) => {
            info!("Loaded inline interaction config");
            config
        }
        Err(err) => {
            warn!("Falling back to default config: {err:#}");
            InteractionConfig::default()
        }
    }
}

/// The forgotten lifecycle closures own the shell for the lifetime of the page.
fn wire_lifecycle(shell: &Rc<Shell>, window: &Window, document: &Document) -> Result<(), JsValue> {
    let ready_state = document.ready_state();

    if ready_state == "loading" {
        let owner = Rc::clone(shell);
        let win = window.clone();
        let on_ready = Closure::once_into_js(move |_event: Event| on_dom_ready(&owner, &win));
        document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
    } else {
        on_dom_ready(shell, window);
    }

    if ready_state == "complete" {
        shell.post(Signal::Loaded);
    } else {
        let owner = Rc::clone(shell);
        let on_load = Closure::once_into_js(move |_event: Event| owner.post(Signal::Loaded));
        window.add_event_listener_with_callback("load", on_load.unchecked_ref())?;
    }

    let owner = Rc::clone(shell);
    let on_page_show = Closure::wrap(Box::new(move |event: Event| {
        let persisted = event
            .dyn_ref::<PageTransitionEvent>()
            .is_some_and(PageTransitionEvent::persisted);
        owner.post(Signal::PageShown(persisted));
    }) as Box<dyn FnMut(_)>);
    window.add_event_listener_with_callback("pageshow", on_page_show.as_ref().unchecked_ref())?;
    on_page_show.forget();
    Ok(())
}

fn on_dom_ready(shell: &Rc<Shell>, window: &Window) {
    shell.post(Signal::DomReady);
    defer_overlay_init(shell, window);
}

/// Runs overlay setup through the `Webflow` ready queue when the page has one.
fn defer_overlay_init(shell: &Rc<Shell>, window: &Window) {
    let queue = Reflect::get(window, &JsValue::from_str("Webflow"))
        .ok()
        .filter(JsValue::is_object);
    let push = queue
        .as_ref()
        .and_then(|queue| Reflect::get(queue, &JsValue::from_str("push")).ok())
        .and_then(|push| push.dyn_into::<Function>().ok());

    let (Some(queue), Some(push)) = (queue, push) else {
        shell.post(Signal::OverlayInit);
        return;
    };
    let poster = shell.poster();
    let callback = Closure::once_into_js(move || poster.post(Signal::OverlayInit));
    if let Err(err) = push.call1(&queue, &callback) {
        warn!("Webflow.push failed, initializing overlay directly: {err:?}");
        shell.post(Signal::OverlayInit);
    }
}
