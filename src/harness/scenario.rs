use super::page::{AutoplayPolicy, SimPage};
use super::snapshot::PageSnapshot;
use crate::config::InteractionConfig;
use crate::controller::NavigationType;
use crate::dom::{ElementId, Target};
use crate::host::Host;
use crate::runtime::Runtime;
use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const ROOT_KEY: &str = "root";
const BODY_KEY: &str = "body";

/// A page fixture plus the browser events to replay against it.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub page: PageFixture,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageFixture {
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f64,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,
    #[serde(default)]
    pub scroll_y: f64,
    #[serde(default)]
    pub navigation: NavigationType,
    #[serde(default)]
    pub autoplay: AutoplayPolicy,
    #[serde(default)]
    pub root_classes: Vec<String>,
    #[serde(default)]
    pub body_classes: Vec<String>,
    #[serde(default)]
    pub elements: Vec<ElementFixture>,
}

impl Default for PageFixture {
    fn default() -> Self {
        Self {
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            scroll_y: 0.0,
            navigation: NavigationType::default(),
            autoplay: AutoplayPolicy::default(),
            root_classes: Vec::new(),
            body_classes: Vec::new(),
            elements: Vec::new(),
        }
    }
}

fn default_viewport_width() -> f64 {
    390.0
}

fn default_viewport_height() -> f64 {
    844.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElementFixture {
    pub key: String,
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub html: String,
    /// Key of an earlier element; `body` when omitted.
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub ready_state: Option<u16>,
    #[serde(default)]
    pub current_time: Option<f64>,
    /// Layout height in pixels, for blocks taller than the viewport.
    #[serde(default)]
    pub height: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Step {
    DomReady,
    OverlayInit,
    Load,
    PageShow {
        #[serde(default)]
        persisted: bool,
    },
    Click {
        target: String,
    },
    Resize {
        width: f64,
    },
    Scroll {
        y: f64,
    },
    Intersect {
        target: String,
        ratio: f64,
    },
    SettlePlays,
    Playing {
        target: String,
    },
    Advance {
        ms: u64,
    },
    /// A third-party script stripping a class behind the controller's back.
    StripClass {
        target: String,
        class: String,
    },
}

pub fn parse_scenario(contents: &str) -> Result<Scenario> {
    toml::from_str(contents).context("Failed to parse scenario")
}

pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario {}", path.display()))?;
    parse_scenario(&contents).with_context(|| format!("Invalid scenario {}", path.display()))
}

/// Fixture keys resolved to element handles.
struct ElementKeys(HashMap<String, ElementId>);

impl ElementKeys {
    fn element(&self, key: &str) -> Result<ElementId> {
        self.0
            .get(key)
            .copied()
            .ok_or_else(|| anyhow!("unknown element key `{key}`"))
    }

    fn target(&self, key: &str) -> Result<Target> {
        Ok(match key {
            ROOT_KEY => Target::Root,
            BODY_KEY => Target::Body,
            other => Target::Element(self.element(other)?),
        })
    }
}

fn build_page(fixture: &PageFixture) -> Result<(SimPage, ElementKeys)> {
    let mut page = SimPage::new();
    page.set_viewport_width(fixture.viewport_width);
    page.set_viewport_height(fixture.viewport_height);
    page.set_scroll_y(fixture.scroll_y);
    page.set_navigation(fixture.navigation);
    page.set_autoplay_policy(fixture.autoplay);

    for class in &fixture.root_classes {
        page.add_class(Target::Root, class)?;
    }
    for class in &fixture.body_classes {
        page.add_class(Target::Body, class)?;
    }

    let mut keys = HashMap::from([
        (ROOT_KEY.to_string(), SimPage::ROOT),
        (BODY_KEY.to_string(), SimPage::BODY),
    ]);
    for element in &fixture.elements {
        if keys.contains_key(&element.key) {
            bail!("duplicate element key `{}`", element.key);
        }
        let parent_key = element.parent.as_deref().unwrap_or(BODY_KEY);
        let parent = *keys.get(parent_key).ok_or_else(|| {
            anyhow!(
                "element `{}` names unknown parent `{parent_key}`",
                element.key
            )
        })?;
        let classes: Vec<&str> = element.classes.iter().map(String::as_str).collect();
        let id = page
            .add_element(
                parent,
                &element.tag,
                element.id.as_deref(),
                &classes,
                &element.html,
            )
            .with_context(|| format!("Failed to add element `{}`", element.key))?;
        if let Some(ready_state) = element.ready_state {
            page.set_ready_state(id, ready_state).with_context(|| {
                format!("`{}` has a ready_state but is not a video", element.key)
            })?;
        }
        if let Some(seconds) = element.current_time {
            page.set_current_time(id, seconds).with_context(|| {
                format!("`{}` has a current_time but is not a video", element.key)
            })?;
        }
        if let Some(height) = element.height {
            page.set_height(id, height)?;
        }
        keys.insert(element.key.clone(), id);
    }
    Ok((page, ElementKeys(keys)))
}

/// Builds the fixture, replays every step, and returns the final page state.
pub fn replay(scenario: &Scenario, config: InteractionConfig) -> Result<PageSnapshot> {
    let (page, keys) = build_page(&scenario.page)?;
    let mut runtime = Runtime::new(config, page);

    for (idx, step) in scenario.steps.iter().enumerate() {
        debug!(step = idx, ?step, "Replaying step");
        run_step(&mut runtime, &keys, step).with_context(|| format!("Step {idx} failed"))?;
    }

    let mut snapshot = runtime.snapshot();
    let labels: BTreeMap<ElementId, String> = keys
        .0
        .into_iter()
        .map(|(key, id)| (id, key))
        .collect();
    snapshot.attach_keys(&labels);
    info!(
        steps = scenario.steps.len(),
        clock_ms = snapshot.clock_ms,
        "Scenario replayed"
    );
    Ok(snapshot)
}

fn run_step(runtime: &mut Runtime<SimPage>, keys: &ElementKeys, step: &Step) -> Result<()> {
    match step {
        Step::DomReady => runtime.dom_ready(),
        Step::OverlayInit => runtime.overlay_init(),
        Step::Load => runtime.page_loaded(),
        Step::PageShow { persisted } => runtime.page_shown(*persisted),
        Step::Click { target } => runtime.click(keys.element(target)?),
        Step::Resize { width } => runtime.resize(*width),
        Step::Scroll { y } => runtime.scroll(*y),
        Step::Intersect { target, ratio } => runtime.intersect(keys.element(target)?, *ratio),
        Step::SettlePlays => runtime.settle_plays(),
        Step::Playing { target } => runtime.emit_playing(keys.element(target)?),
        Step::Advance { ms } => runtime.advance(*ms),
        Step::StripClass { target, class } => {
            runtime.host_mut().strip_class(keys.target(target)?, class)?
        }
    }
    Ok(())
}
