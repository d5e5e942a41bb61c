//! Host-neutral view of the page: element handles, selectors, and the
//! inventory gathered once at page-ready.

use crate::config::{InteractionConfig, Markers};
use serde::Serialize;

/// Opaque handle for an element, issued by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ElementId(pub u32);

/// Where a class or style mutation lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Target {
    /// The document root (`<html>`).
    Root,
    Body,
    Element(ElementId),
}

/// The handful of selectors the controllers need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Id(String),
    Class(String),
    Tag(String),
    TagWithClass { tag: String, class: String },
    TagWithoutClass { tag: String, class: String },
}

impl Selector {
    pub fn to_css(&self) -> String {
        match self {
            Selector::Id(id) => format!("#{id}"),
            Selector::Class(class) => format!(".{class}"),
            Selector::Tag(tag) => tag.clone(),
            Selector::TagWithClass { tag, class } => format!("{tag}.{class}"),
            Selector::TagWithoutClass { tag, class } => format!("{tag}:not(.{class})"),
        }
    }

    /// Match against a tag name and class list, ASCII case-insensitive on the tag.
    pub fn matches(&self, id_attr: Option<&str>, tag: &str, classes: &[&str]) -> bool {
        let has = |class: &str| classes.iter().any(|c| *c == class);
        match self {
            Selector::Id(id) => id_attr == Some(id.as_str()),
            Selector::Class(class) => has(class),
            Selector::Tag(t) => tag.eq_ignore_ascii_case(t),
            Selector::TagWithClass { tag: t, class } => tag.eq_ignore_ascii_case(t) && has(class),
            Selector::TagWithoutClass { tag: t, class } => {
                tag.eq_ignore_ascii_case(t) && !has(class)
            }
        }
    }
}

/// Read-only DOM access shared by both hosts.
pub trait DomQuery {
    /// All matches in document order.
    fn query_all(&self, selector: &Selector) -> Vec<ElementId>;
    /// First descendant of `scope` matching `selector`.
    fn query_within(&self, scope: ElementId, selector: &Selector) -> Option<ElementId>;
    fn has_class(&self, element: ElementId, class: &str) -> bool;
    fn inner_html(&self, element: ElementId) -> Option<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VideoRole {
    Hero,
    ScrollTriggered,
    Other,
}

/// A `.video-wrapper` and the children the media controller cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoWrapper {
    pub wrapper: ElementId,
    pub video: ElementId,
    pub fallback: Option<ElementId>,
    pub play_button: Option<ElementId>,
    pub role: VideoRole,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    pub element: ElementId,
    pub html: String,
}

/// Everything the controllers need to know about the page at setup time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInventory {
    pub video_wrappers: Vec<VideoWrapper>,
    pub reset_on_load: Vec<ElementId>,
    pub play_on_scroll: Vec<ElementId>,
    pub reveal_targets: Vec<ElementId>,
    /// Default typography candidates (headings not opted out).
    pub headings: Vec<TextBlock>,
    /// Elements explicitly opted into typography normalization.
    pub forced_text: Vec<TextBlock>,
}

impl PageInventory {
    pub fn collect<Q: DomQuery + ?Sized>(query: &Q, config: &InteractionConfig) -> Self {
        let markers = &config.markers;
        let video_wrappers = query
            .query_all(&Selector::Class(markers.video_wrapper.clone()))
            .into_iter()
            .filter_map(|wrapper| describe_wrapper(query, markers, wrapper))
            .collect();

        let text_blocks = |selector: Selector| -> Vec<TextBlock> {
            query
                .query_all(&selector)
                .into_iter()
                .filter_map(|element| {
                    query
                        .inner_html(element)
                        .map(|html| TextBlock { element, html })
                })
                .collect()
        };

        PageInventory {
            video_wrappers,
            reset_on_load: query.query_all(&Selector::TagWithClass {
                tag: "video".to_string(),
                class: markers.reset_on_load.clone(),
            }),
            play_on_scroll: query.query_all(&Selector::TagWithClass {
                tag: "video".to_string(),
                class: markers.play_on_scroll.clone(),
            }),
            reveal_targets: query.query_all(&Selector::Class(markers.media_item.clone())),
            headings: text_blocks(Selector::TagWithoutClass {
                tag: config.heading_tag.clone(),
                class: markers.widow_fix_off.clone(),
            }),
            forced_text: text_blocks(Selector::Class(markers.widow_fix_on.clone())),
        }
    }
}

fn describe_wrapper<Q: DomQuery + ?Sized>(
    query: &Q,
    markers: &Markers,
    wrapper: ElementId,
) -> Option<VideoWrapper> {
    let video = query.query_within(wrapper, &Selector::Tag("video".to_string()))?;
    let role = if query.has_class(video, &markers.hero) {
        VideoRole::Hero
    } else if query.has_class(video, &markers.media_item) {
        VideoRole::ScrollTriggered
    } else {
        VideoRole::Other
    };
    Some(VideoWrapper {
        wrapper,
        video,
        fallback: query.query_within(wrapper, &Selector::Class(markers.fallback_image.clone())),
        play_button: query.query_within(wrapper, &Selector::Class(markers.play_button.clone())),
        role,
    })
}
