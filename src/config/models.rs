use serde::Deserialize;
use std::time::Duration;

/// Flattened interaction configuration; built from the TOML tables.
#[derive(Debug, Clone, Deserialize, serde::Serialize, PartialEq)]
pub struct InteractionConfig {
    #[serde(default = "crate::config::defaults::default_desktop_breakpoint_px")]
    pub desktop_breakpoint_px: f64,
    #[serde(default = "crate::config::defaults::default_closing_delay_ms")]
    pub closing_delay_ms: u64,
    #[serde(default = "crate::config::defaults::default_load_settle_delay_ms")]
    pub load_settle_delay_ms: u64,
    #[serde(default = "crate::config::defaults::default_autoplay_threshold")]
    pub autoplay_threshold: f64,
    #[serde(default = "crate::config::defaults::default_play_while_visible_threshold")]
    pub play_while_visible_threshold: f64,
    #[serde(default = "crate::config::defaults::default_fallback_fade_ms")]
    pub fallback_fade_ms: u64,
    #[serde(default = "crate::config::defaults::default_hero_hints")]
    pub hero_hints: bool,
    #[serde(default = "crate::config::defaults::default_reveal_threshold")]
    pub reveal_threshold: f64,
    #[serde(default = "crate::config::defaults::default_reveal_transition")]
    pub reveal_transition: String,
    #[serde(default = "crate::config::defaults::default_heading_tag")]
    pub heading_tag: String,
    #[serde(default = "crate::config::defaults::default_document_reveal_delay_ms")]
    pub document_reveal_delay_ms: u64,
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
    #[serde(default)]
    pub markers: Markers,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        InteractionConfig {
            desktop_breakpoint_px: crate::config::defaults::default_desktop_breakpoint_px(),
            closing_delay_ms: crate::config::defaults::default_closing_delay_ms(),
            load_settle_delay_ms: crate::config::defaults::default_load_settle_delay_ms(),
            autoplay_threshold: crate::config::defaults::default_autoplay_threshold(),
            play_while_visible_threshold:
                crate::config::defaults::default_play_while_visible_threshold(),
            fallback_fade_ms: crate::config::defaults::default_fallback_fade_ms(),
            hero_hints: crate::config::defaults::default_hero_hints(),
            reveal_threshold: crate::config::defaults::default_reveal_threshold(),
            reveal_transition: crate::config::defaults::default_reveal_transition(),
            heading_tag: crate::config::defaults::default_heading_tag(),
            document_reveal_delay_ms: crate::config::defaults::default_document_reveal_delay_ms(),
            log_level: crate::config::defaults::default_log_level(),
            markers: Markers::default(),
        }
    }
}

impl InteractionConfig {
    pub fn closing_delay(&self) -> Duration {
        Duration::from_millis(self.closing_delay_ms)
    }

    pub fn load_settle_delay(&self) -> Duration {
        Duration::from_millis(self.load_settle_delay_ms)
    }

    pub fn fallback_fade(&self) -> Duration {
        Duration::from_millis(self.fallback_fade_ms)
    }

    pub fn document_reveal_delay(&self) -> Duration {
        Duration::from_millis(self.document_reveal_delay_ms)
    }
}

/// Class and id names shared with the page's stylesheet and markup.
///
/// These are part of the external contract: styling and analytics read the
/// same names, so a rename here must be mirrored in the site.
#[derive(Debug, Clone, Deserialize, serde::Serialize, PartialEq, Eq)]
pub struct Markers {
    #[serde(default = "crate::config::defaults::default_menu_trigger_id")]
    pub menu_trigger_id: String,
    #[serde(default = "crate::config::defaults::default_menu_open")]
    pub menu_open: String,
    #[serde(default = "crate::config::defaults::default_menu_locked")]
    pub menu_locked: String,
    #[serde(default = "crate::config::defaults::default_menu_closing")]
    pub menu_closing: String,
    #[serde(default = "crate::config::defaults::default_no_scroll")]
    pub no_scroll: String,
    #[serde(default = "crate::config::defaults::default_loading")]
    pub loading: String,
    #[serde(default = "crate::config::defaults::default_video_wrapper")]
    pub video_wrapper: String,
    #[serde(default = "crate::config::defaults::default_fallback_image")]
    pub fallback_image: String,
    #[serde(default = "crate::config::defaults::default_play_button")]
    pub play_button: String,
    #[serde(default = "crate::config::defaults::default_hero")]
    pub hero: String,
    /// Marks scroll-triggered videos and, independently, scroll-reveal blocks.
    #[serde(default = "crate::config::defaults::default_media_item")]
    pub media_item: String,
    #[serde(default = "crate::config::defaults::default_reset_on_load")]
    pub reset_on_load: String,
    #[serde(default = "crate::config::defaults::default_play_on_scroll")]
    pub play_on_scroll: String,
    #[serde(default = "crate::config::defaults::default_needs_play_button")]
    pub needs_play_button: String,
    #[serde(default = "crate::config::defaults::default_widow_fix_off")]
    pub widow_fix_off: String,
    #[serde(default = "crate::config::defaults::default_widow_fix_on")]
    pub widow_fix_on: String,
}

impl Default for Markers {
    fn default() -> Self {
        Markers {
            menu_trigger_id: crate::config::defaults::default_menu_trigger_id(),
            menu_open: crate::config::defaults::default_menu_open(),
            menu_locked: crate::config::defaults::default_menu_locked(),
            menu_closing: crate::config::defaults::default_menu_closing(),
            no_scroll: crate::config::defaults::default_no_scroll(),
            loading: crate::config::defaults::default_loading(),
            video_wrapper: crate::config::defaults::default_video_wrapper(),
            fallback_image: crate::config::defaults::default_fallback_image(),
            play_button: crate::config::defaults::default_play_button(),
            hero: crate::config::defaults::default_hero(),
            media_item: crate::config::defaults::default_media_item(),
            reset_on_load: crate::config::defaults::default_reset_on_load(),
            play_on_scroll: crate::config::defaults::default_play_on_scroll(),
            needs_play_button: crate::config::defaults::default_needs_play_button(),
            widow_fix_off: crate::config::defaults::default_widow_fix_off(),
            widow_fix_on: crate::config::defaults::default_widow_fix_on(),
        }
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
