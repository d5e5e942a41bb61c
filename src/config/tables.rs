use super::defaults;
use super::models::{InteractionConfig, LogLevel, Markers};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    overlay: OverlayConfig,
    #[serde(default)]
    media: MediaConfig,
    #[serde(default)]
    reveal: RevealConfig,
    #[serde(default)]
    typography: TypographyConfig,
    #[serde(default)]
    visibility: VisibilityConfig,
    #[serde(default)]
    markers: Markers,
    #[serde(default)]
    logging: LoggingConfig,
}

impl From<ConfigTables> for InteractionConfig {
    fn from(tables: ConfigTables) -> Self {
        InteractionConfig {
            desktop_breakpoint_px: tables.overlay.desktop_breakpoint_px,
            closing_delay_ms: tables.overlay.closing_delay_ms,
            load_settle_delay_ms: tables.overlay.load_settle_delay_ms,
            autoplay_threshold: tables.media.autoplay_threshold,
            play_while_visible_threshold: tables.media.play_while_visible_threshold,
            fallback_fade_ms: tables.media.fallback_fade_ms,
            hero_hints: tables.media.hero_hints,
            reveal_threshold: tables.reveal.threshold,
            reveal_transition: tables.reveal.transition,
            heading_tag: tables.typography.heading_tag,
            document_reveal_delay_ms: tables.visibility.reveal_delay_ms,
            log_level: tables.logging.log_level,
            markers: tables.markers,
        }
    }
}

impl From<&InteractionConfig> for ConfigTables {
    fn from(config: &InteractionConfig) -> Self {
        ConfigTables {
            overlay: OverlayConfig {
                desktop_breakpoint_px: config.desktop_breakpoint_px,
                closing_delay_ms: config.closing_delay_ms,
                load_settle_delay_ms: config.load_settle_delay_ms,
            },
            media: MediaConfig {
                autoplay_threshold: config.autoplay_threshold,
                play_while_visible_threshold: config.play_while_visible_threshold,
                fallback_fade_ms: config.fallback_fade_ms,
                hero_hints: config.hero_hints,
            },
            reveal: RevealConfig {
                threshold: config.reveal_threshold,
                transition: config.reveal_transition.clone(),
            },
            typography: TypographyConfig {
                heading_tag: config.heading_tag.clone(),
            },
            visibility: VisibilityConfig {
                reveal_delay_ms: config.document_reveal_delay_ms,
            },
            markers: config.markers.clone(),
            logging: LoggingConfig {
                log_level: config.log_level,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct OverlayConfig {
    #[serde(default = "defaults::default_desktop_breakpoint_px")]
    desktop_breakpoint_px: f64,
    #[serde(default = "defaults::default_closing_delay_ms")]
    closing_delay_ms: u64,
    #[serde(default = "defaults::default_load_settle_delay_ms")]
    load_settle_delay_ms: u64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        OverlayConfig {
            desktop_breakpoint_px: defaults::default_desktop_breakpoint_px(),
            closing_delay_ms: defaults::default_closing_delay_ms(),
            load_settle_delay_ms: defaults::default_load_settle_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct MediaConfig {
    #[serde(default = "defaults::default_autoplay_threshold")]
    autoplay_threshold: f64,
    #[serde(default = "defaults::default_play_while_visible_threshold")]
    play_while_visible_threshold: f64,
    #[serde(default = "defaults::default_fallback_fade_ms")]
    fallback_fade_ms: u64,
    #[serde(default = "defaults::default_hero_hints")]
    hero_hints: bool,
}

impl Default for MediaConfig {
    fn default() -> Self {
        MediaConfig {
            autoplay_threshold: defaults::default_autoplay_threshold(),
            play_while_visible_threshold: defaults::default_play_while_visible_threshold(),
            fallback_fade_ms: defaults::default_fallback_fade_ms(),
            hero_hints: defaults::default_hero_hints(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct RevealConfig {
    #[serde(default = "defaults::default_reveal_threshold")]
    threshold: f64,
    #[serde(default = "defaults::default_reveal_transition")]
    transition: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        RevealConfig {
            threshold: defaults::default_reveal_threshold(),
            transition: defaults::default_reveal_transition(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct TypographyConfig {
    #[serde(default = "defaults::default_heading_tag")]
    heading_tag: String,
}

impl Default for TypographyConfig {
    fn default() -> Self {
        TypographyConfig {
            heading_tag: defaults::default_heading_tag(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct VisibilityConfig {
    #[serde(default = "defaults::default_document_reveal_delay_ms")]
    reveal_delay_ms: u64,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        VisibilityConfig {
            reveal_delay_ms: defaults::default_document_reveal_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
        }
    }
}
