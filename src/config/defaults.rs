pub(crate) fn default_desktop_breakpoint_px() -> f64 {
    992.0
}

pub(crate) fn default_closing_delay_ms() -> u64 {
    400
}

pub(crate) fn default_load_settle_delay_ms() -> u64 {
    300
}

pub(crate) fn default_autoplay_threshold() -> f64 {
    0.6
}

pub(crate) fn default_play_while_visible_threshold() -> f64 {
    0.5
}

pub(crate) fn default_fallback_fade_ms() -> u64 {
    600
}

pub(crate) fn default_hero_hints() -> bool {
    true
}

pub(crate) fn default_reveal_threshold() -> f64 {
    0.15
}

pub(crate) fn default_reveal_transition() -> String {
    "opacity 0.9s cubic-bezier(0.4, 0, 0.2, 1), transform 0.9s cubic-bezier(0.4, 0, 0.2, 1)"
        .to_string()
}

pub(crate) fn default_heading_tag() -> String {
    "h2".to_string()
}

pub(crate) fn default_document_reveal_delay_ms() -> u64 {
    50
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Info
}

pub(crate) fn default_menu_trigger_id() -> String {
    "menu-trigger".to_string()
}

pub(crate) fn default_menu_open() -> String {
    "menu-open".to_string()
}

pub(crate) fn default_menu_locked() -> String {
    "menu-locked".to_string()
}

pub(crate) fn default_menu_closing() -> String {
    "menu-closing".to_string()
}

pub(crate) fn default_no_scroll() -> String {
    "no-scroll".to_string()
}

pub(crate) fn default_loading() -> String {
    "wf-loading".to_string()
}

pub(crate) fn default_video_wrapper() -> String {
    "video-wrapper".to_string()
}

pub(crate) fn default_fallback_image() -> String {
    "video-fallback-img".to_string()
}

pub(crate) fn default_play_button() -> String {
    "video-play-btn".to_string()
}

pub(crate) fn default_hero() -> String {
    "video-hero".to_string()
}

pub(crate) fn default_media_item() -> String {
    "media-item".to_string()
}

pub(crate) fn default_reset_on_load() -> String {
    "reset-on-load".to_string()
}

pub(crate) fn default_play_on_scroll() -> String {
    "play-on-scroll".to_string()
}

pub(crate) fn default_needs_play_button() -> String {
    "needs-play-button".to_string()
}

pub(crate) fn default_widow_fix_off() -> String {
    "widow-fix-off".to_string()
}

pub(crate) fn default_widow_fix_on() -> String {
    "widow-fix-on".to_string()
}
