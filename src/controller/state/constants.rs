/// `HTMLMediaElement.HAVE_FUTURE_DATA`: enough buffered to keep playing.
pub(crate) const HAVE_FUTURE_DATA: u16 = 3;

pub(crate) const STYLE_TOP: &str = "top";
pub(crate) const STYLE_OPACITY: &str = "opacity";
pub(crate) const STYLE_VISIBILITY: &str = "visibility";
pub(crate) const STYLE_TRANSITION: &str = "transition";
pub(crate) const STYLE_TRANSFORM: &str = "transform";

pub(crate) const ATTR_CONTROLS: &str = "controls";
pub(crate) const ATTR_PLAYSINLINE: &str = "playsinline";
pub(crate) const ATTR_PRELOAD: &str = "preload";

pub(crate) const REVEAL_RESTING_TRANSFORM: &str = "translateY(0)";
