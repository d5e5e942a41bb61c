//! View-state controller.
//!
//! Owns one typed state value per concern (overlay, each video, reveal
//! blocks, the visibility gate, typography) and reduces browser signals,
//! delivered as [`Message`]s, into [`Effect`]s for the host to perform. The
//! reducer never touches the DOM itself.

mod messages;
mod state;
mod update;

pub use messages::{BodyMarkers, IntersectionEntry, Message, NavigationType, PlayOutcome};
pub use state::{
    Affordance, AutoplayState, Controller, FallbackImage, GateState, OverlayPhase, OverlayState,
    OverlayView, VideoRecord,
};
pub use update::{Effect, Listener, ObserverKind, PlayIntent, Timer};
