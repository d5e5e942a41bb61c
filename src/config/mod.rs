//! Configuration loading for the interaction layer.
//!
//! Tunables (breakpoints, delays, observer thresholds) and the marker names
//! shared with the page's stylesheet are centralized here. Values come from a
//! sectioned TOML document; any missing or invalid entry falls back to the
//! defaults so the page keeps working.

mod defaults;
mod io;
mod models;
mod tables;

pub use io::{load_config, parse_config, serialize_config};
pub use models::{InteractionConfig, LogLevel, Markers};
