pub mod config;
pub mod controller;
pub mod dom;
#[cfg(feature = "harness")]
pub mod harness;
pub mod host;
pub mod runtime;
pub mod typography;
