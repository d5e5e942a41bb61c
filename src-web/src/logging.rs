//! `tracing` output routed to the browser console.

use site_interactions::config::LogLevel;
use std::io;
use tracing::{Level, Metadata, info, warn};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};
use wasm_bindgen::JsValue;

pub(crate) type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

/// Buffers one formatted record and hands it to `console` on drop.
pub(crate) struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.buf);
        let line = JsValue::from_str(line.trim_end());
        match self.level {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            Level::INFO => web_sys::console::info_1(&line),
            _ => web_sys::console::debug_1(&line),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MakeConsoleWriter;

impl<'a> MakeWriter<'a> for MakeConsoleWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            level: Level::INFO,
            buf: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            level: *meta.level(),
            buf: Vec::new(),
        }
    }
}

pub(crate) fn init_tracing() -> Option<ReloadHandle> {
    let (filter_layer, handle) = reload::Layer::new(EnvFilter::new("info"));
    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(MakeConsoleWriter)
                .without_time()
                .with_ansi(false)
                .with_target(true)
                .with_filter(filter_layer),
        )
        .try_init()
        .is_ok();
    installed.then_some(handle)
}

pub(crate) fn set_log_level(handle: &ReloadHandle, level: LogLevel) {
    let parsed = EnvFilter::builder()
        .parse(level.as_filter_str())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}
