use std::io::{self, Write};

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

use crate::config::AppConfig;

/// Buffers one formatted event and hands it to the matching
/// `console.*` method when dropped.
pub struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.buffer);
        let message: wasm_bindgen::JsValue = line.trim_end().into();
        match self.level {
            Level::ERROR => web_sys::console::error_1(&message),
            Level::WARN => web_sys::console::warn_1(&message),
            Level::INFO => web_sys::console::info_1(&message),
            _ => web_sys::console::debug_1(&message),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter { level: Level::INFO, buffer: Vec::new() }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter { level: *meta.level(), buffer: Vec::new() }
    }
}

/// Routes `tracing` output to the browser console. The browser has no
/// system clock for the formatter, so timestamps are left to devtools.
pub fn init(config: &AppConfig) {
    let result = tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .try_init();

    if let Err(e) = result {
        web_sys::console::warn_1(&format!("Logging already initialised: {}", e).into());
    }
}
