//! Routes core `tracing` output to the browser console
//!
//! Info and above are always shown. Debug lines (rejections, transitions,
//! stale timers) only appear while `set_debug_enabled(true)` is in effect.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{Level, Metadata};
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;

static DEBUG_LOGS: AtomicBool = AtomicBool::new(false);

pub(crate) fn set_debug_logs(enabled: bool) {
    DEBUG_LOGS.store(enabled, Ordering::Relaxed);
}

fn level_enabled(level: &Level, debug: bool) -> bool {
    *level <= Level::INFO || (debug && *level == Level::DEBUG)
}

/// Install the console subscriber (called once from the start hook)
pub(crate) fn install_console_logging() {
    let layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_ansi(false)
        .with_target(false)
        .with_writer(ConsoleMakeWriter)
        .with_filter(filter_fn(|meta| {
            level_enabled(meta.level(), DEBUG_LOGS.load(Ordering::Relaxed))
        }));

    if let Err(err) = tracing_subscriber::registry().with(layer).try_init() {
        web_sys::console::warn_1(&format!("Logging already installed: {}", err).into());
    }
}

/// Strip the formatter's trailing newline; the console adds its own
fn console_line(buffer: &[u8]) -> String {
    String::from_utf8_lossy(buffer).trim_end().to_string()
}

struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Buffers one formatted event and emits it on drop
struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self {
            level,
            buffer: Vec::new(),
        }
    }
}

impl io::Write for ConsoleWriter {
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
        let line = console_line(&self.buffer).into();
        if self.level == Level::ERROR {
            web_sys::console::error_1(&line);
        } else if self.level == Level::WARN {
            web_sys::console::warn_1(&line);
        } else if self.level > Level::INFO {
            web_sys::console::debug_1(&line);
        } else {
            web_sys::console::log_1(&line);
        }
    }
}
