use std::io::{self, Write};
use std::str::FromStr;

use tracing::{Level, Metadata};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;

/// Console method an event is written with, so devtools keeps its severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleMethod {
    Log,
    Warn,
    Error,
}

impl ConsoleMethod {
    pub fn for_level(level: &Level) -> Self {
        if *level == Level::ERROR {
            ConsoleMethod::Error
        } else if *level == Level::WARN {
            ConsoleMethod::Warn
        } else {
            ConsoleMethod::Log
        }
    }
}

/// Writer that forwards each formatted event to the browser console.
pub struct ConsoleWriter {
    buf: Vec<u8>,
    method: ConsoleMethod,
}

impl Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&self.buf);
        let line = JsValue::from_str(line.trim_end());
        match self.method {
            ConsoleMethod::Log => web_sys::console::log_1(&line),
            ConsoleMethod::Warn => web_sys::console::warn_1(&line),
            ConsoleMethod::Error => web_sys::console::error_1(&line),
        }
        self.buf.clear();
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MakeConsoleWriter;

impl<'a> MakeWriter<'a> for MakeConsoleWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            buf: Vec::new(),
            method: ConsoleMethod::Log,
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            buf: Vec::new(),
            method: ConsoleMethod::for_level(meta.level()),
        }
    }
}

/// Parses a level name, falling back to `info` for anything unrecognised.
pub fn parse_level(level: &str) -> LevelFilter {
    LevelFilter::from_str(level.trim()).unwrap_or(LevelFilter::INFO)
}

/// Installs the console subscriber. Later calls keep the first subscriber.
pub fn init(level: &str) {
    let installed = tracing_subscriber::fmt()
        .with_writer(MakeConsoleWriter)
        .with_max_level(parse_level(level))
        .without_time()
        .with_target(false)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(level, "console logging ready");
    }
}
