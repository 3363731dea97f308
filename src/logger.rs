//! `log` backend writing to the browser console.
//!
//! Records from the sync layer (`animaldrive_core`) and from the shell end up
//! in the devtools console, at the console level matching their severity.

use log::{Level, Log, Metadata, Record};

use crate::config::LOG_LEVEL;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Install the console logger. Later calls are no-ops.
pub fn init() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LOG_LEVEL);
    }
}

/// One console line: `[LEVEL target] message`.
fn format_record(level: Level, target: &str, message: &str) -> String {
    format!("[{} {}] {}", level, target, message)
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= LOG_LEVEL
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_record(
            record.level(),
            record.target(),
            &record.args().to_string(),
        );

        #[cfg(target_arch = "wasm32")]
        {
            let line = wasm_bindgen::JsValue::from_str(&line);
            match record.level() {
                Level::Error => web_sys::console::error_1(&line),
                Level::Warn => web_sys::console::warn_1(&line),
                Level::Info => web_sys::console::info_1(&line),
                Level::Debug | Level::Trace => web_sys::console::log_1(&line),
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        let _ = line;
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_record() {
        assert_eq!(
            format_record(Level::Warn, "animaldrive_core::session", "expired"),
            "[WARN animaldrive_core::session] expired"
        );
    }

    #[test]
    fn test_trace_is_filtered() {
        let metadata = Metadata::builder().level(Level::Trace).build();
        assert!(!LOGGER.enabled(&metadata));
        let metadata = Metadata::builder().level(Level::Info).build();
        assert!(LOGGER.enabled(&metadata));
    }
}
