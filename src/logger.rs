//! Logging setup for basegfx
//!
//! Plain text goes through `env_logger`; a `json:` level prefix switches to
//! one JSON object per line, which is what log scrapers of load reports read.

use chrono::{Local, Utc};
use log::{Level, LevelFilter, Log, Metadata, Record};
use serde_json::json;
use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::sync::Mutex;

/// Environment variable holding the log level (optionally `json:`-prefixed)
pub const LOG_LEVEL_ENV: &str = "BASEGFX_LOG_LEVEL";

/// Environment variable naming a file that receives JSON log lines
pub const LOG_PATH_ENV: &str = "BASEGFX_LOG_PATH";

/// JSON logger implementation
#[derive(Debug)]
pub struct JsonLogger {
    level: Level,
    target_file: Mutex<Option<std::fs::File>>,
}

/// Split a level string into (json?, level name)
fn parse_level_spec(level_str: &str) -> (bool, &str) {
    if let Some(stripped) = level_str.strip_prefix("json:") {
        (true, stripped)
    } else if level_str == "json" {
        (true, "info")
    } else {
        (false, level_str)
    }
}

fn parse_filter(level: &str) -> LevelFilter {
    match level {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Warn,
    }
}

impl JsonLogger {
    /// Create a new JSON logger
    pub fn new(level: Level, log_path: Option<String>) -> Self {
        let target_file = if let Some(path) = log_path {
            OpenOptions::new().create(true).append(true).open(path).ok()
        } else {
            None
        };

        JsonLogger {
            level,
            target_file: Mutex::new(target_file),
        }
    }

    /// Initialize the logger with specified level and source
    pub fn init_with_level(level_str: &str, source: &str) -> (String, String) {
        let log_path = env::var(LOG_PATH_ENV).ok();
        let (use_json, actual_level) = parse_level_spec(level_str);

        if !use_json {
            let level_filter = parse_filter(actual_level);

            let result = env_logger::Builder::new()
                .filter_level(level_filter)
                .format(|buf, record| {
                    use std::io::Write;

                    write!(buf, "🖼️ ")?;
                    write!(
                        buf,
                        "[{} {} {}] ",
                        Local::now().format("%Y-%m-%dT%H:%M:%SZ"),
                        record.level(),
                        record.target()
                    )?;
                    writeln!(buf, "{}", record.args())
                })
                .try_init();
            if let Err(e) = result {
                eprintln!("Failed to initialize logger: {e}");
            }
            return (actual_level.to_string(), source.to_string());
        }

        let level = match parse_filter(actual_level).to_level() {
            Some(level) => level,
            None => {
                log::set_max_level(LevelFilter::Off);
                return (actual_level.to_string(), source.to_string());
            }
        };

        let logger = Box::new(JsonLogger::new(level, log_path));

        if let Err(e) = log::set_boxed_logger(logger) {
            eprintln!("Failed to initialize JSON logger: {e}");
            return (actual_level.to_string(), source.to_string());
        }

        log::set_max_level(level.to_level_filter());
        (actual_level.to_string(), source.to_string())
    }

    /// Initialize the logger from `BASEGFX_LOG_LEVEL`, defaulting to warnings
    pub fn init() {
        let log_level = env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| "warn".to_string());
        Self::init_with_level(&log_level, LOG_LEVEL_ENV);
    }

    fn render(record: &Record<'_>) -> String {
        let log_entry = json!({
            "@timestamp": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
            "@level": record.level().to_string().to_lowercase(),
            "@message": record.args().to_string(),
            "@module": record.target(),
            "@pid": std::process::id(),
            "@file": record.file().unwrap_or("unknown"),
            "@line": record.line().unwrap_or(0),
        });

        format!(
            "{}\n",
            serde_json::to_string(&log_entry).unwrap_or_default()
        )
    }
}

impl Log for JsonLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let json_string = Self::render(record);

        if let Ok(mut file_guard) = self.target_file.lock() {
            if let Some(ref mut file) = *file_guard {
                let _ = file.write_all(json_string.as_bytes());
                let _ = file.flush();
                return;
            }
        }
        let _ = io::stderr().write_all(json_string.as_bytes());
        let _ = io::stderr().flush();
    }

    fn flush(&self) {
        if let Ok(mut file_guard) = self.target_file.lock() {
            if let Some(ref mut file) = *file_guard {
                let _ = file.flush();
            }
        }
        let _ = io::stderr().flush();
    }
}

/// Helper to check if JSON logging is enabled
pub fn is_json_logging() -> bool {
    env::var(LOG_LEVEL_ENV)
        .map(|v| v.starts_with("json"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_spec() {
        assert_eq!(parse_level_spec("json:debug"), (true, "debug"));
        assert_eq!(parse_level_spec("json"), (true, "info"));
        assert_eq!(parse_level_spec("trace"), (false, "trace"));
        assert_eq!(parse_filter("bogus"), LevelFilter::Warn);
        assert_eq!(parse_filter("off"), LevelFilter::Off);
    }

    #[test]
    fn test_json_line_shape() {
        let line = JsonLogger::render(
            &Record::builder()
                .args(format_args!("Reading grf-file 'base.grf'"))
                .level(Level::Debug)
                .target("sprite")
                .build(),
        );
        let value: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(value["@level"], "debug");
        assert_eq!(value["@module"], "sprite");
        assert_eq!(value["@message"], "Reading grf-file 'base.grf'");
    }
}
