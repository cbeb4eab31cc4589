use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use chrono::Local;

use crate::error::{Result, WormError};

static LOGGER: OnceLock<Logger> = OnceLock::new();

pub struct Logger {
    prefix: Option<String>,
    sink: Mutex<File>,
}

impl Logger {
    fn new(prefix: Option<String>, sink: File) -> Self {
        Self { prefix, sink: Mutex::new(sink) }
    }

    pub fn log(&self, file: &str, line: u32, message: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();
        let entry = format_entry(&timestamp, self.prefix.as_deref(), file, line, message);
        if let Ok(mut sink) = self.sink.lock() {
            // Write errors are ignored
            let _ = writeln!(sink, "{}", entry);
        }
    }
}

/// Opens (appending) the log file. Until this is called log lines are
/// dropped: stdout belongs to the board.
pub fn init_logger(path: &Path, prefix: Option<String>) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| WormError::LogFile { path: path.to_path_buf(), source })?;
    LOGGER.get_or_init(|| Logger::new(prefix, file));
    Ok(())
}

pub fn log(file: &str, line: u32, message: &str) {
    if let Some(logger) = LOGGER.get() {
        logger.log(file, line, message);
    }
}

fn format_entry(timestamp: &str, prefix: Option<&str>, file: &str, line: u32, message: &str) -> String {
    let file_name = file.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(file);
    match prefix {
        Some(prefix) => format!("[{}][{}][{}:{}] {}", timestamp, prefix, file_name, line, message),
        None => format!("[{}][{}:{}] {}", timestamp, file_name, line, message),
    }
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::logger::log(file!(), line!(), &format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_strips_directories() {
        let entry = format_entry("2024-01-01 10:00:00.000", None, "src/game.rs", 12, "ate");
        assert_eq!(entry, "[2024-01-01 10:00:00.000][game.rs:12] ate");

        let entry = format_entry("t", None, "C:\\worm\\src\\app.rs", 3, "x");
        assert_eq!(entry, "[t][app.rs:3] x");
    }

    #[test]
    fn test_entry_with_prefix() {
        let entry = format_entry("t", Some("worm"), "main.rs", 1, "hello");
        assert_eq!(entry, "[t][worm][main.rs:1] hello");
    }

    #[test]
    fn test_log_without_sink_is_silent() {
        log("app.rs", 1, "nobody listens");
    }
}
