// Logging for swap-manager
// SPDX-License-Identifier: GPL-3.0-or-later
//
// Every message goes to the terminal and, once init() has run, is appended
// to the log file with a timestamp and severity. The file is never rotated
// or truncated here.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

static LOG_SINK: OnceLock<Mutex<File>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Info => write!(f, "INFO"),
            Level::Warn => write!(f, "WARN"),
            Level::Error => write!(f, "ERROR"),
        }
    }
}

/// Open the log file for appending, owner/group readable only.
/// Logging before init (or after a failed init) still reaches the terminal.
pub fn init<P: AsRef<Path>>(path: P) -> std::io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o640)
        .open(path)?;
    let _ = LOG_SINK.set(Mutex::new(file));
    Ok(())
}

pub fn log(level: Level, message: &str) {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    match level {
        Level::Info => println!("{}: {}", level, message),
        _ => eprintln!("{}: {}", level, message),
    }
    if let Some(sink) = LOG_SINK.get() {
        if let Ok(mut file) = sink.lock() {
            let _ = writeln!(file, "{} [{}] {}", timestamp, level, message);
        }
    }
}

// Logging macros
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::Level::Info, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::Level::Warn, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::Level::Error, &format!($($arg)*))
    };
}
