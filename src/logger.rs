//! Session logger: backs the `log` facade with a single file in the OS data
//! directory.
//!
//! The file is **truncated (overwritten) at each launch**, so it only ever
//! contains output from the most-recent session.
//!
//! Log location:
//!   Windows:  `%APPDATA%\ZoomFE\zoomfe.log`
//!   Linux:    `~/.local/share/ZoomFE/zoomfe.log`
//!   macOS:    `~/Library/Application Support/ZoomFE/zoomfe.log`
//!
//! Use the usual `log::info!` / `log::warn!` / `log::error!` macros anywhere
//! in the crate once [`init`] has run.

use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

static LOGGER: OnceLock<SessionLogger> = OnceLock::new();

struct SessionLogger {
    file: Mutex<File>,
    path: PathBuf,
}

impl Log for SessionLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            write_line(&format_line(&timestamp(), record));
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Returns the path to the current session log file.
pub fn log_path() -> Option<&'static PathBuf> {
    LOGGER.get().map(|l| &l.path)
}

/// `[HH:MM:SS] [LEVEL] [target] message`
fn format_line(time: &str, record: &Record) -> String {
    format!("[{}] [{:<5}] [{}] {}", time, record.level(), record.target(), record.args())
}

/// Write a raw line to the session log. I/O errors are dropped so that
/// logging never crashes the application.
fn write_line(line: &str) {
    if let Some(logger) = LOGGER.get()
        && let Ok(mut file) = logger.file.lock()
    {
        let _ = writeln!(file, "{}", line);
    }
}

/// Initialise the session logger. Must be called once before any logging.
///
/// * Creates (or truncates) the log file.
/// * Registers it with the `log` facade at `level`.
/// * Installs a panic hook that writes the panic message to the log before
///   propagating to the default handler.
pub fn init(level: LevelFilter) {
    let path = log_file_path();

    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path);

    let file = match file {
        Ok(f) => f,
        Err(e) => {
            eprintln!("ZoomFE: session log disabled, cannot open {}: {}", path.display(), e);
            return;
        }
    };

    let logger = LOGGER.get_or_init(|| SessionLogger {
        file: Mutex::new(file),
        path: path.clone(),
    });
    if log::set_logger(logger).is_err() {
        return;
    }
    log::set_max_level(level);

    write_line(&format!("=== ZoomFE session started (unix {}) ===", unix_secs()));

    let prev = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        write_line(&format!("[{}] [PANIC] {}", timestamp(), info));
        prev(info);
    }));
}

fn log_file_path() -> PathBuf {
    data_dir().join("ZoomFE").join("zoomfe.log")
}

/// Platform data directory (without the app sub-folder). Falls back to the
/// working directory when no environment variable applies.
fn data_dir() -> PathBuf {
    let var = |name: &str| std::env::var_os(name).map(PathBuf::from);
    let platform = if cfg!(target_os = "windows") {
        var("APPDATA")
    } else if cfg!(target_os = "macos") {
        var("HOME").map(|home| home.join("Library").join("Application Support"))
    } else {
        None
    };
    platform
        .or_else(|| var("XDG_DATA_HOME"))
        .or_else(|| var("HOME").map(|home| home.join(".local").join("share")))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// HH:MM:SS (UTC) within the current day.
fn timestamp() -> String {
    clock_time(unix_secs())
}

fn clock_time(secs: u64) -> String {
    let of_day = secs % 86_400;
    format!("{:02}:{:02}:{:02}", of_day / 3600, of_day % 3600 / 60, of_day % 60)
}
