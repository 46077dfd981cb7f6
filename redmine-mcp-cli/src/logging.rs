//! Logging setup
//!
//! While serving over stdio, stdout carries the protocol, so logs go to a
//! file under `~/.redmine-mcp/`. Every other command logs to stderr.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::Level;

/// Directory holding the server log, relative to the home directory
pub const LOG_DIR: &str = ".redmine-mcp";

/// Environment variable overriding the log file name
pub const LOG_FILE_ENV: &str = "REDMINE_MCP_LOG_FILE";

const DEFAULT_LOG_FILE: &str = "mcp.log";

/// A thread-safe writer that flushes and syncs the log file after every write.
///
/// # Example
///
/// ```no_run
/// use std::io::Write;
/// use std::sync::{Arc, Mutex};
/// use std::fs::File;
/// use redmine_mcp_cli::logging::FileWriterGuard;
///
/// let file = File::create("log.txt").unwrap();
/// let mut guard = FileWriterGuard::new(Arc::new(Mutex::new(file)));
/// guard.write_all(b"Log message\n").unwrap();
/// ```
#[derive(Clone)]
pub struct FileWriterGuard {
    file: Arc<Mutex<File>>,
}

impl FileWriterGuard {
    /// Creates a new `FileWriterGuard` wrapping the given file
    pub fn new(file: Arc<Mutex<File>>) -> Self {
        Self { file }
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, File>> {
        self.file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))
    }
}

impl Write for FileWriterGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file = self.lock()?;
        let written = file.write(buf)?;
        file.flush()?;
        file.sync_all()?;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut file = self.lock()?;
        file.flush()?;
        file.sync_all()
    }
}

/// Pick the log level from the global flags
pub fn log_level(quiet: bool, debug: bool, verbose: bool) -> Level {
    if quiet {
        Level::ERROR
    } else if debug {
        Level::DEBUG
    } else if verbose {
        Level::TRACE
    } else {
        Level::INFO
    }
}

/// Location of the server log file
pub fn log_file_path() -> PathBuf {
    let dir = dirs::home_dir()
        .map(|home| home.join(LOG_DIR))
        .unwrap_or_else(|| PathBuf::from(LOG_DIR));
    let name = std::env::var(LOG_FILE_ENV)
        .ok()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());
    dir.join(name)
}

fn open_log_file(path: &PathBuf) -> io::Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber
pub fn init(level: Level, serving: bool) {
    if serving {
        let path = log_file_path();
        match open_log_file(&path) {
            Ok(file) => {
                let guard = FileWriterGuard::new(Arc::new(Mutex::new(file)));
                tracing_subscriber::fmt()
                    .with_writer(move || guard.clone())
                    .with_max_level(level)
                    .with_ansi(false)
                    .init();
                return;
            }
            Err(e) => {
                eprintln!("Failed to open log file {}, using stderr: {e}", path.display());
            }
        }
    }

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_log_level_precedence() {
        assert_eq!(log_level(true, true, true), Level::ERROR);
        assert_eq!(log_level(false, true, true), Level::DEBUG);
        assert_eq!(log_level(false, false, true), Level::TRACE);
        assert_eq!(log_level(false, false, false), Level::INFO);
    }

    #[test]
    #[serial]
    fn test_log_file_name_override() {
        std::env::set_var(LOG_FILE_ENV, "custom.log");
        let path = log_file_path();
        std::env::remove_var(LOG_FILE_ENV);

        assert!(path.ends_with(PathBuf::from(LOG_DIR).join("custom.log")));
    }

    #[test]
    #[serial]
    fn test_default_log_file() {
        std::env::remove_var(LOG_FILE_ENV);
        assert!(log_file_path().ends_with(PathBuf::from(LOG_DIR).join("mcp.log")));
    }

    #[test]
    fn test_guard_writes_through() {
        let path = std::env::temp_dir().join(format!("redmine-mcp-log-{}.log", std::process::id()));
        let file = File::create(&path).unwrap();
        let mut guard = FileWriterGuard::new(Arc::new(Mutex::new(file)));

        guard.write_all(b"hello\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
        fs::remove_file(&path).unwrap();
    }
}
