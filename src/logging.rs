//! Logging setup.
//!
//! Two outputs are installed:
//!
//! - stderr, filtered by `RUST_LOG` (defaults to `warn`)
//! - the log file, at the level given by `--loglevel`
//!
//! The log file is appended to and never rotated. Events with the
//! [`REPORT_TARGET`] target only go to the log file: they repeat a message
//! the user already gets on stderr.

use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE: &str = "key2pane.log";

/// Target of the final error events, kept out of the stderr layer.
pub const REPORT_TARGET: &str = "key2pane::report";

/// Default log file location, `~/.local/state/key2pane.log`.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".local").join("state").join(LOG_FILE))
}

/// Open `path` for appending log lines, creating parent directories.
fn file_appender(path: &Path) -> Result<RollingFileAppender, InitError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(LOG_FILE);

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .build(dir)
}

/// Filter for the stderr layer: `base` with [`REPORT_TARGET`] silenced.
pub fn console_filter(base: EnvFilter) -> EnvFilter {
    match format!("{REPORT_TARGET}=off").parse() {
        Ok(directive) => base.add_directive(directive),
        Err(_) => base,
    }
}

/// Initialize the global subscriber.
///
/// When `logfile` is `None` or cannot be opened, only stderr logging is
/// installed and a warning is printed.
pub fn init(logfile: Option<&Path>, level: LevelFilter) {
    let console_filter = console_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    );

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_filter);

    let file_layer = match logfile.map(file_appender) {
        Some(Ok(appender)) => Some(
            fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(true)
                .with_filter(level),
        ),
        Some(Err(e)) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
        None => {
            eprintln!("Warning: Could not determine log file location");
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch;
    use crate::error::Key2PaneError;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    /// In-memory writer shared between the subscriber and the test.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_reported_error_reaches_stderr_once() {
        let console = Captured::default();
        let writer = console.clone();
        let subscriber = fmt()
            .with_writer(move || writer.clone())
            .with_env_filter(console_filter(EnvFilter::new("warn")))
            .finish();

        let mut stderr = Vec::new();
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("skipping malformed action");
            tracing::info!("dry run, not sending keys");
            let err = Key2PaneError::NoActionMatched("fish".into());
            dispatch::report(&err, &mut stderr).unwrap();
        });

        let logged = console.text();
        assert!(logged.contains("skipping malformed action"));
        assert!(!logged.contains("dry run"));
        assert!(!logged.contains("No action matched"));
        assert_eq!(
            String::from_utf8(stderr).unwrap().matches("No action matched").count(),
            1
        );
    }

    #[test]
    fn test_default_log_path() {
        if let Some(path) = default_log_path() {
            assert!(path.ends_with(".local/state/key2pane.log"));
        }
    }

    #[test]
    fn test_file_appender_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("custom.log");
        file_appender(&path).unwrap();
        assert!(path.exists());
    }
}
