//! Command-line interface for key2pane.
//!
//! Parses arguments using clap and provides the [`Cli`] struct containing
//! all user-specified options.

use crate::settings::SettingsLayer;
use crate::tmux::Socket;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

const LONG_ABOUT: &str = "\
Sends a sequence of keys to a tmux pane, based on the pane's current command.

Which keys to send is configured in a JSON file:

{
  \"actions\": [
    { \"regex\": \"bash|zsh|fish\", \"keys\": [\"echo 'Hello, World!'\", \"Enter\"] }
  ]
}

The regex is matched against the start of the pane's current command. The
keys are passed to `tmux send-keys`, so `Enter` presses Enter instead of
typing the word. Exactly one action must match.

Positional arguments fill placeholders in the keys: {1} is the first
argument, {2} the second, and {} all of them joined by spaces. Escape a
brace with a backslash to keep it literally: \\{1\\} stays {1}.";

/// Log levels accepted by `--loglevel`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[value(rename_all = "UPPER")]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warning,
    Error,
    Critical,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warning => LevelFilter::WARN,
            LogLevel::Error | LogLevel::Critical => LevelFilter::ERROR,
        }
    }
}

/// Command-line arguments for key2pane.
///
/// # Examples
///
/// ```bash
/// # Send the configured keys for the active pane, filling {1} with "make"
/// key2pane make
///
/// # Target pane 1 of window 2, interrupting whatever runs there first
/// key2pane -w 2 -i 1 --reset test
///
/// # Show what would be sent
/// key2pane --dry-run foo bar
/// ```
#[derive(Parser, Debug)]
#[command(name = "key2pane")]
#[command(version)]
#[command(about = "Send keys to a tmux pane based on the command running in it")]
#[command(long_about = LONG_ABOUT)]
pub struct Cli {
    /// Path to the config file.
    ///
    /// Defaults to `~/.config/key2pane/config.json`.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Target tmux session, defaults to the current session.
    #[arg(short, long, value_name = "NAME")]
    pub session: Option<String>,

    /// Target tmux window, defaults to the current window.
    #[arg(short, long, value_name = "N", env = "KEY2PANE_WINDOW")]
    pub window: Option<u32>,

    /// Target pane index, defaults to the current pane.
    #[arg(short, long, value_name = "N", env = "KEY2PANE_PANE")]
    pub index: Option<u32>,

    /// Send C-c to the pane before the keys.
    #[arg(short, long, conflicts_with = "no_reset")]
    pub reset: bool,

    /// Do not send C-c first, even if the config asks for it.
    #[arg(long)]
    pub no_reset: bool,

    /// Print the keys instead of sending them.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Name of the tmux server to use (`tmux -L`).
    #[arg(short = 'L', long, value_name = "NAME", conflicts_with = "socket_path")]
    pub socket_name: Option<String>,

    /// Path of the tmux server socket to use (`tmux -S`).
    #[arg(short = 'S', long, value_name = "PATH")]
    pub socket_path: Option<PathBuf>,

    /// Log file path.
    ///
    /// Defaults to `~/.local/state/key2pane.log`.
    #[arg(long, value_name = "PATH")]
    pub logfile: Option<PathBuf>,

    /// Log level for the log file.
    #[arg(long, value_enum, default_value_t = LogLevel::Warning)]
    pub loglevel: LogLevel,

    /// Values for the {n} placeholders in the keys.
    #[arg(value_name = "POSITIONAL")]
    pub positional: Vec<String>,
}

impl Cli {
    /// The reset choice, if one was made on the command line.
    ///
    /// Returns `None` when neither `--reset` nor `--no-reset` was given, so
    /// the config value is kept.
    pub fn reset(&self) -> Option<bool> {
        if self.reset {
            Some(true)
        } else if self.no_reset {
            Some(false)
        } else {
            None
        }
    }

    /// The tmux server selected on the command line.
    pub fn socket(&self) -> Socket {
        match (&self.socket_name, &self.socket_path) {
            (Some(name), _) => Socket::Name(name.clone()),
            (None, Some(path)) => Socket::Path(path.clone()),
            (None, None) => Socket::Default,
        }
    }

    /// The strongest settings layer: everything given explicitly.
    pub fn overrides(&self) -> SettingsLayer {
        SettingsLayer {
            session: self.session.clone(),
            window: self.window,
            index: self.index,
            reset: self.reset(),
            rules: None,
            positional: Some(self.positional.clone()),
        }
    }
}

/// Process exit code for a failed parse.
///
/// Help and version output exit with 0, every real argument error with 1.
pub fn parse_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() { 1 } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["key2pane", "Hello", "Enter"]).unwrap();
        assert_eq!(cli.config, None);
        assert_eq!(cli.loglevel, LogLevel::Warning);
        assert!(!cli.dry_run);
        assert_eq!(cli.reset(), None);
        assert_eq!(cli.positional, ["Hello", "Enter"]);
    }

    #[test]
    fn test_options() {
        let cli = Cli::try_parse_from([
            "key2pane",
            "-c",
            "config.json",
            "-s",
            "foo",
            "-w",
            "0",
            "-i",
            "1",
            "--logfile",
            "log.log",
            "--loglevel",
            "DEBUG",
            "--reset",
            "Hello",
            "Enter",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("config.json")));
        assert_eq!(cli.session.as_deref(), Some("foo"));
        assert_eq!(cli.window, Some(0));
        assert_eq!(cli.index, Some(1));
        assert_eq!(cli.reset(), Some(true));
        assert_eq!(cli.logfile, Some(PathBuf::from("log.log")));
        assert_eq!(cli.loglevel, LogLevel::Debug);
        assert_eq!(cli.positional, ["Hello", "Enter"]);
    }

    #[test]
    fn test_reset_flags_conflict() {
        assert!(Cli::try_parse_from(["key2pane", "--reset", "--no-reset"]).is_err());
        let cli = Cli::try_parse_from(["key2pane", "--no-reset"]).unwrap();
        assert_eq!(cli.reset(), Some(false));
    }

    #[test]
    fn test_overrides_leave_unset_fields_empty() {
        let cli = Cli::try_parse_from(["key2pane", "-s", "foo", "x"]).unwrap();
        let layer = cli.overrides();
        assert_eq!(layer.session.as_deref(), Some("foo"));
        assert_eq!(layer.reset, None);
        assert_eq!(layer.rules, None);
        assert_eq!(layer.positional, Some(vec!["x".to_string()]));
    }

    #[test]
    fn test_loglevel_filter() {
        assert_eq!(LevelFilter::from(LogLevel::Critical), LevelFilter::ERROR);
        assert_eq!(LevelFilter::from(LogLevel::Info), LevelFilter::INFO);
    }

    #[test]
    fn test_socket_selection() {
        let cli = Cli::try_parse_from(["key2pane"]).unwrap();
        assert_eq!(cli.socket(), Socket::Default);

        let cli = Cli::try_parse_from(["key2pane", "-L", "k2p"]).unwrap();
        assert_eq!(cli.socket(), Socket::Name("k2p".into()));

        let cli = Cli::try_parse_from(["key2pane", "--socket-path", "/tmp/k2p.sock"]).unwrap();
        assert_eq!(cli.socket(), Socket::Path("/tmp/k2p.sock".into()));

        assert!(Cli::try_parse_from(["key2pane", "-L", "a", "-S", "/tmp/b"]).is_err());
    }

    #[test]
    fn test_parse_exit_code() {
        let err = Cli::try_parse_from(["key2pane", "--window", "two"]).unwrap_err();
        assert_eq!(parse_exit_code(&err), 1);

        let err = Cli::try_parse_from(["key2pane", "--bogus"]).unwrap_err();
        assert_eq!(parse_exit_code(&err), 1);

        let err = Cli::try_parse_from(["key2pane", "--help"]).unwrap_err();
        assert_eq!(parse_exit_code(&err), 0);
    }
}
