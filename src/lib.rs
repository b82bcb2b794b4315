//! # key2pane
//!
//! Send keys to a tmux pane, choosing them by the command running in it.
//!
//! key2pane looks at the foreground command of a tmux pane (`bash`, `nvim`,
//! `python3`, ...), finds the one configured action whose regex matches it,
//! fills positional arguments into the action's keys and hands them to
//! `tmux send-keys`. Bind it to a key in your editor to, say, re-run the
//! current test in a neighbouring pane whether that pane shows a shell or a
//! REPL.
//!
//! ## Quick Example
//!
//! ```json
//! // ~/.config/key2pane/config.json
//! {
//!   "reset": true,
//!   "actions": [
//!     { "regex": "bash|zsh|fish", "keys": ["pytest {1}", "Enter"] },
//!     { "regex": "python", "keys": ["run_tests('{1}')", "Enter"] }
//!   ]
//! }
//! ```
//!
//! ```bash
//! key2pane -i 1 tests/test_cli.py
//! ```
//!
//! ## Architecture
//!
//! The crate is organized into these modules:
//!
//! - [`config`]: Config document and rule types
//! - [`cli`]: Command-line argument parsing with clap
//! - [`loader`]: Config file discovery and loading
//! - [`settings`]: Layered settings resolution
//! - [`matcher`]: Action selection
//! - [`interpolate`]: Positional placeholder substitution (`{1}`, `{}`)
//! - [`tmux`]: Tmux pane queries and `send-keys`
//! - [`dispatch`]: One invocation, end to end
//! - [`logging`]: Log file and stderr setup
//! - [`error`]: Error types

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod interpolate;
pub mod loader;
pub mod logging;
pub mod matcher;
pub mod settings;
pub mod tmux;

pub use config::{RawConfig, Rule};
pub use error::{Key2PaneError, Result};
pub use settings::{Settings, SettingsLayer};
pub use tmux::{PaneAccessor, PaneIdentity, PaneTarget, Tmux};
