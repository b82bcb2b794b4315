//! One key2pane invocation, end to end.
//!
//! Settings and keys are fully resolved before anything is sent, so every
//! configuration or matching error leaves the pane untouched.

use crate::config::RawConfig;
use crate::error::{Key2PaneError, Result};
use crate::loader;
use crate::logging::REPORT_TARGET;
use crate::matcher;
use crate::settings::{self, Settings, SettingsLayer};
use crate::tmux::{PaneAccessor, PaneIdentity};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, error, info};

/// Key sent to interrupt the pane when `reset` is on.
pub const INTERRUPT_KEY: &str = "C-c";

/// Everything one invocation was asked to do.
#[derive(Debug, Clone)]
pub struct Request {
    /// Config file to load.
    pub config: PathBuf,
    /// Settings given explicitly for this invocation.
    pub overrides: SettingsLayer,
    /// Print the keys instead of sending them.
    pub dry_run: bool,
}

/// Merge the built-in defaults, the active pane, `config` and `overrides`.
pub fn resolve_settings(
    active: &PaneIdentity,
    config: &RawConfig,
    overrides: SettingsLayer,
) -> Result<Settings> {
    settings::resolve([
        SettingsLayer::defaults(),
        SettingsLayer::from_pane(active),
        SettingsLayer::from_config(config)?,
        overrides,
    ])
}

/// Run one invocation: resolve, match, then print or send.
///
/// Returns the keys that were resolved.
pub fn run(
    request: Request,
    pane: &impl PaneAccessor,
    out: &mut impl Write,
) -> Result<Vec<String>> {
    let active = pane.query_active()?;
    debug!(?active, "active pane");

    let config = loader::load_config(&request.config)?;
    let settings = resolve_settings(&active, &config, request.overrides)?;
    let target = settings.target();
    info!(%target, "target pane");

    let command = if target == active.target {
        active.command
    } else {
        pane.query_command(&target)?
    };
    let keys = matcher::select_keys(&settings.rules, &command, &settings.positional)?;
    debug!(%command, ?keys, "resolved keys");

    if request.dry_run {
        info!("dry run, not sending keys");
        writeln!(out, "{}", keys.join(" "))?;
        return Ok(keys);
    }

    // Shells in vi line-editing mode drop input batched after C-c, so the
    // interrupt goes out on its own.
    if settings.reset {
        debug!(%target, "resetting pane");
        pane.send(&target, &[INTERRUPT_KEY.to_string()])?;
    }
    pane.send(&target, &keys)?;
    info!(%target, ?keys, "sent keys");

    Ok(keys)
}

/// Write the single user-facing message for `err` to `out` and log it.
///
/// Expected errors get a one-line `Error:` message; anything else is a
/// defect and is reported with its full debug detail.
pub fn report(err: &Key2PaneError, out: &mut impl Write) -> std::io::Result<()> {
    if err.is_expected() {
        error!(target: REPORT_TARGET, "{}", err);
        writeln!(out, "Error: {}", err)
    } else {
        error!(target: REPORT_TARGET, error = ?err, "unexpected failure");
        writeln!(out, "Internal error: {:?}", err)
    }
}
