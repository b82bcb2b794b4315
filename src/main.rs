//! key2pane CLI entry point.
//!
//! This binary provides the `key2pane` command for sending keys to a tmux
//! pane based on the command running in it.

use clap::Parser;
use key2pane::cli::{self, Cli};
use key2pane::dispatch::{self, Request};
use key2pane::error::Result;
use key2pane::tmux::{Tmux, TmuxExecutor};
use key2pane::{loader, logging};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(cli::parse_exit_code(&e));
        }
    };
    let logfile = cli.logfile.clone().or_else(logging::default_log_path);
    logging::init(logfile.as_deref(), cli.loglevel.into());
    tracing::debug!(?cli, "arguments");

    if let Err(e) = run(cli) {
        let _ = dispatch::report(&e, &mut std::io::stderr());
        std::process::exit(1);
    }
}

/// Main application logic.
fn run(cli: Cli) -> Result<()> {
    let config = match cli.config.clone() {
        Some(path) => path,
        None => loader::default_config_path()?,
    };
    let request = Request {
        config,
        overrides: cli.overrides(),
        dry_run: cli.dry_run,
    };

    let mut stdout = std::io::stdout().lock();
    let tmux = Tmux::new(TmuxExecutor::new(cli.socket()));
    dispatch::run(request, &tmux, &mut stdout)?;
    Ok(())
}
