//! Tmux pane access.
//!
//! Provides the [`PaneAccessor`] boundary the rest of key2pane depends on,
//! plus its tmux-backed implementation [`Tmux`]. Every tmux invocation goes
//! through a [`TmuxRunner`], so tests can swap in a fake runner.
//!
//! # Pane Addressing
//!
//! Panes are addressed with tmux's `session:window.index` notation. The
//! index is the value tmux reports as `#{pane_index}`, which already
//! accounts for `pane-base-index`.

use crate::error::{Key2PaneError, Result, TmuxError};
use std::fmt;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Address of a single pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneTarget {
    pub session: String,
    pub window: u32,
    pub index: u32,
}

impl PaneTarget {
    pub fn new(session: impl Into<String>, window: u32, index: u32) -> Self {
        Self {
            session: session.into(),
            window,
            index,
        }
    }

    /// The `session:window` part, as accepted by `list-panes -t`.
    pub fn window_target(&self) -> String {
        format!("{}:{}", self.session, self.window)
    }
}

impl fmt::Display for PaneTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}.{}", self.session, self.window, self.index)
    }
}

/// A pane together with the command currently running in its foreground.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneIdentity {
    pub target: PaneTarget,
    pub command: String,
}

/// Query and control tmux panes.
pub trait PaneAccessor {
    /// Identity of the currently active pane.
    fn query_active(&self) -> Result<PaneIdentity>;

    /// Foreground command of a specific pane.
    fn query_command(&self, target: &PaneTarget) -> Result<String>;

    /// Deliver `keys` to the pane as a single `send-keys` call.
    fn send(&self, target: &PaneTarget, keys: &[String]) -> Result<()>;
}

/// Runs a tmux command and returns its stdout.
pub trait TmuxRunner {
    fn run(&self, args: &[&str]) -> std::result::Result<String, TmuxError>;
}

impl<T: TmuxRunner + ?Sized> TmuxRunner for &T {
    fn run(&self, args: &[&str]) -> std::result::Result<String, TmuxError> {
        (**self).run(args)
    }
}

/// Which tmux server to talk to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Socket {
    /// Whatever tmux picks: `$TMUX`, or the default server.
    #[default]
    Default,
    /// A named server (`tmux -L name`).
    Name(String),
    /// A server on an explicit socket file (`tmux -S path`).
    Path(PathBuf),
}

/// Runs the `tmux` binary as a child process.
#[derive(Debug, Default)]
pub struct TmuxExecutor {
    socket: Socket,
}

impl TmuxExecutor {
    pub fn new(socket: Socket) -> Self {
        Self { socket }
    }

    /// Build the full `tmux` command line for `args`.
    pub(crate) fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("tmux");
        match &self.socket {
            Socket::Default => {}
            Socket::Name(name) => {
                cmd.arg("-L").arg(name);
            }
            Socket::Path(path) => {
                cmd.arg("-S").arg(path);
            }
        }
        cmd.args(args);
        cmd
    }
}

impl TmuxRunner for TmuxExecutor {
    fn run(&self, args: &[&str]) -> std::result::Result<String, TmuxError> {
        debug!(?args, socket = ?self.socket, "running tmux");
        let output = self.command(args).output()?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).trim().to_string());
        }
        Err(TmuxError::CommandFailed(format!(
            "tmux {} exited with code {}: {}",
            args.join(" "),
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stderr).trim()
        )))
    }
}

/// [`PaneAccessor`] backed by tmux.
#[derive(Debug)]
pub struct Tmux<R = TmuxExecutor> {
    runner: R,
}

impl<R: TmuxRunner> Tmux<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: TmuxRunner> PaneAccessor for Tmux<R> {
    fn query_active(&self) -> Result<PaneIdentity> {
        let stdout = self
            .runner
            .run(&["display-message", "-p", "#S:#I:#P"])
            .map_err(|e| Key2PaneError::PaneQueryFailed(e.to_string()))?;
        let target = parse_active(&stdout)?;
        let command = self.query_command(&target)?;
        Ok(PaneIdentity { target, command })
    }

    fn query_command(&self, target: &PaneTarget) -> Result<String> {
        let window = target.window_target();
        let stdout = self
            .runner
            .run(&[
                "list-panes",
                "-t",
                window.as_str(),
                "-F",
                "#{pane_index}:#{pane_current_command}",
            ])
            .map_err(|e| Key2PaneError::PaneQueryFailed(e.to_string()))?;

        find_command(&stdout, target.index)
            .ok_or_else(|| Key2PaneError::PaneNotFound(target.clone()))
    }

    fn send(&self, target: &PaneTarget, keys: &[String]) -> Result<()> {
        let pane = target.to_string();
        let mut args = vec!["send-keys", "-t", pane.as_str()];
        args.extend(keys.iter().map(String::as_str));

        self.runner
            .run(&args)
            .map_err(|e| Key2PaneError::PaneSendFailed {
                target: target.clone(),
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

/// Parse `display-message -p '#S:#I:#P'` output.
fn parse_active(stdout: &str) -> Result<PaneTarget> {
    let invalid = || Key2PaneError::PaneQueryFailed(format!("unexpected pane identity {stdout:?}"));

    // Window and pane are always the last two fields.
    let mut parts = stdout.trim().rsplitn(3, ':');
    let index = parts.next().and_then(|s| s.parse().ok()).ok_or_else(invalid)?;
    let window = parts.next().and_then(|s| s.parse().ok()).ok_or_else(invalid)?;
    let session = parts.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;

    Ok(PaneTarget::new(session, window, index))
}

/// Find the command of pane `index` in `#{pane_index}:#{pane_current_command}` lines.
fn find_command(stdout: &str, index: u32) -> Option<String> {
    stdout
        .lines()
        .filter_map(|line| line.trim().split_once(':'))
        .find(|(i, _)| i.parse::<u32>().ok() == Some(index))
        .map(|(_, command)| command.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Replays canned tmux output and records every call.
    struct FakeRunner {
        calls: RefCell<Vec<Vec<String>>>,
        fail: bool,
    }

    impl FakeRunner {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }
    }

    impl TmuxRunner for FakeRunner {
        fn run(&self, args: &[&str]) -> std::result::Result<String, TmuxError> {
            self.calls
                .borrow_mut()
                .push(args.iter().map(|s| s.to_string()).collect());
            if self.fail {
                return Err(TmuxError::CommandFailed("no server running".into()));
            }
            match args.first() {
                Some(&"display-message") => Ok("foo:0:0".into()),
                Some(&"list-panes") => Ok("0:bash\n1:nvim".into()),
                Some(&"send-keys") => Ok(String::new()),
                _ => Err(TmuxError::CommandFailed(format!("unknown command {args:?}"))),
            }
        }
    }

    #[test]
    fn test_pane_target_display() {
        let target = PaneTarget::new("work", 2, 1);
        assert_eq!(target.to_string(), "work:2.1");
        assert_eq!(target.window_target(), "work:2");
    }

    #[test]
    fn test_query_active() {
        let tmux = Tmux::new(FakeRunner::new());
        let pane = tmux.query_active().unwrap();
        assert_eq!(pane.target, PaneTarget::new("foo", 0, 0));
        assert_eq!(pane.command, "bash");
    }

    #[test]
    fn test_query_command_other_pane() {
        let runner = FakeRunner::new();
        let tmux = Tmux::new(&runner);
        let command = tmux.query_command(&PaneTarget::new("foo", 3, 1)).unwrap();
        assert_eq!(command, "nvim");
        assert_eq!(
            runner.calls.borrow()[0],
            ["list-panes", "-t", "foo:3", "-F", "#{pane_index}:#{pane_current_command}"]
        );
    }

    #[test]
    fn test_query_command_missing_pane() {
        let tmux = Tmux::new(FakeRunner::new());
        let err = tmux.query_command(&PaneTarget::new("foo", 0, 7)).unwrap_err();
        assert!(matches!(err, Key2PaneError::PaneNotFound(t) if t.index == 7));
    }

    #[test]
    fn test_query_active_failure() {
        let tmux = Tmux::new(FakeRunner::failing());
        let err = tmux.query_active().unwrap_err();
        assert!(matches!(err, Key2PaneError::PaneQueryFailed(_)));
    }

    #[test]
    fn test_send() {
        let runner = FakeRunner::new();
        let tmux = Tmux::new(&runner);
        let keys = vec!["echo 'Hello'".to_string(), "Enter".to_string()];
        tmux.send(&PaneTarget::new("foo", 0, 0), &keys).unwrap();
        assert_eq!(
            runner.calls.borrow()[0],
            ["send-keys", "-t", "foo:0.0", "echo 'Hello'", "Enter"]
        );
    }

    #[test]
    fn test_send_failure() {
        let tmux = Tmux::new(FakeRunner::failing());
        let err = tmux
            .send(&PaneTarget::new("foo", 0, 0), &["Enter".to_string()])
            .unwrap_err();
        assert!(matches!(err, Key2PaneError::PaneSendFailed { .. }));
        assert!(err.to_string().contains("no server running"));
    }

    #[test]
    fn test_parse_active_rejects_garbage() {
        assert!(parse_active("foo:x:0").is_err());
        assert!(parse_active(":0:0").is_err());
        assert_eq!(parse_active("a:1:2\n").unwrap(), PaneTarget::new("a", 1, 2));
    }

    #[test]
    fn test_executor_socket_args() {
        let args = |exec: TmuxExecutor| -> Vec<String> {
            exec.command(&["list-panes"])
                .get_args()
                .map(|a| a.to_string_lossy().into_owned())
                .collect()
        };

        assert_eq!(args(TmuxExecutor::default()), ["list-panes"]);
        assert_eq!(
            args(TmuxExecutor::new(Socket::Name("k2p".into()))),
            ["-L", "k2p", "list-panes"]
        );
        assert_eq!(
            args(TmuxExecutor::new(Socket::Path("/tmp/k2p.sock".into()))),
            ["-S", "/tmp/k2p.sock", "list-panes"]
        );
    }
}
