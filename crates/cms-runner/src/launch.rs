//! Launches the external server process and drains its output.

use crate::error::{Result, RunnerError};

use std::panic::Location;
use std::process::{ExitStatus, Stdio};

use cms_config::ServerLayout;
use error_location::ErrorLocation;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

const ENV_JAVA_HOME: &str = "JAVA_HOME";
const ENV_CMS_JAVA_HOME: &str = "CMS_JAVA_HOME";
const ENV_CMS_MODE: &str = "CMS_MODE";
const LEGACY_MODE: &str = "legacy";

/// Build the launch command line for an installation.
///
/// Prefers the wrapper script and falls back to the plain server executable,
/// then wraps the command for the current OS shell and appends the run mode
/// argument.
pub(crate) fn build_commands(layout: &ServerLayout) -> Result<Vec<String>> {
    let mut executable = layout.wrapper_executable();
    if !executable.exists() {
        executable = layout.server_executable();
    }

    if !executable.exists() {
        return Err(RunnerError::LauncherMissing {
            bin_dir: layout.bin_dir(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let mut commands = convert_for_current_os(vec![executable.to_string_lossy().into_owned()]);
    commands.push(String::from(run_mode_argument()));

    Ok(commands)
}

fn run_mode_argument() -> &'static str {
    if cfg!(windows) { "console" } else { "start" }
}

pub(crate) fn convert_for_current_os(commands: Vec<String>) -> Vec<String> {
    if cfg!(windows) {
        as_windows_commands(commands)
    } else {
        as_unix_commands(commands)
    }
}

/// `cmd /c` invocation; the shell does not understand the `\./` prefix some
/// callers carry on the executable path.
pub(crate) fn as_windows_commands(mut commands: Vec<String>) -> Vec<String> {
    if let Some(first) = commands.first_mut() {
        *first = first.replace("\\./", "");
    }

    let mut converted = vec![String::from("cmd"), String::from("/c")];
    converted.append(&mut commands);
    converted
}

/// `sh` invocation, with the same path cleanup as the Windows variant.
pub(crate) fn as_unix_commands(mut commands: Vec<String>) -> Vec<String> {
    if let Some(first) = commands.first_mut() {
        *first = first.replace("\\./", "");
    }

    let mut converted = vec![String::from("sh")];
    converted.append(&mut commands);
    converted
}

/// Handle to the supervising task that owns the launched OS process.
///
/// Dropping the handle leaves the process running; a started server must
/// outlive the tool that launched it. Teardown only ever happens through
/// [`ServerTask::destroy`].
pub(crate) struct ServerTask {
    supervisor: JoinHandle<Option<ExitStatus>>,
    cancel: watch::Sender<bool>,
}

impl ServerTask {
    /// Spawn the server process under a supervising task.
    ///
    /// Spawn failures are not raised here: the supervisor logs them and
    /// resolves, and startup then fails through the regular readiness
    /// timeout.
    pub(crate) fn spawn(commands: Vec<String>, layout: &ServerLayout) -> ServerTask {
        let (cancel, cancel_rx) = watch::channel(false);
        let legacy = layout.runs_legacy_server();

        info!("Starting server: {}", commands.join(" "));

        let supervisor = tokio::spawn(supervise(commands, legacy, cancel_rx));

        ServerTask { supervisor, cancel }
    }

    /// Forcibly destroy the process.
    pub(crate) fn destroy(&self) {
        let _ = self.cancel.send(true);
    }

    /// Whether the process has exited and its output is fully drained.
    pub(crate) fn is_finished(&self) -> bool {
        self.supervisor.is_finished()
    }
}

async fn supervise(
    commands: Vec<String>,
    legacy: bool,
    mut cancel_rx: watch::Receiver<bool>,
) -> Option<ExitStatus> {
    let Some((program, args)) = commands.split_first() else {
        return None;
    };

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    if legacy {
        command.env(ENV_CMS_MODE, LEGACY_MODE);
    }

    if let Ok(java_home) = std::env::var(ENV_JAVA_HOME) {
        command.env(ENV_JAVA_HOME, &java_home);
        command.env(ENV_CMS_JAVA_HOME, &java_home);
    }

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            error!("Problem gathering data from CMS server process! {e}");
            return None;
        }
    };

    let stdout = child
        .stdout
        .take()
        .map(|stream| tokio::spawn(drain_lines(stream)));
    let stderr = child
        .stderr
        .take()
        .map(|stream| tokio::spawn(drain_lines(stream)));

    let drained = async {
        if let Some(handle) = stdout {
            let _ = handle.await;
        }
        if let Some(handle) = stderr {
            let _ = handle.await;
        }
    };

    let cancelled = async {
        if cancel_rx.wait_for(|cancel| *cancel).await.is_err() {
            // Sender dropped without a destroy call; teardown must never
            // trigger on its own.
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = drained => {}
        _ = cancelled => {
            debug!("Destroying CMS server process");
            let _ = child.start_kill();
        }
    }

    match child.wait().await {
        Ok(status) => Some(status),
        Err(e) => {
            debug!("Problem gathering data from CMS server process! {e}");
            None
        }
    }
}

/// Forward one output stream of the server process into the log.
async fn drain_lines<R>(stream: R)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(stream).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        info!("{line}");
    }
}
