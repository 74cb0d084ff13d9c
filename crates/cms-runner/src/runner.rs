//! Startup and shutdown sequencing for a CMS server process.

use crate::admin::{AdminConnection, AdminError};
use crate::error::{Result, RunnerError};
use crate::launch::{self, ServerTask};
use crate::poll::{PollSchedule, wait_for};
use crate::run_level::RunLevel;
use crate::watchdog;

use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use cms_config::ServerLayout;
use error_location::ErrorLocation;
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info};

const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(600);
const POLL_INTERVAL: Duration = Duration::from_secs(1);
const STATUS_LOG_INTERVAL: Duration = Duration::from_secs(5);
const DISCONNECT_WAIT: Duration = Duration::from_secs(120);
const LOCK_RELEASE_WAIT: Duration = Duration::from_secs(180);

/// Supervises one CMS server: launches the OS process, confirms startup
/// through an admin connection, and sequences a graceful shutdown.
///
/// One runner manages at most one process; once a launch has been registered,
/// further start calls reuse it instead of spawning again. The admin
/// connection is passed in per call rather than owned, a runner for a remote
/// server never has a process to manage at all.
pub struct ServerRunner {
    server_dir: Option<PathBuf>,
    timeout: Duration,
    target_level: RunLevel,
    active: OnceCell<ActiveServer>,
    wrapper_failed: Arc<AtomicBool>,
}

struct ActiveServer {
    task: ServerTask,
    watchdog: JoinHandle<()>,
}

impl ServerRunner {
    /// Runner for a server installed locally under `server_dir`.
    pub fn new(server_dir: impl Into<PathBuf>) -> Self {
        let dir = server_dir.into();
        let dir = std::path::absolute(&dir).unwrap_or(dir);

        Self {
            server_dir: Some(dir),
            ..Self::remote()
        }
    }

    /// Runner for a remote server without a local installation.
    pub fn remote() -> Self {
        Self {
            server_dir: None,
            timeout: DEFAULT_STARTUP_TIMEOUT,
            target_level: RunLevel::Started,
            active: OnceCell::new(),
            wrapper_failed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Total time `start` may spend waiting for the target run level.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Run level `start` waits for, [`RunLevel::Started`] unless changed.
    pub fn set_target_level(&mut self, level: RunLevel) {
        self.target_level = level;
    }

    pub fn server_dir(&self) -> Option<&Path> {
        self.server_dir.as_deref()
    }

    /// Whether a process launch has been registered on this runner.
    pub fn launched(&self) -> bool {
        self.active.initialized()
    }

    /// Launch the local server and wait until it reports the target run
    /// level.
    ///
    /// The connection is polled once per second within the configured
    /// timeout; progress is logged at most once per five seconds. A crash
    /// sentinel from the wrapper aborts the wait immediately.
    pub async fn start(&self, connection: &dyn AdminConnection) -> Result<()> {
        self.launch().await?;

        let throttle = LogThrottle::new(STATUS_LOG_INTERVAL);
        let throttle = &throttle;
        let schedule = PollSchedule::within(self.timeout, POLL_INTERVAL);

        let started = wait_for(schedule, || self.startup_step(connection, throttle)).await?;

        if !started {
            return Err(RunnerError::StartupTimeout {
                timeout_secs: self.timeout.as_secs(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        info!("Server successfully started.");

        Ok(())
    }

    /// Gracefully stop the server behind the given connection.
    ///
    /// An unreachable server is not an error. The stop call losing its own
    /// connection is expected and suppressed; the disconnect and lock release
    /// waits have hard deadlines.
    pub async fn stop(&self, connection: &dyn AdminConnection) -> Result<()> {
        if connection.connect().await.is_err() || !connection.is_connected().await {
            error!("Could not connect to CMS server, maybe the server is not started.");
            return Ok(());
        }

        info!("Initiating shutdown...");

        match connection.stop_server().await {
            Ok(()) => {}
            Err(AdminError::ConnectionSevered { .. }) => {
                debug!("Connection severed by the stopping server");
            }
            Err(e) => {
                error!("An unknown error occurred, server may still be running...");
                return Err(RunnerError::from(e));
            }
        }

        connection.disconnect().await;

        let schedule = PollSchedule::within(DISCONNECT_WAIT, POLL_INTERVAL);
        let disconnected = wait_for(schedule, || async move {
            Ok::<bool, RunnerError>(!connection.is_connected().await)
        })
        .await?;

        if !disconnected {
            return Err(RunnerError::DisconnectTimeout {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        info!("Connection disconnected.");

        match self.server_dir.as_deref() {
            Some(server_dir) => {
                info!("Server shutdown initiated. Waiting for server to shutdown...");

                let layout = ServerLayout::new(server_dir);
                let layout = &layout;
                let schedule = PollSchedule::within(LOCK_RELEASE_WAIT, POLL_INTERVAL);
                let released = wait_for(schedule, || async move {
                    Ok::<bool, RunnerError>(!layout.lock_file_exists())
                })
                .await?;

                if !released {
                    return Err(RunnerError::LockReleaseTimeout {
                        location: ErrorLocation::from(Location::caller()),
                    });
                }

                info!("CMS server shutdown completed!");
            }
            None => {
                info!(
                    "Remote server shutdown initiated. Server may take some time to shutdown successfully."
                );
            }
        }

        Ok(())
    }

    /// Forcibly destroy the launched process, if any.
    ///
    /// Only an explicit call tears the process down; dropping the runner
    /// leaves a started server running.
    pub fn destroy(&self) {
        if let Some(active) = self.active.get() {
            active.task.destroy();
        }
    }

    /// Whether the launched process has exited. Always true when nothing was
    /// launched.
    pub fn process_finished(&self) -> bool {
        self.active
            .get()
            .is_none_or(|active| active.task.is_finished())
    }

    /// Check the launch preconditions and register the one-time process
    /// launch.
    async fn launch(&self) -> Result<()> {
        let Some(server_dir) = self.server_dir.as_deref() else {
            return Err(RunnerError::ServerDirMissing {
                location: ErrorLocation::from(Location::caller()),
            });
        };

        let layout = ServerLayout::new(server_dir);

        if layout.lock_file_exists() {
            return Err(RunnerError::LockFilePresent {
                path: layout.lock_file(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if !layout.license_file_exists() {
            return Err(RunnerError::LicenseFileMissing {
                path: layout.license_file(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.active
            .get_or_try_init(|| async {
                let commands = launch::build_commands(&layout)?;
                let watchdog =
                    watchdog::arm(layout.wrapper_error_file(), Arc::clone(&self.wrapper_failed))?;
                let task = ServerTask::spawn(commands, &layout);

                Ok::<ActiveServer, RunnerError>(ActiveServer { task, watchdog })
            })
            .await?;

        Ok(())
    }

    /// One iteration of the startup poll: crash check first, then connection
    /// progress, then run level.
    async fn startup_step(
        &self,
        connection: &dyn AdminConnection,
        throttle: &LogThrottle,
    ) -> Result<bool> {
        if self.wrapper_failed.load(Ordering::SeqCst) {
            return Err(RunnerError::WrapperCrashed {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let announce = throttle.ready();

        if !connection.is_connected().await {
            if announce {
                info!("Waiting for connection to CMS server...");
            }

            // Failed attempts stay silent; the next iteration retries.
            if connection.connect().await.is_ok() && connection.is_connected().await {
                info!("Connection to CMS server established.");
            }

            return Ok(false);
        }

        if announce {
            info!("Waiting for server to complete the startup process...");
        }

        let level = connection.run_level().await?;

        Ok(level >= self.target_level.level())
    }
}

impl Drop for ServerRunner {
    fn drop(&mut self) {
        // The watchdog would otherwise poll forever when no sentinel appears.
        if let Some(active) = self.active.get() {
            active.watchdog.abort();
        }
    }
}

const NEVER: u64 = u64::MAX;

/// At-most-once-per-window gate for progress log lines.
pub(crate) struct LogThrottle {
    anchor: Instant,
    window: Duration,
    last_ms: AtomicU64,
}

impl LogThrottle {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            anchor: Instant::now(),
            window,
            last_ms: AtomicU64::new(NEVER),
        }
    }

    /// True when a message is due; the first call always is.
    pub(crate) fn ready(&self) -> bool {
        let elapsed = self.anchor.elapsed().as_millis() as u64;
        let last = self.last_ms.load(Ordering::Relaxed);

        if last == NEVER || elapsed.saturating_sub(last) >= self.window.as_millis() as u64 {
            self.last_ms.store(elapsed, Ordering::Relaxed);
            return true;
        }

        false
    }
}
