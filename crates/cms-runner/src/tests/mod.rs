
use crate::admin::{AdminConnection, AdminError, AdminResult};
use crate::run_level::RunLevel;

use std::panic::Location;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use cms_config::ServerLayout;
use error_location::ErrorLocation;
use tempfile::TempDir;

/// Wrapper script that records every spawn in `spawn.log` next to the
/// installation and exits immediately.
pub(crate) const COUNTING_SCRIPT: &str =
    "cd \"$(dirname \"$0\")/..\" && echo spawned >> spawn.log\n";

/// Admin connection double driven by plain atomics.
pub(crate) struct FakeConnection {
    /// 1-based connect attempt at which the connection starts succeeding.
    connect_after: u32,
    connect_calls: AtomicU32,
    connected: AtomicBool,
    /// Run-level queries answered with `Booting` before `Started`.
    low_level_queries: AtomicU32,
    run_level_calls: AtomicU32,
    stop_error: Mutex<Option<AdminError>>,
    stop_calls: AtomicU32,
    disconnect_calls: AtomicU32,
    /// Keeps `is_connected` truthful to a server that ignores the shutdown.
    linger_after_disconnect: bool,
}

impl FakeConnection {
    fn base() -> Self {
        Self {
            connect_after: 1,
            connect_calls: AtomicU32::new(0),
            connected: AtomicBool::new(false),
            low_level_queries: AtomicU32::new(0),
            run_level_calls: AtomicU32::new(0),
            stop_error: Mutex::new(None),
            stop_calls: AtomicU32::new(0),
            disconnect_calls: AtomicU32::new(0),
            linger_after_disconnect: false,
        }
    }

    /// Accepts the first connect attempt and reports `Started` right away.
    pub(crate) fn ready() -> Self {
        Self::base()
    }

    /// Never accepts a connection.
    pub(crate) fn unreachable() -> Self {
        Self {
            connect_after: u32::MAX,
            ..Self::base()
        }
    }

    /// Accepts the nth connect attempt, then reports `Booting` for the given
    /// number of run-level queries before `Started`.
    pub(crate) fn slow(connect_after: u32, low_level_queries: u32) -> Self {
        Self {
            connect_after,
            low_level_queries: AtomicU32::new(low_level_queries),
            ..Self::base()
        }
    }

    /// Connected from the outset, as a shutdown target.
    pub(crate) fn running() -> Self {
        let fake = Self::base();
        fake.connected.store(true, Ordering::SeqCst);
        fake
    }

    pub(crate) fn with_stop_error(self, error: AdminError) -> Self {
        *self.stop_error.lock().unwrap() = Some(error);
        self
    }

    pub(crate) fn lingering(mut self) -> Self {
        self.linger_after_disconnect = true;
        self
    }

    pub(crate) fn connect_calls(&self) -> u32 {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn run_level_calls(&self) -> u32 {
        self.run_level_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn stop_calls(&self) -> u32 {
        self.stop_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn disconnect_calls(&self) -> u32 {
        self.disconnect_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AdminConnection for FakeConnection {
    async fn connect(&self) -> AdminResult<()> {
        if self.connected.load(Ordering::SeqCst) {
            return Ok(());
        }

        let attempt = self.connect_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt >= self.connect_after {
            self.connected.store(true, Ordering::SeqCst);
            Ok(())
        } else {
            Err(AdminError::NotConnected {
                location: ErrorLocation::from(Location::caller()),
            })
        }
    }

    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn run_level(&self) -> AdminResult<u8> {
        self.run_level_calls.fetch_add(1, Ordering::SeqCst);

        let remaining = self.low_level_queries.load(Ordering::SeqCst);
        if remaining > 0 {
            self.low_level_queries.store(remaining - 1, Ordering::SeqCst);
            Ok(RunLevel::Booting.level())
        } else {
            Ok(RunLevel::Started.level())
        }
    }

    async fn stop_server(&self) -> AdminResult<()> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);

        match self.stop_error.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn disconnect(&self) {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        if !self.linger_after_disconnect {
            self.connected.store(false, Ordering::SeqCst);
        }
    }
}

/// Minimal startable installation: a license file plus a wrapper script.
pub(crate) fn install_server(script: &str) -> (TempDir, ServerLayout) {
    let temp = TempDir::new().unwrap();
    let layout = ServerLayout::new(temp.path());

    std::fs::create_dir_all(layout.license_file().parent().unwrap()).unwrap();
    std::fs::write(layout.license_file(), "LICENSE=test\n").unwrap();
    std::fs::create_dir_all(layout.bin_dir()).unwrap();
    write_executable(&layout.wrapper_executable(), script);

    (temp, layout)
}

pub(crate) fn write_executable(path: &Path, contents: &str) {
    std::fs::write(path, contents).unwrap();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mut permissions = std::fs::metadata(path).unwrap().permissions();
        permissions.set_mode(0o755);
        std::fs::set_permissions(path, permissions).unwrap();
    }
}

/// Wait on the real clock for a side effect of a launched process.
pub(crate) fn wait_for_file(path: &Path) -> bool {
    for _ in 0..100 {
        if path.exists() {
            return true;
        }

        std::thread::sleep(Duration::from_millis(50));
    }

    false
}

pub(crate) fn spawn_count(layout: &ServerLayout) -> usize {
    std::fs::read_to_string(layout.root().join("spawn.log"))
        .map(|log| log.lines().count())
        .unwrap_or(0)
}
