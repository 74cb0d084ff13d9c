//! Crash watchdog for the wrapper's error sentinel file.

use crate::error::{Result, RunnerError};

use std::panic::Location;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use error_location::ErrorLocation;
use tokio::task::JoinHandle;
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Arm the crash watchdog for a server installation.
///
/// A sentinel left over from an earlier run is deleted first; failing that is
/// fatal, since a stale sentinel would immediately abort the upcoming
/// startup. The returned task polls once per second, sets `failed` the moment
/// the wrapper writes a fresh sentinel, and then exits.
pub(crate) fn arm(sentinel: PathBuf, failed: Arc<AtomicBool>) -> Result<JoinHandle<()>> {
    if sentinel.exists() {
        std::fs::remove_file(&sentinel).map_err(|e| RunnerError::SentinelDeletion {
            path: sentinel.clone(),
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;
        debug!("Removed stale wrapper sentinel {}", sentinel.display());
    }

    Ok(tokio::spawn(async move {
        loop {
            if sentinel.exists() {
                debug!("Wrapper sentinel {} detected", sentinel.display());
                failed.store(true, Ordering::SeqCst);
                return;
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }))
}
