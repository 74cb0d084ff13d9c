use crate::admin::AdminError;

use std::panic::Location;
use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("No server directory configured, a local installation is required {location}")]
    ServerDirMissing { location: ErrorLocation },

    #[error("Server lock file already exists! Server seems to be running. ({path}) {location}")]
    LockFilePresent {
        path: PathBuf,
        location: ErrorLocation,
    },

    #[error("License file does not exist! ({path}) {location}")]
    LicenseFileMissing {
        path: PathBuf,
        location: ErrorLocation,
    },

    #[error("Neither cms-wrapper nor cms-server exists in {bin_dir} {location}")]
    LauncherMissing {
        bin_dir: PathBuf,
        location: ErrorLocation,
    },

    #[error("Could not delete {path}! {source} {location}")]
    SentinelDeletion {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Wrapper failed unexpectedly! See cms-wrapper.log for details... {location}")]
    WrapperCrashed { location: ErrorLocation },

    #[error("Could not detect a started CMS server! (waited {timeout_secs}s) {location}")]
    StartupTimeout {
        timeout_secs: u64,
        location: ErrorLocation,
    },

    #[error("Server shutdown failed, server may still be running... {location}")]
    DisconnectTimeout { location: ErrorLocation },

    #[error(
        "Server shutdown initiated but the server is still shutting down. Server may hang on shutdown... {location}"
    )]
    LockReleaseTimeout { location: ErrorLocation },

    #[error("Admin connection error: {source} {location}")]
    Admin {
        #[source]
        source: AdminError,
        location: ErrorLocation,
    },
}

impl From<AdminError> for RunnerError {
    #[track_caller]
    fn from(source: AdminError) -> Self {
        Self::Admin {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, RunnerError>;
