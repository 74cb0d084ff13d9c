use std::panic::Location;

use cms_config::ConfigError;
use cms_runner::{AdminError, RunnerError};
use error_location::ErrorLocation;
use thiserror::Error;

/// Errors surfaced to the command line user.
///
/// The wrapped errors already carry their own origin, so the wrappers
/// display the source unchanged.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{source}")]
    Config {
        #[source]
        source: ConfigError,
        location: ErrorLocation,
    },

    #[error("{source}")]
    Runner {
        #[source]
        source: RunnerError,
        location: ErrorLocation,
    },

    #[error("{source}")]
    Admin {
        #[source]
        source: AdminError,
        location: ErrorLocation,
    },

    #[error("Incomplete parameters. The server directory or host/port must be defined. {location}")]
    IncompleteParameters { location: ErrorLocation },
}

impl From<ConfigError> for CliError {
    #[track_caller]
    fn from(source: ConfigError) -> Self {
        Self::Config {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<RunnerError> for CliError {
    #[track_caller]
    fn from(source: RunnerError) -> Self {
        Self::Runner {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<AdminError> for CliError {
    #[track_caller]
    fn from(source: AdminError) -> Self {
        Self::Admin {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type CliResult<T> = std::result::Result<T, CliError>;
