use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("HTTP request failed: {source} {location}")]
    Http {
        #[source]
        source: reqwest::Error,
        location: ErrorLocation,
    },

    #[error("Unexpected HTTP status {status} from {endpoint} {location}")]
    UnexpectedStatus {
        status: u16,
        endpoint: String,
        location: ErrorLocation,
    },

    #[error("Connection severed while the server was shutting down {location}")]
    ConnectionSevered { location: ErrorLocation },

    #[error("Not connected {location}")]
    NotConnected { location: ErrorLocation },
}

impl From<reqwest::Error> for AdminError {
    #[track_caller]
    fn from(source: reqwest::Error) -> Self {
        Self::Http {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type AdminResult<T> = std::result::Result<T, AdminError>;
