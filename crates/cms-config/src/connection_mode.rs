use crate::{ConfigError, DEFAULT_ADMIN_PORT};

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Transport used for the administrative connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMode {
    #[default]
    Http,
    Https,
}

impl ConnectionMode {
    /// URL scheme for this mode.
    pub const fn scheme(self) -> &'static str {
        match self {
            ConnectionMode::Http => "http",
            ConnectionMode::Https => "https",
        }
    }

    /// Port used when the server settings file does not name one.
    pub const fn default_port(self) -> u16 {
        DEFAULT_ADMIN_PORT
    }

    /// Key under which the admin port is stored in cms-server.conf.
    pub const fn port_property(self) -> &'static str {
        match self {
            ConnectionMode::Http => "HTTP_PORT",
            ConnectionMode::Https => "HTTPS_PORT",
        }
    }
}

impl fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

impl FromStr for ConnectionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(ConnectionMode::Http),
            "https" => Ok(ConnectionMode::Https),
            other => Err(ConfigError::connection(format!(
                "unknown connection mode '{other}', expected http or https"
            ))),
        }
    }
}
