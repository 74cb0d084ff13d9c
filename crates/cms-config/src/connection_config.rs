use crate::{
    ConfigError, ConfigErrorResult, ConnectionMode, DEFAULT_ADMIN_PORT, DEFAULT_HOST,
    DEFAULT_PASSWORD, DEFAULT_USER,
};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub mode: ConnectionMode,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: String::from(DEFAULT_HOST),
            port: DEFAULT_ADMIN_PORT,
            user: String::from(DEFAULT_USER),
            password: String::from(DEFAULT_PASSWORD),
            mode: ConnectionMode::default(),
        }
    }
}

impl ConnectionConfig {
    /// Base URL of the admin endpoint, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.mode.scheme(), self.host, self.port)
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::connection("connection.host must not be empty"));
        }

        if self.port == 0 {
            return Err(ConfigError::connection(format!(
                "connection.port must be 1-65535, got {}",
                self.port
            )));
        }

        Ok(())
    }
}
