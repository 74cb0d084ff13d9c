use crate::{ConfigError, ConfigErrorResult, DEFAULT_LOG_LEVEL};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log filter used when RUST_LOG is not set, e.g. "info" or "info,cms_runner=debug"
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from(DEFAULT_LOG_LEVEL),
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.level.trim().is_empty() {
            return Err(ConfigError::logging("logging.level must not be empty"));
        }

        Ok(())
    }
}
