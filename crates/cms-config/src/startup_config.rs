use crate::{ConfigError, ConfigErrorResult, DEFAULT_WAIT_TIME_SECS};

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StartupConfig {
    /// Seconds to wait for the server to reach its target run level
    pub wait_time_secs: u64,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            wait_time_secs: DEFAULT_WAIT_TIME_SECS,
        }
    }
}

impl StartupConfig {
    pub fn wait_time(&self) -> Duration {
        Duration::from_secs(self.wait_time_secs)
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.wait_time_secs == 0 {
            return Err(ConfigError::config(
                "startup.wait_time_secs must be greater than 0",
            ));
        }

        Ok(())
    }
}
