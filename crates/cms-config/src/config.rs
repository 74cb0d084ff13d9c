use crate::{ConfigError, ConfigErrorResult, ConnectionConfig, LoggingConfig, StartupConfig};

use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub connection: ConnectionConfig,
    pub startup: StartupConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config without validating it.
    ///
    /// Loading order:
    /// 1. Check for CMS_CONFIG_DIR env var, else use ./.cms/
    /// 2. Load config.toml if it exists, else use defaults
    /// 3. Apply CMS_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_path = Self::config_dir()?.join("config.toml");

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &PathBuf) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.clone(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: CMS_CONFIG_DIR env var > ./.cms/ (relative to cwd)
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        if let Ok(dir) = std::env::var("CMS_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(".cms"))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.connection.validate()?;
        self.startup.validate()?;
        self.logging.validate()?;

        Ok(())
    }

    /// Log configuration summary (NEVER logs the password).
    pub fn log_summary(&self) {
        debug!("Configuration loaded:");
        debug!(
            "  connection: {}://{}:{} as {}",
            self.connection.mode, self.connection.host, self.connection.port, self.connection.user
        );
        debug!("  startup: wait_time={}s", self.startup.wait_time_secs);
        debug!("  logging: {}", self.logging.level);
    }

    fn apply_env_overrides(&mut self) {
        // Connection
        Self::apply_env_string("CMS_CONNECTION_HOST", &mut self.connection.host);
        Self::apply_env_parse("CMS_CONNECTION_PORT", &mut self.connection.port);
        Self::apply_env_string("CMS_CONNECTION_USER", &mut self.connection.user);
        Self::apply_env_string("CMS_CONNECTION_PASSWORD", &mut self.connection.password);
        Self::apply_env_parse("CMS_CONNECTION_MODE", &mut self.connection.mode);

        // Startup
        Self::apply_env_parse(
            "CMS_STARTUP_WAIT_TIME_SECS",
            &mut self.startup.wait_time_secs,
        );

        // Logging
        Self::apply_env_string("CMS_LOG_LEVEL", &mut self.logging.level);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }
}
