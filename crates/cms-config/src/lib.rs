mod config;
mod connection_config;
mod connection_mode;
mod error;
mod layout;
mod logging_config;
mod server_conf;
mod startup_config;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use connection_config::ConnectionConfig;
pub use connection_mode::ConnectionMode;
pub use error::{ConfigError, ConfigErrorResult};
pub use layout::ServerLayout;
pub use logging_config::LoggingConfig;
pub use server_conf::{host_from_conf, port_from_conf};
pub use startup_config::StartupConfig;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_ADMIN_PORT: u16 = 8000;
const DEFAULT_USER: &str = "Admin";
const DEFAULT_PASSWORD: &str = "Admin";
const DEFAULT_WAIT_TIME_SECS: u64 = 600;
const DEFAULT_LOG_LEVEL: &str = "info";
