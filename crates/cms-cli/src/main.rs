//! cms - CMS server administration CLI
//!
//! Starts and stops a CMS server installation from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Start the server installed under /opt/cms and wait for it
//! cms server start --server-dir /opt/cms
//!
//! # Start with a longer startup budget and live server output
//! cms server start --server-dir /opt/cms --wait-time 1200 --log-messages
//!
//! # Stop a remote server
//! cms server stop --host cms.example.com --port 8000 --mode https
//! ```

mod cli;
mod commands;
mod error;
mod server_commands;

#[cfg(test)]
mod tests;

use crate::cli::Cli;
use crate::commands::Commands;
use crate::error::{CliError, CliResult};
use crate::server_commands::ServerCommands;

use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use cms_config::{Config, ConnectionConfig, ServerLayout, host_from_conf, port_from_conf};
use cms_runner::{HttpAdminClient, RunnerError, ServerRunner};
use error_location::ErrorLocation;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    setup_logging(&config, &cli);
    config.log_summary();

    match run(&cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");

            if let CliError::Runner {
                source: RunnerError::StartupTimeout { .. },
                ..
            } = &e
            {
                eprintln!(
                    "The server couldn't be started or it takes longer than expected \
                     (use --wait-time to increase the time to wait)!"
                );
            }

            ExitCode::FAILURE
        }
    }
}

fn load_config() -> CliResult<Config> {
    let config = Config::load()?;
    config.validate()?;

    Ok(config)
}

/// Console logging with the configured level; `RUST_LOG` wins when set.
///
/// `--log-messages` raises the default to debug so the forwarded server
/// output becomes visible.
fn setup_logging(config: &Config, cli: &Cli) {
    let default_level = if cli.log_messages() {
        "debug"
    } else {
        config.logging.level.as_str()
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .init();
}

async fn run(cli: &Cli, config: &Config) -> CliResult<()> {
    match &cli.command {
        Commands::Server { action } => match action {
            ServerCommands::Start {
                server_dir,
                wait_time,
                log_messages: _,
            } => start_server(config, cli, server_dir.clone(), *wait_time).await,
            ServerCommands::Stop { server_dir } => {
                stop_server(config, cli, server_dir.clone()).await
            }
        },
    }
}

async fn start_server(
    config: &Config,
    cli: &Cli,
    server_dir: Option<PathBuf>,
    wait_time: Option<u64>,
) -> CliResult<()> {
    let connection = resolve_connection(config, cli, server_dir.as_deref())?;
    let client = HttpAdminClient::new(&connection)?;

    let mut runner = match &server_dir {
        Some(dir) => ServerRunner::new(dir),
        None => ServerRunner::remote(),
    };
    let timeout = match wait_time {
        Some(secs) => Duration::from_secs(secs),
        None => config.startup.wait_time(),
    };
    runner.set_timeout(timeout);

    runner.start(&client).await?;

    Ok(())
}

async fn stop_server(config: &Config, cli: &Cli, server_dir: Option<PathBuf>) -> CliResult<()> {
    // Stopping a server picked up from configuration defaults alone is too
    // easy to trigger by accident; an explicit target is required.
    if server_dir.is_none() && (cli.host.is_none() || cli.port.is_none()) {
        return Err(CliError::IncompleteParameters {
            location: ErrorLocation::from(Location::caller()),
        });
    }

    if let Some(dir) = server_dir.as_deref() {
        let layout = ServerLayout::new(dir);

        if !layout.lock_file_exists() {
            warn!("Server lock file not found! Server seems to be offline.");
            return Ok(());
        }
    }

    let connection = resolve_connection(config, cli, server_dir.as_deref())?;
    let client = HttpAdminClient::new(&connection)?;

    let runner = match &server_dir {
        Some(dir) => ServerRunner::new(dir),
        None => ServerRunner::remote(),
    };

    runner.stop(&client).await?;

    Ok(())
}

/// Connection endpoint from command line flags, the installation's
/// `cms-server.conf`, and the tool configuration, in that order.
fn resolve_connection(
    config: &Config,
    cli: &Cli,
    server_dir: Option<&Path>,
) -> CliResult<ConnectionConfig> {
    let mut connection = config.connection.clone();

    if let Some(mode) = cli.mode.as_deref() {
        connection.mode = mode.parse()?;
    }

    if let Some(user) = &cli.user {
        connection.user = user.clone();
    }

    if let Some(password) = &cli.password {
        connection.password = password.clone();
    }

    match server_dir {
        Some(dir) => {
            let layout = ServerLayout::new(dir);
            connection.host = cli.host.clone().unwrap_or_else(|| host_from_conf(&layout));
            connection.port = cli
                .port
                .unwrap_or_else(|| port_from_conf(&layout, connection.mode));

            info!(
                "Using local host:port '{}://{}:{}' from cms-server.conf...",
                connection.mode, connection.host, connection.port
            );
        }
        None => {
            if let Some(host) = &cli.host {
                connection.host = host.clone();
            }

            if let Some(port) = cli.port {
                connection.port = port;
            }

            info!(
                "Using remote host:port '{}://{}:{}'...",
                connection.mode, connection.host, connection.port
            );
        }
    }

    Ok(connection)
}
