use crate::commands::Commands;
use crate::server_commands::ServerCommands;

use clap::Parser;

#[derive(Parser)]
#[command(name = "cms")]
#[command(about = "CMS server administration CLI")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Admin host of the CMS server (overrides configuration)
    #[arg(long, global = true)]
    pub(crate) host: Option<String>,

    /// Admin port of the CMS server (overrides configuration)
    #[arg(long, global = true)]
    pub(crate) port: Option<u16>,

    /// Admin user for the connection
    #[arg(long, global = true)]
    pub(crate) user: Option<String>,

    /// Admin password for the connection
    #[arg(long, global = true)]
    pub(crate) password: Option<String>,

    /// Connection mode
    #[arg(long, global = true, value_parser = ["http", "https"])]
    pub(crate) mode: Option<String>,
}

impl Cli {
    /// Whether the chosen command asked for the server's own log output.
    pub(crate) fn log_messages(&self) -> bool {
        matches!(
            self.command,
            Commands::Server {
                action: ServerCommands::Start {
                    log_messages: true,
                    ..
                },
            }
        )
    }
}
