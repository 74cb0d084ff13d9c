use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum ServerCommands {
    /// Start the CMS server and wait until it is fully operational
    Start {
        /// Server installation directory
        #[arg(long)]
        server_dir: Option<PathBuf>,

        /// Seconds to wait for the server to finish starting (default: 600)
        #[arg(long)]
        wait_time: Option<u64>,

        /// Forward the server's own log output while waiting
        #[arg(long)]
        log_messages: bool,
    },

    /// Stop a running CMS server
    Stop {
        /// Server installation directory
        #[arg(long)]
        server_dir: Option<PathBuf>,
    },
}
