use crate::server_commands::ServerCommands;

use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Server lifecycle operations
    Server {
        #[command(subcommand)]
        action: ServerCommands,
    },
}
