
use crate::cli::Cli;
use crate::commands::Commands;
use crate::server_commands::ServerCommands;

/// `cms server stop` with no flags set.
pub(crate) fn stop_cli() -> Cli {
    Cli {
        command: Commands::Server {
            action: ServerCommands::Stop { server_dir: None },
        },
        host: None,
        port: None,
        user: None,
        password: None,
        mode: None,
    }
}
