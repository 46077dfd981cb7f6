use std::process;

use clap::CommandFactory;
use is_terminal::IsTerminal;
use redmine_mcp_cli::cli::{Cli, Commands};
use redmine_mcp_cli::error::handle_cli_result;
use redmine_mcp_cli::exit_codes::{EXIT_FAILURE, EXIT_SUCCESS};
use redmine_mcp_cli::{completions, list, logging, serve};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let Some(command) = cli.command else {
        if let Err(e) = Cli::command().print_help() {
            eprintln!("Failed to print help: {e}");
            process::exit(EXIT_FAILURE);
        }
        process::exit(EXIT_SUCCESS);
    };

    let serving = matches!(command, Commands::Serve { .. }) && !std::io::stdin().is_terminal();
    logging::init(logging::log_level(cli.quiet, cli.debug, cli.verbose), serving);

    let exit_code = match command {
        Commands::Serve { connection } => {
            tracing::info!("Starting MCP server v{}", redmine_mcp::VERSION);
            handle_cli_result(serve::run_server(connection).await)
        }
        Commands::Tools { format } => match list::run_list_command(format, cli.verbose) {
            Ok(()) => EXIT_SUCCESS,
            Err(e) => {
                tracing::error!("Tools error: {e}");
                EXIT_FAILURE
            }
        },
        Commands::Completion { shell } => {
            tracing::debug!("Generating completion for {:?}", shell);
            match completions::print_completion(shell) {
                Ok(()) => EXIT_SUCCESS,
                Err(e) => {
                    tracing::error!("Completion error: {e}");
                    EXIT_FAILURE
                }
            }
        }
    };

    process::exit(exit_code);
}
