use clap::Parser;
use std::process;
use workshop_cli::cli::Cli;
use workshop_cli::commands::{self, CommandContext};
use workshop_cli::exit_codes::EXIT_ERROR;
use workshop_cli::logging::configure_logging;
use workshop_kanban::BoardConfig;

/// Load configuration, falling back to defaults so the CLI stays usable
/// with a broken config file.
fn load_cli_configuration() -> BoardConfig {
    match BoardConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Configuration loading failed: {}", e);
            eprintln!("Continuing with default configuration...");
            BoardConfig::default()
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = load_cli_configuration();
    if let Some(board) = cli.board.clone() {
        config.data_dir = board;
    }
    configure_logging(cli.verbose, cli.quiet, &config.log_level);
    tracing::debug!(?config, "starting");

    let ctx = CommandContext {
        config,
        format: cli.format,
        quiet: cli.quiet,
    };

    let mut stdout = std::io::stdout();
    let exit_code = match commands::run(cli.command, &ctx, &mut stdout).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_ERROR
        }
    };
    process::exit(exit_code);
}
