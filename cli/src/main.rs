mod check_config;
mod classify;
mod cli;
mod codes;
mod error;
mod table;
mod ui;
mod validate_version;

use clap::Parser;
use cli::{Cli, Commands};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);
    debug!("s3check starting");

    let result = match cli.command {
        Commands::Codes { prefix, format } => codes::execute(prefix, format),
        Commands::Classify {
            status,
            code,
            body,
            expect,
        } => classify::execute(status, code, body, expect),
        Commands::CheckConfig {
            config,
            init,
            verbose,
        } => check_config::execute(config, init, verbose),
        Commands::ValidateVersion { file, status } => validate_version::execute(file, status),
    };

    if let Err(err) = result {
        ui::error_message(&err.user_message());
        process::exit(1);
    }
}
