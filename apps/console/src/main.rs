use admin_console::APP_DIR_NAME;
use admin_console::cli::Cli;
use admin_console::commands;
use admin_console::error::ConsoleError;
use admin_console::logger::initialize as LoggerInitialize;
use admin_console::terminal::{TerminalNavigator, TerminalNotifier};

use client_core::ApiClient;
use client_core::config::ClientConfig;
use client_core::credential::FileCredentialStore;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use log::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            // Request failures were already shown by the notifier.
            if !matches!(e, ConsoleError::Request { .. }) {
                eprintln!("{e}");
            }
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), ConsoleError> {
    let config_dir = match cli.config_dir {
        Some(dir) => dir,
        None => default_config_dir()?,
    };

    LoggerInitialize(&config_dir.join("logs"), cli.verbose)?;
    info!("Console starting, config dir {}", config_dir.display());

    let mut config = ClientConfig::load(&config_dir)
        .and_then(ClientConfig::with_env_overrides)
        .map_err(ConsoleError::config)?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    let store = Arc::new(FileCredentialStore::open(&config_dir, config.storage_prefix.clone()));
    let client = ApiClient::from_config(
        &config,
        store,
        Arc::new(TerminalNotifier),
        Arc::new(TerminalNavigator),
    )
    .map_err(ConsoleError::config)?;

    commands::run(cli.command, client).await
}

fn default_config_dir() -> Result<PathBuf, ConsoleError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| ConsoleError::console("Could not determine the config directory"))
}
