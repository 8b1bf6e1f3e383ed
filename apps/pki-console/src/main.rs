use std::path::PathBuf;

use clap::Parser;
use pki_console::ConsoleConfig;
use pki_console::cli::Cli;
use pki_console::command::run;
use pki_console::init::initialize_tracing;
use pki_core::config::core_config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config_files: Vec<PathBuf> = cli.config.clone().unwrap_or_default();
    config_files.insert(0, "config/config.yml".into());

    let app_config: AppConfig<ConsoleConfig> = AppConfig::from_files(&config_files)?;

    initialize_tracing(&app_config.app)?;

    run(cli, &app_config.core).await
}
