mod commands;
mod config;
mod server;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::Command;
use config::CalltreeConfig;

#[derive(Parser)]
#[command(name = "calltree")]
#[command(about = "Assemble, check and encode contract method arguments")]
#[command(version)]
struct Cli {
    /// Path to calltree.toml
    #[arg(long, global = true, env = "CALLTREE_CONFIG")]
    config: Option<PathBuf>,

    /// Log engine activity to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = CalltreeConfig::load(cli.config.as_deref())?;
    cli.command.run(&config).await
}
