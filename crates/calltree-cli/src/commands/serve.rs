//! Start the HTTP API for form sessions

use std::path::PathBuf;

use clap::Args;
use color_eyre::eyre::{eyre, Result};
use console::style;

use crate::config::CalltreeConfig;
use crate::server::{AppState, ServerConfig};

use super::load_abi;

/// Start the HTTP API for form sessions
#[derive(Args)]
pub struct ServeCommand {
    /// Host to bind to (overrides calltree.toml)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides calltree.toml)
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Default ABI for sessions created without one
    #[arg(long)]
    pub abi: Option<PathBuf>,
}

impl ServeCommand {
    pub async fn run(self, config: &CalltreeConfig) -> Result<()> {
        let server = ServerConfig {
            host: self.host.unwrap_or_else(|| config.server.host.clone()),
            port: self.port.unwrap_or(config.server.port),
        };

        let mut state =
            AppState::new(config.tree_builder()).with_max_sessions(config.server.max_sessions);
        if let Some(path) = &self.abi {
            state = state.with_abi(load_abi(path)?);
        }

        println!("{} Starting calltree server...", style("→").blue());
        println!();
        println!(
            "  {} API: {}",
            style("◆").cyan(),
            style(format!("http://{}:{}/api", server.host, server.port))
                .underlined()
                .cyan()
        );
        if let Some(path) = &self.abi {
            println!("  {} ABI: {}", style("◆").cyan(), path.display());
        }
        println!();
        println!("  Press {} to stop the server", style("Ctrl+C").yellow());
        println!();

        crate::server::run_server(state, server)
            .await
            .map_err(|e| eyre!("Server error: {}", e))?;

        Ok(())
    }
}
