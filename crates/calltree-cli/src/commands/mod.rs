//! CLI commands for calltree

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use color_eyre::eyre::{eyre, Result};
use serde_json::Value;

use calltree_core::{Abi, FormSession, Snapshot};

use crate::config::CalltreeConfig;

pub mod check;
pub mod decode;
pub mod encode;
pub mod export;
pub mod fill;
pub mod methods;
pub mod render;
pub mod serve;
pub mod template;

/// All available CLI commands
#[derive(Subcommand)]
pub enum Command {
    /// List the read and write methods of an ABI
    Methods(methods::MethodsCommand),

    /// Print the empty argument list of a method
    Template(template::TemplateCommand),

    /// Check arguments against a method and show what is missing
    Check(check::CheckCommand),

    /// Fill in a method's arguments interactively
    Fill(fill::FillCommand),

    /// Encode call data from arguments
    Encode(encode::EncodeCommand),

    /// Decode call data back into arguments
    Decode(decode::DecodeCommand),

    /// Write arguments to a JSON file
    Export(export::ExportCommand),

    /// Start the HTTP API for form sessions
    Serve(serve::ServeCommand),
}

impl Command {
    /// Execute the command
    pub async fn run(self, config: &CalltreeConfig) -> Result<()> {
        match self {
            Command::Methods(cmd) => cmd.run(),
            Command::Template(cmd) => cmd.run(config),
            Command::Check(cmd) => cmd.run(config),
            Command::Fill(cmd) => cmd.run(config),
            Command::Encode(cmd) => cmd.run(config),
            Command::Decode(cmd) => cmd.run(),
            Command::Export(cmd) => cmd.run(config),
            Command::Serve(cmd) => cmd.run(config).await,
        }
    }
}

/// ABI file and method selection shared by most commands
#[derive(Args)]
pub struct MethodArgs {
    /// ABI JSON file, or a compiler artifact with an `abi` field
    #[arg(long)]
    pub abi: PathBuf,

    /// Method name or full signature, e.g. `transfer(address,uint256)`
    pub method: String,
}

impl MethodArgs {
    /// Open a session with the method selected
    pub fn session(&self, config: &CalltreeConfig) -> Result<(FormSession, Snapshot)> {
        let abi = load_abi(&self.abi)?;
        let mut session = FormSession::with_builder(abi, config.tree_builder());
        let snapshot = session.select(&self.method)?;
        Ok((session, snapshot))
    }
}

/// Load an ABI from a bare ABI array or a compiler artifact
pub fn load_abi(path: &Path) -> Result<Abi> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| eyre!("Could not read {}: {}", path.display(), e))?;
    parse_abi(&content)
}

fn parse_abi(content: &str) -> Result<Abi> {
    let value: Value = serde_json::from_str(content)?;
    let abi = match value.get("abi") {
        Some(abi) => Abi::from_value(abi)?,
        None => Abi::from_value(&value)?,
    };
    Ok(abi)
}

/// Read an argument list given inline, as `@file`, or as `-` for stdin
pub fn read_args(raw: &str) -> Result<String> {
    if raw == "-" {
        return Ok(std::io::read_to_string(std::io::stdin())?);
    }
    match raw.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| eyre!("Could not read arguments from {}: {}", path, e)),
        None => Ok(raw.to_string()),
    }
}

/// Apply the text view and fail on shape mismatches
pub fn apply_args(session: &mut FormSession, raw: &str) -> Result<Snapshot> {
    let text = read_args(raw)?;
    let snapshot = session.apply_text(&text)?;
    match &snapshot.error {
        Some(error) => Err(eyre!("{}", error)),
        None => Ok(snapshot),
    }
}
