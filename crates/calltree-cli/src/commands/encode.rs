//! Encode call data from arguments

use clap::Args;
use color_eyre::eyre::Result;

use crate::config::CalltreeConfig;

use super::{apply_args, MethodArgs};

/// Encode call data from arguments
#[derive(Args)]
pub struct EncodeCommand {
    #[command(flatten)]
    pub target: MethodArgs,

    /// Arguments as a JSON list, `@file` or `-` for stdin
    #[arg(long)]
    pub args: String,

    /// Print the full call payload as JSON instead of bare call data
    #[arg(long)]
    pub json: bool,
}

impl EncodeCommand {
    pub fn run(self, config: &CalltreeConfig) -> Result<()> {
        let (mut session, _) = self.target.session(config)?;
        apply_args(&mut session, &self.args)?;
        let payload = session.submit()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&payload)?);
        } else {
            // Bare call data for scripting: cast send $ADDR $(calltree encode ...)
            println!("{}", payload.call_data);
        }
        Ok(())
    }
}
