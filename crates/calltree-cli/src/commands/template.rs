//! Print the empty argument list of a method

use clap::Args;
use color_eyre::eyre::Result;

use crate::config::CalltreeConfig;

use super::MethodArgs;

/// Print the empty argument list of a method
#[derive(Args)]
pub struct TemplateCommand {
    #[command(flatten)]
    pub target: MethodArgs,
}

impl TemplateCommand {
    pub fn run(self, config: &CalltreeConfig) -> Result<()> {
        let (_, snapshot) = self.target.session(config)?;
        println!("{}", serde_json::to_string_pretty(&snapshot.values)?);
        Ok(())
    }
}
