//! Check arguments against a method

use clap::Args;
use color_eyre::eyre::{eyre, Result};
use console::style;

use crate::config::CalltreeConfig;

use super::{read_args, render, MethodArgs};

/// Check arguments against a method and show what is missing
#[derive(Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub target: MethodArgs,

    /// Arguments as a JSON list, `@file` or `-` for stdin
    #[arg(long)]
    pub args: String,

    /// Print the annotated tree as JSON
    #[arg(long)]
    pub json: bool,
}

impl CheckCommand {
    pub fn run(self, config: &CalltreeConfig) -> Result<()> {
        let (mut session, _) = self.target.session(config)?;
        let snapshot = session.apply_text(&read_args(&self.args)?)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        } else {
            println!("{}", style(&snapshot.function.signature).bold());
            render::print_tree(&snapshot.tree);
            println!();
            if let Some(error) = &snapshot.error {
                println!("{} {}", style("✗").red(), error);
            }
            println!("Progress: {}", render::progress(&snapshot.stats));
        }

        if snapshot.complete {
            Ok(())
        } else {
            Err(eyre!(
                "Arguments incomplete: {} of {} fields filled",
                snapshot.stats.completed,
                snapshot.stats.total
            ))
        }
    }
}
