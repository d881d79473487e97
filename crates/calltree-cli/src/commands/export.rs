//! Write arguments to a JSON file

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::Args;
use color_eyre::eyre::Result;
use console::style;
use serde_json::Value;

use crate::config::CalltreeConfig;

use super::{apply_args, MethodArgs};

/// Write arguments to a JSON file
#[derive(Args)]
pub struct ExportCommand {
    #[command(flatten)]
    pub target: MethodArgs,

    /// Arguments as a JSON list, `@file` or `-` for stdin
    #[arg(long)]
    pub args: String,

    /// Output file; defaults to a timestamped file in the export directory
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

impl ExportCommand {
    pub fn run(self, config: &CalltreeConfig) -> Result<()> {
        let (mut session, _) = self.target.session(config)?;
        let snapshot = apply_args(&mut session, &self.args)?;

        let path = match self.out {
            Some(path) => {
                write_values(&path, &snapshot.values)?;
                path
            }
            None => export_values(
                &config.export_dir(),
                &snapshot.function.name,
                &snapshot.values,
            )?,
        };

        println!(
            "{} Exported {} argument(s) to {}",
            style("✓").green(),
            snapshot.values.len(),
            style(path.display()).cyan()
        );
        if !snapshot.complete {
            println!(
                "  {} {} of {} fields filled",
                style("!").yellow(),
                snapshot.stats.completed,
                snapshot.stats.total
            );
        }
        Ok(())
    }
}

/// Write values into `dir` under a timestamped name, creating `dir` if needed
pub fn export_values(dir: &Path, method: &str, values: &[Value]) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(generate_filename(method, "json"));
    write_values(&path, values)?;
    Ok(path)
}

fn write_values(path: &Path, values: &[Value]) -> Result<()> {
    let content = serde_json::to_string_pretty(values)?;
    fs::write(path, content)?;
    Ok(())
}

/// Generate a timestamped filename
fn generate_filename(prefix: &str, extension: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d-%H%M%S");
    format!("{}-{}.{}", prefix, timestamp, extension)
}
