//! List the methods of an ABI

use std::path::PathBuf;

use clap::Args;
use color_eyre::eyre::Result;
use console::style;

use calltree_core::{CallKind, FunctionInfo};

use super::load_abi;

/// List the read and write methods of an ABI
#[derive(Args)]
pub struct MethodsCommand {
    /// ABI JSON file, or a compiler artifact with an `abi` field
    #[arg(long)]
    pub abi: PathBuf,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

impl MethodsCommand {
    pub fn run(self) -> Result<()> {
        let abi = load_abi(&self.abi)?;
        let functions = abi.functions();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&functions)?);
            return Ok(());
        }

        if functions.is_empty() {
            println!("{} No methods found in {}", style("!").yellow(), self.abi.display());
            return Ok(());
        }

        for kind in CallKind::ALL {
            print_section(kind, functions.of_kind(kind));
        }
        println!("Total: {} method(s)", functions.len());

        Ok(())
    }
}

fn print_section(kind: CallKind, functions: &[FunctionInfo]) {
    if functions.is_empty() {
        return;
    }

    println!("{}", style(kind).bold());
    for f in functions {
        println!(
            "  {:<12} {} {}",
            style(&f.selector).dim(),
            f.signature,
            style(f.state_mutability).cyan()
        );
    }
    println!();
}
