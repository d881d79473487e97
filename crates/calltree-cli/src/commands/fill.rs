//! Fill in a method's arguments interactively

use clap::Args;
use color_eyre::eyre::{eyre, Result};
use console::style;
use dialoguer::Input;

use calltree_core::{FormSession, NodeStatus, ParameterNode};

use crate::config::CalltreeConfig;

use super::export::export_values;
use super::{render, MethodArgs};

/// Fill in a method's arguments interactively
#[derive(Args)]
pub struct FillCommand {
    #[command(flatten)]
    pub target: MethodArgs,

    /// Also write the arguments to the export directory
    #[arg(long)]
    pub export: bool,
}

impl FillCommand {
    pub fn run(self, config: &CalltreeConfig) -> Result<()> {
        let (mut session, snapshot) = self.target.session(config)?;

        println!(
            "{} Filling {}",
            style("→").blue(),
            style(&snapshot.function.signature).cyan()
        );
        println!();

        let names: Vec<String> = snapshot
            .tree
            .nodes()
            .iter()
            .map(|node| node.name.clone())
            .collect();
        for (index, name) in names.iter().enumerate() {
            fill_node(&mut session, &mut vec![index], name)?;
        }

        let snapshot = session.snapshot()?;
        println!();
        render::print_tree(&snapshot.tree);
        println!("Progress: {}", render::progress(&snapshot.stats));
        println!();

        let payload = session.submit()?;
        println!("{}", serde_json::to_string_pretty(&payload.values)?);
        println!();
        println!("Call data: {}", style(&payload.call_data).yellow());

        if self.export {
            let path = export_values(
                &config.export_dir(),
                &snapshot.function.name,
                &payload.values,
            )?;
            println!(
                "{} Exported to {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
        Ok(())
    }
}

fn current<'a>(session: &'a FormSession, path: &[usize]) -> Result<&'a ParameterNode> {
    session
        .tree()
        .and_then(|tree| tree.get(path))
        .ok_or_else(|| eyre!("No parameter at path {:?}", path))
}

fn fill_node(session: &mut FormSession, path: &mut Vec<usize>, label: &str) -> Result<()> {
    let node = current(session, path)?;
    if node.is_leaf() {
        let declared = node.declared_type.clone();
        return prompt_leaf(session, path, label, &declared);
    }

    if node.parsed_type.is_dynamic_array() {
        let prompt = format!("{} ({}) length", label, node.declared_type);
        let len: usize = Input::new()
            .with_prompt(prompt)
            .default(node.children().len())
            .interact_text()?;
        session.resize(path, len)?;
    }

    let names: Vec<String> = current(session, path)?
        .children()
        .iter()
        .map(|child| child.name.clone())
        .collect();
    for (index, name) in names.iter().enumerate() {
        path.push(index);
        fill_node(session, path, &format!("{}.{}", label, name))?;
        path.pop();
    }
    Ok(())
}

fn prompt_leaf(
    session: &mut FormSession,
    path: &[usize],
    label: &str,
    declared: &str,
) -> Result<()> {
    loop {
        let input: String = Input::new()
            .with_prompt(format!("{} ({})", label, declared))
            .allow_empty(true)
            .interact_text()?;
        session.set_value(path, &input)?;

        let leaf = current(session, path)?;
        if leaf.status == Some(NodeStatus::Error) {
            println!("  {} not a valid {} value", style("✗").red(), declared);
        } else if !leaf.is_completed_input() {
            println!("  {} a value is required", style("!").yellow());
        } else {
            return Ok(());
        }
    }
}
