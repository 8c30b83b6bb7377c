//! `reorder-tree groups` command - maintain group separator nodes

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{load_product, setup};
use crate::cli::GlobalOpts;
use crate::core::{GroupSynthesis, Host, SimulatedHost};

#[derive(clap::Args, Debug)]
pub struct GroupsArgs {
    /// Product file (YAML)
    pub product: PathBuf,

    /// Only remove existing separators
    #[arg(long)]
    pub remove: bool,
}

pub fn run(args: GroupsArgs, global: &GlobalOpts) -> Result<()> {
    let config = setup(global, Some(&args.product))?;
    let mut product = load_product(&args.product)?;
    let synthesis = GroupSynthesis::new(&config.tree, &config.props);

    if args.remove {
        let removed = synthesis.remove(&mut product)?;
        product.save(&args.product)?;
        if !global.quiet {
            println!(
                "{} Removed {} group separator(s) from {}",
                style("✓").green(),
                style(removed).cyan(),
                style(&product.part_number).yellow()
            );
        }
        return Ok(());
    }

    let created = synthesis.create(&mut product)?;
    let mut host = SimulatedHost::new(config.tree.node_template.clone());
    host.exclude_from_bom(&mut product, &created)?;
    product.save(&args.product)?;

    if !global.quiet {
        println!(
            "{} Created {} group separator(s) in {}",
            style("✓").green(),
            style(created.len()).cyan(),
            style(&product.part_number).yellow()
        );
        for name in &created {
            if let Some(node) = product.position(name).map(|i| &product.nodes[i]) {
                println!("  {}", style(&node.part_number).cyan());
            }
        }
    }
    Ok(())
}
