//! `reorder-tree renumber` command - renumber instance names in tree order

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::{load_product, setup};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::renumber::{self, final_labels};

#[derive(clap::Args, Debug)]
pub struct RenumberArgs {
    /// Product file (YAML)
    pub product: PathBuf,

    /// First index of every part number (overrides tree.start_index)
    #[arg(long)]
    pub start_index: Option<u32>,

    /// Print the new names without writing the file
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: RenumberArgs, global: &GlobalOpts) -> Result<()> {
    let config = setup(global, Some(&args.product))?;
    let start_index = args.start_index.unwrap_or(config.tree.start_index);
    let mut product = load_product(&args.product)?;

    if args.dry_run {
        let labels = final_labels(&product.nodes, start_index)?;
        for (node, label) in product.nodes.iter().zip(labels) {
            let label = label.unwrap_or_else(|| node.instance_name.clone());
            if label != node.instance_name {
                println!("{}\t{}", node.instance_name, label);
            }
        }
        return Ok(());
    }

    let report = renumber::renumber(&mut product, start_index)?;
    product.save(&args.product)?;

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&report).into_diagnostic()?);
        }
        _ if global.quiet => {}
        _ => {
            println!(
                "{} Renamed {} instance(s) in {} ({} group separator(s) skipped)",
                style("✓").green(),
                style(report.renamed).cyan(),
                style(&product.part_number).yellow(),
                report.skipped
            );
        }
    }
    Ok(())
}
