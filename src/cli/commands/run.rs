//! `reorder-tree run` command - the full workflow on a product file

use chrono::Utc;
use console::style;
use miette::{IntoDiagnostic, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::PathBuf;

use crate::cli::helpers::{load_product, setup};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::task::STEPS;
use crate::core::{AppData, Product, ReorderError, SimulatedHost, Task};

/// Exit code of a run stopped by a warning (an error exits with 1)
pub const WARNING_EXIT_CODE: i32 = 2;

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Product file (YAML)
    pub product: PathBuf,

    /// Do not create group separators
    #[arg(long)]
    pub no_groups: bool,

    /// Do not renumber instance names
    #[arg(long)]
    pub no_renumber: bool,

    /// Shuffle the children with this seed before reordering
    #[arg(long, value_name = "SEED")]
    pub shuffle_seed: Option<u64>,

    /// Write the result here instead of back to the product file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Run everything but do not write any file
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: RunArgs, global: &GlobalOpts) -> Result<()> {
    let mut config = setup(global, Some(&args.product))?;
    if args.no_groups {
        config.tree.create_groups = false;
    }
    if args.no_renumber {
        config.tree.renumber = false;
    }

    let mut product = load_product(&args.product)?;
    if let Some(seed) = args.shuffle_seed {
        shuffle_processable(&mut product, seed);
        tracing::info!(seed, "Shuffled processable nodes");
    }

    let show_progress = !global.quiet && matches!(global.format, OutputFormat::Auto | OutputFormat::Tsv);
    let mut host = SimulatedHost::new(config.tree.node_template.clone());
    let report = Task::new(&config, &mut host)
        .on_progress(|step, text| {
            if show_progress {
                println!("{} {}", style(format!("Step {} of {}:", step, STEPS)).dim(), text);
            }
        })
        .run(&mut product);

    let report = match report {
        Ok(report) => report,
        Err(e) if e.is_warning() => {
            warn(&e);
            std::process::exit(WARNING_EXIT_CODE);
        }
        Err(e) => return Err(e.into()),
    };

    if !args.dry_run {
        let target = args.output.as_ref().unwrap_or(&args.product);
        product.save(target)?;
        record_run();
    }

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
                "{} Reordered {} item(s) in {} of {} ({} move(s))",
                style("✓").green(),
                style(product.processable().len()).cyan(),
                style(&product.part_number).yellow(),
                style(args.product.display()).dim(),
                report.sort.moves
            );
            if !report.groups.is_empty() {
                println!("  {} group separator(s) created", report.groups.len());
            }
            if let Some(renumber) = &report.renumber {
                println!("  {} instance(s) renamed", renumber.renamed);
            }
            if args.dry_run {
                println!("  {}", style("Dry run, nothing written").dim());
            }
        }
    }

    Ok(())
}

/// Print a run-aborting precondition failure; the product is left untouched
fn warn(e: &ReorderError) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), e);
    let cause = e.root_cause();
    if !std::ptr::eq(cause, e) {
        eprintln!("  {}", style(cause).yellow());
    }
}

/// Randomly permute the processable children, leaving other nodes in place
pub fn shuffle_processable(product: &mut Product, seed: u64) {
    let slots: Vec<usize> = product
        .nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.is_processable())
        .map(|(i, _)| i)
        .collect();

    let mut order = slots.clone();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let original = product.nodes.clone();
    for (slot, from) in slots.iter().zip(order) {
        product.nodes[*slot] = original[from].clone();
    }
}

fn record_run() {
    let Some(path) = AppData::default_path() else {
        return;
    };
    let mut appdata = AppData::load(&path);
    appdata.record_run(Utc::now());
    if let Err(e) = appdata.save(&path) {
        tracing::warn!(path = %path.display(), error = %e, "Could not save AppData");
    }
}
