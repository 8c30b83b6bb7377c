//! `reorder-tree plan` command - preview the canonical order and the moves

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{load_product, setup, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::simulated::render_row;
use crate::core::{plan_moves, Filter, GroupSynthesis, Matcher, Node};

#[derive(clap::Args, Debug)]
pub struct PlanArgs {
    /// Product file (YAML)
    pub product: PathBuf,

    /// Recreate group separators before planning (the file is not changed)
    #[arg(long)]
    pub groups: bool,

    /// Show only rows that have to move
    #[arg(long)]
    pub moving_only: bool,
}

/// One row of the plan, in canonical order
#[derive(Debug, Clone, Serialize)]
pub struct PlanRow {
    pub position: usize,
    pub from: usize,
    pub moves_up: usize,
    pub part_number: String,
    pub instance_name: String,
    pub source: String,
    pub key: String,
}

const HEADERS: [&str; 7] = ["POS", "FROM", "MOVES", "PART NUMBER", "INSTANCE", "SOURCE", "KEY"];

impl PlanRow {
    fn cells(&self) -> [String; 7] {
        [
            self.position.to_string(),
            self.from.to_string(),
            self.moves_up.to_string(),
            self.part_number.clone(),
            self.instance_name.clone(),
            self.source.clone(),
            self.key.clone(),
        ]
    }
}

pub fn run(args: PlanArgs, global: &GlobalOpts) -> Result<()> {
    let config = setup(global, Some(&args.product))?;
    let mut product = load_product(&args.product)?;

    if args.groups {
        GroupSynthesis::new(&config.tree, &config.props).create(&mut product)?;
    }

    let filter = Filter::new(config.tree.filter, config.props.clone());
    let mut canonical: Vec<&Node> = product.processable();
    let current: Vec<String> = canonical
        .iter()
        .map(|n| render_row(&config.tree.node_template, n))
        .collect();
    filter.sort(&mut canonical);

    let alignment = Matcher::from_config(&config.tree).align(&canonical, &current)?;
    let moves = plan_moves(&alignment, &current)?;

    let rows: Vec<PlanRow> = canonical
        .iter()
        .zip(&moves)
        .map(|(node, planned)| PlanRow {
            position: planned.target,
            from: planned.from,
            moves_up: planned.moves_up,
            part_number: node.part_number.clone(),
            instance_name: node.instance_name.clone(),
            source: node.source.to_string(),
            key: filter.key(node).to_string(),
        })
        .filter(|row| !args.moving_only || row.moves_up > 0)
        .collect();

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rows).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&rows).into_diagnostic()?);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(io::stdout());
            for row in &rows {
                writer.serialize(row).into_diagnostic()?;
            }
            writer.flush().into_diagnostic()?;
        }
        OutputFormat::Md => {
            let mut table = Builder::default();
            table.push_record(HEADERS);
            for row in &rows {
                table.push_record(row.cells());
            }
            println!("{}", table.build().with(Style::markdown()).to_string());
        }
        OutputFormat::Tsv => {
            println!("{}", HEADERS.join("\t"));
            for row in &rows {
                println!("{}", row.cells().join("\t"));
            }
        }
        OutputFormat::Auto => {
            output_table(&rows);
            if !global.quiet {
                let total: usize = moves.iter().map(|m| m.moves_up).sum();
                println!();
                println!(
                    "{} item(s) in {}, {} move(s) needed",
                    style(moves.len()).cyan(),
                    style(&product.part_number).yellow(),
                    style(total).cyan()
                );
            }
        }
    }

    Ok(())
}

fn output_table(rows: &[PlanRow]) {
    const MAX_WIDTH: usize = 40;

    let cells: Vec<[String; 7]> = rows.iter().map(|r| r.cells()).collect();
    let widths: Vec<usize> = (0..HEADERS.len())
        .map(|col| {
            cells
                .iter()
                .map(|c| c[col].chars().count())
                .chain(std::iter::once(HEADERS[col].len()))
                .max()
                .unwrap_or(0)
                .min(MAX_WIDTH)
        })
        .collect();

    let header: Vec<String> = HEADERS
        .iter()
        .zip(&widths)
        .map(|(h, w)| style(format!("{:<width$}", h, width = w)).bold().to_string())
        .collect();
    println!("{}", header.join(" "));
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + widths.len() - 1));

    for row in &cells {
        let parts: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(value, w)| format!("{:<width$}", truncate_str(value, *w), width = w))
            .collect();
        println!("{}", parts.join(" "));
    }
}
