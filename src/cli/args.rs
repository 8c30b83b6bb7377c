//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, config::ConfigCommands, groups::GroupsArgs, plan::PlanArgs,
    renumber::RenumberArgs, run::RunArgs,
};

#[derive(Parser)]
#[command(name = "reorder-tree")]
#[command(author, version, about = "Reorder Tree - sort the children of a product assembly")]
#[command(long_about = "Sorts the direct children of a product assembly by source, group, filter tag and part number, drives the reorder graph tree dialog to match, renumbers instances and maintains group separators.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Config file applied on top of global and project config
    #[arg(long, global = true, env = "REORDER_TREE_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create groups, reorder the tree and renumber instances
    Run(RunArgs),

    /// Show the canonical order and the moves needed to reach it
    Plan(PlanArgs),

    /// Renumber instance names only
    Renumber(RenumberArgs),

    /// Recreate (or remove) group separator nodes only
    Groups(GroupsArgs),

    /// Show configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (tsv for tables)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
}
