//! `reorder-tree config` command - inspect configuration

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::setup;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::PROJECT_CONFIG_FILE;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show(ShowArgs),

    /// Show paths to configuration files
    Path(PathArgs),

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value (e.g. tree.in_delimiter)
    pub key: Option<String>,

    /// Directory to resolve the project config from
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct PathArgs {
    /// Directory to resolve the project config from
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    ("debug", "Log sort keys and intermediate lists"),
    ("active", "Project accepts changes (set false to disable a project)"),
    ("tree.create_groups", "Create group separator nodes"),
    ("tree.group_prefix", "Prefix of a separator's part number"),
    ("tree.group_postfix", "Postfix of a separator's part number"),
    ("tree.in_delimiter", "Delimiter splitting a dialog row (REORDER_TREE_DELIMITER)"),
    ("tree.in_position", "Token holding the instance name (REORDER_TREE_POSITION)"),
    ("tree.renumber", "Renumber instance names after sorting"),
    ("tree.start_index", "First index per part number (REORDER_TREE_START_INDEX)"),
    ("tree.filter", "Sort strategy: default, simple or source"),
    ("tree.node_template", "Row text shown by the dialog (#PN#, #IN#, #SO#)"),
    ("props.group", "Property holding a node's group"),
    ("props.filter", "Property holding a bought node's filter tag"),
    ("dialog.window_name", "Title of the reorder dialog"),
    ("dialog.settle_ms", "Wait for the dialog to appear, in milliseconds"),
    ("restrictions.allow_all_users", "Skip the user whitelist"),
    ("restrictions.allow_all_editors", "Skip the editor whitelist"),
    ("restrictions.allow_outside_workspace", "Allow products without a project config"),
    ("users", "Whitelisted users (logon, name, mail)"),
    ("editors", "Logons allowed to edit"),
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Path(args) => run_path(args, global),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = load(&args.dir, global)?;
    let value = serde_yml::to_value(&config).into_diagnostic()?;

    if let Some(key) = &args.key {
        let found = key
            .split('.')
            .try_fold(&value, |v, part| v.get(part))
            .ok_or_else(|| miette::miette!("Unknown configuration key '{}'", key))?;
        match found {
            serde_yml::Value::String(s) => println!("{}", s),
            serde_yml::Value::Null => println!("~"),
            other => print!("{}", serde_yml::to_string(other).into_diagnostic()?),
        }
        return Ok(());
    }

    match global.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config).into_diagnostic()?),
        _ => print!("{}", serde_yml::to_string(&value).into_diagnostic()?),
    }
    Ok(())
}

fn run_path(args: PathArgs, global: &GlobalOpts) -> Result<()> {
    println!("{}", style("Configuration file paths (lowest priority first):").bold());
    println!();

    match Config::global_config_path() {
        Some(path) => print_path("Global:", &path),
        None => println!("  {} {}", style("Global:").cyan(), style("(no home directory)").dim()),
    }

    match Config::find_project_config(&args.dir) {
        Some(path) => print_path("Project:", &path),
        None => println!(
            "  {} {}",
            style("Project:").cyan(),
            style(format!("(no {} found)", PROJECT_CONFIG_FILE)).dim()
        ),
    }

    if let Some(path) = &global.config {
        print_path("Explicit:", path);
    }

    println!();
    println!(
        "{}",
        style("Environment: REORDER_TREE_DELIMITER, REORDER_TREE_POSITION, REORDER_TREE_START_INDEX").dim()
    );
    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();
    for (key, description) in VALID_KEYS {
        println!("  {:<32} {}", style(key).cyan(), style(description).dim());
    }
    Ok(())
}

fn load(dir: &std::path::Path, global: &GlobalOpts) -> Result<Config> {
    // setup() resolves the project config next to a file, so hand it one
    setup(global, Some(&dir.join(PROJECT_CONFIG_FILE)))
}

fn print_path(label: &str, path: &std::path::Path) {
    println!("  {:<9} {}", style(label).cyan(), path.display());
    if path.exists() {
        println!("            {}", style("(exists)").green());
    } else {
        println!("            {}", style("(not created)").dim());
    }
}
