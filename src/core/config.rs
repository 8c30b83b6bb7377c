//! Configuration management with layered hierarchy

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::error::{ReorderError, Result};

/// Name of the project level config file, searched from the product file upwards
pub const PROJECT_CONFIG_FILE: &str = ".reorder-tree.yaml";

/// Sort key strategy used to compute the canonical order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Source, group, group identifier, filter tag, part number, instance name
    #[default]
    Default,
    /// Source, filter tag (bought only), part number, instance name
    Simple,
    /// Source and instance name only
    Source,
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterKind::Default => write!(f, "default"),
            FilterKind::Simple => write!(f, "simple"),
            FilterKind::Source => write!(f, "source"),
        }
    }
}

/// Tree options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Synthesize group placeholder nodes before sorting
    pub create_groups: bool,

    /// Prefix of the placeholder part number
    pub group_prefix: String,

    /// Postfix of the placeholder part number
    pub group_postfix: String,

    /// Delimiter around the instance name (#IN#) in a list box row
    pub in_delimiter: Option<String>,

    /// Zero based token index of the instance name after splitting
    pub in_position: usize,

    /// Renumber instance names after sorting
    pub renumber: bool,

    /// First instance index of every part number
    pub start_index: u32,

    /// Sort key strategy
    pub filter: FilterKind,

    /// How the dialog renders a row (#PN#, #IN#, #SO#)
    pub node_template: String,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            create_groups: true,
            group_prefix: "GROUP ".to_string(),
            group_postfix: String::new(),
            in_delimiter: Some(" | ".to_string()),
            in_position: 1,
            renumber: true,
            start_index: 1,
            filter: FilterKind::Default,
            node_template: "#PN# | #IN# | #SO#".to_string(),
        }
    }
}

impl TreeConfig {
    /// The delimiter, treating an empty string as absent
    pub fn delimiter(&self) -> Option<&str> {
        self.in_delimiter.as_deref().filter(|d| !d.is_empty())
    }
}

/// Names of the user properties read from each node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropsConfig {
    pub group: String,
    pub filter: String,
}

impl Default for PropsConfig {
    fn default() -> Self {
        Self {
            group: "group".to_string(),
            filter: "filter".to_string(),
        }
    }
}

/// Dialog automation options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogConfig {
    /// Title of the reorder graph tree window
    pub window_name: String,

    /// Time the window gets to settle before its controls are queried
    pub settle_ms: u64,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            window_name: "Graph tree reordering".to_string(),
            settle_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Restrictions {
    pub allow_all_users: bool,
    pub allow_all_editors: bool,
    /// Allow runs on products without a project config above them
    pub allow_outside_workspace: bool,
}

impl Default for Restrictions {
    fn default() -> Self {
        Self {
            allow_all_users: true,
            allow_all_editors: true,
            allow_outside_workspace: true,
        }
    }
}

/// A known user of the tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub logon: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mail: String,
}

/// Reorder Tree configuration with layered hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log every processable node and computed sort key
    pub debug: bool,
    /// A disabled project rejects all changes
    pub active: bool,
    pub tree: TreeConfig,
    pub props: PropsConfig,
    pub dialog: DialogConfig,
    pub restrictions: Restrictions,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<User>,
    /// Logons allowed to edit this project (empty: no restriction)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub editors: Vec<String>,
    /// Project config file the configuration was loaded from, if any
    #[serde(skip)]
    pub workspace: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            active: true,
            tree: TreeConfig::default(),
            props: PropsConfig::default(),
            dialog: DialogConfig::default(),
            restrictions: Restrictions::default(),
            users: Vec::new(),
            editors: Vec::new(),
            workspace: None,
        }
    }
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    ///
    /// `start_dir` is where the project config search begins (usually the
    /// directory of the product file). An explicit config file must exist
    /// and parse; the implicit layers are skipped with a warning if broken.
    pub fn load(start_dir: Option<&Path>, explicit: Option<&Path>) -> Result<Self> {
        // 1. Built-in defaults come from serde(default) on the final parse
        let mut merged = serde_yml::Value::Mapping(Default::default());

        // 2. Global user config (~/.config/reorder-tree/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                match Self::read_layer(&global_path) {
                    Ok(layer) => merge_values(&mut merged, layer),
                    Err(e) => tracing::warn!(path = %global_path.display(), error = %e, "Skipping global config"),
                }
            }
        }

        // 3. Project config (.reorder-tree.yaml, nearest ancestor)
        let workspace = start_dir.and_then(Self::find_project_config);
        if let Some(project_path) = &workspace {
            match Self::read_layer(project_path) {
                Ok(layer) => merge_values(&mut merged, layer),
                Err(e) => tracing::warn!(path = %project_path.display(), error = %e, "Skipping project config"),
            }
        }

        // 4. Explicit --config file
        if let Some(path) = explicit {
            merge_values(&mut merged, Self::read_layer(path)?);
        }

        let mut config: Config = serde_yml::from_value(merged)?;
        config.workspace = workspace;

        // 5. Environment variables
        config.apply_env(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "reorder-tree")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Walk up from `start` looking for a project config file
    pub fn find_project_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.canonicalize().ok()?;
        loop {
            let candidate = current.join(PROJECT_CONFIG_FILE);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn read_layer(path: &Path) -> Result<serde_yml::Value> {
        let contents = std::fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(serde_yml::Value::Mapping(Default::default()));
        }
        Ok(serde_yml::from_str(&contents)?)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(delimiter) = var("REORDER_TREE_DELIMITER") {
            self.tree.in_delimiter = if delimiter.is_empty() { None } else { Some(delimiter) };
        }
        if let Some(position) = var("REORDER_TREE_POSITION").and_then(|p| p.parse().ok()) {
            self.tree.in_position = position;
        }
        if let Some(start) = var("REORDER_TREE_START_INDEX").and_then(|s| s.parse().ok()) {
            self.tree.start_index = start;
        }
    }

    /// Parse a config from a YAML string on top of the defaults
    pub fn from_yaml(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yml::from_str(contents).map_err(ReorderError::from)
    }

    /// Whether `logon` is listed as a known user
    pub fn user_exists(&self, logon: &str) -> bool {
        self.users.iter().any(|u| u.logon.eq_ignore_ascii_case(logon))
    }
}

/// Recursively merge `overlay` into `base`; mappings merge, everything else replaces
fn merge_values(base: &mut serde_yml::Value, overlay: serde_yml::Value) {
    match (base, overlay) {
        (serde_yml::Value::Mapping(base_map), serde_yml::Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
