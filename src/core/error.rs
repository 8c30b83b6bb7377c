//! Error types for the reorder pipeline

use miette::Diagnostic;
use thiserror::Error;

use crate::yaml::YamlSyntaxError;

/// Everything that can go wrong while gathering, sorting, reordering or
/// renumbering the children of a product.
#[derive(Debug, Error, Diagnostic)]
pub enum ReorderError {
    #[error("Cannot assign all items from assembly to the list box ({expected} nodes, {found} list items)")]
    #[diagnostic(
        code(reorder_tree::matching::size_mismatch),
        help("The reorder dialog must list exactly the processable children of the product")
    )]
    ListSizeMismatch { expected: usize, found: usize },

    #[error("No list item matches the node {instance_name:?}")]
    #[diagnostic(
        code(reorder_tree::matching::unmatched),
        help("Enable the instance name (#IN#) in the product structure node options and check tree.in_delimiter / tree.in_position")
    )]
    UnmatchedNode { instance_name: String },

    #[error("List item {label:?} has no token at position {position}")]
    #[diagnostic(
        code(reorder_tree::matching::token_out_of_range),
        help("tree.in_position is zero based; check it against tree.node_template")
    )]
    TokenOutOfRange { label: String, position: usize },

    #[error("The list box has no item {text:?}")]
    #[diagnostic(code(reorder_tree::dialog::unknown_item))]
    UnknownItem { text: String },

    #[error("Instance name {name:?} is already used by another node")]
    #[diagnostic(code(reorder_tree::product::duplicate_name))]
    DuplicateInstanceName { name: String },

    #[error("Instance index of {part_number:?} overflows when counting from {start_index}")]
    #[diagnostic(
        code(reorder_tree::renumber::index_overflow),
        help("Use a smaller tree.start_index")
    )]
    IndexOverflow { part_number: String, start_index: u32 },

    #[error("Node {name:?} not found in product")]
    #[diagnostic(code(reorder_tree::product::node_not_found))]
    NodeNotFound { name: String },

    #[error("Failed to connect to {window:?} window: {reason}")]
    #[diagnostic(
        code(reorder_tree::dialog::not_connected),
        help("This may be caused by an inactive window or a timeout in the connection")
    )]
    WindowNotConnected { window: String, reason: String },

    #[error("You are not allowed to reorder the graph tree: {reason}")]
    #[diagnostic(code(reorder_tree::permission::denied))]
    PermissionDenied { reason: String },

    #[error("Failed to create groups: {source}")]
    #[diagnostic(code(reorder_tree::task::groups))]
    GroupCreation {
        #[source]
        source: Box<ReorderError>,
    },

    #[error("Failed to sort nodes: {source}")]
    #[diagnostic(code(reorder_tree::task::sort))]
    SortFailed {
        #[source]
        source: Box<ReorderError>,
    },

    #[error("Failed to renumber nodes: {source}")]
    #[diagnostic(code(reorder_tree::task::renumber))]
    RenumberFailed {
        #[source]
        source: Box<ReorderError>,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("IO error: {0}")]
    #[diagnostic(code(reorder_tree::io))]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    #[diagnostic(code(reorder_tree::yaml))]
    Yaml(#[from] serde_yml::Error),

    #[error("Failed to parse JSON: {0}")]
    #[diagnostic(code(reorder_tree::json))]
    Json(#[from] serde_json::Error),
}

impl ReorderError {
    /// Warnings are reported to the user and abort the run, but are not
    /// faults of the tool itself.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            ReorderError::ListSizeMismatch { .. }
                | ReorderError::UnmatchedNode { .. }
                | ReorderError::TokenOutOfRange { .. }
                | ReorderError::PermissionDenied { .. }
                | ReorderError::GroupCreation { .. }
                | ReorderError::SortFailed { .. }
                | ReorderError::RenumberFailed { .. }
        )
    }
}

impl ReorderError {
    pub fn group_creation(source: ReorderError) -> Self {
        ReorderError::GroupCreation {
            source: Box::new(source),
        }
    }

    pub fn sort_failed(source: ReorderError) -> Self {
        ReorderError::SortFailed {
            source: Box::new(source),
        }
    }

    pub fn renumber_failed(source: ReorderError) -> Self {
        ReorderError::RenumberFailed {
            source: Box::new(source),
        }
    }

    /// The innermost error behind task level wrappers
    pub fn root_cause(&self) -> &ReorderError {
        match self {
            ReorderError::GroupCreation { source }
            | ReorderError::SortFailed { source }
            | ReorderError::RenumberFailed { source } => source.root_cause(),
            other => other,
        }
    }
}

pub type Result<T, E = ReorderError> = std::result::Result<T, E>;
