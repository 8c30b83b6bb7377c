//! Matching list box rows to product nodes
//!
//! The reorder dialog shows one row per child, rendered from the node
//! options of the host (for example `#PN# | #IN# | #SO#`). The matcher finds
//! the row of every node by its instance name, producing an [`Alignment`]:
//! the row texts in canonical order.
//!
//! Each row is consumed by at most one node. When several rows carry the
//! same instance token, the first unconsumed row in list order wins.

use std::borrow::Borrow;

use crate::core::config::TreeConfig;
use crate::core::error::{ReorderError, Result};
use crate::core::node::Node;

/// Row texts of the list box, indexed by canonical position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    items: Vec<String>,
}

impl Alignment {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }
}

/// How to find the instance name inside a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matcher {
    delimiter: Option<String>,
    position: usize,
}

impl Matcher {
    /// A `None` delimiter falls back to substring search, which is ambiguous
    /// when one instance name contains another.
    pub fn new(delimiter: Option<&str>, position: usize) -> Self {
        Self {
            delimiter: delimiter.filter(|d| !d.is_empty()).map(str::to_string),
            position,
        }
    }

    pub fn from_config(tree: &TreeConfig) -> Self {
        Self::new(tree.delimiter(), tree.in_position)
    }

    /// Instance token of a row, or the whole row when no delimiter is set
    pub fn token<'a>(&self, label: &'a str) -> Result<&'a str> {
        match &self.delimiter {
            None => Ok(label),
            Some(delimiter) => label.split(delimiter.as_str()).nth(self.position).ok_or_else(|| {
                ReorderError::TokenOutOfRange {
                    label: label.to_string(),
                    position: self.position,
                }
            }),
        }
    }

    fn matches(&self, label: &str, instance_name: &str) -> Result<bool> {
        match &self.delimiter {
            None => Ok(label.contains(instance_name)),
            Some(_) => Ok(self.token(label)? == instance_name),
        }
    }

    /// Align `items` (list box rows, current order) to `canonical` nodes.
    ///
    /// Fails before anything else when the counts differ, and fails as a
    /// whole when any node has no row.
    pub fn align<T: Borrow<Node>>(&self, canonical: &[T], items: &[String]) -> Result<Alignment> {
        if canonical.len() != items.len() {
            tracing::warn!(
                nodes = canonical.len(),
                items = items.len(),
                "Cannot assign all items from assembly to the list box"
            );
            return Err(ReorderError::ListSizeMismatch {
                expected: canonical.len(),
                found: items.len(),
            });
        }

        if self.delimiter.is_none() {
            tracing::warn!("No delimiter for tree nodes set. This may cause inconsistent results.");
        }

        let mut consumed = vec![false; items.len()];
        let mut aligned = Vec::with_capacity(items.len());

        for node in canonical {
            let node = node.borrow();
            let mut found = None;
            for (index, item) in items.iter().enumerate() {
                if !consumed[index] && self.matches(item, &node.instance_name)? {
                    found = Some(index);
                    break;
                }
            }

            match found {
                Some(index) => {
                    consumed[index] = true;
                    aligned.push(items[index].clone());
                }
                None => {
                    tracing::warn!(
                        instance_name = %node.instance_name,
                        part_number = %node.part_number,
                        "No list item matches node"
                    );
                    return Err(ReorderError::UnmatchedNode {
                        instance_name: node.instance_name.clone(),
                    });
                }
            }
        }

        tracing::info!(items = aligned.len(), "Assigned product items to the appropriate tree items");
        Ok(Alignment { items: aligned })
    }
}
