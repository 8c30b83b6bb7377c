//! The parent product whose direct children get reordered

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{ReorderError, Result};
use crate::core::node::{Node, Source};
use crate::yaml::YamlSyntaxError;

/// A product (assembly) and its ordered direct children
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Part number of the product itself
    pub part_number: String,

    /// Direct children in tree order
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl Product {
    pub fn new(part_number: impl Into<String>) -> Self {
        Self {
            part_number: part_number.into(),
            nodes: Vec::new(),
        }
    }

    /// Load a product from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents, &path.display().to_string())
    }

    /// Parse a product, reporting errors against `filename`
    pub fn from_yaml(contents: &str, filename: &str) -> Result<Self> {
        let product: Product = serde_yml::from_str(contents)
            .map_err(|e| YamlSyntaxError::from_serde_error(&e, contents, filename))?;
        product.check_unique_names()?;
        Ok(product)
    }

    /// Write the product back as YAML
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_yml::to_string(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn check_unique_names(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.instance_name.as_str()) {
                return Err(ReorderError::DuplicateInstanceName {
                    name: node.instance_name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Children that can be sorted (parts and products)
    pub fn processable(&self) -> Vec<&Node> {
        self.nodes.iter().filter(|n| n.is_processable()).collect()
    }

    pub fn position(&self, instance_name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.instance_name == instance_name)
    }

    /// Rename a child. Like the host application, a name already held by a
    /// sibling is rejected.
    pub fn rename(&mut self, index: usize, new_name: &str) -> Result<()> {
        if self
            .nodes
            .iter()
            .enumerate()
            .any(|(i, n)| i != index && n.instance_name == new_name)
        {
            return Err(ReorderError::DuplicateInstanceName {
                name: new_name.to_string(),
            });
        }

        let node = self.nodes.get_mut(index).ok_or_else(|| ReorderError::NodeNotFound {
            name: format!("#{}", index),
        })?;
        node.instance_name = new_name.to_string();
        Ok(())
    }

    /// Append a new child product and return its index. The host assigns a
    /// free `{part_number}.{n}` instance name.
    pub fn add_new_node(&mut self, part_number: &str, source: Source) -> usize {
        let mut n = 1;
        let name = loop {
            let candidate = format!("{}.{}", part_number, n);
            if self.position(&candidate).is_none() {
                break candidate;
            }
            n += 1;
        };
        self.nodes.push(Node::new(part_number, name, source));
        self.nodes.len() - 1
    }

    /// Remove a child by instance name
    pub fn remove_node(&mut self, instance_name: &str) -> Result<Node> {
        let index = self
            .position(instance_name)
            .ok_or_else(|| ReorderError::NodeNotFound {
                name: instance_name.to_string(),
            })?;
        Ok(self.nodes.remove(index))
    }

    /// Reorder the processable children to follow `order` (instance names).
    /// Non-processable children keep their slots.
    pub fn reorder(&mut self, order: &[String]) -> Result<()> {
        let slots: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_processable())
            .map(|(i, _)| i)
            .collect();

        if slots.len() != order.len() {
            return Err(ReorderError::ListSizeMismatch {
                expected: slots.len(),
                found: order.len(),
            });
        }

        let mut reordered = Vec::with_capacity(order.len());
        for name in order {
            let index = self
                .position(name)
                .filter(|i| slots.contains(i))
                .ok_or_else(|| ReorderError::NodeNotFound { name: name.clone() })?;
            reordered.push(self.nodes[index].clone());
        }

        for (slot, node) in slots.into_iter().zip(reordered) {
            self.nodes[slot] = node;
        }
        Ok(())
    }
}
