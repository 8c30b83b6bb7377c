//! Group placeholder synthesis
//!
//! Children can carry a group property. For every distinct group an empty
//! placeholder child is created that sorts in front of the group's members
//! and acts as a visual separator in the tree. Placeholders are flagged with
//! [`PROP_GROUP_IDENTIFIER`] and hidden from the bill of materials.

use crate::core::config::{PropsConfig, TreeConfig};
use crate::core::error::Result;
use crate::core::node::{Source, PROP_GROUP_IDENTIFIER, PROP_NO_BOM};
use crate::core::product::Product;

/// Catch-all bucket for children without a group
pub const NO_GROUP: &str = "NO GROUP";

/// Width the separator name is padded to
const SEPARATOR_WIDTH: usize = 70;

/// A group found on the children, in first-seen order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupEntry {
    pub name: String,
    /// Source of the last member seen; the placeholder inherits it so that it
    /// sorts with its members
    pub source: Source,
}

/// Creates and removes group placeholders on a product
#[derive(Debug, Clone)]
pub struct GroupSynthesis<'c> {
    tree: &'c TreeConfig,
    props: &'c PropsConfig,
}

impl<'c> GroupSynthesis<'c> {
    pub fn new(tree: &'c TreeConfig, props: &'c PropsConfig) -> Self {
        Self { tree, props }
    }

    /// Remove all existing placeholders, returning how many were removed
    pub fn remove(&self, product: &mut Product) -> Result<usize> {
        tracing::info!("Indexing existing group identifiers...");
        let names: Vec<String> = product
            .nodes
            .iter()
            .filter(|n| n.is_group_identifier())
            .map(|n| n.instance_name.clone())
            .collect();

        for name in &names {
            let node = product.remove_node(name)?;
            tracing::info!(part_number = %node.part_number, "Removed group identifier");
        }
        Ok(names.len())
    }

    /// Distinct groups of the non-placeholder children. The catch-all bucket
    /// always comes first and is sourced as bought so that ungrouped
    /// children end up last.
    pub fn collect(&self, product: &Product) -> Vec<GroupEntry> {
        tracing::info!("Reading existing groups from properties...");
        let mut groups = vec![GroupEntry {
            name: NO_GROUP.to_string(),
            source: Source::Bought,
        }];

        for node in product.nodes.iter().filter(|n| !n.is_group_identifier()) {
            let Some(group) = node.properties.get(&self.props.group) else {
                continue;
            };
            match groups.iter_mut().find(|g| g.name == group) {
                Some(entry) => entry.source = node.source,
                None => groups.push(GroupEntry {
                    name: group.to_string(),
                    source: node.source,
                }),
            }
        }

        groups
    }

    /// Part number of the placeholder for `group`
    pub fn placeholder_part_number(&self, group: &str) -> String {
        format!(
            "{}{}{}",
            self.tree.group_prefix,
            group.to_uppercase(),
            self.tree.group_postfix
        )
    }

    /// Replace all placeholders with fresh ones. Returns the instance names
    /// of the created placeholders, catch-all first.
    pub fn create(&self, product: &mut Product) -> Result<Vec<String>> {
        self.remove(product)?;
        let groups = self.collect(product);

        let mut created = Vec::with_capacity(groups.len());
        for (index, group) in groups.iter().enumerate() {
            let part_number = self.placeholder_part_number(&group.name);
            let slot = product.add_new_node(&part_number, group.source);
            product.rename(slot, &separator_name(&part_number, index))?;

            let node = &mut product.nodes[slot];
            node.properties.set(PROP_GROUP_IDENTIFIER, "1");
            node.properties.set(PROP_NO_BOM, "1");
            // The catch-all echoes no group so it sorts behind grouped children
            if index > 0 {
                node.properties.set(self.props.group.clone(), group.name.clone());
            }

            tracing::info!(part_number = %part_number, source = %group.source, "Created new product");
            created.push(node.instance_name.clone());
        }

        Ok(created)
    }
}

/// A line of ` - ` padding followed by `.{index}`
fn separator_name(part_number: &str, index: usize) -> String {
    let repeat = SEPARATOR_WIDTH.saturating_sub(part_number.chars().count());
    format!("{}.{}", " - ".repeat(repeat), index)
}
