//! Instance renumbering
//!
//! Every child is renamed to `{part_number}.{n}`, where `n` counts the
//! occurrences of its part number in tree order starting at the configured
//! start index. Group placeholders keep their names but still advance the
//! counter of their part number.
//!
//! The host rejects a rename to a name a sibling already holds, which
//! happens as soon as two nodes swap suffixes. So renaming runs in two
//! passes: first every node gets a transient name derived from a hash of
//! its final name, then every node gets its final name.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

use crate::core::error::{ReorderError, Result};
use crate::core::node::Node;
use crate::core::product::Product;

/// Final instance names in tree order; `None` for nodes that keep their name
pub fn final_labels(nodes: &[Node], start_index: u32) -> Result<Vec<Option<String>>> {
    let mut counters: HashMap<&str, u32> = HashMap::new();
    let mut labels = Vec::with_capacity(nodes.len());

    for node in nodes {
        let index = match counters.get_mut(node.part_number.as_str()) {
            Some(counter) => {
                *counter = counter.checked_add(1).ok_or_else(|| ReorderError::IndexOverflow {
                    part_number: node.part_number.clone(),
                    start_index,
                })?;
                *counter
            }
            None => {
                counters.insert(node.part_number.as_str(), start_index);
                start_index
            }
        };

        if node.is_group_identifier() {
            labels.push(None);
        } else {
            labels.push(Some(format!("{}.{}", node.part_number, index)));
        }
    }

    Ok(labels)
}

/// Transient name used during the first pass. It never contains a `.`,
/// so it cannot collide with any final name.
pub fn transient_label(final_label: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(final_label.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..16].to_string()
}

/// Result of a renumbering run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenumberReport {
    /// Nodes whose final name differs from their name before the run
    pub renamed: usize,
    /// Group placeholders left untouched
    pub skipped: usize,
}

/// Renumber all children of `product` in place
pub fn renumber(product: &mut Product, start_index: u32) -> Result<RenumberReport> {
    tracing::info!(start_index, "Renumbering all nodes...");

    let labels = final_labels(&product.nodes, start_index)?;
    let before: Vec<String> = product.nodes.iter().map(|n| n.instance_name.clone()).collect();

    for (index, label) in labels.iter().enumerate() {
        if let Some(label) = label {
            product.rename(index, &transient_label(label))?;
        }
    }

    for (index, label) in labels.iter().enumerate() {
        if let Some(label) = label {
            product.rename(index, label)?;
        }
    }

    let report = RenumberReport {
        renamed: labels
            .iter()
            .zip(&before)
            .filter(|(label, old)| label.as_deref().is_some_and(|l| l != old.as_str()))
            .count(),
        skipped: labels.iter().filter(|l| l.is_none()).count(),
    };

    tracing::info!(renamed = report.renamed, skipped = report.skipped, "Renumbered nodes");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::node::{Source, PROP_GROUP_IDENTIFIER};

    fn product(part_numbers: &[&str]) -> Product {
        let mut product = Product::new("ASM");
        for (i, pn) in part_numbers.iter().enumerate() {
            product.nodes.push(Node::new(*pn, format!("node-{}", i), Source::Made));
        }
        product
    }

    fn names(product: &Product) -> Vec<&str> {
        product.nodes.iter().map(|n| n.instance_name.as_str()).collect()
    }

    #[test]
    fn test_final_labels_count_per_part_number() {
        let product = product(&["A", "B", "A", "A"]);
        let labels = final_labels(&product.nodes, 1).unwrap();
        assert_eq!(
            labels,
            vec![
                Some("A.1".to_string()),
                Some("B.1".to_string()),
                Some("A.2".to_string()),
                Some("A.3".to_string())
            ]
        );
    }

    #[test]
    fn test_start_index() {
        let product = product(&["A", "A"]);
        let labels = final_labels(&product.nodes, 0).unwrap();
        assert_eq!(labels, vec![Some("A.0".to_string()), Some("A.1".to_string())]);
    }

    #[test]
    fn test_index_overflow_is_an_error() {
        let repeated = product(&["A", "B", "A"]);
        let err = final_labels(&repeated.nodes, u32::MAX).unwrap_err();
        assert!(matches!(err, ReorderError::IndexOverflow { ref part_number, .. } if part_number == "A"));

        // One node per part number still fits
        let distinct = product(&["A", "B"]);
        let labels = final_labels(&distinct.nodes, u32::MAX).unwrap();
        assert_eq!(labels[0], Some(format!("A.{}", u32::MAX)));
    }

    #[test]
    fn test_overflow_leaves_names_untouched() {
        let mut product = product(&["A", "A"]);
        let before = product.clone();
        assert!(renumber(&mut product, u32::MAX).is_err());
        assert_eq!(product, before);
    }

    #[test]
    fn test_transient_labels_disjoint_from_final_labels() {
        let product = product(&["A", "B", "A", "A"]);
        let finals: Vec<String> = final_labels(&product.nodes, 1).unwrap().into_iter().flatten().collect();
        let transients: Vec<String> = finals.iter().map(|l| transient_label(l)).collect();

        for t in &transients {
            assert!(!finals.contains(t));
            assert!(!t.contains('.'));
        }
        let mut unique = transients.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), transients.len());
    }

    #[test]
    fn test_renumber() {
        let mut product = product(&["A", "B", "A", "A"]);
        let report = renumber(&mut product, 1).unwrap();
        assert_eq!(names(&product), vec!["A.1", "B.1", "A.2", "A.3"]);
        assert_eq!(report.renamed, 4);
        assert_eq!(report.skipped, 0);
    }

    #[test]
    fn test_swapped_suffixes_need_the_transient_pass() {
        let mut product = Product::new("ASM");
        product.nodes.push(Node::new("A", "A.2", Source::Made));
        product.nodes.push(Node::new("A", "A.1", Source::Made));

        // A direct rename would collide with the sibling
        let mut direct = product.clone();
        assert!(matches!(
            direct.rename(0, "A.1"),
            Err(ReorderError::DuplicateInstanceName { .. })
        ));

        renumber(&mut product, 1).unwrap();
        assert_eq!(names(&product), vec!["A.1", "A.2"]);
    }

    #[test]
    fn test_group_identifiers_keep_names_but_advance_counter() {
        let mut product = product(&["A", "A", "A"]);
        product.nodes[1] = Node::new("A", " -  - .0", Source::Made).with_property(PROP_GROUP_IDENTIFIER, "1");
        let report = renumber(&mut product, 1).unwrap();
        assert_eq!(names(&product), vec!["A.1", " -  - .0", "A.3"]);
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn test_renumber_is_idempotent() {
        let mut product = product(&["A", "B", "A"]);
        renumber(&mut product, 1).unwrap();
        let report = renumber(&mut product, 1).unwrap();
        assert_eq!(report.renamed, 0);
        assert_eq!(names(&product), vec!["A.1", "B.1", "A.2"]);
    }
}
