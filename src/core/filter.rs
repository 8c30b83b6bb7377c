//! Sort keys for product tree nodes
//!
//! The canonical order of a product's children is the ascending order of
//! their [`SortKey`]s. Sorting is stable, so nodes with equal keys keep their
//! relative tree order.

use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;

use crate::core::config::{FilterKind, PropsConfig};
use crate::core::node::{Node, Source, PROP_GROUP_IDENTIFIER};

/// Rank of a present optional field; sorts before [`ABSENT`]
const PRESENT: u8 = 1;
const ABSENT: u8 = 2;

/// Ordering key of a node, compared field by field
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct SortKey {
    pub source: Source,
    pub group_rank: u8,
    pub group: String,
    pub identifier_rank: u8,
    pub group_identifier: String,
    pub filter_tag: String,
    pub part_number: String,
    pub instance_name: String,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {:?}, {}, {:?}, {:?}, {:?}, {:?})",
            self.source.code(),
            self.group_rank,
            self.group,
            self.identifier_rank,
            self.group_identifier,
            self.filter_tag,
            self.part_number,
            self.instance_name
        )
    }
}

/// Computes sort keys from node properties
#[derive(Debug, Clone)]
pub struct Filter {
    kind: FilterKind,
    props: PropsConfig,
}

impl Filter {
    pub fn new(kind: FilterKind, props: PropsConfig) -> Self {
        Self { kind, props }
    }

    /// Sort key of a node. Absent properties map to the absent rank and an
    /// empty string; this never fails.
    pub fn key(&self, node: &Node) -> SortKey {
        let filter_tag = match node.source {
            Source::Bought => node.properties.get(&self.props.filter).unwrap_or_default(),
            _ => "",
        };

        let key = match self.kind {
            FilterKind::Default => {
                let group = node.properties.get(&self.props.group);
                let identifier = node.properties.get(PROP_GROUP_IDENTIFIER);
                SortKey {
                    source: node.source,
                    group_rank: rank(group),
                    group: group.unwrap_or_default().to_string(),
                    identifier_rank: rank(identifier),
                    group_identifier: identifier.unwrap_or_default().to_string(),
                    filter_tag: filter_tag.to_string(),
                    part_number: node.part_number.clone(),
                    instance_name: node.instance_name.clone(),
                }
            }
            FilterKind::Simple => SortKey {
                filter_tag: filter_tag.to_string(),
                part_number: node.part_number.clone(),
                ..neutral(node)
            },
            FilterKind::Source => neutral(node),
        };

        tracing::trace!(node = %node.instance_name, key = %key, "Filter key");
        key
    }

    /// Stable sort by key, each key computed once
    pub fn sort<T: Borrow<Node>>(&self, nodes: &mut [T]) {
        nodes.sort_by_cached_key(|n| self.key(n.borrow()));
    }
}

fn rank(value: Option<&str>) -> u8 {
    if value.is_some() {
        PRESENT
    } else {
        ABSENT
    }
}

/// Key that only distinguishes source and instance name
fn neutral(node: &Node) -> SortKey {
    SortKey {
        source: node.source,
        group_rank: ABSENT,
        group: String::new(),
        identifier_rank: ABSENT,
        group_identifier: String::new(),
        filter_tag: String::new(),
        part_number: String::new(),
        instance_name: node.instance_name.clone(),
    }
}
