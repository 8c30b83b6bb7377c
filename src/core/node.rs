//! Product tree nodes - the direct children of the product being reordered

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Property flagging a synthetic group placeholder node
pub const PROP_GROUP_IDENTIFIER: &str = "reorder_tree.group_identifier";

/// Property flagging a node that must not appear in the bill of materials
pub const PROP_NO_BOM: &str = "reorder_tree.no_bom";

/// Manufacturing source of a node.
///
/// The numeric codes are the ones the host application uses and are what
/// the sort key compares: unknown (0) < made (1) < bought (2).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Source {
    #[default]
    Unknown = 0,
    Made = 1,
    Bought = 2,
}

impl Source {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Source::Unknown),
            1 => Some(Source::Made),
            2 => Some(Source::Bought),
            _ => None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Unknown => write!(f, "unknown"),
            Source::Made => write!(f, "made"),
            Source::Bought => write!(f, "bought"),
        }
    }
}

impl std::str::FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unknown" | "0" => Ok(Source::Unknown),
            "made" | "1" => Ok(Source::Made),
            "bought" | "2" => Ok(Source::Bought),
            _ => Err(format!("Unknown source: {}", s)),
        }
    }
}

impl Serialize for Source {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Source {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(u8),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Code(code) => Source::from_code(code).ok_or_else(|| {
                serde::de::Error::custom(format!("invalid source code {} (expected 0, 1 or 2)", code))
            }),
            Raw::Name(name) => name.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Document type behind a node. Only parts and products can be reordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    #[default]
    Part,
    Product,
    Other,
}

/// User defined string properties of a node, looked up by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyBag(BTreeMap<String, String>);

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exists(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One direct child of the product tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Part number of the referenced document (not unique across the tree)
    pub part_number: String,

    /// Instance name shown in the tree (unique among siblings)
    pub instance_name: String,

    /// Manufacturing source
    #[serde(default)]
    pub source: Source,

    /// Document type
    #[serde(default)]
    pub kind: NodeKind,

    /// Whether the node is shown in the bill of materials
    #[serde(default = "default_in_bom")]
    pub in_bom: bool,

    /// User defined properties of the referenced product
    #[serde(default, skip_serializing_if = "PropertyBag::is_empty")]
    pub properties: PropertyBag,
}

fn default_in_bom() -> bool {
    true
}

impl Node {
    pub fn new(part_number: impl Into<String>, instance_name: impl Into<String>, source: Source) -> Self {
        Self {
            part_number: part_number.into(),
            instance_name: instance_name.into(),
            source,
            kind: NodeKind::Part,
            in_bom: true,
            properties: PropertyBag::new(),
        }
    }

    /// Builder style property setter, mostly for tests and fixtures
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.set(key, value);
        self
    }

    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Synthetic placeholder created by group synthesis
    pub fn is_group_identifier(&self) -> bool {
        self.properties.exists(PROP_GROUP_IDENTIFIER)
    }

    /// Parts and products take part in sorting; anything else is left alone
    pub fn is_processable(&self) -> bool {
        matches!(self.kind, NodeKind::Part | NodeKind::Product)
    }
}
