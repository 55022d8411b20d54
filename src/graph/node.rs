//! Node representation in the graphic graph

use super::attributes::Attributes;
use super::value::AttributeValue;
use serde::{Deserialize, Serialize};

/// Unique identifier for a node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a NodeId from a string
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A node with its layout coordinates and attributes
#[derive(Debug, Clone)]
pub struct GraphicNode {
    /// Unique identifier
    pub id: NodeId,
    /// Layout coordinates, in graph units
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub(crate) attributes: Attributes,
}

impl GraphicNode {
    /// Create a node at the origin
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            attributes: Attributes::new(),
        }
    }

    /// Place the node
    pub fn at(mut self, x: f64, y: f64, z: f64) -> Self {
        self.x = x;
        self.y = y;
        self.z = z;
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains(key)
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}
