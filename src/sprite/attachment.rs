//! What a sprite is attached to

use crate::graph::{EdgeId, NodeId};

/// The host of a sprite: nothing, one node, or one edge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Attachment {
    #[default]
    None,
    Node(NodeId),
    Edge(EdgeId),
}

impl Attachment {
    pub fn is_attached(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn node(&self) -> Option<&NodeId> {
        match self {
            Self::Node(id) => Some(id),
            _ => None,
        }
    }

    pub fn edge(&self) -> Option<&EdgeId> {
        match self {
            Self::Edge(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_on_node(&self, node: &NodeId) -> bool {
        self.node() == Some(node)
    }

    pub fn is_on_edge(&self, edge: &EdgeId) -> bool {
        self.edge() == Some(edge)
    }
}

impl std::fmt::Display for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "detached"),
            Self::Node(id) => write!(f, "node {}", id),
            Self::Edge(id) => write!(f, "edge {}", id),
        }
    }
}
