//! Sprite state as the renderer reads it

use super::attachment::Attachment;
use crate::graph::{AttributeValue, Attributes, EdgeId, NodeId, PositionValue, Units};
use serde::{Deserialize, Serialize};

/// Unique identifier for a sprite
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpriteId(String);

impl SpriteId {
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SpriteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SpriteId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SpriteId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Screen-space box the renderer computed for a sprite, in graph units
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl Bounds {
    /// 2-D containment, exclusive on every side
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x > self.x && y > self.y && x < self.x + self.width && y < self.y + self.height
    }
}

/// A positioned visual marker, optionally attached to a node or an edge.
///
/// Sprites belong to a [`GraphicGraph`](crate::GraphicGraph); mutation goes
/// through [`SpriteMut`](super::SpriteMut) so the graph mirrors stay in step.
#[derive(Debug, Clone)]
pub struct GraphicSprite {
    pub(crate) id: SpriteId,
    pub(crate) position: PositionValue,
    pub(crate) bounds: Bounds,
    pub(crate) attachment: Attachment,
    pub(crate) attributes: Attributes,
}

impl GraphicSprite {
    pub(crate) fn new(id: SpriteId, position: PositionValue) -> Self {
        Self {
            id,
            position,
            bounds: Bounds::default(),
            attachment: Attachment::None,
            attributes: Attributes::new(),
        }
    }

    pub fn id(&self) -> &SpriteId {
        &self.id
    }

    pub fn position(&self) -> &PositionValue {
        &self.position
    }

    pub fn x(&self) -> f64 {
        self.position.x()
    }

    pub fn y(&self) -> f64 {
        self.position.y()
    }

    pub fn z(&self) -> f64 {
        self.position.z()
    }

    pub fn units(&self) -> Units {
        self.position.units()
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn attachment(&self) -> &Attachment {
        &self.attachment
    }

    pub fn node_attachment(&self) -> Option<&NodeId> {
        self.attachment.node()
    }

    pub fn edge_attachment(&self) -> Option<&EdgeId> {
        self.attachment.edge()
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Hit test against the renderer bounds. Only x and y are checked.
    pub fn contains(&self, x: f64, y: f64, _z: f64) -> bool {
        self.bounds.contains(x, y)
    }
}
