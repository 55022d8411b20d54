//! GraphicGraph: the graph a renderer draws, with its sprites

use super::edge::{EdgeId, GraphicEdge};
use super::node::{GraphicNode, NodeId};
use super::store::GraphStore;
use super::value::{AttributeValue, PositionValue, Units};
use crate::sprite::{mirror, Attachment, GraphicSprite, SpriteId, SpriteMut};
use crate::stream::{ObserverHandle, ObserverId, ObserverList, StreamError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Errors that can occur in graph and sprite operations
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Edge not found: {0}")]
    EdgeNotFound(EdgeId),

    #[error("Sprite not found: {0}")]
    SpriteNotFound(SpriteId),

    #[error("Sprite already exists: {0}")]
    SpriteExists(SpriteId),

    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    #[error(transparent)]
    Stream(#[from] StreamError),
}

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Unique identifier for a graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphId(String);

impl GraphId {
    /// Create a new random GraphId (UUID-based)
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for GraphId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GraphId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GraphId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A graph of positioned nodes, edges and sprites.
///
/// Attribute writes on the graph and its elements are announced to the
/// registered observers as they happen. The dirty flag tells the renderer a
/// redraw is due; it has a single writer, whoever owns the graph.
#[derive(Debug)]
pub struct GraphicGraph {
    store: GraphStore,
    sprites: BTreeMap<SpriteId, GraphicSprite>,
}

impl GraphicGraph {
    /// Create an empty graph with a random id
    pub fn new() -> Self {
        Self::with_id(GraphId::new())
    }

    pub fn with_id(id: impl Into<GraphId>) -> Self {
        Self {
            store: GraphStore::new(id.into()),
            sprites: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &GraphId {
        self.store.id()
    }

    // Observers and redraw flag

    pub fn add_observer(&self, observer: ObserverHandle) -> ObserverId {
        self.store.observers().add(observer)
    }

    pub fn remove_observer(&self, id: ObserverId) -> bool {
        self.store.observers().remove(id)
    }

    /// The graph's attribute observers, shared
    pub fn observers(&self) -> ObserverList {
        self.store.observers().clone()
    }

    pub fn mark_dirty(&mut self) {
        self.store.mark_dirty();
    }

    pub fn is_dirty(&self) -> bool {
        self.store.is_dirty()
    }

    /// Read and clear the dirty flag
    pub fn consume_dirty(&mut self) -> bool {
        self.store.consume_dirty()
    }

    // Graph attributes

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.store.attribute(key)
    }

    /// Store a value, announcing it as added, or as changed if the key exists
    pub fn add_attribute(&mut self, key: &str, value: impl Into<AttributeValue>) -> GraphResult<()> {
        self.store.add_attribute(key, value.into())
    }

    /// Store a value, announcing it only if it differs from the stored one.
    /// Returns whether anything changed.
    pub fn set_attribute(&mut self, key: &str, value: impl Into<AttributeValue>) -> GraphResult<bool> {
        self.store.set_attribute(key, value.into())
    }

    pub fn remove_attribute(&mut self, key: &str) -> GraphResult<Option<AttributeValue>> {
        self.store.remove_attribute(key)
    }

    // Nodes

    /// Insert a node. Re-adding an existing id moves that node and keeps its
    /// attributes.
    pub fn add_node(&mut self, node: GraphicNode) -> NodeId {
        let id = node.id.clone();
        self.store.insert_node(node);
        self.store.mark_dirty();
        id
    }

    pub fn node(&self, id: &NodeId) -> Option<&GraphicNode> {
        self.store.node(id)
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &GraphicNode> {
        self.store.nodes()
    }

    pub fn node_count(&self) -> usize {
        self.store.node_count()
    }

    pub fn move_node(&mut self, id: &NodeId, x: f64, y: f64, z: f64) -> GraphResult<()> {
        let node = self
            .store
            .node_mut(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.clone()))?;
        node.x = x;
        node.y = y;
        node.z = z;
        self.store.mark_dirty();
        Ok(())
    }

    /// Remove a node with its edges. Sprites attached to any of them are
    /// detached first.
    pub fn remove_node(&mut self, id: &NodeId) -> GraphResult<GraphicNode> {
        if self.store.node(id).is_none() {
            return Err(GraphError::NodeNotFound(id.clone()));
        }
        let incident: Vec<EdgeId> = self
            .store
            .edges()
            .filter(|e| e.touches(id))
            .map(|e| e.id.clone())
            .collect();
        for edge in &incident {
            self.remove_edge(edge)?;
        }
        self.detach_sprites(|attachment| attachment.is_on_node(id))?;

        let node = self
            .store
            .take_node(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.clone()))?;
        self.store.mark_dirty();
        Ok(node)
    }

    pub fn node_attribute(&self, id: &NodeId, key: &str) -> Option<&AttributeValue> {
        self.store.node(id).and_then(|n| n.attribute(key))
    }

    pub fn add_node_attribute(
        &mut self,
        id: &NodeId,
        key: &str,
        value: impl Into<AttributeValue>,
    ) -> GraphResult<()> {
        self.store.add_node_attribute(id, key, value.into())
    }

    pub fn set_node_attribute(
        &mut self,
        id: &NodeId,
        key: &str,
        value: impl Into<AttributeValue>,
    ) -> GraphResult<bool> {
        self.store.set_node_attribute(id, key, value.into())
    }

    pub fn remove_node_attribute(
        &mut self,
        id: &NodeId,
        key: &str,
    ) -> GraphResult<Option<AttributeValue>> {
        self.store.remove_node_attribute(id, key)
    }

    // Edges

    /// Insert an edge between two existing nodes. Re-adding an existing id
    /// rewires that edge and keeps its attributes.
    pub fn add_edge(&mut self, edge: GraphicEdge) -> GraphResult<EdgeId> {
        let id = edge.id.clone();
        self.store.insert_edge(edge)?;
        self.store.mark_dirty();
        Ok(id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&GraphicEdge> {
        self.store.edge(id)
    }

    pub fn edges(&self) -> impl Iterator<Item = &GraphicEdge> {
        self.store.edges()
    }

    pub fn edge_count(&self) -> usize {
        self.store.edge_count()
    }

    /// Remove an edge, detaching the sprites it carries
    pub fn remove_edge(&mut self, id: &EdgeId) -> GraphResult<GraphicEdge> {
        if self.store.edge(id).is_none() {
            return Err(GraphError::EdgeNotFound(id.clone()));
        }
        self.detach_sprites(|attachment| attachment.is_on_edge(id))?;
        let edge = self
            .store
            .take_edge(id)
            .ok_or_else(|| GraphError::EdgeNotFound(id.clone()))?;
        self.store.mark_dirty();
        Ok(edge)
    }

    pub fn edge_attribute(&self, id: &EdgeId, key: &str) -> Option<&AttributeValue> {
        self.store.edge(id).and_then(|e| e.attribute(key))
    }

    pub fn add_edge_attribute(
        &mut self,
        id: &EdgeId,
        key: &str,
        value: impl Into<AttributeValue>,
    ) -> GraphResult<()> {
        self.store.add_edge_attribute(id, key, value.into())
    }

    pub fn set_edge_attribute(
        &mut self,
        id: &EdgeId,
        key: &str,
        value: impl Into<AttributeValue>,
    ) -> GraphResult<bool> {
        self.store.set_edge_attribute(id, key, value.into())
    }

    pub fn remove_edge_attribute(
        &mut self,
        id: &EdgeId,
        key: &str,
    ) -> GraphResult<Option<AttributeValue>> {
        self.store.remove_edge_attribute(id, key)
    }

    // Sprites

    /// Create a sprite.
    ///
    /// The sprite starts at the first node's coordinates, or at the origin
    /// when the graph has no node. Its position is mirrored at
    /// `ui.sprite.<id>` unless that attribute already exists.
    pub fn add_sprite(&mut self, id: impl Into<SpriteId>) -> GraphResult<SpriteMut<'_>> {
        let id = id.into();
        if self.sprites.contains_key(&id) {
            return Err(GraphError::SpriteExists(id));
        }

        let position = match self.store.nodes().next() {
            Some(node) => PositionValue::new(Units::GraphUnits, node.x, node.y, node.z),
            None => PositionValue::zero(),
        };
        let key = mirror::position_key(&id);
        if self.store.attribute(&key).is_none() {
            self.store.add_attribute(&key, position.clone().into())?;
        }
        self.store.mark_dirty();
        debug!(sprite = %id, %position, "sprite added");

        let sprite = self
            .sprites
            .entry(id.clone())
            .or_insert_with(|| GraphicSprite::new(id, position));
        Ok(SpriteMut::new(sprite, &mut self.store))
    }

    pub fn sprite(&self, id: &SpriteId) -> Option<&GraphicSprite> {
        self.sprites.get(id)
    }

    /// Mutable access to a sprite, together with the graph it mirrors into
    pub fn sprite_mut(&mut self, id: &SpriteId) -> Option<SpriteMut<'_>> {
        let sprite = self.sprites.get_mut(id)?;
        Some(SpriteMut::new(sprite, &mut self.store))
    }

    /// Sprites ordered by id
    pub fn sprites(&self) -> impl Iterator<Item = &GraphicSprite> {
        self.sprites.values()
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    /// Destroy a sprite: detach it, then drop its graph mirror
    pub fn remove_sprite(&mut self, id: &SpriteId) -> GraphResult<GraphicSprite> {
        self.sprite_mut(id)
            .ok_or_else(|| GraphError::SpriteNotFound(id.clone()))?
            .detach()?;
        self.store.remove_attribute(&mirror::position_key(id))?;
        self.store.mark_dirty();
        debug!(sprite = %id, "sprite removed");
        self.sprites
            .remove(id)
            .ok_or_else(|| GraphError::SpriteNotFound(id.clone()))
    }

    fn detach_sprites(&mut self, hosted_by: impl Fn(&Attachment) -> bool) -> GraphResult<()> {
        let hosted: Vec<SpriteId> = self
            .sprites
            .values()
            .filter(|s| hosted_by(s.attachment()))
            .map(|s| s.id().clone())
            .collect();
        for id in hosted {
            if let Some(mut sprite) = self.sprite_mut(&id) {
                sprite.detach()?;
            }
        }
        Ok(())
    }
}

impl Default for GraphicGraph {
    fn default() -> Self {
        Self::new()
    }
}
